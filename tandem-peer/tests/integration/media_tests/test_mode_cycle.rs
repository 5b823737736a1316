use tandem_core::{Membership, Mode};
use tandem_peer::ModeState;

use crate::integration::{init_tracing, spawn_session};

#[tokio::test]
async fn test_video_chat_video_keeps_one_capture() {
    init_tracing();

    let user = spawn_session(Membership::join("R9"));
    let audio = user.peer.audio();
    let video = user.peer.video();

    user.handle.switch_mode(Mode::Video).await.unwrap();
    assert_eq!(user.devices.active_captures(), 1);
    assert_eq!(*user.handle.mode().borrow(), ModeState::Active(Mode::Video));

    user.handle.switch_mode(Mode::Chat).await.unwrap();
    assert_eq!(user.devices.active_captures(), 0);
    assert!(audio.current().is_none());
    assert!(video.current().is_none());
    assert!(user.handle.preview().borrow().is_none());

    user.handle.switch_mode(Mode::Video).await.unwrap();
    assert_eq!(user.devices.acquired(), 2);
    assert_eq!(user.devices.active_captures(), 1);
    assert!(!user.devices.captures()[0].is_live());

    assert_eq!(
        audio.history(),
        [Some("mic-1".to_owned()), None, Some("mic-2".to_owned())]
    );
    assert_eq!(
        video.history(),
        [Some("cam-1".to_owned()), None, Some("cam-2".to_owned())]
    );

    // Track swaps never touch negotiation.
    assert!(user.peer.calls().is_empty());
    assert_eq!(user.peer.sender_requests(), 2);
}

#[tokio::test]
async fn test_reentering_video_is_noop() {
    init_tracing();

    let admin = spawn_session(Membership::create());

    admin.handle.switch_mode(Mode::Video).await.unwrap();
    admin.handle.switch_mode(Mode::Video).await.unwrap();

    assert_eq!(admin.devices.acquired(), 1);
    assert_eq!(admin.peer.video().history().len(), 1);
}

#[tokio::test]
async fn test_dashboard_releases_media() {
    init_tracing();

    let admin = spawn_session(Membership::create());

    admin.handle.switch_mode(Mode::Video).await.unwrap();
    admin.handle.switch_mode(Mode::Dashboard).await.unwrap();

    assert_eq!(admin.devices.active_captures(), 0);
    assert!(admin.peer.audio().current().is_none());
    assert_eq!(*admin.handle.mode().borrow(), ModeState::Active(Mode::Dashboard));
}

#[tokio::test]
async fn test_preview_follows_capture() {
    init_tracing();

    let admin = spawn_session(Membership::create());
    let preview = admin.handle.preview();

    admin.handle.switch_mode(Mode::Video).await.unwrap();

    let capture = preview.borrow().clone().expect("No preview after entering video");
    let sent = admin.peer.video().current().expect("Video sender is empty");
    assert!(capture.video().same_track(&sent));
}
