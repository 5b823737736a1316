use tandem_core::{MediaKind, Membership, Mode};
use tandem_peer::{MediaError, ModeState, SessionError};

use crate::integration::{init_tracing, spawn_session};

#[tokio::test]
async fn test_permission_denied_keeps_mode() {
    init_tracing();

    let admin = spawn_session(Membership::create());
    admin.handle.switch_mode(Mode::Chat).await.unwrap();
    admin.devices.deny();

    let result = admin.handle.switch_mode(Mode::Video).await;

    assert_eq!(
        result,
        Err(SessionError::Media(MediaError::PermissionDenied))
    );
    let state = *admin.handle.mode().borrow();
    assert_eq!(
        state,
        ModeState::Failed {
            mode: Mode::Chat,
            attempted: Mode::Video
        }
    );
    assert_eq!(state.mode(), Mode::Chat);
    assert!(admin.peer.audio().history().iter().all(Option::is_none));

    // Re-selecting video retries.
    admin.devices.allow();
    admin.handle.switch_mode(Mode::Video).await.unwrap();
    assert_eq!(*admin.handle.mode().borrow(), ModeState::Active(Mode::Video));
}

#[tokio::test]
async fn test_sender_failure_releases_capture() {
    init_tracing();

    let admin = spawn_session(Membership::create());
    admin.peer.video().fail_attach();

    let result = admin.handle.switch_mode(Mode::Video).await;

    assert!(matches!(
        result,
        Err(SessionError::Media(MediaError::Sender {
            kind: MediaKind::Video,
            ..
        }))
    ));
    assert_eq!(admin.devices.acquired(), 1);
    assert_eq!(admin.devices.active_captures(), 0);
    assert!(admin.peer.audio().current().is_none());
    assert!(admin.handle.preview().borrow().is_none());
    assert_eq!(admin.handle.mode().borrow().mode(), Mode::Dashboard);
}
