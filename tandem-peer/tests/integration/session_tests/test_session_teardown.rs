use tandem_core::{MediaKind, Membership, Mode};
use tandem_peer::{ChannelState, PeerEvent, RemoteTrack, SessionError, TransportState};

use crate::integration::{TestPeer, WAIT_TIMEOUT, init_tracing, spawn_session};

#[tokio::test]
async fn test_shutdown_releases_everything() {
    init_tracing();

    let responder = spawn_session(Membership::create());
    responder.handle.switch_mode(Mode::Video).await.unwrap();
    assert_eq!(responder.devices.active_captures(), 1);

    responder.handle.shutdown().await;

    assert!(responder.peer.is_closed());
    assert!(responder.signaling.is_closed());
    assert_eq!(responder.devices.active_captures(), 0);
    assert!(responder.handle.preview().borrow().is_none());

    let status = *responder.handle.status().borrow();
    assert_eq!(status.signaling, ChannelState::Closed);
    assert_eq!(status.transport, TransportState::Closed);

    tokio::time::timeout(WAIT_TIMEOUT, responder.task)
        .await
        .expect("Timeout waiting for session to finish")
        .expect("Session panicked");
}

#[tokio::test]
async fn test_commands_after_shutdown_fail() {
    init_tracing();

    let responder = spawn_session(Membership::create());
    responder.handle.shutdown().await;

    assert_eq!(
        responder.handle.send_chat("late").await,
        Err(SessionError::Closed)
    );
    assert_eq!(
        responder.handle.switch_mode(Mode::Video).await,
        Err(SessionError::Closed)
    );
    // Shutting down twice is harmless.
    responder.handle.shutdown().await;
    assert_eq!(responder.devices.acquired(), 0);
}

#[tokio::test]
async fn test_dropping_handles_ends_session() {
    init_tracing();

    let TestPeer {
        handle, peer, task, ..
    } = spawn_session(Membership::join("R7"));
    let second = handle.clone();
    drop(handle);
    drop(second);

    tokio::time::timeout(WAIT_TIMEOUT, task)
        .await
        .expect("Timeout waiting for session to finish")
        .expect("Session panicked");
    assert!(peer.is_closed());
}

#[tokio::test]
async fn test_remote_tracks_are_aggregated() {
    init_tracing();

    let initiator = spawn_session(Membership::join("R8"));
    let mut remote = initiator.handle.remote_media();

    initiator
        .peer_event(PeerEvent::RemoteTrack(RemoteTrack::new(
            "a1",
            MediaKind::Audio,
            "remote",
        )))
        .await;
    initiator
        .peer_event(PeerEvent::RemoteTrack(RemoteTrack::new(
            "v1",
            MediaKind::Video,
            "remote",
        )))
        .await;
    tokio::time::timeout(
        WAIT_TIMEOUT,
        remote.wait_for(|m| m.get(MediaKind::Video).is_some() && m.get(MediaKind::Audio).is_some()),
    )
    .await
    .expect("Timeout waiting for remote tracks")
    .expect("Session stopped");

    initiator
        .peer_event(PeerEvent::RemoteTrackEnded {
            kind: MediaKind::Video,
            track_id: "v1".into(),
        })
        .await;
    let media = tokio::time::timeout(
        WAIT_TIMEOUT,
        remote.wait_for(|m| m.get(MediaKind::Video).is_none()),
    )
    .await
    .expect("Timeout waiting for track end")
    .expect("Session stopped")
    .clone();

    assert_eq!(
        media.get(MediaKind::Audio).map(|t| t.id.as_str()),
        Some("a1")
    );
}
