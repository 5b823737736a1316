use tandem_core::{Envelope, Membership};
use tandem_peer::{ChannelState, NegotiationState, PeerEvent, SignalingEvent};

use crate::integration::{WAIT_TIMEOUT, eventually, init_tracing, spawn_session};

#[tokio::test]
async fn test_offer_waits_for_channel_open() {
    init_tracing();

    let initiator = spawn_session(Membership::join("R3"));
    initiator.peer_event(PeerEvent::NegotiationNeeded).await;

    let mut negotiation = initiator.handle.negotiation();
    tokio::time::timeout(
        WAIT_TIMEOUT,
        negotiation.wait_for(|s| s.state == NegotiationState::HaveLocalOffer),
    )
    .await
    .expect("Timeout waiting for local offer")
    .expect("Session stopped");
    assert!(initiator.signaling.sent().is_empty());

    initiator.signaling_event(SignalingEvent::Open).await;
    assert!(eventually(|| initiator.signaling.sent().len() == 1).await);

    // A second open event must not resend anything.
    initiator.signaling_event(SignalingEvent::Open).await;
    let mut status = initiator.handle.status();
    tokio::time::timeout(WAIT_TIMEOUT, status.wait_for(|s| s.signaling == ChannelState::Open))
        .await
        .expect("Timeout waiting for open status")
        .expect("Session stopped");

    let envelopes = initiator.signaling.sent_envelopes();
    assert_eq!(envelopes.len(), 1);
    assert!(matches!(envelopes[0], Envelope::Offer { .. }));
}

#[tokio::test]
async fn test_closed_channel_drops_outbound_frames() {
    init_tracing();

    let initiator = spawn_session(Membership::join("R4"));
    initiator.signaling_event(SignalingEvent::Closed).await;

    let mut status = initiator.handle.status();
    tokio::time::timeout(
        WAIT_TIMEOUT,
        status.wait_for(|s| s.signaling == ChannelState::Closed),
    )
    .await
    .expect("Timeout waiting for closed status")
    .expect("Session stopped");

    initiator.handle.send_chat("anyone?").await.unwrap();
    initiator.peer_event(PeerEvent::NegotiationNeeded).await;

    // The local log still records the message; nothing reaches the wire.
    let mut chat = initiator.handle.chat();
    tokio::time::timeout(WAIT_TIMEOUT, chat.wait_for(|log| log.len() == 1))
        .await
        .expect("Timeout waiting for chat log")
        .expect("Session stopped");
    assert!(initiator.signaling.sent().is_empty());
}
