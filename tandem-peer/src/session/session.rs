use crate::config::SessionConfig;
use crate::media::{MediaController, MediaDevices};
use crate::negotiation::{NegotiationStatus, Negotiator};
use crate::session::chat_log::{ChatEntry, ChatLog};
use crate::session::handle::SessionHandle;
use crate::session::outbox::{ChannelState, Outbox};
use crate::session::remote_media::RemoteMedia;
use crate::session::session_command::SessionCommand;
use crate::session::status::SessionStatus;
use crate::signaling::{SignalingEvent, SignalingOutput, WsSignaling, signaling_url};
use crate::transport::{PeerConnection, PeerEvent, RtcPeer, TransportState};
use anyhow::{Context, Result};
use std::sync::Arc;
use tandem_core::{Envelope, Membership, Participant, decode, encode};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

const COMMAND_CAPACITY: usize = 32;
const PEER_EVENT_CAPACITY: usize = 256;
const SIGNALING_EVENT_CAPACITY: usize = 256;

/// Everything a session is assembled from.
pub struct SessionParts {
    pub membership: Membership,
    pub peer: Arc<dyn PeerConnection>,
    pub peer_events: mpsc::Receiver<PeerEvent>,
    pub signaling: Arc<dyn SignalingOutput>,
    pub signaling_events: mpsc::Receiver<SignalingEvent>,
    pub devices: Arc<dyn MediaDevices>,
}

/// One room membership: exactly one signaling channel and one peer
/// connection, both owned for the session's whole life.
pub struct Session {
    membership: Membership,
    local: Participant,
    peer: Arc<dyn PeerConnection>,
    signaling: Arc<dyn SignalingOutput>,
    negotiator: Negotiator,
    media: MediaController,
    outbox: Outbox,
    status: SessionStatus,

    command_rx: mpsc::Receiver<SessionCommand>,
    peer_rx: mpsc::Receiver<PeerEvent>,
    signaling_rx: mpsc::Receiver<SignalingEvent>,

    status_tx: watch::Sender<SessionStatus>,
    chat_tx: watch::Sender<ChatLog>,
    remote_tx: watch::Sender<RemoteMedia>,
    negotiation_tx: watch::Sender<NegotiationStatus>,
}

impl Session {
    pub fn new(parts: SessionParts) -> (Self, SessionHandle) {
        let SessionParts {
            membership,
            peer,
            peer_events,
            signaling,
            signaling_events,
            devices,
        } = parts;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (status_tx, status_rx) = watch::channel(SessionStatus::default());
        let (chat_tx, chat_rx) = watch::channel(ChatLog::new());
        let (remote_tx, remote_rx) = watch::channel(RemoteMedia::new());

        let negotiator = Negotiator::new(membership.role);
        let (negotiation_tx, negotiation_rx) = watch::channel(negotiator.status());
        let media = MediaController::new(devices, peer.as_ref());

        let handle = SessionHandle {
            membership: membership.clone(),
            commands: command_tx,
            status: status_rx,
            mode: media.subscribe_mode(),
            chat: chat_rx,
            remote_media: remote_rx,
            preview: media.subscribe_preview(),
            negotiation: negotiation_rx,
        };

        let session = Self {
            local: membership.role.participant(),
            membership,
            peer,
            signaling,
            negotiator,
            media,
            outbox: Outbox::new(),
            status: SessionStatus::default(),
            command_rx,
            peer_rx: peer_events,
            signaling_rx: signaling_events,
            status_tx,
            chat_tx,
            remote_tx,
            negotiation_tx,
        };

        (session, handle)
    }

    /// Builds the `webrtc` peer connection and the relay WebSocket for `membership`.
    pub async fn connect(
        config: SessionConfig,
        membership: Membership,
        devices: Arc<dyn MediaDevices>,
    ) -> Result<(Self, SessionHandle)> {
        let (peer_tx, peer_rx) = mpsc::channel(PEER_EVENT_CAPACITY);
        let peer = RtcPeer::new(config.peer, peer_tx)
            .await
            .context("Failed to create peer connection")?;

        let (signaling_tx, signaling_rx) = mpsc::channel(SIGNALING_EVENT_CAPACITY);
        let url = signaling_url(&config.relay_url, &membership.room);
        info!("Connecting to relay at {}", url);
        let signaling = WsSignaling::spawn(url, signaling_tx);

        Ok(Self::new(SessionParts {
            membership,
            peer: Arc::new(peer),
            peer_events: peer_rx,
            signaling: Arc::new(signaling),
            signaling_events: signaling_rx,
            devices,
        }))
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Event loop. Returns after teardown, on shutdown or once every handle is dropped.
    pub async fn run(mut self) {
        info!(
            "Session started in room {} as {:?}",
            self.membership.room, self.membership.role
        );

        let mut signaling_live = true;
        let mut peer_live = true;

        let shutdown_reply = loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Shutdown { reply }) => break Some(reply),
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All session handles dropped");
                            break None;
                        }
                    }
                }

                evt = self.signaling_rx.recv(), if signaling_live => {
                    match evt {
                        Some(e) => self.handle_signaling_event(e).await,
                        None => {
                            signaling_live = false;
                            self.on_signaling_closed();
                        }
                    }
                }

                evt = self.peer_rx.recv(), if peer_live => {
                    match evt {
                        Some(e) => self.handle_peer_event(e).await,
                        None => {
                            debug!("Peer event channel closed");
                            peer_live = false;
                        }
                    }
                }
            }
        };

        // Later commands fail fast instead of queueing behind a dead loop.
        self.command_rx.close();
        self.teardown().await;
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
        info!("Session finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::SwitchMode { mode, reply } => {
                let result = self.media.switch_mode(mode).await;
                let _ = reply.send(result);
            }

            SessionCommand::ToggleMute { reply } => {
                let _ = reply.send(self.media.toggle_mute());
            }

            SessionCommand::SendChat { message } => {
                self.send_entry(ChatEntry::Text {
                    sender: self.local,
                    message,
                })
                .await;
            }

            SessionCommand::SendImage { name, data } => {
                self.send_entry(ChatEntry::Image {
                    sender: self.local,
                    name,
                    data,
                })
                .await;
            }

            SessionCommand::SendFile { name, size } => {
                self.send_entry(ChatEntry::File {
                    sender: self.local,
                    name,
                    size,
                })
                .await;
            }

            // Intercepted by the run loop.
            SessionCommand::Shutdown { .. } => {}
        }
    }

    async fn handle_signaling_event(&mut self, event: SignalingEvent) {
        match event {
            SignalingEvent::Open => {
                self.outbox.open(self.signaling.as_ref()).await;
                self.publish_status();
            }

            SignalingEvent::Frame(text) => match decode(&text) {
                Ok(Some(envelope)) => self.handle_envelope(envelope).await,
                Ok(None) => debug!("Ignoring signaling frame of unknown type"),
                Err(e) => warn!("Dropping malformed signaling frame: {}", e),
            },

            SignalingEvent::Closed => self.on_signaling_closed(),
        }
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        debug!("Received '{}' envelope", envelope.kind());

        match envelope {
            Envelope::Offer { offer } => {
                let reply = self.negotiator.on_offer(self.peer.as_ref(), offer).await;
                if let Some(answer) = reply {
                    self.dispatch(answer).await;
                }
                self.publish_negotiation();
            }

            Envelope::Answer { answer } => {
                self.negotiator.on_answer(self.peer.as_ref(), answer).await;
                self.publish_negotiation();
            }

            Envelope::Ice { candidate } => {
                self.negotiator
                    .on_remote_candidate(self.peer.as_ref(), candidate)
                    .await;
                self.publish_negotiation();
            }

            other => {
                if let Some(entry) = ChatEntry::from_envelope(&other) {
                    info!("Received {} from {}", other.kind(), entry.sender());
                    self.chat_tx.send_modify(|log| log.push(entry));
                }
            }
        }
    }

    async fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::NegotiationNeeded => {
                let offer = self
                    .negotiator
                    .on_negotiation_needed(self.peer.as_ref())
                    .await;
                if let Some(offer) = offer {
                    self.dispatch(offer).await;
                }
                self.publish_negotiation();
            }

            PeerEvent::LocalCandidate(candidate) => {
                self.dispatch(Envelope::Ice { candidate }).await;
            }

            PeerEvent::RemoteTrack(track) => {
                self.remote_tx.send_modify(|media| media.insert(track));
            }

            PeerEvent::RemoteTrackEnded { kind, track_id } => {
                self.remote_tx.send_if_modified(|media| media.remove(kind, &track_id));
            }

            PeerEvent::StateChanged(state) => {
                self.status.transport = state;
                self.publish_status();
            }
        }
    }

    async fn send_entry(&mut self, entry: ChatEntry) {
        self.dispatch(entry.to_envelope()).await;
        self.chat_tx.send_modify(|log| log.push(entry));
    }

    async fn dispatch(&mut self, envelope: Envelope) {
        match encode(&envelope) {
            Ok(frame) => self.outbox.submit(self.signaling.as_ref(), frame).await,
            Err(e) => error!("Failed to encode '{}' envelope: {}", envelope.kind(), e),
        }
    }

    fn on_signaling_closed(&mut self) {
        if self.outbox.state() == ChannelState::Closed {
            return;
        }
        warn!("Signaling channel closed");
        self.outbox.close();
        self.publish_status();
    }

    async fn teardown(&mut self) {
        info!("Tearing down session in room {}", self.membership.room);

        self.signaling.close().await;
        self.outbox.close();

        if let Err(e) = self.peer.close().await {
            warn!("Failed to close peer connection: {:?}", e);
        }
        self.media.release();

        self.status.transport = TransportState::Closed;
        self.publish_status();
    }

    fn publish_status(&mut self) {
        self.status.signaling = self.outbox.state();
        self.status_tx.send_replace(self.status);
    }

    fn publish_negotiation(&self) {
        self.negotiation_tx.send_replace(self.negotiator.status());
    }
}
