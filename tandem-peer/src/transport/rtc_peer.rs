use crate::config::PeerConfig;
use crate::media::LocalTrack;
use crate::transport::peer_connection::{MediaSender, PeerConnection};
use crate::transport::peer_event::{PeerEvent, RemoteTrack, TransportState};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, MediaKind, SdpKind, SessionDescription};
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::{RTCRtpTransceiver, RTCRtpTransceiverInit};
use webrtc::track::track_remote::TrackRemote;

/// `webrtc`-backed peer connection with audio and video transceivers declared up front.
pub struct RtcPeer {
    peer_connection: Arc<RTCPeerConnection>,
    audio: Arc<dyn MediaSender>,
    video: Arc<dyn MediaSender>,
}

impl RtcPeer {
    /// Builds the connection and wires its callbacks into `event_tx`.
    ///
    /// Callbacks are registered before the transceivers are added, so the
    /// negotiation-needed event raised by adding them is never missed.
    pub async fn new(config: PeerConfig, event_tx: mpsc::Sender<PeerEvent>) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let negotiation_tx = event_tx.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = negotiation_tx.clone();
            Box::pin(async move {
                debug!("Negotiation needed");
                let _ = tx.send(PeerEvent::NegotiationNeeded).await;
            })
        }));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(PeerEvent::LocalCandidate(candidate_from_init(init)))
                    .await;
            })
        }));

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer Connection State changed: {:?}", s);
                    let _ = tx.send(PeerEvent::StateChanged(transport_state(s))).await;
                })
            },
        ));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => MediaKind::Audio,
                        RTPCodecType::Video => MediaKind::Video,
                        _ => return,
                    };
                    let remote = RemoteTrack::new(track.id(), kind, track.stream_id());
                    info!("Remote {} track arrived: {}", kind, remote.id);

                    // The read loop must not run inside this callback, the
                    // handler lock is held until the returned future resolves.
                    tokio::spawn(forward_rtp(track, remote.clone(), tx.clone()));
                    let _ = tx.send(PeerEvent::RemoteTrack(remote)).await;
                })
            },
        ));

        let audio = Self::declare_transceiver(&peer_connection, MediaKind::Audio).await?;
        let video = Self::declare_transceiver(&peer_connection, MediaKind::Video).await?;

        Ok(Self {
            peer_connection,
            audio,
            video,
        })
    }

    async fn declare_transceiver(
        peer_connection: &RTCPeerConnection,
        kind: MediaKind,
    ) -> Result<Arc<dyn MediaSender>> {
        let codec_type = match kind {
            MediaKind::Audio => RTPCodecType::Audio,
            MediaKind::Video => RTPCodecType::Video,
        };
        let transceiver = peer_connection
            .add_transceiver_from_kind(
                codec_type,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Sendrecv,
                    send_encodings: vec![],
                }),
            )
            .await?;

        Ok(Arc::new(RtcSender {
            kind,
            sender: transceiver.sender().await,
        }))
    }
}

#[async_trait]
impl PeerConnection for RtcPeer {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(description_from_rtc(offer))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(description_from_rtc(answer))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(description_to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(description_to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    fn sender(&self, kind: MediaKind) -> Arc<dyn MediaSender> {
        match kind {
            MediaKind::Audio => self.audio.clone(),
            MediaKind::Video => self.video.clone(),
        }
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

struct RtcSender {
    kind: MediaKind,
    sender: Arc<RTCRtpSender>,
}

#[async_trait]
impl MediaSender for RtcSender {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn replace_track(&self, track: Option<LocalTrack>) -> Result<()> {
        self.sender
            .replace_track(track.map(|t| t.rtp_track()))
            .await?;
        Ok(())
    }
}

async fn forward_rtp(track: Arc<TrackRemote>, remote: RemoteTrack, tx: mpsc::Sender<PeerEvent>) {
    while let Ok((packet, _)) = track.read_rtp().await {
        remote.publish(packet);
    }

    debug!("Remote {} track ended: {}", remote.kind, remote.id);
    let _ = tx
        .send(PeerEvent::RemoteTrackEnded {
            kind: remote.kind,
            track_id: remote.id,
        })
        .await;
}

fn transport_state(state: RTCPeerConnectionState) -> TransportState {
    match state {
        RTCPeerConnectionState::Connecting => TransportState::Connecting,
        RTCPeerConnectionState::Connected => TransportState::Connected,
        RTCPeerConnectionState::Disconnected => TransportState::Disconnected,
        RTCPeerConnectionState::Failed => TransportState::Failed,
        RTCPeerConnectionState::Closed => TransportState::Closed,
        _ => TransportState::New,
    }
}

fn candidate_from_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}

fn description_from_rtc(desc: RTCSessionDescription) -> SessionDescription {
    let kind = match desc.sdp_type {
        RTCSdpType::Answer => SdpKind::Answer,
        RTCSdpType::Pranswer => SdpKind::Pranswer,
        RTCSdpType::Rollback => SdpKind::Rollback,
        _ => SdpKind::Offer,
    };
    SessionDescription {
        kind,
        sdp: desc.sdp,
    }
}

fn description_to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
        SdpKind::Pranswer => RTCSessionDescription::pranswer(desc.sdp)?,
        SdpKind::Rollback => bail!("rollback descriptions are not supported"),
    };
    Ok(rtc)
}
