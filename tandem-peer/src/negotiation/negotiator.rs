use crate::negotiation::candidate_buffer::CandidateBuffer;
use crate::transport::PeerConnection;
use tandem_core::{Envelope, IceCandidate, Role, SessionDescription};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Idle,
    HaveLocalOffer,
    HaveRemoteOffer,
    Stable,
}

/// Snapshot published to observers after every negotiation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NegotiationStatus {
    pub state: NegotiationState,
    pub has_remote_description: bool,
    pub buffered_candidates: usize,
}

/// Offer/answer sequencing for one peer connection.
///
/// Role decides direction: an Initiator only offers and only accepts answers,
/// a Responder only accepts offers and only answers. Inputs that do not fit
/// the role are dropped. Failures are logged and never roll state back.
///
/// Every handler returns the envelope that has to go out, if any.
#[derive(Debug)]
pub struct Negotiator {
    role: Role,
    state: NegotiationState,
    has_remote_description: bool,
    candidates: CandidateBuffer,
}

impl Negotiator {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: NegotiationState::Idle,
            has_remote_description: false,
            candidates: CandidateBuffer::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Set once the first remote description is applied; never reset.
    pub fn has_remote_description(&self) -> bool {
        self.has_remote_description
    }

    pub fn buffered_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn status(&self) -> NegotiationStatus {
        NegotiationStatus {
            state: self.state,
            has_remote_description: self.has_remote_description,
            buffered_candidates: self.candidates.len(),
        }
    }

    pub async fn on_negotiation_needed(&mut self, peer: &dyn PeerConnection) -> Option<Envelope> {
        if !self.role.is_offerer() {
            debug!("Responder ignores negotiation-needed");
            return None;
        }
        if self.state == NegotiationState::HaveLocalOffer {
            debug!("Offer already outstanding, ignoring negotiation-needed");
            return None;
        }

        let offer = match peer.create_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                warn!("Failed to create offer: {:?}", e);
                return None;
            }
        };
        if let Err(e) = peer.set_local_description(offer.clone()).await {
            warn!("Failed to set local offer: {:?}", e);
            return None;
        }

        self.state = NegotiationState::HaveLocalOffer;
        info!("Sending offer");
        Some(Envelope::Offer { offer })
    }

    pub async fn on_offer(
        &mut self,
        peer: &dyn PeerConnection,
        offer: SessionDescription,
    ) -> Option<Envelope> {
        if self.role.is_offerer() {
            debug!("Initiator ignores inbound offer");
            return None;
        }

        if let Err(e) = peer.set_remote_description(offer).await {
            warn!("Failed to apply remote offer: {:?}", e);
            return None;
        }
        self.state = NegotiationState::HaveRemoteOffer;
        self.has_remote_description = true;
        self.candidates.drain(peer).await;

        let answer = match peer.create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to create answer: {:?}", e);
                return None;
            }
        };
        if let Err(e) = peer.set_local_description(answer.clone()).await {
            warn!("Failed to set local answer: {:?}", e);
            return None;
        }

        self.state = NegotiationState::Stable;
        info!("Sending answer");
        Some(Envelope::Answer { answer })
    }

    pub async fn on_answer(&mut self, peer: &dyn PeerConnection, answer: SessionDescription) {
        if !self.role.is_offerer() {
            debug!("Responder ignores inbound answer");
            return;
        }
        if self.state != NegotiationState::HaveLocalOffer {
            debug!("Ignoring answer in state {:?}", self.state);
            return;
        }

        if let Err(e) = peer.set_remote_description(answer).await {
            warn!("Failed to apply remote answer: {:?}", e);
            return;
        }
        self.has_remote_description = true;
        self.candidates.drain(peer).await;

        self.state = NegotiationState::Stable;
        info!("Negotiation complete");
    }

    /// Applies the candidate now, or buffers it until a remote description exists.
    pub async fn on_remote_candidate(&mut self, peer: &dyn PeerConnection, candidate: IceCandidate) {
        if !self.has_remote_description {
            debug!("Buffering ICE candidate until remote description is set");
            self.candidates.enqueue(candidate);
            return;
        }

        if let Err(e) = peer.add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate: {:?}", e);
        }
    }
}
