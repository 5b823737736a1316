use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tandem_core::{IceCandidate, MediaKind, SdpKind, SessionDescription};
use tandem_peer::{LocalTrack, MediaSender, PeerConnection};

/// A call made on the mock peer connection, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCall {
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    AddIce(String),
}

/// In-memory peer connection.
///
/// Behaves like a real one where the session depends on it: candidates are
/// rejected until a remote description exists, and an answer cannot be built
/// without a remote offer.
pub struct MockPeer {
    label: String,
    calls: Mutex<Vec<PeerCall>>,
    applied: Mutex<Vec<String>>,
    has_remote: AtomicBool,
    closed: AtomicBool,
    sender_requests: AtomicUsize,
    audio: Arc<MockSender>,
    video: Arc<MockSender>,
}

impl MockPeer {
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            calls: Mutex::new(Vec::new()),
            applied: Mutex::new(Vec::new()),
            has_remote: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            sender_requests: AtomicUsize::new(0),
            audio: Arc::new(MockSender::new(MediaKind::Audio)),
            video: Arc::new(MockSender::new(MediaKind::Video)),
        })
    }

    pub fn calls(&self) -> Vec<PeerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Candidates the peer accepted, in application order.
    pub fn applied_candidates(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }

    pub fn remote_descriptions(&self) -> Vec<SdpKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PeerCall::SetRemote(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn offers_created(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == PeerCall::CreateOffer)
            .count()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn sender_requests(&self) -> usize {
        self.sender_requests.load(Ordering::SeqCst)
    }

    pub fn audio(&self) -> Arc<MockSender> {
        self.audio.clone()
    }

    pub fn video(&self) -> Arc<MockSender> {
        self.video.clone()
    }

    fn record(&self, call: PeerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PeerConnection for MockPeer {
    async fn create_offer(&self) -> Result<SessionDescription> {
        self.record(PeerCall::CreateOffer);
        Ok(SessionDescription::offer(format!("offer-from-{}", self.label)))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        self.record(PeerCall::CreateAnswer);
        if !self.has_remote.load(Ordering::SeqCst) {
            bail!("no remote offer to answer");
        }
        Ok(SessionDescription::answer(format!("answer-from-{}", self.label)))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.record(PeerCall::SetLocal(desc.kind));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.record(PeerCall::SetRemote(desc.kind));
        self.has_remote.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.record(PeerCall::AddIce(candidate.candidate.clone()));
        if !self.has_remote.load(Ordering::SeqCst) {
            bail!("remote description not set");
        }
        self.applied.lock().unwrap().push(candidate.candidate);
        Ok(())
    }

    fn sender(&self, kind: MediaKind) -> Arc<dyn MediaSender> {
        self.sender_requests.fetch_add(1, Ordering::SeqCst);
        match kind {
            MediaKind::Audio => self.audio.clone(),
            MediaKind::Video => self.video.clone(),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Sender that records every track swap.
pub struct MockSender {
    kind: MediaKind,
    current: Mutex<Option<LocalTrack>>,
    history: Mutex<Vec<Option<String>>>,
    fail: AtomicBool,
}

impl MockSender {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            current: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Option<LocalTrack> {
        self.current.lock().unwrap().clone()
    }

    /// Track ids passed to `replace_track`, `None` for an emptied sender.
    pub fn history(&self) -> Vec<Option<String>> {
        self.history.lock().unwrap().clone()
    }

    /// Makes every later non-empty `replace_track` fail.
    pub fn fail_attach(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaSender for MockSender {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn replace_track(&self, track: Option<LocalTrack>) -> Result<()> {
        if track.is_some() && self.fail.load(Ordering::SeqCst) {
            bail!("{} sender rejected track", self.kind);
        }
        self.history
            .lock()
            .unwrap()
            .push(track.as_ref().map(|t| t.id().to_owned()));
        *self.current.lock().unwrap() = track;
        Ok(())
    }
}
