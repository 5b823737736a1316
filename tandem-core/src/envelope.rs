//! JSON frames exchanged through the relay, one object per frame.
//!
//! Every frame carries a `type` discriminator. Frames whose `type` is not one
//! of the kinds below decode to `None` so that newer peers can add kinds
//! without breaking older ones.

use crate::model::{IceCandidate, Participant, SessionDescription};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const KNOWN_KINDS: [&str; 6] = ["offer", "answer", "ice", "chat", "image", "file"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Offer {
        offer: SessionDescription,
    },
    Answer {
        answer: SessionDescription,
    },
    Ice {
        candidate: IceCandidate,
    },
    Chat {
        message: String,
        sender: Participant,
    },
    /// `data` is a base64 data URL, carried opaquely.
    Image {
        name: String,
        data: String,
        sender: Participant,
    },
    /// Metadata only. No file content travels over signaling.
    File {
        name: String,
        size: u64,
        sender: Participant,
    },
}

impl Envelope {
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Offer { .. } => "offer",
            Envelope::Answer { .. } => "answer",
            Envelope::Ice { .. } => "ice",
            Envelope::Chat { .. } => "chat",
            Envelope::Image { .. } => "image",
            Envelope::File { .. } => "file",
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("malformed '{kind}' payload: {source}")]
    Payload {
        kind: String,
        source: serde_json::Error,
    },
}

pub fn encode(envelope: &Envelope) -> Result<String, CodecError> {
    Ok(serde_json::to_string(envelope)?)
}

/// Decodes one frame. `Ok(None)` means the frame has no recognized `type`.
pub fn decode(text: &str) -> Result<Option<Envelope>, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(ref object) = value else {
        return Err(CodecError::NotAnObject);
    };

    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        return Ok(None);
    };
    if !KNOWN_KINDS.contains(&kind) {
        return Ok(None);
    }

    let kind = kind.to_owned();
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| CodecError::Payload { kind, source })
}
