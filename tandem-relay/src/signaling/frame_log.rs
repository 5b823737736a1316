use serde_json::Value;
use tandem_core::RoomId;
use tracing::{debug, info, warn};

const CONTENT_KINDS: [&str; 3] = ["chat", "image", "file"];
const NEGOTIATION_KINDS: [&str; 3] = ["offer", "answer", "ice"];

/// How the relay treats one inbound text frame. The payload itself is never
/// interpreted, only its `type` and `sender` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameClass {
    Content { kind: String, sender: Option<String> },
    Negotiation { kind: String },
    Unknown { kind: Option<String> },
    /// Not a JSON object: dropped, not forwarded.
    Invalid,
}

impl FrameClass {
    pub fn of(text: &str) -> Self {
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) else {
            return FrameClass::Invalid;
        };

        let kind = object.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind {
            Some(kind) if CONTENT_KINDS.contains(&kind.as_str()) => FrameClass::Content {
                kind,
                sender: object
                    .get("sender")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            Some(kind) if NEGOTIATION_KINDS.contains(&kind.as_str()) => {
                FrameClass::Negotiation { kind }
            }
            kind => FrameClass::Unknown { kind },
        }
    }

    pub fn should_forward(&self) -> bool {
        !matches!(self, FrameClass::Invalid)
    }

    pub fn log(&self, room: &RoomId) {
        match self {
            FrameClass::Content { kind, sender } => info!(
                "[{}] Received {} from {}",
                room,
                kind,
                sender.as_deref().unwrap_or("Unknown")
            ),
            FrameClass::Negotiation { kind } => debug!("[{}] Signal: {}", room, kind),
            FrameClass::Unknown { kind } => {
                info!("[{}] Unknown message type: {:?}", room, kind)
            }
            FrameClass::Invalid => warn!("[{}] Dropping frame that is not a JSON object", room),
        }
    }
}
