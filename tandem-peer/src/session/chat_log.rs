use tandem_core::{Envelope, Participant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Text {
        sender: Participant,
        message: String,
    },
    Image {
        sender: Participant,
        name: String,
        data: String,
    },
    File {
        sender: Participant,
        name: String,
        size: u64,
    },
}

impl ChatEntry {
    /// `None` for negotiation envelopes.
    pub fn from_envelope(envelope: &Envelope) -> Option<Self> {
        let entry = match envelope {
            Envelope::Chat { message, sender } => ChatEntry::Text {
                sender: *sender,
                message: message.clone(),
            },
            Envelope::Image { name, data, sender } => ChatEntry::Image {
                sender: *sender,
                name: name.clone(),
                data: data.clone(),
            },
            Envelope::File { name, size, sender } => ChatEntry::File {
                sender: *sender,
                name: name.clone(),
                size: *size,
            },
            _ => return None,
        };
        Some(entry)
    }

    pub fn to_envelope(&self) -> Envelope {
        match self.clone() {
            ChatEntry::Text { sender, message } => Envelope::Chat { message, sender },
            ChatEntry::Image { sender, name, data } => Envelope::Image { name, data, sender },
            ChatEntry::File { sender, name, size } => Envelope::File { name, size, sender },
        }
    }

    pub fn sender(&self) -> Participant {
        match self {
            ChatEntry::Text { sender, .. }
            | ChatEntry::Image { sender, .. }
            | ChatEntry::File { sender, .. } => *sender,
        }
    }
}

/// Append-only record of everything said in the session, local and remote.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
