use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the offer/answer exchange this participant plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Joined an existing room. Sends the offer.
    Initiator,
    /// Created the room. Answers the offer.
    Responder,
}

impl Role {
    pub fn is_offerer(self) -> bool {
        matches!(self, Role::Initiator)
    }

    pub fn participant(self) -> Participant {
        match self {
            Role::Initiator => Participant::User,
            Role::Responder => Participant::Admin,
        }
    }
}

/// Sender label carried by chat, image and file envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Admin,
    User,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Admin => write!(f, "Admin"),
            Participant::User => write!(f, "User"),
        }
    }
}
