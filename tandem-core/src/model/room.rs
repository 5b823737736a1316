use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Routing key on the relay. Both members of a session must hold the same value.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One participant's seat in a room. The role is fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room: RoomId,
    pub role: Role,
}

impl Membership {
    /// Creator of a new room: answers offers.
    pub fn create() -> Self {
        Self {
            room: RoomId::generate(),
            role: Role::Responder,
        }
    }

    /// Joiner of an existing room: sends the offer.
    pub fn join(room: impl Into<RoomId>) -> Self {
        Self {
            room: room.into(),
            role: Role::Initiator,
        }
    }

    /// Resolves the `room` query parameter. A missing or blank value creates a new room.
    pub fn from_query(room: Option<&str>) -> Self {
        match room.map(str::trim) {
            Some(room) if !room.is_empty() => Self::join(room),
            _ => Self::create(),
        }
    }
}
