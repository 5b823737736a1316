use axum::extract::ws::Message;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tandem_core::RoomId;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Identifies one WebSocket connection for the relay's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

struct Member {
    id: ConnId,
    tx: mpsc::UnboundedSender<Message>,
}

struct RelayInner {
    rooms: DashMap<RoomId, Vec<Member>>,
    next_id: AtomicU64,
}

/// Room membership shared by every socket task.
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayInner>,
}

impl RelayState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                rooms: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Adds a member to `room`, creating the room on first join. The receiver
    /// yields every frame other members broadcast.
    pub fn join(&self, room: &RoomId) -> (ConnId, mpsc::UnboundedReceiver<Message>) {
        let id = ConnId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        self.inner
            .rooms
            .entry(room.clone())
            .or_default()
            .push(Member { id, tx });
        (id, rx)
    }

    /// Removes the member; an emptied room is deleted.
    pub fn leave(&self, room: &RoomId, id: ConnId) {
        let emptied = match self.inner.rooms.get_mut(room) {
            Some(mut members) => {
                members.retain(|m| m.id != id);
                members.is_empty()
            }
            None => false,
        };

        if emptied && self.inner.rooms.remove_if(room, |_, m| m.is_empty()).is_some() {
            info!("Room {} is empty, removed", room);
        }
    }

    /// Sends `text` to every member of `room` except `from`. Returns how many
    /// members it was handed to.
    pub fn broadcast(&self, room: &RoomId, from: ConnId, text: &str) -> usize {
        let Some(members) = self.inner.rooms.get(room) else {
            return 0;
        };

        let message = Message::Text(text.into());
        let mut delivered = 0;
        for member in members.iter().filter(|m| m.id != from) {
            // Unbounded send never waits, so the map guard is held only briefly.
            if member.tx.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Member {} of room {} is gone", member.id, room);
            }
        }
        delivered
    }

    pub fn room_size(&self, room: &RoomId) -> usize {
        self.inner.rooms.get(room).map_or(0, |m| m.len())
    }

    pub fn room_count(&self) -> usize {
        self.inner.rooms.len()
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new()
    }
}
