//! Room storage.
//!
//! `RoomStore` is the seam between the lobby and wherever rooms live. The
//! in-memory store keeps them in a map behind a read-write lock; each room
//! carries its own mutex, so the map lock is only held for lookups.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::room::{Room, RoomId};
use crate::core::{EngineError, Result};

pub trait RoomStore: Send + Sync {
    /// Insert a room. Fails with `RoomExists` if the id is taken.
    fn create(&self, room: Room) -> Result<Arc<Room>>;

    fn get(&self, id: &RoomId) -> Option<Arc<Room>>;

    fn delete(&self, id: &RoomId) -> Option<Arc<Room>>;

    fn contains(&self, id: &RoomId) -> bool {
        self.get(id).is_some()
    }

    fn list(&self) -> Vec<Arc<Room>>;
}

#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: RwLock<FxHashMap<RoomId, Arc<Room>>>,
}

impl InMemoryRoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.read().is_empty()
    }
}

impl RoomStore for InMemoryRoomStore {
    fn create(&self, room: Room) -> Result<Arc<Room>> {
        let mut rooms = self.rooms.write();
        if rooms.contains_key(room.id()) {
            return Err(EngineError::RoomExists(room.id().0.clone()));
        }
        let room = Arc::new(room);
        rooms.insert(room.id().clone(), Arc::clone(&room));
        Ok(room)
    }

    fn get(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.read().get(id).cloned()
    }

    fn delete(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.write().remove(id)
    }

    fn list(&self) -> Vec<Arc<Room>> {
        let mut rooms: Vec<_> = self.rooms.read().values().cloned().collect();
        rooms.sort_by(|a, b| a.id().cmp(b.id()));
        rooms
    }
}
