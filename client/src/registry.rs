//! In-memory table of every known client's identity and last-known tile.

use shared::{ClientEntry, ClientId, GridPosition};
use std::collections::HashMap;

/// Pure data holder keyed by client id. The local player is an ordinary
/// entry whose id is additionally held in `local_id`; that id is set exactly
/// once, when the server confirms the connection.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    entries: HashMap<ClientId, ClientEntry>,
    local_id: Option<ClientId>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the server-assigned local identity. Returns false (and leaves
    /// the registry untouched) if a local id was already registered.
    pub fn register_local(&mut self, id: ClientId, pos: GridPosition) -> bool {
        if self.local_id.is_some() {
            return false;
        }
        self.entries
            .insert(id.clone(), ClientEntry { id: id.clone(), pos });
        self.local_id = Some(id);
        true
    }

    /// True once `connection-established` has been applied.
    pub fn is_registered(&self) -> bool {
        self.local_id.is_some()
    }

    pub fn local_id(&self) -> Option<&ClientId> {
        self.local_id.as_ref()
    }

    pub fn local_position(&self) -> Option<GridPosition> {
        self.local_id
            .as_ref()
            .and_then(|id| self.entries.get(id))
            .map(|entry| entry.pos)
    }

    /// Inserts a peer entry. Returns false if the id is already known, in
    /// which case the existing entry is left as-is.
    pub fn insert(&mut self, id: ClientId, pos: GridPosition) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries
            .insert(id.clone(), ClientEntry { id, pos });
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ClientEntry> {
        self.entries.get(id)
    }

    /// Updates the position of a known client. Returns false for unknown ids.
    pub fn set_position(&mut self, id: &str, pos: GridPosition) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientEntry> {
        self.entries.values()
    }
}
