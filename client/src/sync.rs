//! Inbound protocol dispatch.
//!
//! The sync handler is the sole consumer of decoded server messages. It is
//! stateless between messages; everything it learns lands in the client
//! registry and the grid it is handed. The client is *unregistered* until
//! `connection-established` arrives, and every other tag received before
//! then is dropped as a protocol violation.

use crate::grid::{CharacterData, GridWorld, SpriteSource};
use crate::registry::ClientRegistry;
use log::{info, warn};
use shared::{ClientId, ClientMessage, GridPosition, ServerMessage};

#[derive(Debug, Default)]
pub struct SyncHandler;

impl SyncHandler {
    pub fn new() -> Self {
        SyncHandler
    }

    /// Applies one inbound message. Returns a reply the session must send,
    /// which happens exactly once: `after-create` after the local character
    /// has been placed.
    pub fn handle<G, S>(
        &self,
        msg: ServerMessage,
        registry: &mut ClientRegistry,
        grid: &mut G,
        sprites: &mut S,
    ) -> Option<ClientMessage>
    where
        G: GridWorld,
        S: SpriteSource,
    {
        if !registry.is_registered()
            && !matches!(msg, ServerMessage::ConnectionEstablished { .. })
        {
            warn!("message received before registration, dropped: {:?}", msg);
            return None;
        }

        match msg {
            ServerMessage::ConnectionEstablished { id, pos } => {
                if !registry.register_local(id.clone(), pos) {
                    warn!("duplicate connection-established for '{}', dropped", id);
                    return None;
                }
                info!("connection established, local id '{}' at ({}, {})", id, pos.x, pos.y);
                let sprite = sprites.make_sprite();
                grid.add_character(CharacterData::new(id.clone(), sprite, pos));
                Some(ClientMessage::AfterCreate { id })
            }

            ServerMessage::ExistUserlist { clients } => {
                for (id, pos) in clients {
                    self.add_peer(id, pos, registry, grid, sprites);
                }
                None
            }

            ServerMessage::NewUser { id, pos } => {
                info!("new user '{}' joined at ({}, {})", id, pos.x, pos.y);
                self.add_peer(id, pos, registry, grid, sprites);
                None
            }

            ServerMessage::Move { result } => {
                // Batched; per-id updates are independent, order is irrelevant.
                for (id, moved) in result {
                    if !registry.contains(&id) {
                        warn!("move for unknown client '{}', skipped", id);
                        continue;
                    }
                    grid.move_to(&id, moved.pos);
                    registry.set_position(&id, moved.pos);
                }
                None
            }
        }
    }

    /// One peer registration: registry entry plus renderable actor, skipped
    /// entirely if the id is already known (idempotent per id).
    fn add_peer<G, S>(
        &self,
        id: ClientId,
        pos: GridPosition,
        registry: &mut ClientRegistry,
        grid: &mut G,
        sprites: &mut S,
    ) where
        G: GridWorld,
        S: SpriteSource,
    {
        if !registry.insert(id.clone(), pos) {
            return;
        }
        let sprite = sprites.make_sprite();
        grid.add_character(CharacterData::new(id, sprite, pos));
    }
}
