//! Per-frame glue between the channel, the sync handler, the input gate and
//! the renderer. One `tick` per rendered frame; nothing in it blocks.

use crate::grid::{GridConfig, TileGrid, TileMap};
use crate::input::{poll_direction, InputGate};
use crate::network::Connection;
use crate::registry::ClientRegistry;
use crate::rendering::Renderer;
use crate::sync::SyncHandler;
use log::{error, info};
use std::time::Instant;

pub struct Session {
    connection: Connection,
    registry: ClientRegistry,
    grid: TileGrid,
    handler: SyncHandler,
    gate: InputGate,
    renderer: Renderer,
}

impl Session {
    pub fn new(connection: Connection, map: TileMap, tile_size: f32) -> Self {
        Self {
            connection,
            registry: ClientRegistry::new(),
            grid: TileGrid::create(map, GridConfig::default()),
            handler: SyncHandler::new(),
            gate: InputGate::new(),
            renderer: Renderer::new(tile_size),
        }
    }

    pub fn tick(&mut self) {
        self.pump_messages();
        self.handle_input();
        self.renderer
            .render(&self.grid, &self.registry, self.connection.is_open());
    }

    /// Drains every inbound message that arrived since the last frame and
    /// applies it through the sync handler.
    fn pump_messages(&mut self) {
        while let Some(msg) = self.connection.try_recv() {
            let reply = self.handler.handle(
                msg,
                &mut self.registry,
                &mut self.grid,
                &mut self.renderer,
            );
            if let Some(reply) = reply {
                if let Err(e) = self.connection.send(reply) {
                    error!("failed to queue reply: {}", e);
                }
            }
        }
    }

    fn handle_input(&mut self) {
        let Some(direction) = poll_direction() else {
            return;
        };
        let msg = self
            .gate
            .try_move(&self.registry, &self.grid, direction, Instant::now());
        if let Some(msg) = msg {
            info!("move {:?}", direction);
            if let Err(e) = self.connection.send(msg) {
                error!("failed to queue move: {}", e);
            }
        }
    }
}
