//! Minimal tile and actor renderer.
//!
//! Stands in for a full sprite pipeline: tiles are flat quads, actors are
//! colored by their sprite handle, and the camera keeps the local player
//! centered. Also the allocator for renderable sprite handles.

use crate::grid::{SpriteId, SpriteSource, TileGrid};
use crate::registry::ClientRegistry;
use macroquad::prelude::*;
use shared::GridPosition;

const SPRITE_SCALE: f32 = 1.5;

pub struct Renderer {
    tile_size: f32,
    next_sprite: u32,
}

impl Renderer {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            next_sprite: 0,
        }
    }

    pub fn render(&self, grid: &TileGrid, registry: &ClientRegistry, channel_open: bool) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        let camera = self.camera_offset(registry);

        self.draw_tiles(grid, camera);
        self.draw_actors(grid, registry, camera);
        self.draw_status(registry, channel_open);
    }

    /// Keeps the local player's tile centered once it exists; before
    /// registration the map is drawn from its origin.
    fn camera_offset(&self, registry: &ClientRegistry) -> (f32, f32) {
        match registry.local_position() {
            Some(pos) => (
                (pos.x as f32 + 0.5) * self.tile_size - screen_width() / 2.0,
                (pos.y as f32 + 0.5) * self.tile_size - screen_height() / 2.0,
            ),
            None => (0.0, 0.0),
        }
    }

    fn draw_tiles(&self, grid: &TileGrid, camera: (f32, f32)) {
        let map = grid.map();
        for y in 0..map.height {
            for x in 0..map.width {
                let pos = GridPosition::new(x, y);
                let color = if map.is_impassable(pos) {
                    Color::from_rgba(68, 68, 68, 255)
                } else {
                    Color::from_rgba(40, 44, 40, 255)
                };
                let px = x as f32 * self.tile_size - camera.0;
                let py = y as f32 * self.tile_size - camera.1;
                draw_rectangle(px, py, self.tile_size - 1.0, self.tile_size - 1.0, color);
            }
        }
    }

    fn draw_actors(&self, grid: &TileGrid, registry: &ClientRegistry, camera: (f32, f32)) {
        let size = self.tile_size * 0.5 * SPRITE_SCALE;
        let inset = (self.tile_size - size) / 2.0;

        for (id, character) in grid.characters() {
            let is_local = registry.local_id() == Some(id);
            let color = if is_local {
                GREEN
            } else {
                sprite_color(character.sprite)
            };

            let px = character.pos.x as f32 * self.tile_size - camera.0 + inset;
            let py = character.pos.y as f32 * self.tile_size - camera.1 + inset;
            draw_rectangle(px, py, size, size, color);
            draw_rectangle_lines(px, py, size, size, 2.0, WHITE);
        }
    }

    fn draw_status(&self, registry: &ClientRegistry, channel_open: bool) {
        let status = if !channel_open {
            "channel closed".to_string()
        } else if !registry.is_registered() {
            "connecting...".to_string()
        } else {
            format!("{} players", registry.len())
        };
        draw_text(&status, 10.0, 20.0, 18.0, WHITE);
    }
}

impl SpriteSource for Renderer {
    fn make_sprite(&mut self) -> SpriteId {
        let id = SpriteId(self.next_sprite);
        self.next_sprite += 1;
        id
    }
}

fn sprite_color(sprite: SpriteId) -> Color {
    match sprite.0 % 6 {
        0 => Color::from_rgba(255, 68, 68, 255),
        1 => BLUE,
        2 => YELLOW,
        3 => MAGENTA,
        4 => Color::from_rgba(0, 255, 255, 255),
        _ => Color::from_rgba(255, 140, 0, 255),
    }
}
