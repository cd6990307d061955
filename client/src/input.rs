//! Directional input gating: blocked-tile check plus outbound move throttle.

use crate::grid::GridWorld;
use crate::registry::ClientRegistry;
use log::debug;
use macroquad::prelude::{is_key_pressed, KeyCode};
use shared::{ClientMessage, Direction, GridPosition, MOVE_SEND_WINDOW_MS};
use std::time::{Duration, Instant};

/// Leading-edge rate limiter: the first acquire in a window fires, everything
/// else in that window is dropped (nothing is queued for later).
///
/// The caller supplies `now`, so behavior is deterministic under test.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    last_fire: Option<Instant>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
        }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        match self.last_fire {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_fire = Some(now);
                true
            }
        }
    }
}

/// Turns directional key-down events into outbound move requests, refusing
/// moves into blocked tiles and collapsing bursts to one send per window.
///
/// Movement is never applied locally here; the sprite advances only when the
/// server's `move` broadcast comes back through the sync handler.
pub struct InputGate {
    limiter: RateLimiter,
}

impl InputGate {
    pub fn new() -> Self {
        Self {
            limiter: RateLimiter::new(Duration::from_millis(MOVE_SEND_WINDOW_MS)),
        }
    }

    /// The tile a move in `direction` would land on, or None while the local
    /// player is not yet placed on the grid.
    fn target_tile(
        &self,
        registry: &ClientRegistry,
        grid: &impl GridWorld,
        direction: Direction,
    ) -> Option<GridPosition> {
        let id = registry.local_id()?;
        Some(grid.get_position(id)?.step(direction))
    }

    /// Whether a move in `direction` would enter an occupied or impassable
    /// tile. Fails closed: an unknown local id counts as blocked.
    pub fn is_blocked(
        &self,
        registry: &ClientRegistry,
        grid: &impl GridWorld,
        direction: Direction,
    ) -> bool {
        match self.target_tile(registry, grid, direction) {
            Some(target) => grid.is_blocked(target),
            None => true,
        }
    }

    /// Runs the full gate for one key-down event: blocked-tile check, then
    /// throttle. Returns the move message to send, if any.
    pub fn try_move(
        &mut self,
        registry: &ClientRegistry,
        grid: &impl GridWorld,
        direction: Direction,
        now: Instant,
    ) -> Option<ClientMessage> {
        if self.is_blocked(registry, grid, direction) {
            debug!("move {:?} refused: target tile blocked", direction);
            return None;
        }
        if !self.limiter.try_acquire(now) {
            debug!("move {:?} dropped by throttle", direction);
            return None;
        }
        let id = registry.local_id()?.clone();
        Some(ClientMessage::Move { id, direction })
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a cursor-key press to a direction. Key-down edges only, so holding a
/// key does not repeat; the throttle still guards against mashing.
pub fn poll_direction() -> Option<Direction> {
    if is_key_pressed(KeyCode::Left) {
        Some(Direction::Left)
    } else if is_key_pressed(KeyCode::Right) {
        Some(Direction::Right)
    } else if is_key_pressed(KeyCode::Up) {
        Some(Direction::Up)
    } else if is_key_pressed(KeyCode::Down) {
        Some(Direction::Down)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CharacterData, GridConfig, SpriteId, TileGrid, TileMap};

    fn grid_with_local(pos: GridPosition) -> (ClientRegistry, TileGrid) {
        let mut registry = ClientRegistry::new();
        registry.register_local("u1".to_string(), pos);
        let mut grid = TileGrid::create(TileMap::new(10, 10), GridConfig::default());
        grid.add_character(CharacterData::new("u1".to_string(), SpriteId(0), pos));
        (registry, grid)
    }

    #[test]
    fn test_rate_limiter_leading_edge() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(limiter.try_acquire(start));
        for ms in [1, 100, 250, 499] {
            assert!(!limiter.try_acquire(start + Duration::from_millis(ms)));
        }
        assert!(limiter.try_acquire(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_rate_limiter_spaced_calls_both_fire() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        assert!(limiter.try_acquire(start));
        assert!(limiter.try_acquire(start + Duration::from_millis(600)));
    }

    #[test]
    fn test_each_direction_queries_a_distinct_tile() {
        let mut registry = ClientRegistry::new();
        registry.register_local("u1".to_string(), GridPosition::new(3, 3));
        let gate = InputGate::new();

        // Block one neighbor at a time and check only that direction sees it.
        let cases = [
            (Direction::Left, GridPosition::new(2, 3)),
            (Direction::Right, GridPosition::new(4, 3)),
            (Direction::Up, GridPosition::new(3, 2)),
            (Direction::Down, GridPosition::new(3, 4)),
        ];
        for (direction, tile) in cases {
            let mut map = TileMap::new(10, 10);
            map.set_impassable(tile);
            let mut grid = TileGrid::create(map, GridConfig::default());
            grid.add_character(CharacterData::new(
                "u1".to_string(),
                SpriteId(0),
                GridPosition::new(3, 3),
            ));
            for probe in Direction::ALL {
                assert_eq!(
                    gate.is_blocked(&registry, &grid, probe),
                    probe == direction,
                    "blocking {:?} leaked into {:?}",
                    tile,
                    probe
                );
            }
        }
    }

    #[test]
    fn test_is_blocked_fails_closed_without_local_id() {
        let registry = ClientRegistry::new();
        let grid = TileGrid::create(TileMap::new(10, 10), GridConfig::default());
        let gate = InputGate::new();
        for direction in Direction::ALL {
            assert!(gate.is_blocked(&registry, &grid, direction));
        }
    }

    #[test]
    fn test_is_blocked_fails_closed_when_not_on_grid() {
        // Registered, but no character placed on the grid yet.
        let mut registry = ClientRegistry::new();
        registry.register_local("u1".to_string(), GridPosition::new(3, 3));
        let grid = TileGrid::create(TileMap::new(10, 10), GridConfig::default());
        let gate = InputGate::new();
        assert!(gate.is_blocked(&registry, &grid, Direction::Right));
    }

    #[test]
    fn test_try_move_burst_collapses_to_one_send() {
        let (registry, grid) = grid_with_local(GridPosition::new(3, 3));
        let mut gate = InputGate::new();
        let start = Instant::now();

        let mut sent = 0;
        for ms in [0, 50, 100, 200, 450] {
            if gate
                .try_move(&registry, &grid, Direction::Right, start + Duration::from_millis(ms))
                .is_some()
            {
                sent += 1;
            }
        }
        assert_eq!(sent, 1);

        // Outside the window a second send goes through.
        let msg = gate.try_move(
            &registry,
            &grid,
            Direction::Right,
            start + Duration::from_millis(600),
        );
        assert_eq!(
            msg,
            Some(ClientMessage::Move {
                id: "u1".to_string(),
                direction: Direction::Right,
            })
        );
    }

    #[test]
    fn test_try_move_refuses_blocked_tile_without_spending_window() {
        let mut registry = ClientRegistry::new();
        registry.register_local("u1".to_string(), GridPosition::new(1, 1));
        let mut map = TileMap::new(10, 10);
        map.set_impassable(GridPosition::new(2, 1));
        let mut grid = TileGrid::create(map, GridConfig::default());
        grid.add_character(CharacterData::new(
            "u1".to_string(),
            SpriteId(0),
            GridPosition::new(1, 1),
        ));

        let mut gate = InputGate::new();
        let start = Instant::now();
        assert!(gate.try_move(&registry, &grid, Direction::Right, start).is_none());
        // The refused move did not consume the throttle window.
        assert!(gate.try_move(&registry, &grid, Direction::Down, start).is_some());
    }
}
