//! Tile-grid contract and an in-memory implementation.
//!
//! The client core only talks to [`GridWorld`]; `TileGrid` is the concrete
//! walkability/occupancy model used by the binary and by the test suites.

use log::warn;
use shared::{ClientId, GridPosition};
use std::collections::{HashMap, HashSet};

/// Default walking animation row for newly created characters.
pub const WALKING_ANIMATION_MAPPING: u32 = 6;

/// Opaque handle to a renderable sprite, allocated by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// Anything that can hand out fresh renderable sprites.
pub trait SpriteSource {
    fn make_sprite(&mut self) -> SpriteId;
}

/// Everything the grid needs to place a new renderable actor.
#[derive(Debug, Clone)]
pub struct CharacterData {
    pub id: ClientId,
    pub sprite: SpriteId,
    pub walking_animation_mapping: u32,
    pub start_position: GridPosition,
}

impl CharacterData {
    pub fn new(id: ClientId, sprite: SpriteId, start_position: GridPosition) -> Self {
        Self {
            id,
            sprite,
            walking_animation_mapping: WALKING_ANIMATION_MAPPING,
            start_position,
        }
    }
}

/// Grid/pathing operations the client core depends on.
pub trait GridWorld {
    fn get_position(&self, id: &str) -> Option<GridPosition>;
    /// True when the tile cannot be walked onto: out of bounds, impassable,
    /// or occupied by another character.
    fn is_blocked(&self, pos: GridPosition) -> bool;
    /// Moves an existing character. Unknown ids are skipped with a warning.
    fn move_to(&mut self, id: &str, pos: GridPosition) -> bool;
    /// Places a new character. Ids already present are skipped, so replaying
    /// a join snapshot never duplicates an actor.
    fn add_character(&mut self, character: CharacterData) -> bool;
}

/// Static tile map: rectangular bounds plus a set of impassable tiles.
#[derive(Debug, Clone)]
pub struct TileMap {
    pub width: i32,
    pub height: i32,
    impassable: HashSet<GridPosition>,
}

impl TileMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            impassable: HashSet::new(),
        }
    }

    /// A map whose outermost ring of tiles is impassable.
    pub fn bordered(width: i32, height: i32) -> Self {
        let mut map = Self::new(width, height);
        for x in 0..width {
            map.set_impassable(GridPosition::new(x, 0));
            map.set_impassable(GridPosition::new(x, height - 1));
        }
        for y in 0..height {
            map.set_impassable(GridPosition::new(0, y));
            map.set_impassable(GridPosition::new(width - 1, y));
        }
        map
    }

    pub fn set_impassable(&mut self, pos: GridPosition) {
        self.impassable.insert(pos);
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn is_impassable(&self, pos: GridPosition) -> bool {
        self.impassable.contains(&pos)
    }
}

/// A placed character as the grid tracks it.
#[derive(Debug, Clone)]
pub struct Character {
    pub sprite: SpriteId,
    pub walking_animation_mapping: u32,
    pub pos: GridPosition,
}

/// Initial character set handed to [`TileGrid::create`].
#[derive(Debug, Clone, Default)]
pub struct GridConfig {
    pub characters: Vec<CharacterData>,
}

/// In-memory tile grid with character occupancy.
pub struct TileGrid {
    map: TileMap,
    characters: HashMap<ClientId, Character>,
}

impl TileGrid {
    pub fn create(map: TileMap, config: GridConfig) -> Self {
        let mut grid = Self {
            map,
            characters: HashMap::new(),
        };
        for character in config.characters {
            grid.add_character(character);
        }
        grid
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Every placed character, in no particular order.
    pub fn characters(&self) -> impl Iterator<Item = (&ClientId, &Character)> {
        self.characters.iter()
    }
}

impl GridWorld for TileGrid {
    fn get_position(&self, id: &str) -> Option<GridPosition> {
        self.characters.get(id).map(|c| c.pos)
    }

    fn is_blocked(&self, pos: GridPosition) -> bool {
        if !self.map.in_bounds(pos) || self.map.is_impassable(pos) {
            return true;
        }
        self.characters.values().any(|c| c.pos == pos)
    }

    fn move_to(&mut self, id: &str, pos: GridPosition) -> bool {
        // Server-authoritative: the destination is applied as sent, even if
        // the local walkability model would have called it blocked.
        match self.characters.get_mut(id) {
            Some(character) => {
                character.pos = pos;
                true
            }
            None => {
                warn!("move_to for unknown character '{}', skipped", id);
                false
            }
        }
    }

    fn add_character(&mut self, character: CharacterData) -> bool {
        if self.characters.contains_key(&character.id) {
            warn!("character '{}' already placed, skipped", character.id);
            return false;
        }
        self.characters.insert(
            character.id,
            Character {
                sprite: character.sprite,
                walking_animation_mapping: character.walking_animation_mapping,
                pos: character.start_position,
            },
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> TileGrid {
        TileGrid::create(TileMap::new(10, 10), GridConfig::default())
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = open_grid();
        assert!(grid.is_blocked(GridPosition::new(-1, 0)));
        assert!(grid.is_blocked(GridPosition::new(0, -1)));
        assert!(grid.is_blocked(GridPosition::new(10, 0)));
        assert!(grid.is_blocked(GridPosition::new(0, 10)));
        assert!(!grid.is_blocked(GridPosition::new(0, 0)));
    }

    #[test]
    fn test_bordered_map_blocks_edges() {
        let grid = TileGrid::create(TileMap::bordered(8, 6), GridConfig::default());
        assert!(grid.is_blocked(GridPosition::new(0, 3)));
        assert!(grid.is_blocked(GridPosition::new(7, 3)));
        assert!(grid.is_blocked(GridPosition::new(4, 0)));
        assert!(grid.is_blocked(GridPosition::new(4, 5)));
        assert!(!grid.is_blocked(GridPosition::new(1, 1)));
    }

    #[test]
    fn test_occupied_tile_is_blocked() {
        let mut grid = open_grid();
        grid.add_character(CharacterData::new(
            "a".to_string(),
            SpriteId(0),
            GridPosition::new(4, 4),
        ));
        assert!(grid.is_blocked(GridPosition::new(4, 4)));
        assert!(!grid.is_blocked(GridPosition::new(4, 5)));
    }

    #[test]
    fn test_add_character_is_idempotent() {
        let mut grid = open_grid();
        assert!(grid.add_character(CharacterData::new(
            "a".to_string(),
            SpriteId(0),
            GridPosition::new(1, 1),
        )));
        assert!(!grid.add_character(CharacterData::new(
            "a".to_string(),
            SpriteId(1),
            GridPosition::new(2, 2),
        )));
        assert_eq!(grid.character_count(), 1);
        assert_eq!(grid.get_position("a"), Some(GridPosition::new(1, 1)));
    }

    #[test]
    fn test_move_to_updates_known_and_skips_unknown() {
        let mut grid = open_grid();
        grid.add_character(CharacterData::new(
            "a".to_string(),
            SpriteId(0),
            GridPosition::new(1, 1),
        ));
        assert!(grid.move_to("a", GridPosition::new(2, 1)));
        assert_eq!(grid.get_position("a"), Some(GridPosition::new(2, 1)));
        assert!(!grid.move_to("ghost", GridPosition::new(0, 0)));
    }
}
