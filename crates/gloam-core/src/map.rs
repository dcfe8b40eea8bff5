//! Tile grid and the map query surface the core exposes to its collaborators.
//!
//! Map generation is out of scope; maps arrive pre-built (tests construct
//! them directly) and the core only queries walkability, transparency, and
//! tile names, and toggles doors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::action::Direction;

/// Terrain type of a single map cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
    ClosedDoor,
    OpenDoor,
    DownStairs,
    UpStairs,
}

impl TileKind {
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::ClosedDoor)
    }

    pub const fn is_transparent(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::ClosedDoor)
    }

    /// Human-readable tile name, used for door/floor-specific behavior
    /// and inspection panels.
    pub const fn name(self) -> &'static str {
        match self {
            TileKind::Wall => "wall",
            TileKind::Floor => "floor",
            TileKind::ClosedDoor => "door",
            TileKind::OpenDoor => "open door",
            TileKind::DownStairs => "stairs down",
            TileKind::UpStairs => "stairs up",
        }
    }
}

/// Rectangular tile grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
}

impl Map {
    /// Create a map filled with the given tile.
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width * height) as usize],
        }
    }

    /// Create an all-floor map ringed by walls. Handy for tests.
    pub fn walled_room(width: i32, height: i32) -> Self {
        let mut map = Self::filled(width, height, TileKind::Floor);
        for x in 0..width {
            map.set(x, 0, TileKind::Wall);
            map.set(x, height - 1, TileKind::Wall);
        }
        for y in 0..height {
            map.set(0, y, TileKind::Wall);
            map.set(width - 1, y, TileKind::Wall);
        }
        map
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Tile at (x, y). Out-of-bounds reads as wall.
    pub fn tile(&self, x: i32, y: i32) -> TileKind {
        if self.in_bounds(x, y) {
            self.tiles[self.idx(x, y)]
        } else {
            TileKind::Wall
        }
    }

    pub fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.tiles[i] = kind;
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.tile(x, y).is_walkable()
    }

    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.tile(x, y).is_transparent()
    }

    pub fn tile_name(&self, x: i32, y: i32) -> &'static str {
        self.tile(x, y).name()
    }

    /// Open a closed door. Returns true if the tile changed.
    pub fn open_door(&mut self, x: i32, y: i32) -> bool {
        if self.tile(x, y) == TileKind::ClosedDoor {
            self.set(x, y, TileKind::OpenDoor);
            true
        } else {
            false
        }
    }

    /// Close an open door. Returns true if the tile changed.
    pub fn close_door(&mut self, x: i32, y: i32) -> bool {
        if self.tile(x, y) == TileKind::OpenDoor {
            self.set(x, y, TileKind::ClosedDoor);
            true
        } else {
            false
        }
    }

    /// Walk a straight line from `from` (exclusive) in `dir`, yielding up to
    /// `max_tiles` coordinates. Used for line-of-fire scans.
    pub fn line_from(
        &self,
        from: (i32, i32),
        dir: Direction,
        max_tiles: i32,
    ) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (dx, dy) = dir.delta();
        (1..=max_tiles).map(move |step| (from.0 + dx * step, from.1 + dy * step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_wall() {
        let map = Map::walled_room(10, 8);
        assert_eq!(map.tile(-1, 0), TileKind::Wall);
        assert_eq!(map.tile(10, 0), TileKind::Wall);
        assert!(!map.is_walkable(-1, -1));
    }

    #[test]
    fn door_toggling() {
        let mut map = Map::walled_room(10, 8);
        map.set(4, 4, TileKind::ClosedDoor);
        assert!(!map.is_walkable(4, 4));
        assert!(!map.is_transparent(4, 4));
        assert!(map.open_door(4, 4));
        assert!(map.is_walkable(4, 4));
        assert!(!map.open_door(4, 4));
        assert!(map.close_door(4, 4));
        assert_eq!(map.tile_name(4, 4), "door");
    }

    #[test]
    fn line_scan_marches_straight() {
        let map = Map::walled_room(20, 20);
        let tiles: Vec<_> = map.line_from((5, 5), Direction::East, 3).collect();
        assert_eq!(tiles, vec![(6, 5), (7, 5), (8, 5)]);
    }
}
