//! Field of view and line-of-sight tests.
//!
//! Visibility is a radius-limited mask over the map's transparency. The point
//! test walks a Bresenham line and is symmetric in practice for the cardinal
//! and diagonal cases the AI cares about.

use serde::{Deserialize, Serialize};

use crate::map::Map;

/// Boolean visibility mask over a map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionMask {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl VisionMask {
    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.cells[(y * self.width + x) as usize]
    }

    fn set(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = true;
        }
    }
}

/// True when an unobstructed straight line runs from `from` to `to`.
///
/// The origin does not block itself; the endpoint is visible even when the
/// endpoint tile itself is opaque (walls are visible from adjacent floor).
pub fn line_of_sight(map: &Map, from: (i32, i32), to: (i32, i32)) -> bool {
    let (mut x, mut y) = from;
    let (tx, ty) = to;
    let dx = (tx - x).abs();
    let dy = (ty - y).abs();
    let sx = (tx - x).signum();
    let sy = (ty - y).signum();
    let mut err = dx - dy;

    loop {
        if (x, y) == (tx, ty) {
            return true;
        }
        if (x, y) != from && !map.is_transparent(x, y) {
            return false;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Compute the set of tiles visible from `origin` within `radius`
/// (Chebyshev-bounded, Euclidean-trimmed).
pub fn compute_fov(map: &Map, origin: (i32, i32), radius: i32) -> VisionMask {
    let mut mask = VisionMask::empty(map.width, map.height);
    let (ox, oy) = origin;
    mask.set(ox, oy);

    for y in (oy - radius)..=(oy + radius) {
        for x in (ox - radius)..=(ox + radius) {
            if !map.in_bounds(x, y) {
                continue;
            }
            let dx = x - ox;
            let dy = y - oy;
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            if line_of_sight(map, origin, (x, y)) {
                mask.set(x, y);
            }
        }
    }
    mask
}

/// Radius-limited point visibility test: can an observer at `from` see `to`?
pub fn can_see(map: &Map, from: (i32, i32), to: (i32, i32), radius: i32) -> bool {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    if dx * dx + dy * dy > radius * radius {
        return false;
    }
    line_of_sight(map, from, to)
}
