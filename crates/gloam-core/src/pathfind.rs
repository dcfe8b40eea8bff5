//! Weighted pathfinding over the map, with a pluggable cost model.
//!
//! Dijkstra rather than plain BFS: closed doors and occupied tiles are
//! traversable at a premium, so an agent routes around a blocked corridor
//! instead of queueing behind it, but will take the door when it is the
//! only way through.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;

use crate::action::Direction;
use crate::consts::{CLOSED_DOOR_COST, OCCUPIED_TILE_PENALTY};
use crate::map::TileKind;
use crate::world::World;

/// Cost-model knobs for one path query.
#[derive(Debug, Clone, Copy)]
pub struct PathOptions {
    /// Extra cost of passing a closed door; `None` makes doors impassable.
    pub closed_door_cost: Option<u32>,
    /// Treat lit tiles as impassable.
    pub avoid_lit: bool,
    /// Extra cost of stepping where another agent stands.
    pub occupied_penalty: u32,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            closed_door_cost: Some(CLOSED_DOOR_COST),
            avoid_lit: false,
            occupied_penalty: OCCUPIED_TILE_PENALTY,
        }
    }
}

impl PathOptions {
    /// Doors are walls for this query.
    pub fn no_doors() -> Self {
        Self {
            closed_door_cost: None,
            ..Self::default()
        }
    }

    /// Lit tiles are impassable for this query.
    pub fn shun_light() -> Self {
        Self {
            avoid_lit: true,
            ..Self::default()
        }
    }
}

fn step_cost(world: &World, x: i32, y: i32, goal: (i32, i32), opts: &PathOptions) -> Option<u32> {
    if !world.map.in_bounds(x, y) {
        return None;
    }
    if opts.avoid_lit && world.is_lit(x, y) {
        return None;
    }
    let mut cost = match world.map.tile(x, y) {
        TileKind::ClosedDoor => 1 + opts.closed_door_cost?,
        tile if tile.is_walkable() => 1,
        _ => return None,
    };
    // The goal itself is exempt from the occupancy penalty so that paths
    // toward a standing target do not price in the target.
    if (x, y) != goal && world.blocking_agent_at(x, y).is_some() {
        cost += opts.occupied_penalty;
    }
    Some(cost)
}

/// Find the cheapest path from `from` to `to`. Returns the tile sequence
/// excluding the start, ending at the goal, or `None` when unreachable.
pub fn path(
    world: &World,
    from: (i32, i32),
    to: (i32, i32),
    opts: &PathOptions,
) -> Option<Vec<(i32, i32)>> {
    if from == to {
        return Some(Vec::new());
    }

    let mut dist: HashMap<(i32, i32), u32> = HashMap::new();
    let mut prev: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut heap = BinaryHeap::new();
    dist.insert(from, 0);
    heap.push(Reverse((0u32, from)));

    while let Some(Reverse((cost, pos))) = heap.pop() {
        if pos == to {
            break;
        }
        if dist.get(&pos).is_some_and(|&d| cost > d) {
            continue;
        }
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let next = (pos.0 + dx, pos.1 + dy);
            let Some(step) = step_cost(world, next.0, next.1, to, opts) else {
                continue;
            };
            let next_cost = cost + step;
            if dist.get(&next).is_none_or(|&d| next_cost < d) {
                dist.insert(next, next_cost);
                prev.insert(next, pos);
                heap.push(Reverse((next_cost, next)));
            }
        }
    }

    if !prev.contains_key(&to) {
        return None;
    }
    let mut tiles = vec![to];
    let mut cursor = to;
    while let Some(&p) = prev.get(&cursor) {
        if p == from {
            break;
        }
        tiles.push(p);
        cursor = p;
    }
    tiles.reverse();
    Some(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Fighter;
    use crate::map::{Map, TileKind};
    use crate::world::World;

    fn corridor_world() -> World {
        // A walled room split by a wall with a door at (6, 3).
        let mut map = Map::walled_room(13, 7);
        for y in 1..6 {
            map.set(6, y, TileKind::Wall);
        }
        map.set(6, 3, TileKind::ClosedDoor);
        World::new(map, 1, (2, 3))
    }

    #[test]
    fn path_goes_through_the_only_door() {
        let world = corridor_world();
        let tiles = path(&world, (2, 3), (10, 3), &PathOptions::default()).unwrap();
        assert!(tiles.contains(&(6, 3)));
        assert_eq!(*tiles.last().unwrap(), (10, 3));
    }

    #[test]
    fn impassable_doors_make_the_far_side_unreachable() {
        let world = corridor_world();
        assert!(path(&world, (2, 3), (10, 3), &PathOptions::no_doors()).is_none());
    }

    #[test]
    fn occupied_tiles_are_routed_around() {
        let mut world = World::new(Map::walled_room(9, 9), 1, (1, 4));
        world.spawn_agent("orc", 3, 4, Fighter::new(10, 3, 0));
        let tiles = path(&world, (1, 4), (7, 4), &PathOptions::default()).unwrap();
        assert!(!tiles.contains(&(3, 4)));
    }

    #[test]
    fn goal_occupancy_is_free() {
        let mut world = World::new(Map::walled_room(9, 9), 1, (1, 4));
        let orc = world.spawn_agent("orc", 5, 4, Fighter::new(10, 3, 0));
        let target = world.agent(orc).unwrap().pos();
        let tiles = path(&world, (1, 4), target, &PathOptions::default()).unwrap();
        assert_eq!(*tiles.last().unwrap(), (5, 4));
    }

    #[test]
    fn trivial_path_is_empty() {
        let world = corridor_world();
        assert_eq!(
            path(&world, (2, 3), (2, 3), &PathOptions::default()),
            Some(Vec::new())
        );
    }
}
