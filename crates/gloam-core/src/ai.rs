//! NPC decision making.
//!
//! Each behavior produces exactly one [`Action`] per turn. Path state is
//! carried inside the behavior so a monster keeps hunting toward the
//! player's last known position after losing sight.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind, Direction};
use crate::agent::AgentId;
use crate::consts::AI_SIGHT_RADIUS;
use crate::log::MessageStyle;
use crate::map::TileKind;
use crate::pathfind::{self, PathOptions};
use crate::perception;
use crate::world::World;

/// How far a friendly wanderer will seek out a light source.
const LIGHT_SEEK_RADIUS: i32 = 12;

/// NPC behavior state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Hunts the player on sight, pursues last known position.
    Hostile { path: Vec<(i32, i32)> },
    /// Staggers in random directions until the confusion wears off.
    Confused {
        turns_remaining: u32,
        previous: Box<Behavior>,
    },
    /// Wanders near light, opening doors and closing them behind itself.
    Friendly {
        path: Vec<(i32, i32)>,
        wait_turns: u32,
        opened_doors: Vec<(i32, i32)>,
    },
    /// Hunts like [`Behavior::Hostile`] but never sets foot on a lit tile.
    DarkHostile { path: Vec<(i32, i32)> },
}

impl Behavior {
    pub fn hostile() -> Self {
        Behavior::Hostile { path: Vec::new() }
    }

    pub fn friendly() -> Self {
        Behavior::Friendly {
            path: Vec::new(),
            wait_turns: 0,
            opened_doors: Vec::new(),
        }
    }

    pub fn dark_hostile() -> Self {
        Behavior::DarkHostile { path: Vec::new() }
    }

    pub fn confused(turns: u32, previous: Behavior) -> Self {
        Behavior::Confused {
            turns_remaining: turns,
            previous: Box::new(previous),
        }
    }
}

/// Choose this agent's action for the turn and update its behavior state.
pub fn decide(world: &mut World, id: AgentId) -> Action {
    let Some(agent) = world.agent(id) else {
        return Action::new(id, ActionKind::Wait);
    };
    let Some(behavior) = agent.behavior.clone() else {
        return Action::new(id, ActionKind::Wait);
    };

    let (action, next) = match behavior {
        Behavior::Hostile { path } => hunt(world, id, path, false),
        Behavior::DarkHostile { path } => hunt(world, id, path, true),
        Behavior::Confused {
            turns_remaining,
            previous,
        } => {
            if turns_remaining == 0 {
                let name = world.agent(id).map_or_else(String::new, |a| a.name.clone());
                world.log.push(
                    format!("The {name} is no longer confused!"),
                    MessageStyle::Info,
                );
                if let Some(agent) = world.agent_mut(id) {
                    agent.behavior = Some(*previous);
                }
                return decide(world, id);
            }
            let dir = *world
                .rng
                .choose(&Direction::ALL)
                .unwrap_or(&Direction::North);
            (
                Action::new(id, ActionKind::Bump(dir)),
                Behavior::Confused {
                    turns_remaining: turns_remaining - 1,
                    previous,
                },
            )
        }
        Behavior::Friendly {
            path,
            wait_turns,
            opened_doors,
        } => wander(world, id, path, wait_turns, opened_doors),
    };

    if let Some(agent) = world.agent_mut(id) {
        agent.behavior = Some(next);
    }
    action
}

/// Hostile pursuit, optionally refusing lit tiles.
fn hunt(
    world: &World,
    id: AgentId,
    mut path: Vec<(i32, i32)>,
    shun_light: bool,
) -> (Action, Behavior) {
    let wrap = |path: Vec<(i32, i32)>| {
        if shun_light {
            Behavior::DarkHostile { path }
        } else {
            Behavior::Hostile { path }
        }
    };
    let Some(agent) = world.agent(id) else {
        return (Action::new(id, ActionKind::Wait), wrap(path));
    };
    let pos = agent.pos();
    let player = world.player();

    if player.alive {
        let target = player.pos();
        // Adjacent: strike, unless the light there is forbidden.
        if (pos.0 - target.0).abs() <= 1
            && (pos.1 - target.1).abs() <= 1
            && pos != target
            && let Some(dir) = Direction::toward(pos, target)
        {
            return (
                Action::new(
                    id,
                    ActionKind::Melee {
                        dir,
                        target_part: None,
                    },
                ),
                wrap(path),
            );
        }
        if perception::can_see(&world.map, pos, target, AI_SIGHT_RADIUS) {
            let opts = if shun_light {
                PathOptions::shun_light()
            } else {
                PathOptions::default()
            };
            if let Some(fresh) = pathfind::path(world, pos, target, &opts) {
                path = fresh;
            }
        }
    }

    let (action, path) = follow_path(world, id, pos, path, shun_light);
    (action, wrap(path))
}

/// Take the next step of a stored path. Desyncs drop the path.
fn follow_path(
    world: &World,
    id: AgentId,
    pos: (i32, i32),
    mut path: Vec<(i32, i32)>,
    shun_light: bool,
) -> (Action, Vec<(i32, i32)>) {
    while path.first() == Some(&pos) {
        path.remove(0);
    }
    let Some(&next) = path.first() else {
        return (Action::new(id, ActionKind::Wait), path);
    };
    let Some(dir) = Direction::toward(pos, next) else {
        return (Action::new(id, ActionKind::Wait), Vec::new());
    };
    if shun_light && world.is_lit(next.0, next.1) {
        return (Action::new(id, ActionKind::Wait), Vec::new());
    }
    if world.map.tile(next.0, next.1) == TileKind::ClosedDoor {
        // Open it this turn; the stored path resumes next turn.
        return (Action::new(id, ActionKind::Interact(dir)), path);
    }
    path.remove(0);
    (Action::new(id, ActionKind::Move(dir)), path)
}

/// Friendly wandering: drift toward light, pause now and then, and tidy
/// up doors opened along the way.
fn wander(
    world: &mut World,
    id: AgentId,
    mut path: Vec<(i32, i32)>,
    wait_turns: u32,
    mut opened_doors: Vec<(i32, i32)>,
) -> (Action, Behavior) {
    let wrap = |path, wait_turns, opened_doors| Behavior::Friendly {
        path,
        wait_turns,
        opened_doors,
    };
    let Some(agent) = world.agent(id) else {
        return (
            Action::new(id, ActionKind::Wait),
            wrap(path, wait_turns, opened_doors),
        );
    };
    let pos = agent.pos();

    if wait_turns > 0 {
        return (
            Action::new(id, ActionKind::Wait),
            wrap(path, wait_turns - 1, opened_doors),
        );
    }

    // Close a door we opened once we have stepped clear of it.
    if let Some(index) = opened_doors.iter().position(|&(dx, dy)| {
        (dx - pos.0).abs() <= 1
            && (dy - pos.1).abs() <= 1
            && (dx, dy) != pos
            && world.map.tile(dx, dy) == TileKind::OpenDoor
    }) {
        let door = opened_doors.remove(index);
        if let Some(dir) = Direction::toward(pos, door) {
            return (
                Action::new(id, ActionKind::Interact(dir)),
                wrap(path, wait_turns, opened_doors),
            );
        }
    }

    if path.is_empty()
        && let Some(goal) = nearest_light(world, pos)
    {
        if let Some(fresh) = pathfind::path(world, pos, goal, &PathOptions::default()) {
            path = fresh;
        }
    }

    if path.is_empty() {
        // Nothing to head for: loiter or shuffle.
        if world.rng.one_in(3) {
            let pause = world.rng.rnd(3);
            return (
                Action::new(id, ActionKind::Wait),
                wrap(path, pause, opened_doors),
            );
        }
        let dir = *world
            .rng
            .choose(&Direction::ALL)
            .unwrap_or(&Direction::North);
        let (dx, dy) = dir.delta();
        if world.is_walkable_and_clear(pos.0 + dx, pos.1 + dy) {
            return (
                Action::new(id, ActionKind::Move(dir)),
                wrap(path, wait_turns, opened_doors),
            );
        }
        return (
            Action::new(id, ActionKind::Wait),
            wrap(path, wait_turns, opened_doors),
        );
    }

    // Record doors we are about to open so we can close them later.
    if let Some(&next) = path.first()
        && world.map.tile(next.0, next.1) == TileKind::ClosedDoor
        && !opened_doors.contains(&next)
    {
        opened_doors.push(next);
    }
    let (action, path) = follow_path(world, id, pos, path, false);
    (action, wrap(path, wait_turns, opened_doors))
}

/// Nearest tile adjacent to a burning ground light, if one is in range.
fn nearest_light(world: &World, from: (i32, i32)) -> Option<(i32, i32)> {
    world
        .ground_items
        .iter()
        .filter(|g| g.item.is_burning() && g.item.light_radius.is_some())
        .filter(|g| {
            let dx = g.x - from.0;
            let dy = g.y - from.1;
            dx * dx + dy * dy <= LIGHT_SEEK_RADIUS * LIGHT_SEEK_RADIUS
        })
        .min_by_key(|g| {
            let dx = g.x - from.0;
            let dy = g.y - from.1;
            dx * dx + dy * dy
        })
        .and_then(|g| {
            let goal = (g.x, g.y);
            Direction::ALL
                .into_iter()
                .map(|d| {
                    let (dx, dy) = d.delta();
                    (goal.0 + dx, goal.1 + dy)
                })
                .find(|&(x, y)| world.is_walkable_and_clear(x, y) || (x, y) == from)
        })
}
