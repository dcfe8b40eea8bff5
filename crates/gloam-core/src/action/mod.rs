//! The action pipeline: everything an agent can do on its turn.
//!
//! Every action is validated and executed through [`Action::attempt`].
//! A rejected action returns [`Impossible`] and costs no turn; the caller
//! decides whether to surface the reason (player) or swallow it (NPCs).

mod attack;
mod interact;
mod movement;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::agent::AgentId;
use crate::body::PartKind;
use crate::item::ItemId;
use crate::world::World;

/// One of the eight movement directions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Tile offset, with north pointing toward decreasing y.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    /// Direction from one tile toward an adjacent-or-distant other, by sign.
    pub fn toward(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
        let step = ((to.0 - from.0).signum(), (to.1 - from.1).signum());
        Direction::ALL.into_iter().find(|d| d.delta() == step)
    }
}

/// Why an action could not be taken. Rejection costs no turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Impossible(pub String);

impl Impossible {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// The action verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Pass the turn.
    Wait,
    /// Step one tile.
    Move(Direction),
    /// Context-sensitive step: attack if something blocks, else move.
    Bump(Direction),
    /// Strike an adjacent agent, optionally aiming at a body part.
    Melee {
        dir: Direction,
        target_part: Option<PartKind>,
    },
    /// Loose a projectile along a straight line.
    Ranged {
        dir: Direction,
        target_part: Option<PartKind>,
    },
    /// Hurl an inventory item.
    Throw { dir: Direction, item: ItemId },
    /// Pick up the topmost item underfoot.
    PickUp,
    /// Equip (or unequip, if already worn) an inventory item.
    Equip(ItemId),
    /// Drop an inventory item underfoot.
    Drop(ItemId),
    /// Use the adjacent tile: open or close a door.
    Interact(Direction),
}

/// An agent's chosen action for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: AgentId,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(actor: AgentId, kind: ActionKind) -> Self {
        Self { actor, kind }
    }

    /// Validate and execute. `Ok` consumed the actor's turn; `Err` left
    /// the world untouched and the turn unspent.
    pub fn attempt(self, world: &mut World) -> Result<(), Impossible> {
        match self.kind {
            ActionKind::Wait => Ok(()),
            ActionKind::Move(dir) => movement::walk(world, self.actor, dir),
            ActionKind::Bump(dir) => movement::bump(world, self.actor, dir),
            ActionKind::Melee { dir, target_part } => {
                attack::melee(world, self.actor, dir, target_part)
            }
            ActionKind::Ranged { dir, target_part } => {
                attack::ranged(world, self.actor, dir, target_part)
            }
            ActionKind::Throw { dir, item } => attack::throw(world, self.actor, dir, item),
            ActionKind::PickUp => interact::pick_up(world, self.actor),
            ActionKind::Equip(item) => interact::equip(world, self.actor, item),
            ActionKind::Drop(item) => interact::drop_item(world, self.actor, item),
            ActionKind::Interact(dir) => interact::interact(world, self.actor, dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_unit_steps() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
        }
    }

    #[test]
    fn toward_picks_the_signed_step() {
        assert_eq!(Direction::toward((2, 2), (7, 2)), Some(Direction::East));
        assert_eq!(
            Direction::toward((2, 2), (0, 5)),
            Some(Direction::SouthWest)
        );
        assert_eq!(Direction::toward((2, 2), (2, 2)), None);
    }
}
