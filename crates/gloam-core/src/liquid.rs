//! Liquid coatings on body parts, and their aging/evaporation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What a body part is coated in, if anything.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum LiquidKind {
    #[default]
    None,
    Water,
    Blood,
    Oil,
    Poison,
}

impl LiquidKind {
    /// Ticks before this coating evaporates or dries off. `None` never ages.
    pub const fn evaporation_ticks(self) -> Option<u32> {
        match self {
            LiquidKind::None => None,
            LiquidKind::Water => Some(20),
            LiquidKind::Blood => Some(60),
            LiquidKind::Oil => Some(120),
            LiquidKind::Poison => Some(40),
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            LiquidKind::None => "nothing",
            LiquidKind::Water => "water",
            LiquidKind::Blood => "blood",
            LiquidKind::Oil => "oil",
            LiquidKind::Poison => "poison",
        }
    }
}

/// A coating plus its age. Aging happens once per world-maintenance tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coating {
    pub kind: LiquidKind,
    pub age: u32,
}

impl Coating {
    pub fn apply(&mut self, kind: LiquidKind) {
        self.kind = kind;
        self.age = 0;
    }

    /// Advance one tick. Returns true if the coating evaporated this tick.
    pub fn tick(&mut self) -> bool {
        let Some(limit) = self.kind.evaporation_ticks() else {
            return false;
        };
        self.age += 1;
        if self.age >= limit {
            self.kind = LiquidKind::None;
            self.age = 0;
            true
        } else {
            false
        }
    }

    pub fn is_coated(&self) -> bool {
        self.kind != LiquidKind::None
    }
}
