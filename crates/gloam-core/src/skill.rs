//! Skill experience, keyed by closed combat tags.
//!
//! Attackers earn XP keyed by their weapon's tag; defenders earn toughness
//! XP for damage taken and armor XP for damage their armor absorbed.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What kind of activity a grant of skill XP credits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SkillTag {
    Melee,
    Ranged,
    Thrown,
    Dodge,
    Toughness,
    Armor,
}

/// Per-agent accumulated skill XP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillXp {
    totals: HashMap<SkillTag, u32>,
}

impl SkillXp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, tag: SkillTag, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.totals.entry(tag).or_insert(0) += amount;
    }

    pub fn total(&self, tag: SkillTag) -> u32 {
        self.totals.get(&tag).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_accumulate() {
        let mut xp = SkillXp::new();
        xp.grant(SkillTag::Melee, 3);
        xp.grant(SkillTag::Melee, 2);
        xp.grant(SkillTag::Armor, 1);
        assert_eq!(xp.total(SkillTag::Melee), 5);
        assert_eq!(xp.total(SkillTag::Armor), 1);
        assert_eq!(xp.total(SkillTag::Dodge), 0);
    }

    #[test]
    fn zero_grant_is_noop() {
        let mut xp = SkillXp::new();
        xp.grant(SkillTag::Ranged, 0);
        assert_eq!(xp.total(SkillTag::Ranged), 0);
    }
}
