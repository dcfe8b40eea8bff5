//! Items: weapons, launchers, ammunition, armor, light sources.
//!
//! Items are plain data. Consumable/magic item behavior is out of scope; the
//! core only needs the properties that feed combat, equipment, and the
//! durability tick.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::body::PartClass;
use crate::consts::{CAMPFIRE_LIGHT_RADIUS, TORCH_LIGHT_RADIUS};
use crate::skill::SkillTag;

/// Unique identifier for item instances, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Broad item category driving slot selection and action validation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ItemKind {
    MeleeWeapon,
    Launcher,
    Ammo,
    Shield,
    Armor,
    Torch,
    Backpack,
    Coin,
    Campfire,
    Chest,
    Misc,
}

/// Equipment slot an item occupies when equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EquipSlot {
    Weapon,
    Offhand,
    Armor,
    Backpack,
}

/// Item wear state. Degrading to zero breaks the item exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    pub current: i32,
    pub max: i32,
    broken: bool,
}

impl Durability {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            broken: false,
        }
    }

    /// Reduce durability. Returns true the single time the item breaks.
    pub fn degrade(&mut self, amount: i32) -> bool {
        self.current -= amount;
        if self.current <= 0 && !self.broken {
            self.broken = true;
            return true;
        }
        false
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }
}

/// An item instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    /// Body-part classes this item protects when worn.
    pub coverage: Vec<PartClass>,
    /// Weight in arbitrary units; drives thrown-impact damage.
    pub weight: i32,
    /// Coin value for currency pickups.
    pub value: i32,
    /// Skill credited to the wielder on a successful attack.
    pub skill: SkillTag,
    pub durability: Option<Durability>,
    /// Remaining burn time for light sources. `Some(0)` is burned out.
    pub burn_ticks: Option<u32>,
    /// Light radius when burning (equipped torch or ground campfire).
    pub light_radius: Option<i32>,
    /// Stack count for ammunition and coins.
    pub count: u32,
    /// Items stored inside a container.
    pub contents: Vec<Item>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            power_bonus: 0,
            defense_bonus: 0,
            coverage: Vec::new(),
            weight: 1,
            value: 0,
            skill: SkillTag::Melee,
            durability: None,
            burn_ticks: None,
            light_radius: None,
            count: 1,
            contents: Vec::new(),
        }
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power_bonus = power;
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense_bonus = defense;
        self
    }

    pub fn with_coverage(mut self, coverage: &[PartClass]) -> Self {
        self.coverage = coverage.to_vec();
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_skill(mut self, skill: SkillTag) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_durability(mut self, max: i32) -> Self {
        self.durability = Some(Durability::new(max));
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// Mark this item as a burning light source.
    pub fn with_light(mut self, radius: i32, burn_ticks: u32) -> Self {
        self.light_radius = Some(radius);
        self.burn_ticks = Some(burn_ticks);
        self
    }

    /// A carryable torch, lit for `burn_ticks` turns.
    pub fn torch(id: ItemId, burn_ticks: u32) -> Self {
        Self::new(id, "torch", ItemKind::Torch).with_light(TORCH_LIGHT_RADIUS, burn_ticks)
    }

    /// A stationary campfire, lit for `burn_ticks` turns.
    pub fn campfire(id: ItemId, burn_ticks: u32) -> Self {
        Self::new(id, "campfire", ItemKind::Campfire).with_light(CAMPFIRE_LIGHT_RADIUS, burn_ticks)
    }

    /// A fixed chest holding other items.
    pub fn chest(id: ItemId, contents: Vec<Item>) -> Self {
        let mut chest = Self::new(id, "chest", ItemKind::Chest);
        chest.contents = contents;
        chest
    }

    /// Slot this item belongs in when equipped, if it is equippable.
    pub fn preferred_slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::MeleeWeapon | ItemKind::Launcher => Some(EquipSlot::Weapon),
            ItemKind::Shield | ItemKind::Ammo | ItemKind::Torch => Some(EquipSlot::Offhand),
            ItemKind::Armor => Some(EquipSlot::Armor),
            ItemKind::Backpack => Some(EquipSlot::Backpack),
            ItemKind::Coin | ItemKind::Campfire | ItemKind::Chest | ItemKind::Misc => None,
        }
    }

    /// Is this a light source that is currently burning?
    pub fn is_burning(&self) -> bool {
        self.light_radius.is_some() && self.burn_ticks.is_none_or(|t| t > 0)
    }

    /// Does this item protect the given body-part class when worn?
    pub fn covers(&self, class: PartClass) -> bool {
        self.coverage.contains(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durability_breaks_once() {
        let mut d = Durability::new(3);
        assert!(!d.degrade(2));
        assert!(d.degrade(2));
        assert!(!d.degrade(1));
        assert!(d.is_broken());
    }

    #[test]
    fn torch_burns_down() {
        let mut torch = Item::new(ItemId(1), "torch", ItemKind::Torch).with_light(7, 2);
        assert!(torch.is_burning());
        torch.burn_ticks = Some(0);
        assert!(!torch.is_burning());
    }

    #[test]
    fn slots_by_kind() {
        let bow = Item::new(ItemId(1), "shortbow", ItemKind::Launcher);
        assert_eq!(bow.preferred_slot(), Some(EquipSlot::Weapon));
        let arrows = Item::new(ItemId(2), "arrows", ItemKind::Ammo).with_count(10);
        assert_eq!(arrows.preferred_slot(), Some(EquipSlot::Offhand));
        let coin = Item::new(ItemId(3), "coin", ItemKind::Coin);
        assert_eq!(coin.preferred_slot(), None);
    }
}
