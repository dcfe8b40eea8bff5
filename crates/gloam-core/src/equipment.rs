//! Equipped-item state: weapon, offhand, armor, backpack.

use serde::{Deserialize, Serialize};

use crate::body::PartClass;
use crate::item::{EquipSlot, Item, ItemId, ItemKind};

/// What an agent currently has equipped. At most one item per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentState {
    pub weapon: Option<Item>,
    pub offhand: Option<Item>,
    pub armor: Option<Item>,
    pub backpack: Option<Item>,
}

impl EquipmentState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, slot: EquipSlot) -> &Option<Item> {
        match slot {
            EquipSlot::Weapon => &self.weapon,
            EquipSlot::Offhand => &self.offhand,
            EquipSlot::Armor => &self.armor,
            EquipSlot::Backpack => &self.backpack,
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Offhand => &mut self.offhand,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Backpack => &mut self.backpack,
        }
    }

    /// Equip an item into its preferred slot, returning whatever was
    /// displaced. Returns `Err(item)` if the item is not equippable.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let Some(slot) = item.preferred_slot() else {
            return Err(item);
        };
        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn is_equipped(&self, id: ItemId) -> bool {
        self.slot_of(id).is_some()
    }

    pub fn slot_of(&self, id: ItemId) -> Option<EquipSlot> {
        [
            EquipSlot::Weapon,
            EquipSlot::Offhand,
            EquipSlot::Armor,
            EquipSlot::Backpack,
        ]
        .into_iter()
        .find(|&s| self.slot(s).as_ref().is_some_and(|i| i.id == id))
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.offhand, &self.armor, &self.backpack]
            .into_iter()
            .filter_map(|s| s.as_ref())
    }

    /// Attack power contributed by equipment.
    pub fn power_bonus(&self) -> i32 {
        self.items().map(|i| i.power_bonus).sum()
    }

    /// Flat defense contributed by equipment, regardless of coverage.
    pub fn defense_bonus(&self) -> i32 {
        self.items().map(|i| i.defense_bonus).sum()
    }

    /// Defense that worn armor contributes against a hit on the given
    /// body-part class. Only items covering that class count.
    pub fn armor_defense_for(&self, class: PartClass) -> i32 {
        self.items()
            .filter(|i| i.covers(class))
            .map(|i| i.defense_bonus)
            .sum()
    }

    /// A ranged attack requires a readied launcher plus ammunition.
    pub fn has_readied_launcher(&self) -> bool {
        self.weapon.as_ref().is_some_and(|w| w.kind == ItemKind::Launcher)
            && self
                .offhand
                .as_ref()
                .is_some_and(|a| a.kind == ItemKind::Ammo && a.count > 0)
    }

    pub fn readied_launcher(&self) -> Option<&Item> {
        self.weapon
            .as_ref()
            .filter(|w| w.kind == ItemKind::Launcher)
    }

    /// Consume exactly one unit of ammunition. Returns a single-count copy
    /// of the spent projectile, or `None` if no ammo was readied.
    pub fn consume_ammo(&mut self) -> Option<Item> {
        let ammo = self.offhand.as_mut()?;
        if ammo.kind != ItemKind::Ammo || ammo.count == 0 {
            return None;
        }
        ammo.count -= 1;
        let mut spent = ammo.clone();
        spent.count = 1;
        if ammo.count == 0 {
            self.offhand = None;
        }
        Some(spent)
    }

    /// Burn equipped light sources one tick. Returns the items that burned
    /// out this tick; they are removed from their slots.
    pub fn tick_burning(&mut self) -> Vec<Item> {
        let mut burned_out = Vec::new();
        for slot in [EquipSlot::Weapon, EquipSlot::Offhand] {
            let expired = {
                let Some(item) = self.slot_mut(slot).as_mut() else {
                    continue;
                };
                match &mut item.burn_ticks {
                    Some(ticks) if *ticks > 0 => {
                        *ticks -= 1;
                        *ticks == 0
                    }
                    _ => false,
                }
            };
            if expired {
                if let Some(item) = self.slot_mut(slot).take() {
                    burned_out.push(item);
                }
            }
        }
        burned_out
    }

    /// Largest light radius among burning equipped items.
    pub fn light_radius(&self) -> Option<i32> {
        self.items()
            .filter(|i| i.is_burning())
            .filter_map(|i| i.light_radius)
            .max()
    }
}
