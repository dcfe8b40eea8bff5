//! Agents: the player and every NPC, with their combat stats, body,
//! equipment, inventory, and initiative state.

use serde::{Deserialize, Serialize};

use crate::action::Direction;
use crate::ai::Behavior;
use crate::body::BodyPlan;
use crate::consts::{FRIENDLY_SPEED, NORMAL_SPEED};
use crate::effect::EffectList;
use crate::equipment::EquipmentState;
use crate::item::{Item, ItemId};
use crate::level::CharacterLevel;
use crate::skill::SkillXp;

/// Base inventory slots; a worn backpack adds more.
pub const BASE_INVENTORY_CAPACITY: usize = 10;
pub const BACKPACK_CAPACITY_BONUS: usize = 10;

/// Unique identifier for agents, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Core combat statistics. The HP pool here is authoritative for death;
/// body parts are a secondary, more granular layer on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    hp: i32,
    pub base_power: i32,
    pub base_defense: i32,
    /// Probability in [0, 1] of dodging a hit that would otherwise land.
    pub dodge_chance: f32,
    /// Whether a corpse remains on the map after death.
    pub leave_corpse: bool,
}

impl Fighter {
    pub fn new(max_hp: i32, base_power: i32, base_defense: i32) -> Self {
        Self {
            max_hp,
            hp: max_hp,
            base_power,
            base_defense,
            dodge_chance: 0.0,
            leave_corpse: true,
        }
    }

    pub fn with_dodge(mut self, chance: f32) -> Self {
        self.dodge_chance = chance;
        self
    }

    pub fn no_corpse(mut self) -> Self {
        self.leave_corpse = false;
        self
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Set HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Returns the damage actually dealt after clamping.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.hp);
        self.hp -= actual;
        actual
    }

    /// Returns the healing actually applied.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// Mental clarity drained by darkness, restored by light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lucidity {
    pub current: i32,
    pub max: i32,
}

impl Lucidity {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn drain(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn restore(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Remaining fraction in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// One entity on the map: the player, a monster, or a corpse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    pub blocks_movement: bool,
    pub alive: bool,
    pub fighter: Fighter,
    /// Granular damage model; agents without one take pool damage only.
    pub body: Option<BodyPlan>,
    pub equipment: EquipmentState,
    pub inventory: Vec<Item>,
    pub gold: i32,
    pub effects: EffectList,
    /// `None` for the player and for inert agents (corpses, campfires).
    pub behavior: Option<Behavior>,
    /// Initiative points gained per cycle. 100 is one action per cycle.
    pub speed: i32,
    pub initiative_counter: i32,
    /// First direction tried when relocating after a dodge.
    pub preferred_dodge_direction: Option<Direction>,
    pub level: CharacterLevel,
    pub skills: SkillXp,
    /// Satiation countdown; `None` for agents that do not hunger.
    pub hunger: Option<i32>,
    pub lucidity: Option<Lucidity>,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, x: i32, y: i32, fighter: Fighter) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            glyph: '@',
            blocks_movement: true,
            alive: true,
            fighter,
            body: None,
            equipment: EquipmentState::new(),
            inventory: Vec::new(),
            gold: 0,
            effects: EffectList::new(),
            behavior: None,
            speed: NORMAL_SPEED,
            initiative_counter: 0,
            preferred_dodge_direction: None,
            level: CharacterLevel::default(),
            skills: SkillXp::new(),
            hunger: None,
            lucidity: None,
        }
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn with_body(mut self, body: BodyPlan) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Assign a behavior, adopting its action rate. Friendly wanderers
    /// move at half the baseline rate.
    pub fn set_behavior(&mut self, behavior: Behavior) {
        if matches!(behavior, Behavior::Friendly { .. }) {
            self.speed = FRIENDLY_SPEED;
        }
        self.behavior = Some(behavior);
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_xp_reward(mut self, xp: u32) -> Self {
        self.level = CharacterLevel::new(xp);
        self
    }

    /// Total attack power including equipment bonuses.
    pub fn power(&self) -> i32 {
        self.fighter.base_power + self.equipment.power_bonus()
    }

    /// Total flat defense including equipment bonuses.
    pub fn defense(&self) -> i32 {
        self.fighter.base_defense + self.equipment.defense_bonus()
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn distance_to(&self, x: i32, y: i32) -> f32 {
        let dx = (self.x - x) as f32;
        let dy = (self.y - y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn inventory_capacity(&self) -> usize {
        let mut capacity = BASE_INVENTORY_CAPACITY;
        if self.equipment.backpack.is_some() {
            capacity += BACKPACK_CAPACITY_BONUS;
        }
        capacity
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.inventory_capacity()
    }

    pub fn inventory_item(&self, id: ItemId) -> Option<&Item> {
        self.inventory.iter().find(|i| i.id == id)
    }

    pub fn remove_inventory_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.inventory.iter().position(|i| i.id == id)?;
        Some(self.inventory.remove(index))
    }

    /// Can this agent walk at all, given body damage?
    pub fn can_move(&self) -> bool {
        self.body.as_ref().is_none_or(|b| b.can_move())
    }

    /// Can this agent wield and use held items?
    pub fn can_use_hands(&self) -> bool {
        self.body.as_ref().is_none_or(|b| b.can_use_hands())
    }

    /// Turn this agent into an inert corpse in place.
    pub fn become_corpse(&mut self) {
        self.name = format!("remains of {}", self.name);
        self.glyph = '%';
        self.blocks_movement = false;
        self.alive = false;
        self.behavior = None;
        self.fighter.set_hp(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_clamps_at_both_ends() {
        let mut f = Fighter::new(30, 5, 2);
        f.set_hp(100);
        assert_eq!(f.hp(), 30);
        f.set_hp(-5);
        assert_eq!(f.hp(), 0);
        assert!(f.is_dead());
    }

    #[test]
    fn damage_and_heal_report_actual_amounts() {
        let mut f = Fighter::new(10, 0, 0);
        assert_eq!(f.take_damage(25), 10);
        assert_eq!(f.take_damage(5), 0);
        assert_eq!(f.heal(4), 4);
        assert_eq!(f.heal(100), 6);
    }

    #[test]
    fn backpack_expands_inventory() {
        use crate::item::{Item, ItemId, ItemKind};
        let mut agent = Agent::new(AgentId(0), "hero", 0, 0, Fighter::new(30, 5, 2));
        assert_eq!(agent.inventory_capacity(), BASE_INVENTORY_CAPACITY);
        agent
            .equipment
            .equip(Item::new(ItemId(1), "backpack", ItemKind::Backpack))
            .unwrap();
        assert_eq!(
            agent.inventory_capacity(),
            BASE_INVENTORY_CAPACITY + BACKPACK_CAPACITY_BONUS
        );
    }

    #[test]
    fn corpse_is_inert_and_passable() {
        let mut orc = Agent::new(AgentId(1), "orc", 3, 3, Fighter::new(10, 3, 0));
        orc.become_corpse();
        assert_eq!(orc.name, "remains of orc");
        assert!(!orc.blocks_movement);
        assert!(!orc.alive);
        assert!(orc.behavior.is_none());
    }

    #[test]
    fn lucidity_clamps() {
        let mut l = Lucidity::new(100);
        l.drain(150);
        assert_eq!(l.current, 0);
        l.restore(40);
        assert_eq!(l.current, 40);
        l.restore(1000);
        assert_eq!(l.current, 100);
    }
}
