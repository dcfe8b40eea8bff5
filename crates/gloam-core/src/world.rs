//! World state: the map, every agent, items on the ground, and the
//! shared RNG, message log, and presentation queue.

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, Fighter, Lucidity};
use crate::body::{Anatomy, BodyPlan};
use crate::consts::PLAYER_SIGHT_RADIUS;
use crate::item::{Item, ItemId};
use crate::log::{MessageLog, MessageStyle, PresentationQueue};
use crate::map::Map;
use crate::effect::EffectKind;
use crate::perception::{self, VisionMask};
use crate::rng::GameRng;

/// An item lying on the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundItem {
    pub x: i32,
    pub y: i32,
    pub item: Item,
}

/// Everything the simulation acts on. The player is always the first
/// agent; NPC iteration follows creation order for determinism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub map: Map,
    pub agents: Vec<Agent>,
    pub ground_items: Vec<GroundItem>,
    pub rng: GameRng,
    pub log: MessageLog,
    #[serde(skip)]
    pub events: PresentationQueue,
    pub player: AgentId,
    pub turn: u64,
    next_agent_id: u32,
    next_item_id: u32,
    pub player_fov: VisionMask,
}

impl World {
    /// Create a world with the player spawned at the given position.
    pub fn new(map: Map, seed: u64, player_spawn: (i32, i32)) -> Self {
        let player = Agent::new(
            AgentId(0),
            "you",
            player_spawn.0,
            player_spawn.1,
            Fighter::new(30, 5, 2),
        )
        .with_body(BodyPlan::new(Anatomy::Humanoid, 30));
        let mut world = Self {
            map,
            agents: vec![player],
            ground_items: Vec::new(),
            rng: GameRng::new(seed),
            log: MessageLog::new(),
            events: PresentationQueue::default(),
            player: AgentId(0),
            turn: 0,
            next_agent_id: 1,
            next_item_id: 0,
            player_fov: VisionMask::default(),
        };
        world.agents[0].hunger = Some(300);
        world.agents[0].lucidity = Some(Lucidity::new(100));
        world.update_player_fov();
        world
    }

    pub fn spawn_agent(
        &mut self,
        name: impl Into<String>,
        x: i32,
        y: i32,
        fighter: Fighter,
    ) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        self.agents.push(Agent::new(id, name, x, y, fighter));
        id
    }

    pub fn new_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// The player agent. Always present at index zero.
    pub fn player(&self) -> &Agent {
        &self.agents[0]
    }

    pub fn player_mut(&mut self) -> &mut Agent {
        &mut self.agents[0]
    }

    /// Split borrow for combat resolution: agents read-only, RNG mutable.
    pub fn agents_and_rng(&mut self) -> (&[Agent], &mut GameRng) {
        (&self.agents, &mut self.rng)
    }

    /// The living, movement-blocking agent at a tile, if any.
    pub fn blocking_agent_at(&self, x: i32, y: i32) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|a| a.alive && a.blocks_movement && a.x == x && a.y == y)
            .map(|a| a.id)
    }

    pub fn is_walkable_and_clear(&self, x: i32, y: i32) -> bool {
        self.map.is_walkable(x, y) && self.blocking_agent_at(x, y).is_none()
    }

    pub fn items_at(&self, x: i32, y: i32) -> impl Iterator<Item = &GroundItem> {
        self.ground_items
            .iter()
            .filter(move |g| g.x == x && g.y == y)
    }

    pub fn add_ground_item(&mut self, x: i32, y: i32, item: Item) {
        self.ground_items.push(GroundItem { x, y, item });
    }

    /// Take the topmost item off a tile.
    pub fn take_ground_item(&mut self, x: i32, y: i32) -> Option<Item> {
        let index = self
            .ground_items
            .iter()
            .rposition(|g| g.x == x && g.y == y)?;
        Some(self.ground_items.remove(index).item)
    }

    /// Is this tile inside any active light radius? Burning equipped
    /// lights and burning ground items (campfires) both count.
    pub fn is_lit(&self, x: i32, y: i32) -> bool {
        let within = |sx: i32, sy: i32, radius: i32| {
            let dx = sx - x;
            let dy = sy - y;
            dx * dx + dy * dy <= radius * radius
        };
        let carried = self.agents.iter().any(|a| {
            a.alive
                && a.equipment
                    .light_radius()
                    .is_some_and(|r| within(a.x, a.y, r))
        });
        if carried {
            return true;
        }
        self.ground_items.iter().any(|g| {
            g.item.is_burning() && g.item.light_radius.is_some_and(|r| within(g.x, g.y, r))
        })
    }

    /// Kill an agent: award XP to the killer, log the death, and either
    /// leave a corpse in place or remove the body entirely.
    pub fn kill(&mut self, id: AgentId, killer: Option<AgentId>) {
        let Some(victim) = self.agent(id) else {
            return;
        };
        if !victim.alive {
            return;
        }
        let xp = victim.level.xp_given;
        let name = victim.name.clone();
        let leave_corpse = victim.fighter.leave_corpse;

        if id == self.player {
            self.log.push("You died!", MessageStyle::Death);
            self.player_mut().alive = false;
            return;
        }
        self.log
            .push(format!("The {name} dies!"), MessageStyle::Death);

        if let Some(killer_id) = killer
            && xp > 0
            && let Some(killer) = self.agent_mut(killer_id)
        {
            killer.level.add_xp(xp);
            if killer_id == self.player {
                self.log
                    .push(format!("You gain {xp} experience."), MessageStyle::Good);
            }
        }

        if leave_corpse {
            if let Some(victim) = self.agent_mut(id) {
                victim.become_corpse();
            }
        } else {
            self.agents.retain(|a| a.id != id);
        }
    }

    /// Recompute the player's field of view. Under a darkness effect the
    /// player sees only as far as their carried light reaches.
    pub fn update_player_fov(&mut self) {
        let player = self.player();
        let radius = if player.effects.has_kind(EffectKind::Darkness) {
            player.equipment.light_radius().unwrap_or(1)
        } else {
            PLAYER_SIGHT_RADIUS
        };
        self.player_fov = perception::compute_fov(&self.map, player.pos(), radius);
    }

    pub fn player_can_see(&self, x: i32, y: i32) -> bool {
        self.player_fov.contains(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn test_world() -> World {
        World::new(Map::walled_room(12, 12), 42, (2, 2))
    }

    #[test]
    fn player_is_always_first() {
        let world = test_world();
        assert_eq!(world.player().id, AgentId(0));
        assert_eq!(world.player().pos(), (2, 2));
    }

    #[test]
    fn corpse_no_longer_blocks() {
        let mut world = test_world();
        let orc = world.spawn_agent("orc", 4, 4, Fighter::new(10, 3, 0));
        assert_eq!(world.blocking_agent_at(4, 4), Some(orc));
        world.kill(orc, Some(AgentId(0)));
        assert_eq!(world.blocking_agent_at(4, 4), None);
        assert!(world.agent(orc).unwrap().name.starts_with("remains of"));
    }

    #[test]
    fn corpseless_kill_removes_the_agent() {
        let mut world = test_world();
        let wisp = world.spawn_agent("wisp", 5, 5, Fighter::new(5, 1, 0).no_corpse());
        world.kill(wisp, None);
        assert!(world.agent(wisp).is_none());
    }

    #[test]
    fn kill_awards_xp_to_the_killer() {
        let mut world = test_world();
        let orc = world.spawn_agent("orc", 4, 4, Fighter::new(10, 3, 0));
        world.agent_mut(orc).unwrap().level = crate::level::CharacterLevel::new(35);
        world.kill(orc, Some(AgentId(0)));
        assert_eq!(world.player().level.current_xp, 35);
    }

    #[test]
    fn campfire_lights_nearby_tiles() {
        let mut world = test_world();
        let id = world.new_item_id();
        let campfire = Item::new(id, "campfire", ItemKind::Campfire).with_light(3, 100);
        world.add_ground_item(6, 6, campfire);
        assert!(world.is_lit(6, 6));
        assert!(world.is_lit(8, 6));
        assert!(!world.is_lit(10, 6));
    }

    #[test]
    fn ground_items_stack_lifo() {
        let mut world = test_world();
        let a = world.new_item_id();
        let b = world.new_item_id();
        world.add_ground_item(3, 3, Item::new(a, "dagger", ItemKind::MeleeWeapon));
        world.add_ground_item(3, 3, Item::new(b, "shield", ItemKind::Shield));
        assert_eq!(world.take_ground_item(3, 3).unwrap().id, b);
        assert_eq!(world.take_ground_item(3, 3).unwrap().id, a);
        assert!(world.take_ground_item(3, 3).is_none());
    }
}
