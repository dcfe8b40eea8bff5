//! Turn cycle orchestration: preemption, the player's action, remaining
//! agents, then the maintenance tick.
//!
//! Initiative accounting: each agent accrues `speed` points exactly once
//! per cycle (fast agents in the pre-player phase, everyone else in the
//! post-player phase) and every action costs 100 points. Leftover points
//! carry across cycles, so a speed-150 agent acts three times over two
//! cycles and a speed-200 agent exactly twice per cycle.

use crate::action::{Action, Impossible};
use crate::agent::{AgentId, Lucidity};
use crate::ai;
use crate::consts::{LUCIDITY_DRAIN_CHANCE, NORMAL_SPEED, STARVATION_THRESHOLD};
use crate::effect::{Effect, EffectKind};
use crate::liquid::LiquidKind;
use crate::log::{MessageStyle, SoundCue};
use crate::world::World;

/// Where the simulation stands after a full cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    PlayerDied,
    /// The player has banked enough XP; the front end owes a level-up choice.
    LevelUpPending,
}

/// Cycle state. One instance drives the whole game; phase bookkeeping
/// resets every maintenance tick.
#[derive(Debug, Default)]
pub struct TurnCycle {
    /// Agents whose speed was accrued in the pre-player phase.
    accrued_early: Vec<AgentId>,
    pre_phase_ran: bool,
}

impl TurnCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: agents faster than baseline accrue speed now, and those
    /// whose counter reaches the player's next-turn threshold strike before
    /// the player's action resolves.
    pub fn run_pre_player_phase(&mut self, world: &mut World) {
        self.pre_phase_ran = true;
        let threshold = {
            let player = world.player();
            player.initiative_counter + player.speed
        };
        let ids: Vec<AgentId> = world
            .agents
            .iter()
            .filter(|a| a.alive && a.behavior.is_some() && a.speed > NORMAL_SPEED)
            .map(|a| a.id)
            .collect();

        for id in ids {
            let Some(agent) = world.agent_mut(id) else {
                continue;
            };
            agent.initiative_counter += agent.speed;
            self.accrued_early.push(id);
            if agent.initiative_counter < threshold {
                continue;
            }
            // The warning lands before the fast action's effect.
            let pos = (agent.x, agent.y);
            if world.player_can_see(pos.0, pos.1) {
                let name = world.agent(id).map_or_else(String::new, |a| a.name.clone());
                world.log.push(
                    format!("The {name} moves with unnatural speed!"),
                    MessageStyle::Warning,
                );
            } else {
                world.log.push(
                    "You sense movement in the shadows...",
                    MessageStyle::Warning,
                );
            }
            Self::run_agent_action(world, id);
            if let Some(agent) = world.agent_mut(id) {
                agent.initiative_counter -= 100;
            }
            if !world.player().alive {
                return;
            }
        }
    }

    /// Phase 2: the player's declared action. Success banks the player's
    /// speed; rejection costs nothing and the phase may be retried.
    pub fn run_player_phase(&mut self, world: &mut World, action: Action) -> Result<(), Impossible> {
        action.attempt(world)?;
        let player = world.player_mut();
        player.initiative_counter += player.speed;
        Ok(())
    }

    /// Phase 3: everyone who did not accrue early accrues now; all AI
    /// agents then spend their counters down in 100-point actions.
    pub fn run_post_player_phase(&mut self, world: &mut World) {
        let ids: Vec<AgentId> = world
            .agents
            .iter()
            .filter(|a| a.alive && a.behavior.is_some())
            .map(|a| a.id)
            .collect();

        for id in ids {
            let Some(agent) = world.agent_mut(id) else {
                continue;
            };
            if !self.accrued_early.contains(&id) {
                agent.initiative_counter += agent.speed;
            }
            while world
                .agent(id)
                .is_some_and(|a| a.alive && a.initiative_counter >= 100)
            {
                Self::run_agent_action(world, id);
                if let Some(agent) = world.agent_mut(id) {
                    agent.initiative_counter -= 100;
                }
                if !world.player().alive {
                    return;
                }
            }
        }
    }

    /// An AI turn. A rejected action is swallowed; the initiative is spent
    /// either way and there is no retry within the cycle.
    fn run_agent_action(world: &mut World, id: AgentId) {
        let action = ai::decide(world, id);
        let _ = action.attempt(world);
    }

    /// Phase 4: the per-cycle world tick. Burns lights, ages coatings and
    /// effects, advances hunger and lucidity, dissolves light-struck
    /// shadows, and reports the terminal state.
    pub fn run_maintenance_phase(&mut self, world: &mut World) -> CycleOutcome {
        self.accrued_early.clear();
        self.pre_phase_ran = false;
        world.turn += 1;

        tick_equipment(world);
        tick_ground_lights(world);
        tick_coatings(world);
        tick_effects(world);
        tick_hunger(world);
        tick_lucidity(world);
        dissolve_dark_agents(world);

        world.update_player_fov();

        if !world.player().alive || world.player().fighter.is_dead() {
            if world.player().alive {
                world.kill(world.player, None);
            }
            return CycleOutcome::PlayerDied;
        }
        if world.player().level.requires_level_up() {
            return CycleOutcome::LevelUpPending;
        }
        CycleOutcome::Continue
    }

    /// Run all four phases for one declared player action. A rejected
    /// action aborts the cycle before phase 3; the pre-player phase is not
    /// re-run when the player retries.
    pub fn run_cycle(&mut self, world: &mut World, action: Action) -> Result<CycleOutcome, Impossible> {
        if !self.pre_phase_ran {
            self.run_pre_player_phase(world);
        }
        if !world.player().alive {
            return Ok(self.run_maintenance_phase(world));
        }
        self.run_player_phase(world, action)?;
        self.run_post_player_phase(world);
        Ok(self.run_maintenance_phase(world))
    }
}

fn tick_equipment(world: &mut World) {
    let ids: Vec<AgentId> = world.agents.iter().map(|a| a.id).collect();
    for id in ids {
        let burned = match world.agent_mut(id) {
            Some(agent) => agent.equipment.tick_burning(),
            None => continue,
        };
        for item in burned {
            world.events.sound(SoundCue::TorchBurnOut);
            if id == world.player {
                world
                    .log
                    .push(format!("Your {} burns out.", item.name), MessageStyle::Bad);
            }
        }
    }
}

fn tick_ground_lights(world: &mut World) {
    let mut extinguished = Vec::new();
    for ground in &mut world.ground_items {
        if let Some(ticks) = &mut ground.item.burn_ticks
            && *ticks > 0
        {
            *ticks -= 1;
            if *ticks == 0 && ground.item.light_radius.is_some() {
                extinguished.push((ground.x, ground.y, ground.item.name.clone()));
            }
        }
    }
    for (x, y, name) in extinguished {
        if world.player_can_see(x, y) {
            world
                .log
                .push(format!("The {name} burns out."), MessageStyle::Warning);
        }
    }
}

fn tick_coatings(world: &mut World) {
    let ids: Vec<AgentId> = world.agents.iter().filter(|a| a.alive).map(|a| a.id).collect();
    for id in ids {
        let poisoned = {
            let Some(agent) = world.agent_mut(id) else {
                continue;
            };
            let Some(body) = agent.body.as_mut() else {
                continue;
            };
            body.tick_coatings();
            body.any_coated_in(LiquidKind::Poison)
        };
        if poisoned
            && let Some(agent) = world.agent_mut(id)
        {
            // Refreshed every tick the coating persists.
            agent.effects.add(Effect::timed(EffectKind::Poison, 2));
        }
    }
}

fn tick_effects(world: &mut World) {
    let ids: Vec<AgentId> = world.agents.iter().filter(|a| a.alive).map(|a| a.id).collect();
    for id in ids {
        let tick = match world.agent_mut(id) {
            Some(agent) => agent.effects.tick(),
            None => continue,
        };
        if tick.damage > 0 {
            if let Some(agent) = world.agent_mut(id) {
                agent.fighter.take_damage(tick.damage);
            }
            if id == world.player {
                world
                    .log
                    .push("You writhe from your afflictions.", MessageStyle::Bad);
            }
        }
        if id == world.player && tick.expired.contains(&EffectKind::Poison) {
            world
                .log
                .push("The poison wears off.", MessageStyle::Good);
        }
        let dead = world.agent(id).is_some_and(|a| a.alive && a.fighter.is_dead());
        if dead {
            world.kill(id, None);
        }
    }
}

fn tick_hunger(world: &mut World) {
    let ids: Vec<AgentId> = world.agents.iter().filter(|a| a.alive).map(|a| a.id).collect();
    for id in ids {
        let Some(agent) = world.agent_mut(id) else {
            continue;
        };
        let Some(hunger) = agent.hunger.as_mut() else {
            continue;
        };
        *hunger -= 1;
        let starving = *hunger <= STARVATION_THRESHOLD;
        let already = agent.effects.has_kind(EffectKind::Starving);
        if starving && !already {
            agent.effects.add(Effect::permanent(EffectKind::Starving));
            if id == world.player {
                world.log.push("You are starving!", MessageStyle::Bad);
            }
        }
    }
}

fn tick_lucidity(world: &mut World) {
    let player_pos = world.player().pos();
    let in_light = world.is_lit(player_pos.0, player_pos.1);
    let drain = !in_light && world.rng.chance(LUCIDITY_DRAIN_CHANCE);

    let Some(lucidity) = world.player().lucidity else {
        return;
    };
    let before = lucidity_percent(&lucidity);

    {
        let player = world.player_mut();
        let Some(lucidity) = player.lucidity.as_mut() else {
            return;
        };
        if in_light {
            lucidity.restore(1);
        } else if drain {
            lucidity.drain(1);
        }
    }
    let after = world
        .player()
        .lucidity
        .map(|l| lucidity_percent(&l))
        .unwrap_or(0);

    if after < before {
        for (threshold, line) in [
            (66, "Shadows flicker at the edge of your vision."),
            (33, "Your grip on your thoughts is slipping."),
            (10, "The dark whispers press close."),
        ] {
            if before > threshold && after <= threshold {
                world.log.push(line, MessageStyle::Warning);
            }
        }
        if before > 0 && after == 0 {
            world
                .log
                .push("Darkness floods your mind.", MessageStyle::Bad);
            world
                .player_mut()
                .effects
                .add(Effect::permanent(EffectKind::Darkness));
        }
    } else if after > 0
        && before == 0
        && world.player().effects.has_kind(EffectKind::Darkness)
    {
        world.player_mut().effects.remove_kind(EffectKind::Darkness);
        world
            .log
            .push("Light steadies your mind.", MessageStyle::Good);
    }
}

fn lucidity_percent(lucidity: &Lucidity) -> i32 {
    (lucidity.fraction() * 100.0) as i32
}

/// Shadow creatures cannot survive standing in light.
fn dissolve_dark_agents(world: &mut World) {
    let doomed: Vec<(AgentId, String)> = world
        .agents
        .iter()
        .filter(|a| {
            a.alive
                && matches!(a.behavior, Some(crate::ai::Behavior::DarkHostile { .. }))
                && world.is_lit(a.x, a.y)
        })
        .map(|a| (a.id, a.name.clone()))
        .collect();
    for (id, name) in doomed {
        world.agents.retain(|a| a.id != id);
        world.log.push(
            format!("The {name} dissolves in the light!"),
            MessageStyle::Good,
        );
    }
}
