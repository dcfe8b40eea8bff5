//! Walking and the context-sensitive bump.

use super::{attack, Direction, Impossible};
use crate::agent::AgentId;
use crate::consts::FOOTSTEP_RADIUS;
use crate::log::{MessageStyle, SoundCue};
use crate::world::World;

pub(super) fn walk(world: &mut World, actor: AgentId, dir: Direction) -> Result<(), Impossible> {
    let agent = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to move."))?;
    if !agent.can_move() {
        return Err(Impossible::new("You can't walk; your legs won't carry you."));
    }
    let limping = agent
        .body
        .as_ref()
        .is_some_and(|b| b.movement_penalty() > 0.5);

    let (dx, dy) = dir.delta();
    let (nx, ny) = (agent.x + dx, agent.y + dy);

    if !world.map.is_walkable(nx, ny) {
        return Err(Impossible::new(format!(
            "The {} blocks the way.",
            world.map.tile_name(nx, ny)
        )));
    }
    if let Some(blocker) = world.blocking_agent_at(nx, ny) {
        let name = world.agent(blocker).map(|a| a.name.clone()).unwrap_or_default();
        return Err(Impossible::new(format!("The {name} is in the way.")));
    }

    let is_player = actor == world.player;
    let player_pos = world.player().pos();

    if let Some(agent) = world.agent_mut(actor) {
        agent.x = nx;
        agent.y = ny;
    }

    if is_player {
        if limping {
            world
                .log
                .push("You limp along painfully.", MessageStyle::Warning);
        }
        world.update_player_fov();
        return Ok(());
    }

    // NPC footsteps: audible near the player even when out of sight.
    let dx = nx - player_pos.0;
    let dy = ny - player_pos.1;
    if dx * dx + dy * dy <= FOOTSTEP_RADIUS * FOOTSTEP_RADIUS {
        world.events.sound(SoundCue::Footstep);
        if !world.player_can_see(nx, ny) {
            world
                .log
                .push("You hear footsteps nearby.", MessageStyle::Warning);
        }
    }
    Ok(())
}

/// Attack whatever blocks the destination tile; otherwise step into it.
pub(super) fn bump(world: &mut World, actor: AgentId, dir: Direction) -> Result<(), Impossible> {
    let agent = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to move."))?;
    let (dx, dy) = dir.delta();
    let dest = (agent.x + dx, agent.y + dy);
    if world.blocking_agent_at(dest.0, dest.1).is_some() {
        attack::melee(world, actor, dir, None)
    } else {
        walk(world, actor, dir)
    }
}
