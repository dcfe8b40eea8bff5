//! Melee strikes, projectile fire, and thrown items.

use super::{Direction, Impossible};
use crate::agent::AgentId;
use crate::body::PartKind;
use crate::combat::{self, AttackKind};
use crate::consts::MAX_SHOT_RANGE;
use crate::item::{EquipSlot, ItemId};
use crate::log::{AnimationCue, MessageStyle, SoundCue};
use crate::skill::SkillTag;
use crate::world::World;

fn attack_style(world: &World, attacker: AgentId, defender: AgentId) -> MessageStyle {
    if attacker == world.player {
        MessageStyle::PlayerAttack
    } else if defender == world.player {
        MessageStyle::EnemyAttack
    } else {
        MessageStyle::Info
    }
}

/// "You" or "The orc", capitalized for sentence starts.
fn subject(world: &World, id: AgentId) -> String {
    if id == world.player {
        "You".to_string()
    } else {
        match world.agent(id) {
            Some(a) => format!("The {}", a.name),
            None => "Something".to_string(),
        }
    }
}

pub(super) fn melee(
    world: &mut World,
    actor: AgentId,
    dir: Direction,
    target_part: Option<PartKind>,
) -> Result<(), Impossible> {
    let attacker = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to attack with."))?;
    let (dx, dy) = dir.delta();
    let dest = (attacker.x + dx, attacker.y + dy);

    let target = world
        .blocking_agent_at(dest.0, dest.1)
        .ok_or_else(|| Impossible::new("Nothing to attack there."))?;

    // Wounded hands may lose the weapon before the swing; the attack then
    // proceeds with whatever is left in hand.
    drop_failed_grips(world, actor);
    let (attacker_power, weapon_skill) = {
        let Some(attacker) = world.agent(actor) else {
            return Ok(());
        };
        (
            attacker.power(),
            attacker
                .equipment
                .weapon
                .as_ref()
                .map_or(SkillTag::Melee, |w| w.skill),
        )
    };

    let mut resolution = {
        let (agents, rng) = world.agents_and_rng();
        let Some(defender) = agents.iter().find(|a| a.id == target) else {
            return Err(Impossible::new("Nothing to attack there."));
        };
        combat::resolve(AttackKind::Melee, attacker_power, defender, target_part, rng)
    };

    let style = attack_style(world, actor, target);
    let who = subject(world, actor);
    let whom = if target == world.player {
        "you".to_string()
    } else {
        format!("the {}", world.agent(target).map_or_else(String::new, |a| a.name.clone()))
    };

    if !resolution.hit {
        world.events.sound(SoundCue::Miss);
        world
            .log
            .push(format!("{who} attack{} {whom} but miss{}.",
                if actor == world.player { "" } else { "s" },
                if actor == world.player { "" } else { "es" }), style);
        return Ok(());
    }

    if resolution.dodged {
        world.events.sound(SoundCue::Block);
        let dodger = subject(world, target);
        world
            .log
            .push(format!("{dodger} dodge{} the attack!",
                if target == world.player { "" } else { "s" }), style);
        if let Some(d) = world.agent_mut(target) {
            d.skills.grant(SkillTag::Dodge, attacker_power.max(0) as u32);
        }
        relocate_after_dodge(world, target);
        return Ok(());
    }

    world.events.animation(AnimationCue::Slash {
        x: dest.0,
        y: dest.1,
    });
    if resolution.absorbed_by_armor > 0 {
        world.events.sound(SoundCue::HitArmored);
    } else {
        world.events.sound(SoundCue::HitUnarmored);
    }

    if let Some(defender) = world.agent_mut(target) {
        combat::apply_resolution(defender, &mut resolution);
    }

    let part_name = resolution.part.map(|p| p.name());
    match part_name {
        Some(part) => world.log.push(
            format!(
                "{who} hit{} {whom} in the {part} for {} damage.",
                if actor == world.player { "" } else { "s" },
                resolution.damage
            ),
            style,
        ),
        None => world.log.push(
            format!(
                "{who} hit{} {whom} for {} damage.",
                if actor == world.player { "" } else { "s" },
                resolution.damage
            ),
            style,
        ),
    }
    if resolution.part_destroyed
        && let Some(part) = part_name
    {
        let possessive = if target == world.player {
            "Your".to_string()
        } else {
            format!("The {}'s", world.agent(target).map_or_else(String::new, |a| a.name.clone()))
        };
        world
            .log
            .push(format!("{possessive} {part} is destroyed!"), MessageStyle::Bad);
    }

    grant_combat_xp(world, actor, target, weapon_skill, &resolution);
    degrade_weapon(world, actor);

    let defender_dead = world
        .agent(target)
        .is_some_and(|a| a.alive && a.fighter.is_dead());
    if defender_dead {
        world.events.sound(SoundCue::FinishingBlow);
        world.kill(target, Some(actor));
    }
    Ok(())
}

/// Move a dodging agent one tile, trying its preferred direction first.
fn relocate_after_dodge(world: &mut World, id: AgentId) {
    let Some(agent) = world.agent(id) else { return };
    let preferred = agent.preferred_dodge_direction;
    let from = agent.pos();
    for dir in combat::dodge_candidates(preferred) {
        let (dx, dy) = dir.delta();
        let dest = (from.0 + dx, from.1 + dy);
        if world.is_walkable_and_clear(dest.0, dest.1) {
            if let Some(agent) = world.agent_mut(id) {
                agent.x = dest.0;
                agent.y = dest.1;
            }
            if id == world.player {
                world.update_player_fov();
            }
            return;
        }
    }
    // Boxed in: the dodge still negates the hit, there is just nowhere to go.
}

fn grant_combat_xp(
    world: &mut World,
    attacker: AgentId,
    defender: AgentId,
    weapon_skill: SkillTag,
    resolution: &combat::Resolution,
) {
    if resolution.damage > 0
        && let Some(a) = world.agent_mut(attacker)
    {
        a.skills.grant(weapon_skill, resolution.damage as u32);
    }
    if let Some(d) = world.agent_mut(defender) {
        d.skills.grant(SkillTag::Toughness, resolution.damage as u32);
        d.skills
            .grant(SkillTag::Armor, resolution.absorbed_by_armor as u32);
    }
}

/// Pre-attack grip check on the acting agent. Each failed grasping part
/// drops the item held in its paired grasp slot.
fn drop_failed_grips(world: &mut World, id: AgentId) {
    let failed = {
        let (agents, rng) = world.agents_and_rng();
        let Some(agent) = agents.iter().find(|a| a.id == id) else {
            return;
        };
        let Some(body) = agent.body.as_ref() else {
            return;
        };
        combat::failed_grips(body, rng)
    };
    if failed.is_empty() {
        return;
    }

    let (pos, dropped) = {
        let Some(agent) = world.agent_mut(id) else { return };
        let graspers = agent
            .body
            .as_ref()
            .map_or_else(Vec::new, |b| b.grasping_parts());
        let slots = [EquipSlot::Weapon, EquipSlot::Offhand];
        let mut dropped = Vec::new();
        for kind in failed {
            let Some(index) = graspers.iter().position(|&k| k == kind) else {
                continue;
            };
            if let Some(&slot) = slots.get(index)
                && let Some(item) = agent.equipment.unequip(slot)
            {
                dropped.push(item);
            }
        }
        (agent.pos(), dropped)
    };
    if dropped.is_empty() {
        return;
    }
    let holder = subject(world, id);
    for item in dropped {
        world.log.push(
            format!("{holder} drop{} the {}!",
                if id == world.player { "" } else { "s" },
                item.name),
            MessageStyle::Bad,
        );
        world.add_ground_item(pos.0, pos.1, item);
    }
}

/// Each landed blow wears the weapon. Breakage destroys it.
fn degrade_weapon(world: &mut World, id: AgentId) {
    let broken_name = {
        let Some(agent) = world.agent_mut(id) else { return };
        let Some(weapon) = agent.equipment.weapon.as_mut() else {
            return;
        };
        let Some(durability) = weapon.durability.as_mut() else {
            return;
        };
        if !durability.degrade(1) {
            return;
        }
        let name = weapon.name.clone();
        agent.equipment.weapon = None;
        name
    };
    world.events.sound(SoundCue::ItemBreak);
    let owner = if id == world.player {
        "Your".to_string()
    } else {
        format!(
            "The {}'s",
            world.agent(id).map_or_else(String::new, |a| a.name.clone())
        )
    };
    world
        .log
        .push(format!("{owner} {broken_name} breaks!"), MessageStyle::Bad);
}

pub(super) fn ranged(
    world: &mut World,
    actor: AgentId,
    dir: Direction,
    target_part: Option<PartKind>,
) -> Result<(), Impossible> {
    let attacker = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to shoot with."))?;
    if attacker.equipment.readied_launcher().is_none() {
        return Err(Impossible::new("You need a readied launcher to shoot."));
    }
    if !attacker.equipment.has_readied_launcher() {
        return Err(Impossible::new("You are out of ammunition."));
    }

    // Wounded hands may drop the bow or the quiver before the shot; the
    // turn is then spent fumbling.
    drop_failed_grips(world, actor);
    let Some(attacker) = world.agent(actor) else {
        return Ok(());
    };
    if !attacker.equipment.has_readied_launcher() {
        return Ok(());
    }
    let from = attacker.pos();
    let attacker_power = attacker.power();
    let launcher_skill = attacker
        .equipment
        .readied_launcher()
        .map_or(SkillTag::Ranged, |l| l.skill);

    // The shot is committed: the arrow is spent whatever happens downrange.
    let Some(arrow) = world
        .agent_mut(actor)
        .and_then(|a| a.equipment.consume_ammo())
    else {
        return Ok(());
    };
    world.events.sound(SoundCue::BowShot);
    let quiver_empty = world
        .agent(actor)
        .is_some_and(|a| a.equipment.offhand.is_none());
    if quiver_empty && actor == world.player {
        world
            .log
            .push("You are out of ammunition.", MessageStyle::Warning);
    }

    let mut last_clear = from;
    let line: Vec<(i32, i32)> = world.map.line_from(from, dir, MAX_SHOT_RANGE).collect();
    for tile in line {
        if !world.map.in_bounds(tile.0, tile.1) {
            // Sailed off the map; the arrow is gone.
            return Ok(());
        }
        if let Some(target) = world.blocking_agent_at(tile.0, tile.1) {
            world.events.animation(AnimationCue::Projectile { from, to: tile });
            resolve_projectile_hit(world, actor, target, attacker_power, launcher_skill, target_part);
            return Ok(());
        }
        if !world.map.is_walkable(tile.0, tile.1) {
            // Struck an obstacle: half the time the arrow shatters,
            // otherwise it drops at the last clear tile.
            world.events.animation(AnimationCue::Projectile { from, to: last_clear });
            if world.rng.chance(0.5) {
                world.events.sound(SoundCue::ArrowBreak);
            } else {
                world.add_ground_item(last_clear.0, last_clear.1, arrow);
            }
            return Ok(());
        }
        last_clear = tile;
    }

    // Spent at maximum range; the arrow lands where it fell.
    world.events.animation(AnimationCue::Projectile { from, to: last_clear });
    world.add_ground_item(last_clear.0, last_clear.1, arrow);
    Ok(())
}

fn resolve_projectile_hit(
    world: &mut World,
    actor: AgentId,
    target: AgentId,
    attacker_power: i32,
    launcher_skill: SkillTag,
    target_part: Option<PartKind>,
) {
    let mut resolution = {
        let (agents, rng) = world.agents_and_rng();
        let Some(defender) = agents.iter().find(|a| a.id == target) else {
            return;
        };
        combat::resolve(AttackKind::Ranged, attacker_power, defender, target_part, rng)
    };

    let style = attack_style(world, actor, target);
    let who = subject(world, actor);
    let whom = if target == world.player {
        "you".to_string()
    } else {
        format!("the {}", world.agent(target).map_or_else(String::new, |a| a.name.clone()))
    };

    if !resolution.hit || resolution.dodged {
        world.events.sound(SoundCue::Miss);
        world
            .log
            .push(format!("The shot misses {whom}."), style);
        if resolution.dodged {
            relocate_after_dodge(world, target);
        }
        return;
    }

    if resolution.absorbed_by_armor > 0 {
        world.events.sound(SoundCue::HitArmored);
    } else {
        world.events.sound(SoundCue::HitUnarmored);
    }
    if let Some(defender) = world.agent_mut(target) {
        combat::apply_resolution(defender, &mut resolution);
    }
    match resolution.part {
        Some(part) => world.log.push(
            format!(
                "{who} shoot{} {whom} in the {} for {} damage.",
                if actor == world.player { "" } else { "s" },
                part.name(),
                resolution.damage
            ),
            style,
        ),
        None => world.log.push(
            format!(
                "{who} shoot{} {whom} for {} damage.",
                if actor == world.player { "" } else { "s" },
                resolution.damage
            ),
            style,
        ),
    }

    grant_combat_xp(world, actor, target, launcher_skill, &resolution);

    let defender_dead = world
        .agent(target)
        .is_some_and(|a| a.alive && a.fighter.is_dead());
    if defender_dead {
        world.events.sound(SoundCue::FinishingBlow);
        world.kill(target, Some(actor));
    }
}

pub(super) fn throw(
    world: &mut World,
    actor: AgentId,
    dir: Direction,
    item_id: ItemId,
) -> Result<(), Impossible> {
    let Some(agent) = world.agent(actor) else {
        return Err(Impossible::new("There is no one to throw."));
    };
    if !agent.can_use_hands() {
        return Err(Impossible::new("You have no working hand to throw with."));
    }
    let from = agent.pos();
    let item = world
        .agent_mut(actor)
        .and_then(|a| a.remove_inventory_item(item_id))
        .ok_or_else(|| Impossible::new("You don't have that."))?;

    // Heavier items hit harder.
    let impact = item.weight.max(1);
    let mut landing = from;
    let line: Vec<(i32, i32)> = world.map.line_from(from, dir, MAX_SHOT_RANGE).collect();
    for tile in line {
        if !world.map.is_walkable(tile.0, tile.1) {
            break;
        }
        landing = tile;
        if let Some(target) = world.blocking_agent_at(tile.0, tile.1) {
            apply_thrown_impact(world, actor, target, impact);
            break;
        }
    }

    world.events.animation(AnimationCue::Projectile { from, to: landing });
    world.add_ground_item(landing.0, landing.1, item);
    Ok(())
}

fn apply_thrown_impact(world: &mut World, actor: AgentId, target: AgentId, impact: i32) {
    let part = {
        let (agents, rng) = world.agents_and_rng();
        agents
            .iter()
            .find(|a| a.id == target)
            .and_then(|a| a.body.as_ref())
            .and_then(|b| b.random_intact_part(rng))
    };

    let style = attack_style(world, actor, target);
    let whom = if target == world.player {
        "you".to_string()
    } else {
        format!("the {}", world.agent(target).map_or_else(String::new, |a| a.name.clone()))
    };

    if let Some(defender) = world.agent_mut(target) {
        if let Some(kind) = part
            && let Some(body) = defender.body.as_mut()
            && let Some(p) = body.part_mut(kind)
        {
            p.take_damage(impact);
        }
        defender.fighter.take_damage(impact);
    }
    world.events.sound(SoundCue::HitUnarmored);
    match part {
        Some(p) => world.log.push(
            format!("The thrown item strikes {whom} in the {} for {impact} damage.", p.name()),
            style,
        ),
        None => world.log.push(
            format!("The thrown item strikes {whom} for {impact} damage."),
            style,
        ),
    }

    if let Some(a) = world.agent_mut(actor) {
        a.skills.grant(SkillTag::Thrown, impact as u32);
    }
    let defender_dead = world
        .agent(target)
        .is_some_and(|a| a.alive && a.fighter.is_dead());
    if defender_dead {
        world.kill(target, Some(actor));
    }
}
