//! Picking up, equipping, dropping, and using the environment.

use super::{Direction, Impossible};
use crate::agent::AgentId;
use crate::item::{EquipSlot, ItemId, ItemKind};
use crate::log::{MessageStyle, SoundCue};
use crate::map::TileKind;
use crate::world::World;

pub(super) fn pick_up(world: &mut World, actor: AgentId) -> Result<(), Impossible> {
    let agent = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to pick up with."))?;
    if !agent.can_use_hands() {
        return Err(Impossible::new("You have no working hand to pick up with."));
    }
    let pos = agent.pos();
    let full = agent.inventory_full();

    let top = world
        .items_at(pos.0, pos.1)
        .last()
        .ok_or_else(|| Impossible::new("There is nothing here to pick up."))?;

    match top.item.kind {
        ItemKind::Campfire | ItemKind::Chest => Err(Impossible::new("That is fixed in place.")),
        ItemKind::Coin => {
            let item = world
                .take_ground_item(pos.0, pos.1)
                .ok_or_else(|| Impossible::new("There is nothing here to pick up."))?;
            let amount = item.value.max(1) * item.count as i32;
            if let Some(agent) = world.agent_mut(actor) {
                agent.gold += amount;
            }
            world.events.sound(SoundCue::PickUp);
            if actor == world.player {
                world
                    .log
                    .push(format!("You pick up {amount} gold."), MessageStyle::Good);
            }
            Ok(())
        }
        _ => {
            if full {
                return Err(Impossible::new("Your pack is full."));
            }
            let item = world
                .take_ground_item(pos.0, pos.1)
                .ok_or_else(|| Impossible::new("There is nothing here to pick up."))?;
            let name = item.name.clone();
            if let Some(agent) = world.agent_mut(actor) {
                agent.inventory.push(item);
            }
            world.events.sound(SoundCue::PickUp);
            if actor == world.player {
                world
                    .log
                    .push(format!("You pick up the {name}."), MessageStyle::Info);
            }
            Ok(())
        }
    }
}

/// Equip an inventory item, or take an already-equipped item off.
pub(super) fn equip(world: &mut World, actor: AgentId, item_id: ItemId) -> Result<(), Impossible> {
    let agent = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to equip."))?;

    if let Some(slot) = agent.equipment.slot_of(item_id) {
        if agent.inventory_full() {
            return Err(Impossible::new("Your pack is too full to stow that."));
        }
        let Some(agent) = world.agent_mut(actor) else {
            return Err(Impossible::new("There is no one to equip."));
        };
        if let Some(item) = agent.equipment.unequip(slot) {
            let name = item.name.clone();
            agent.inventory.push(item);
            if actor == world.player {
                world
                    .log
                    .push(format!("You put away the {name}."), MessageStyle::Info);
            }
        }
        return Ok(());
    }

    let item = agent
        .inventory_item(item_id)
        .ok_or_else(|| Impossible::new("You don't have that."))?;
    let slot = item
        .preferred_slot()
        .ok_or_else(|| Impossible::new("That can't be equipped."))?;
    if matches!(slot, EquipSlot::Weapon | EquipSlot::Offhand) && !agent.can_use_hands() {
        return Err(Impossible::new("You have no working hand to hold that."));
    }

    let Some(agent) = world.agent_mut(actor) else {
        return Err(Impossible::new("There is no one to equip."));
    };
    let Some(item) = agent.remove_inventory_item(item_id) else {
        return Err(Impossible::new("You don't have that."));
    };
    let name = item.name.clone();
    let verb = match slot {
        EquipSlot::Weapon => "wield",
        EquipSlot::Offhand => "ready",
        EquipSlot::Armor => "wear",
        EquipSlot::Backpack => "shoulder",
    };
    match agent.equipment.equip(item) {
        Ok(displaced) => {
            if let Some(old) = displaced {
                agent.inventory.push(old);
            }
            if actor == world.player {
                world
                    .log
                    .push(format!("You {verb} the {name}."), MessageStyle::Info);
            }
            Ok(())
        }
        Err(item) => {
            // Slot said equippable but the equip was refused; put it back.
            agent.inventory.push(item);
            Err(Impossible::new("That can't be equipped."))
        }
    }
}

pub(super) fn drop_item(
    world: &mut World,
    actor: AgentId,
    item_id: ItemId,
) -> Result<(), Impossible> {
    let agent = world
        .agent_mut(actor)
        .ok_or_else(|| Impossible::new("There is no one to drop with."))?;
    let pos = agent.pos();

    let item = if let Some(slot) = agent.equipment.slot_of(item_id) {
        agent.equipment.unequip(slot)
    } else {
        agent.remove_inventory_item(item_id)
    }
    .ok_or_else(|| Impossible::new("You don't have that."))?;

    let name = item.name.clone();
    world.add_ground_item(pos.0, pos.1, item);
    if actor == world.player {
        world
            .log
            .push(format!("You drop the {name}."), MessageStyle::Info);
    }
    Ok(())
}

/// Tip an adjacent chest's contents onto its tile. The chest itself stays
/// where it is.
fn open_chest(world: &mut World, actor: AgentId, x: i32, y: i32) -> Result<(), Impossible> {
    let Some(index) = world
        .ground_items
        .iter()
        .position(|g| (g.x, g.y) == (x, y) && g.item.kind == ItemKind::Chest)
    else {
        return Err(Impossible::new("There is nothing there to use."));
    };
    if world.ground_items[index].item.contents.is_empty() {
        return Err(Impossible::new(format!(
            "The {} is empty.",
            world.ground_items[index].item.name
        )));
    }
    let name = world.ground_items[index].item.name.clone();
    let contents = core::mem::take(&mut world.ground_items[index].item.contents);
    world.events.sound(SoundCue::ChestOpen);
    for item in contents {
        world.add_ground_item(x, y, item);
    }
    if actor == world.player {
        world
            .log
            .push(format!("You open the {name}."), MessageStyle::Info);
    }
    Ok(())
}

/// Use the adjacent tile: open a closed door or close an open one.
pub(super) fn interact(
    world: &mut World,
    actor: AgentId,
    dir: Direction,
) -> Result<(), Impossible> {
    let agent = world
        .agent(actor)
        .ok_or_else(|| Impossible::new("There is no one to interact with."))?;
    if !agent.can_use_hands() {
        return Err(Impossible::new("You have no working hand for that."));
    }
    let (dx, dy) = dir.delta();
    let (tx, ty) = (agent.x + dx, agent.y + dy);
    let is_player = actor == world.player;

    match world.map.tile(tx, ty) {
        TileKind::ClosedDoor => {
            world.map.open_door(tx, ty);
            world.events.sound(SoundCue::DoorOpen);
            if is_player {
                world.log.push("You open the door.", MessageStyle::Info);
                world.update_player_fov();
            }
            Ok(())
        }
        TileKind::OpenDoor => {
            if world.blocking_agent_at(tx, ty).is_some() {
                return Err(Impossible::new("Something is standing in the doorway."));
            }
            if world.items_at(tx, ty).next().is_some() {
                return Err(Impossible::new("Something lies in the doorway."));
            }
            world.map.close_door(tx, ty);
            world.events.sound(SoundCue::DoorClose);
            if is_player {
                world.log.push("You close the door.", MessageStyle::Info);
                world.update_player_fov();
            }
            Ok(())
        }
        _ => open_chest(world, actor, tx, ty),
    }
}
