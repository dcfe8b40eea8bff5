//! Combat resolution: hit rolls, body-part targeting, dodges, damage.

use serde::{Deserialize, Serialize};

use crate::action::Direction;
use crate::agent::Agent;
use crate::body::{BodyPlan, PartClass, PartKind, PartTags};
use crate::consts::{MANIPULATION_DAMAGE_THRESHOLD, MELEE_BASE_HIT, RANGED_BASE_HIT};
use crate::rng::GameRng;

/// Whether an attack was delivered hand-to-hand or by projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Ranged,
}

impl AttackKind {
    const fn base_hit_chance(self) -> i32 {
        match self {
            AttackKind::Melee => MELEE_BASE_HIT,
            AttackKind::Ranged => RANGED_BASE_HIT,
        }
    }
}

/// What one attack roll produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub hit: bool,
    pub dodged: bool,
    /// Damage that reaches the defender after all defense and scaling.
    pub damage: i32,
    /// Damage the defender's worn armor prevented, for skill credit.
    pub absorbed_by_armor: i32,
    pub part: Option<PartKind>,
    /// Set by [`apply_resolution`] if the struck part was destroyed.
    pub part_destroyed: bool,
}

impl Resolution {
    fn miss(part: Option<PartKind>) -> Self {
        Self {
            hit: false,
            dodged: false,
            damage: 0,
            absorbed_by_armor: 0,
            part,
            part_destroyed: false,
        }
    }
}

/// Damage multiplier and hit-chance modifier for striking a part class.
/// Small, well-protected targets are hard to hit but pay off; the torso is
/// easy to hit and unremarkable.
pub const fn part_modifiers(class: PartClass) -> (f32, i32) {
    match class {
        PartClass::Head => (1.5, -50),
        PartClass::Neck => (1.25, -40),
        PartClass::Torso => (1.0, 15),
        PartClass::Arm => (0.9, -10),
        PartClass::Leg => (0.9, -5),
        PartClass::Hand => (0.75, -35),
        PartClass::Foot => (0.75, -35),
    }
}

/// Resolve which part an attack strikes. An explicitly requested part is
/// honored while it is intact; otherwise the strike lands on a random
/// intact part. `None` when nothing intact remains.
pub fn select_target_part(
    body: &BodyPlan,
    requested: Option<PartKind>,
    rng: &mut GameRng,
) -> Option<PartKind> {
    if let Some(kind) = requested
        && body.part(kind).is_some_and(|p| !p.is_destroyed())
    {
        return Some(kind);
    }
    body.random_intact_part(rng)
}

/// Roll one attack against a defender. Does not mutate the defender;
/// pair with [`apply_resolution`] once dodge relocation has been settled.
pub fn resolve(
    kind: AttackKind,
    attacker_power: i32,
    defender: &Agent,
    requested_part: Option<PartKind>,
    rng: &mut GameRng,
) -> Resolution {
    let part = defender
        .body
        .as_ref()
        .and_then(|b| select_target_part(b, requested_part, rng));

    let (multiplier, hit_modifier) = match part {
        Some(p) => part_modifiers(p.class()),
        None => (1.0, 0),
    };

    let chance = (kind.base_hit_chance() + hit_modifier).clamp(0, 100);
    if rng.rnd(100) as i32 > chance {
        return Resolution::miss(part);
    }

    if rng.chance(defender.fighter.dodge_chance) {
        let mut dodge = Resolution::miss(part);
        dodge.dodged = true;
        return dodge;
    }

    // Defense is the base stat, the struck part's natural protection, and
    // whatever worn armor covers that part. Bodyless agents fall back to
    // their flat equipment defense.
    let (protection, armor) = match part {
        Some(p) => (
            defender
                .body
                .as_ref()
                .and_then(|b| b.part(p))
                .map_or(0, |bp| bp.protection),
            defender.equipment.armor_defense_for(p.class()),
        ),
        None => (0, defender.equipment.defense_bonus()),
    };
    let defense = defender.fighter.base_defense + protection + armor;

    let raw = (attacker_power - defense).max(0);
    let unarmored = (attacker_power - defender.fighter.base_defense - protection).max(0);
    let damage = ((raw as f32 * multiplier).floor() as i32).max(0);

    Resolution {
        hit: true,
        dodged: false,
        damage,
        absorbed_by_armor: (unarmored - raw).max(0),
        part,
        part_destroyed: false,
    }
}

/// Apply a landed hit: the struck part absorbs what it can, and the full
/// damage also comes off the authoritative HP pool.
pub fn apply_resolution(defender: &mut Agent, resolution: &mut Resolution) {
    if !resolution.hit || resolution.dodged || resolution.damage <= 0 {
        return;
    }
    if let Some(kind) = resolution.part
        && let Some(body) = defender.body.as_mut()
        && let Some(part) = body.part_mut(kind)
    {
        part.take_damage(resolution.damage);
        resolution.part_destroyed = part.is_destroyed();
    }
    defender.fighter.take_damage(resolution.damage);
}

/// Directions to try when relocating after a dodge, most preferred first.
pub fn dodge_candidates(preferred: Option<Direction>) -> [Direction; 4] {
    use Direction::*;
    match preferred {
        Some(North) => [North, East, West, South],
        Some(South) => [South, East, West, North],
        Some(East) => [East, North, South, West],
        Some(West) => [West, North, South, East],
        _ => [North, East, West, South],
    }
}

/// Grasping parts that lose hold of their items as an attack begins.
/// A destroyed part always loses its grip; a part damaged past the
/// threshold does half the time.
pub fn failed_grips(body: &BodyPlan, rng: &mut GameRng) -> Vec<PartKind> {
    body.parts()
        .iter()
        .filter(|p| p.tags.contains(PartTags::GRASP))
        .filter(|p| {
            p.is_destroyed()
                || (p.damage_fraction() > MANIPULATION_DAMAGE_THRESHOLD && rng.chance(0.5))
        })
        .map(|p| p.kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentId, Fighter};
    use crate::body::Anatomy;
    use crate::item::{Item, ItemId, ItemKind};

    fn orc() -> Agent {
        Agent::new(AgentId(1), "orc", 1, 0, Fighter::new(10, 3, 0))
            .with_body(BodyPlan::new(Anatomy::Humanoid, 10))
    }

    #[test]
    fn torso_hit_is_guaranteed_and_unscaled() {
        // 85 base + 15 torso modifier = 100, clamps into a sure hit.
        let mut rng = GameRng::new(7);
        let defender = orc();
        for _ in 0..50 {
            let r = resolve(
                AttackKind::Melee,
                5,
                &defender,
                Some(PartKind::Torso),
                &mut rng,
            );
            assert!(r.hit);
            assert_eq!(r.damage, 5);
            assert_eq!(r.part, Some(PartKind::Torso));
        }
    }

    #[test]
    fn head_shots_miss_more_and_hurt_more() {
        let mut rng = GameRng::new(3);
        let defender = orc();
        let mut hits = 0;
        let trials = 2000;
        for _ in 0..trials {
            let r = resolve(
                AttackKind::Melee,
                5,
                &defender,
                Some(PartKind::Head),
                &mut rng,
            );
            if r.hit {
                hits += 1;
                // floor(5 * 1.5)
                assert_eq!(r.damage, 7);
            }
        }
        // 85 - 50 = 35% hit chance.
        let rate = hits as f32 / trials as f32;
        assert!((0.30..0.40).contains(&rate), "hit rate {rate}");
    }

    #[test]
    fn destroyed_part_redirects_targeting() {
        let mut rng = GameRng::new(11);
        let mut defender = orc();
        let body = defender.body.as_mut().unwrap();
        let head = body.part_mut(PartKind::Head).unwrap();
        head.take_damage(head.max_hp);
        for _ in 0..50 {
            let picked =
                select_target_part(defender.body.as_ref().unwrap(), Some(PartKind::Head), &mut rng)
                    .unwrap();
            assert_ne!(picked, PartKind::Head);
        }
    }

    #[test]
    fn armor_counts_only_on_covered_parts() {
        let mut rng = GameRng::new(5);
        let mut defender = orc();
        let mail = Item::new(ItemId(1), "chain shirt", ItemKind::Armor)
            .with_defense(3)
            .with_coverage(&[PartClass::Torso]);
        defender.equipment.equip(mail).unwrap();
        let r = resolve(
            AttackKind::Melee,
            5,
            &defender,
            Some(PartKind::Torso),
            &mut rng,
        );
        assert!(r.hit);
        assert_eq!(r.damage, 2);
        assert_eq!(r.absorbed_by_armor, 3);
    }

    #[test]
    fn apply_hits_part_and_pool_together() {
        let mut defender = orc();
        let mut resolution = Resolution {
            hit: true,
            dodged: false,
            damage: 4,
            absorbed_by_armor: 0,
            part: Some(PartKind::LeftHand),
            part_destroyed: false,
        };
        apply_resolution(&mut defender, &mut resolution);
        assert!(resolution.part_destroyed); // hand pool is tiny
        assert_eq!(defender.fighter.hp(), 6);
    }

    #[test]
    fn dodge_ordering_puts_preference_first() {
        assert_eq!(
            dodge_candidates(Some(Direction::South)),
            [
                Direction::South,
                Direction::East,
                Direction::West,
                Direction::North
            ]
        );
        assert_eq!(dodge_candidates(None)[0], Direction::North);
    }

    #[test]
    fn zero_chance_shots_never_land() {
        // Ranged base 50 minus the head's 50 leaves no chance at all.
        let mut rng = GameRng::new(9);
        let defender = orc();
        for _ in 0..200 {
            let r = resolve(
                AttackKind::Ranged,
                5,
                &defender,
                Some(PartKind::Head),
                &mut rng,
            );
            assert!(!r.hit);
        }
    }

    #[test]
    fn destroyed_hands_always_lose_their_grip() {
        let mut rng = GameRng::new(2);
        let mut body = BodyPlan::new(Anatomy::Humanoid, 10);
        for kind in [PartKind::LeftHand, PartKind::RightHand] {
            let p = body.part_mut(kind).unwrap();
            p.take_damage(p.max_hp);
        }
        for _ in 0..20 {
            assert_eq!(failed_grips(&body, &mut rng).len(), 2);
        }
    }

    #[test]
    fn one_destroyed_hand_drops_unconditionally() {
        let mut rng = GameRng::new(4);
        let mut body = BodyPlan::new(Anatomy::Humanoid, 10);
        let p = body.part_mut(PartKind::LeftHand).unwrap();
        p.take_damage(p.max_hp);
        for _ in 0..20 {
            assert!(failed_grips(&body, &mut rng).contains(&PartKind::LeftHand));
        }
    }

    #[test]
    fn healthy_hands_never_lose_their_grip() {
        let mut rng = GameRng::new(2);
        let body = BodyPlan::new(Anatomy::Humanoid, 10);
        for _ in 0..20 {
            assert!(failed_grips(&body, &mut rng).is_empty());
        }
    }
}
