//! Body part model: per-agent damageable regions.
//!
//! Parts form a secondary, more granular HP pool. The fighter pool is
//! authoritative for death; parts gate capabilities (locomotion, grasping)
//! and make targeted attacks meaningful.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::liquid::{Coating, LiquidKind};
use crate::rng::GameRng;

/// Every distinct body part an anatomy can have.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PartKind {
    Head,
    Neck,
    Torso,
    LeftArm,
    RightArm,
    LeftHand,
    RightHand,
    LeftLeg,
    RightLeg,
    LeftFoot,
    RightFoot,
    // Arachnid
    Thorax,
    Abdomen,
    FrontLeftLeg,
    FrontRightLeg,
    SecondLeftLeg,
    SecondRightLeg,
    ThirdLeftLeg,
    ThirdRightLeg,
    BackLeftLeg,
    BackRightLeg,
}

/// Classification used by the combat modifier table. Compound kinds project
/// onto one of these seven classes; there is no name matching anywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PartClass {
    Head,
    Neck,
    Torso,
    Arm,
    Hand,
    Leg,
    Foot,
}

impl PartKind {
    pub const fn class(self) -> PartClass {
        match self {
            PartKind::Head => PartClass::Head,
            PartKind::Neck => PartClass::Neck,
            PartKind::Torso | PartKind::Thorax | PartKind::Abdomen => PartClass::Torso,
            PartKind::LeftArm | PartKind::RightArm => PartClass::Arm,
            PartKind::LeftHand | PartKind::RightHand => PartClass::Hand,
            PartKind::LeftLeg
            | PartKind::RightLeg
            | PartKind::FrontLeftLeg
            | PartKind::FrontRightLeg
            | PartKind::SecondLeftLeg
            | PartKind::SecondRightLeg
            | PartKind::ThirdLeftLeg
            | PartKind::ThirdRightLeg
            | PartKind::BackLeftLeg
            | PartKind::BackRightLeg => PartClass::Leg,
            PartKind::LeftFoot | PartKind::RightFoot => PartClass::Foot,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PartKind::Head => "head",
            PartKind::Neck => "neck",
            PartKind::Torso => "torso",
            PartKind::LeftArm => "left arm",
            PartKind::RightArm => "right arm",
            PartKind::LeftHand => "left hand",
            PartKind::RightHand => "right hand",
            PartKind::LeftLeg => "left leg",
            PartKind::RightLeg => "right leg",
            PartKind::LeftFoot => "left foot",
            PartKind::RightFoot => "right foot",
            PartKind::Thorax => "thorax",
            PartKind::Abdomen => "abdomen",
            PartKind::FrontLeftLeg => "front left leg",
            PartKind::FrontRightLeg => "front right leg",
            PartKind::SecondLeftLeg => "second left leg",
            PartKind::SecondRightLeg => "second right leg",
            PartKind::ThirdLeftLeg => "third left leg",
            PartKind::ThirdRightLeg => "third right leg",
            PartKind::BackLeftLeg => "back left leg",
            PartKind::BackRightLeg => "back right leg",
        }
    }
}

bitflags! {
    /// Capability tags carried by a body part.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PartTags: u8 {
        /// Can hold an item (weapon, shield, torch).
        const GRASP      = 0b0001;
        /// Fine manipulation; damage here can force grasped items dropped.
        const MANIPULATE = 0b0010;
        /// Contributes to movement.
        const LOCOMOTION = 0b0100;
        /// Armor can be fitted over this part.
        const ARMOR      = 0b1000;
    }
}

// Serialize tags as their raw bits.
impl Serialize for PartTags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for PartTags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(PartTags::from_bits_truncate(bits))
    }
}

/// A single damageable region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPart {
    pub kind: PartKind,
    /// Fraction of the owner's total max HP this part represents.
    pub hp_ratio: f32,
    pub max_hp: i32,
    pub hp: i32,
    /// Destroying a vital part changes death messaging.
    pub vital: bool,
    /// Flat defense contribution (natural armor).
    pub protection: i32,
    pub tags: PartTags,
    pub coating: Coating,
}

impl BodyPart {
    fn new(kind: PartKind, hp_ratio: f32, owner_max_hp: i32) -> Self {
        let max_hp = ((hp_ratio * owner_max_hp as f32) as i32).max(1);
        Self {
            kind,
            hp_ratio,
            max_hp,
            hp: max_hp,
            vital: false,
            protection: 0,
            tags: PartTags::empty(),
            coating: Coating::default(),
        }
    }

    fn vital(mut self) -> Self {
        self.vital = true;
        self
    }

    fn protection(mut self, protection: i32) -> Self {
        self.protection = protection;
        self
    }

    fn tags(mut self, tags: PartTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    /// 0.0 = healthy, 1.0 = destroyed.
    pub fn damage_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 1.0;
        }
        1.0 - (self.hp as f32 / self.max_hp as f32)
    }

    /// Deal damage to this part. A destroyed part takes no further damage.
    /// Returns the damage actually absorbed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.hp);
        self.hp -= actual;
        actual
    }

    /// Heal this part. Returns the healing actually applied.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    /// Wound descriptor for inspection panels.
    pub fn condition(&self) -> &'static str {
        if !self.is_damaged() {
            return "healthy";
        }
        let ratio = self.hp as f32 / self.max_hp as f32;
        if ratio > 0.75 {
            "damaged"
        } else if ratio > 0.5 {
            "wounded"
        } else if ratio > 0.25 {
            "badly wounded"
        } else if ratio > 0.0 {
            "severely wounded"
        } else {
            "destroyed"
        }
    }
}

/// Anatomy layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Anatomy {
    Humanoid,
    Arachnid,
    Simple,
}

/// The per-agent collection of body parts, in a fixed deterministic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPlan {
    pub anatomy: Anatomy,
    parts: Vec<BodyPart>,
}

impl BodyPlan {
    pub fn new(anatomy: Anatomy, owner_max_hp: i32) -> Self {
        let parts = match anatomy {
            Anatomy::Humanoid => Self::humanoid_parts(owner_max_hp),
            Anatomy::Arachnid => Self::arachnid_parts(owner_max_hp),
            Anatomy::Simple => Self::simple_parts(owner_max_hp),
        };
        Self { anatomy, parts }
    }

    fn humanoid_parts(hp: i32) -> Vec<BodyPart> {
        use PartKind::*;
        let grasp = PartTags::GRASP | PartTags::MANIPULATE;
        let loco = PartTags::LOCOMOTION;
        vec![
            BodyPart::new(Head, 0.5, hp).vital().tags(PartTags::ARMOR),
            BodyPart::new(Neck, 0.267, hp).vital().tags(PartTags::ARMOR),
            BodyPart::new(Torso, 1.0, hp).vital().tags(PartTags::ARMOR),
            BodyPart::new(LeftArm, 0.4, hp).tags(PartTags::ARMOR),
            BodyPart::new(RightArm, 0.4, hp).tags(PartTags::ARMOR),
            BodyPart::new(LeftHand, 0.167, hp).tags(grasp),
            BodyPart::new(RightHand, 0.167, hp).tags(grasp),
            BodyPart::new(LeftLeg, 0.5, hp).tags(loco),
            BodyPart::new(RightLeg, 0.5, hp).tags(loco),
            BodyPart::new(LeftFoot, 0.2, hp).tags(loco | PartTags::ARMOR),
            BodyPart::new(RightFoot, 0.2, hp).tags(loco | PartTags::ARMOR),
        ]
    }

    fn arachnid_parts(hp: i32) -> Vec<BodyPart> {
        use PartKind::*;
        let loco = PartTags::LOCOMOTION;
        let mut parts = vec![
            BodyPart::new(Thorax, 1.0, hp).vital().tags(PartTags::ARMOR),
            BodyPart::new(Abdomen, 0.5, hp).vital().tags(PartTags::ARMOR),
        ];
        for leg in [
            FrontLeftLeg,
            FrontRightLeg,
            SecondLeftLeg,
            SecondRightLeg,
            ThirdLeftLeg,
            ThirdRightLeg,
            BackLeftLeg,
            BackRightLeg,
        ] {
            parts.push(BodyPart::new(leg, 0.4, hp).tags(loco));
        }
        parts
    }

    fn simple_parts(hp: i32) -> Vec<BodyPart> {
        vec![
            BodyPart::new(PartKind::Torso, 1.0, hp)
                .vital()
                .protection(1)
                .tags(PartTags::ARMOR),
        ]
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn part(&self, kind: PartKind) -> Option<&BodyPart> {
        self.parts.iter().find(|p| p.kind == kind)
    }

    pub fn part_mut(&mut self, kind: PartKind) -> Option<&mut BodyPart> {
        self.parts.iter_mut().find(|p| p.kind == kind)
    }

    /// All non-destroyed part kinds, in anatomy order.
    pub fn intact_parts(&self) -> Vec<PartKind> {
        self.parts
            .iter()
            .filter(|p| !p.is_destroyed())
            .map(|p| p.kind)
            .collect()
    }

    /// Pick a non-destroyed part uniformly at random.
    pub fn random_intact_part(&self, rng: &mut GameRng) -> Option<PartKind> {
        let intact = self.intact_parts();
        rng.choose(&intact).copied()
    }

    pub fn damaged_parts(&self) -> Vec<&BodyPart> {
        self.parts.iter().filter(|p| p.is_damaged()).collect()
    }

    fn locomotion_parts(&self) -> impl Iterator<Item = &BodyPart> {
        self.parts
            .iter()
            .filter(|p| p.tags.contains(PartTags::LOCOMOTION))
    }

    /// Can this body move at all? Simple anatomies move on an intact torso;
    /// everything else needs at least one working locomotion part.
    pub fn can_move(&self) -> bool {
        match self.anatomy {
            Anatomy::Simple => self.part(PartKind::Torso).is_some_and(|p| !p.is_destroyed()),
            _ => self.locomotion_parts().any(|p| !p.is_destroyed()),
        }
    }

    /// Movement penalty in [0, 1]: 0 = unimpaired, 1 = cannot move.
    pub fn movement_penalty(&self) -> f32 {
        if self.anatomy == Anatomy::Simple {
            return self
                .part(PartKind::Torso)
                .map(|p| p.damage_fraction())
                .unwrap_or(0.0);
        }
        let (total, working) = self.locomotion_parts().fold((0u32, 0u32), |(t, w), p| {
            (t + 1, w + u32::from(!p.is_destroyed()))
        });
        if total == 0 {
            return 0.0;
        }
        1.0 - working as f32 / total as f32
    }

    pub fn can_use_hands(&self) -> bool {
        self.parts
            .iter()
            .any(|p| p.tags.contains(PartTags::GRASP) && !p.is_destroyed())
    }

    /// Grasping part kinds in anatomy order. Grasp slots pair with these:
    /// the first grasper holds the weapon, the second the offhand.
    pub fn grasping_parts(&self) -> Vec<PartKind> {
        self.parts
            .iter()
            .filter(|p| p.tags.contains(PartTags::GRASP))
            .map(|p| p.kind)
            .collect()
    }

    /// Manipulation penalty in [0, 1], from destroyed grasping parts.
    pub fn manipulation_penalty(&self) -> f32 {
        let (total, working) = self
            .parts
            .iter()
            .filter(|p| p.tags.contains(PartTags::GRASP))
            .fold((0u32, 0u32), |(t, w), p| {
                (t + 1, w + u32::from(!p.is_destroyed()))
            });
        if total == 0 {
            return 0.0;
        }
        1.0 - working as f32 / total as f32
    }

    pub fn heal_all(&mut self, amount: i32) -> i32 {
        self.parts.iter_mut().map(|p| p.heal(amount)).sum()
    }

    /// Rescale part pools after the owner's max HP changes, preserving each
    /// part's current damage fraction.
    pub fn rescale_max_hp(&mut self, new_owner_max_hp: i32) {
        for part in &mut self.parts {
            let health_ratio = if part.max_hp > 0 {
                part.hp as f32 / part.max_hp as f32
            } else {
                1.0
            };
            part.max_hp = ((part.hp_ratio * new_owner_max_hp as f32) as i32).max(1);
            part.hp = ((part.max_hp as f32 * health_ratio) as i32).min(part.max_hp);
        }
    }

    /// Age all coatings one tick. Returns the parts whose coating evaporated.
    pub fn tick_coatings(&mut self) -> Vec<(PartKind, LiquidKind)> {
        let mut evaporated = Vec::new();
        for part in &mut self.parts {
            let kind = part.coating.kind;
            if part.coating.tick() {
                evaporated.push((part.kind, kind));
            }
        }
        evaporated
    }

    /// Is any part coated in the given liquid?
    pub fn any_coated_in(&self, kind: LiquidKind) -> bool {
        self.parts.iter().any(|p| p.coating.kind == kind)
    }
}
