//! Timed status effects and damage-over-time ticks.

use serde::{Deserialize, Serialize};
use strum::Display;

/// What a status effect does while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EffectKind {
    /// Vision reduced to nothing beyond carried light.
    Darkness,
    /// Damage each maintenance tick.
    Poison,
    /// Hunger has run out; damage each maintenance tick.
    Starving,
}

impl EffectKind {
    /// Damage dealt per maintenance tick, if any.
    pub const fn damage_per_tick(self) -> i32 {
        match self {
            EffectKind::Darkness => 0,
            EffectKind::Poison => 1,
            EffectKind::Starving => 1,
        }
    }
}

/// One active effect. `duration: None` lasts until explicitly removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub duration: Option<u32>,
}

impl Effect {
    pub fn new(kind: EffectKind, duration: Option<u32>) -> Self {
        Self { kind, duration }
    }

    pub fn permanent(kind: EffectKind) -> Self {
        Self::new(kind, None)
    }

    pub fn timed(kind: EffectKind, turns: u32) -> Self {
        Self::new(kind, Some(turns))
    }
}

/// The set of effects active on one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectList {
    effects: Vec<Effect>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect. An effect of the same kind is replaced, refreshing
    /// its duration rather than stacking.
    pub fn add(&mut self, effect: Effect) {
        self.remove_kind(effect.kind);
        self.effects.push(effect);
    }

    pub fn remove_kind(&mut self, kind: EffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn has_kind(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advance one maintenance tick over a snapshot of the active effects.
    /// Returns the total damage to apply and the kinds that expired.
    pub fn tick(&mut self) -> EffectTick {
        let mut result = EffectTick::default();
        for effect in &mut self.effects {
            result.damage += effect.kind.damage_per_tick();
            if let Some(turns) = &mut effect.duration {
                *turns = turns.saturating_sub(1);
                if *turns == 0 {
                    result.expired.push(effect.kind);
                }
            }
        }
        self.effects.retain(|e| e.duration != Some(0));
        result
    }
}

/// Outcome of one effect tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectTick {
    pub damage: i32,
    pub expired: Vec<EffectKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_kind_replaces_instead_of_stacking() {
        let mut list = EffectList::new();
        list.add(Effect::timed(EffectKind::Poison, 2));
        list.add(Effect::timed(EffectKind::Poison, 5));
        assert_eq!(list.iter().count(), 1);
        assert_eq!(list.iter().next().unwrap().duration, Some(5));
    }

    #[test]
    fn timed_effect_expires_and_reports() {
        let mut list = EffectList::new();
        list.add(Effect::timed(EffectKind::Poison, 2));
        let first = list.tick();
        assert_eq!(first.damage, 1);
        assert!(first.expired.is_empty());
        let second = list.tick();
        assert_eq!(second.damage, 1);
        assert_eq!(second.expired, vec![EffectKind::Poison]);
        assert!(list.is_empty());
    }

    #[test]
    fn permanent_effect_never_expires() {
        let mut list = EffectList::new();
        list.add(Effect::permanent(EffectKind::Starving));
        for _ in 0..100 {
            let tick = list.tick();
            assert_eq!(tick.damage, 1);
            assert!(tick.expired.is_empty());
        }
        assert!(list.has_kind(EffectKind::Starving));
        list.remove_kind(EffectKind::Starving);
        assert!(list.is_empty());
    }

    #[test]
    fn darkness_deals_no_damage() {
        let mut list = EffectList::new();
        list.add(Effect::permanent(EffectKind::Darkness));
        assert_eq!(list.tick().damage, 0);
    }
}
