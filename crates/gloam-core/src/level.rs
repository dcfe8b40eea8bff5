//! Character level and experience thresholds.

use serde::{Deserialize, Serialize};

const LEVEL_UP_BASE: u32 = 200;
const LEVEL_UP_FACTOR: u32 = 150;

/// Experience and level state for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterLevel {
    pub current_level: u32,
    pub current_xp: u32,
    /// XP awarded to whoever kills this agent.
    pub xp_given: u32,
}

impl CharacterLevel {
    pub fn new(xp_given: u32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            xp_given,
        }
    }

    /// XP needed to reach the next level.
    pub fn experience_to_next_level(&self) -> u32 {
        LEVEL_UP_BASE + self.current_level * LEVEL_UP_FACTOR
    }

    pub fn requires_level_up(&self) -> bool {
        self.current_xp >= self.experience_to_next_level()
    }

    pub fn add_xp(&mut self, xp: u32) {
        self.current_xp += xp;
    }

    /// Consume one level worth of XP. The caller applies the stat increase
    /// chosen by the player.
    pub fn increase_level(&mut self) {
        self.current_xp -= self.experience_to_next_level();
        self.current_level += 1;
    }
}

impl Default for CharacterLevel {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_scales_with_level() {
        let mut level = CharacterLevel::new(0);
        assert_eq!(level.experience_to_next_level(), 350);
        level.add_xp(350);
        assert!(level.requires_level_up());
        level.increase_level();
        assert_eq!(level.current_level, 2);
        assert_eq!(level.current_xp, 0);
        assert_eq!(level.experience_to_next_level(), 500);
        assert!(!level.requires_level_up());
    }
}
