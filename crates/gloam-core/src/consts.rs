//! Core tuning constants for the turn cycle, combat, and perception.

/// Initiative consumed by one action. An agent with `speed == NORMAL_SPEED`
/// acts exactly once per cycle.
pub const NORMAL_SPEED: i32 = 100;

/// Initiative gained per cycle by friendly wanderers: half the baseline,
/// so they act every other cycle.
pub const FRIENDLY_SPEED: i32 = 50;

/// Base hit chance (percent) for melee attacks before part modifiers.
pub const MELEE_BASE_HIT: i32 = 85;

/// Base hit chance (percent) for ranged attacks before part modifiers.
pub const RANGED_BASE_HIT: i32 = 50;

/// Maximum flight distance of a launched projectile, in tiles.
pub const MAX_SHOT_RANGE: i32 = 8;

/// Player field-of-view radius.
pub const PLAYER_SIGHT_RADIUS: i32 = 10;

/// Default sight radius for AI perception checks.
pub const AI_SIGHT_RADIUS: i32 = 6;

/// Footsteps are audible to the player within this straight-line distance.
pub const FOOTSTEP_RADIUS: i32 = 10;

/// Light radius of a burning torch held by an agent.
pub const TORCH_LIGHT_RADIUS: i32 = 7;

/// Light radius of a campfire or bonfire on the ground.
pub const CAMPFIRE_LIGHT_RADIUS: i32 = 3;

/// Extra pathfinding cost of a closed door relative to open floor.
pub const CLOSED_DOOR_COST: u32 = 5;

/// Pathfinding cost penalty for a tile occupied by a blocking agent.
pub const OCCUPIED_TILE_PENALTY: u32 = 10;

/// A manipulating limb damaged past this fraction may drop grasped items.
pub const MANIPULATION_DAMAGE_THRESHOLD: f32 = 0.5;

/// Hunger level below which the starving effect sets in.
pub const STARVATION_THRESHOLD: i32 = 0;

/// Per-tick probability of losing lucidity while in darkness.
pub const LUCIDITY_DRAIN_CHANCE: f32 = 0.33;
