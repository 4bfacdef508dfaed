//! Entity vocabulary shared between host and worker
//!
//! Snapshot types are read-only copies handed to the worker each frame; the
//! worker never touches the host's source-of-truth game state directly.

use crate::foundation::math::Vec3;

/// Weapon that fired a missile; stored compactly in buffer metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum WeaponKind {
    /// Basic cannon
    Default = 0,
    /// Chaingun spray
    Chaingun = 1,
    /// BFG orb
    Bfg = 2,
    /// Dumb-fire rocket
    Rocket = 3,
    /// Charged shot
    Charge = 4,
    /// Deployable bomb
    Bomb = 5,
    /// Railgun slug
    Railgun = 6,
}

impl WeaponKind {
    /// Decode from the metadata word, falling back to the basic cannon for
    /// values written by a newer host
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Chaingun,
            2 => Self::Bfg,
            3 => Self::Rocket,
            4 => Self::Charge,
            5 => Self::Bomb,
            6 => Self::Railgun,
            _ => Self::Default,
        }
    }
}

/// Who owns a missile; decides culling rules and collision targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum MissileKind {
    /// Fired by the player; collides with aliens and asteroids
    Player = 0,
    /// Fired by an alien; collides with the player only
    AlienOwned = 1,
    /// Fired by a wingman; treated as player-side for collision
    Wingman = 2,
}

impl MissileKind {
    /// Decode from the metadata word
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::AlienOwned,
            2 => Self::Wingman,
            _ => Self::Player,
        }
    }

    /// Player-side missiles query the spatial grid; alien missiles are
    /// checked against the player directly
    pub fn is_player_side(self) -> bool {
        matches!(self, Self::Player | Self::Wingman)
    }
}

/// Active game mode, selecting the culling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Lane-bounded campaign levels
    Campaign,
    /// Open world; only a radial distance cull applies
    FreeFlight,
}

/// Named sub-part of a struck entity, resolved from the impact offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitComponent {
    /// Forward section facing the player
    Nose,
    /// Central hull
    Body,
    /// Port side
    LeftWing,
    /// Starboard side
    RightWing,
}

impl HitComponent {
    /// Stable name used by game-state consumers
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::Body => "body",
            Self::LeftWing => "leftWing",
            Self::RightWing => "rightWing",
        }
    }
}

/// Read-only alien state supplied fresh each frame
#[derive(Debug, Clone, Copy)]
pub struct AlienSnapshot {
    /// Caller's alien identifier
    pub id: u32,
    /// World position
    pub position: Vec3,
    /// Bounding radius
    pub radius: f32,
    /// Invulnerable aliens are excluded from homing and collision
    pub invulnerable: bool,
    /// Flying-saucer body plan (affects hit component thresholds)
    pub saucer: bool,
}

/// Read-only asteroid state supplied fresh each frame
#[derive(Debug, Clone, Copy)]
pub struct AsteroidSnapshot {
    /// Caller's asteroid identifier
    pub id: u32,
    /// World position
    pub position: Vec3,
    /// Bounding radius
    pub radius: f32,
    /// Decorative asteroids never collide
    pub doodad: bool,
}

/// Read-only player state; only the position is needed by this engine
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    /// World position
    pub position: Vec3,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
        }
    }
}

/// Full description of one missile, written into a buffer slot by the host
#[derive(Debug, Clone, Copy)]
pub struct MissileRecord {
    /// World position
    pub position: Vec3,
    /// Velocity; direction carries meaning, magnitude is the missile speed
    pub velocity: Vec3,
    /// Collision radius
    pub size: f32,
    /// Damage applied on hit
    pub damage: f32,
    /// Display color (consumed by the renderer, carried for cache density)
    pub color: [f32; 3],
    /// Compact external id; the host's side table maps it back
    pub external_id: i32,
    /// Weapon that fired this missile
    pub weapon: WeaponKind,
    /// Owner kind
    pub kind: MissileKind,
    /// Whether homing guidance is enabled
    pub homing: bool,
}

impl MissileRecord {
    /// Convenience constructor for a plain player shot
    pub fn player_shot(position: Vec3, direction: Vec3, weapon: WeaponKind) -> Self {
        Self {
            position,
            velocity: direction,
            size: 0.5,
            damage: 1.0,
            color: [1.0, 1.0, 0.2],
            external_id: 0,
            weapon,
            kind: MissileKind::Player,
            homing: false,
        }
    }

    /// Convenience constructor for an alien shot aimed along `direction`
    pub fn alien_shot(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            velocity: direction,
            size: 0.6,
            damage: 1.0,
            color: [1.0, 0.4, 0.4],
            external_id: 0,
            weapon: WeaponKind::Default,
            kind: MissileKind::AlienOwned,
            homing: false,
        }
    }

    /// Set the compact external id
    pub fn with_external_id(mut self, external_id: i32) -> Self {
        self.external_id = external_id;
        self
    }

    /// Enable homing guidance
    pub fn with_homing(mut self) -> Self {
        self.homing = true;
        self
    }
}
