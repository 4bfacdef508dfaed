//! # Unified Configuration System
//!
//! All simulation tunables live in [`SimConfig`]: buffer capacity, spatial
//! grid cell size, homing parameters, culling bounds per game mode, and
//! collision margins. Values are serializable so a deployment can override
//! them from a TOML file without recompiling.

use serde::{Deserialize, Serialize};

use crate::entities::WeaponKind;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a TOML file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A tunable failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Maximum campaign range per weapon kind, as a depth along the firing axis.
///
/// Heavier weapons reach further before their missiles are culled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponRanges {
    /// Basic cannon
    pub default: f32,
    /// Chaingun spray
    pub chaingun: f32,
    /// BFG orb
    pub bfg: f32,
    /// Dumb-fire rocket
    pub rocket: f32,
    /// Charged shot
    pub charge: f32,
    /// Deployable bomb
    pub bomb: f32,
    /// Railgun slug
    pub railgun: f32,
}

impl Default for WeaponRanges {
    fn default() -> Self {
        Self {
            default: 200.0,
            chaingun: 200.0,
            bfg: 400.0,
            rocket: 300.0,
            charge: 350.0,
            bomb: 150.0,
            railgun: 600.0,
        }
    }
}

impl WeaponRanges {
    /// Maximum range for a weapon kind
    pub fn range(&self, weapon: WeaponKind) -> f32 {
        match weapon {
            WeaponKind::Default => self.default,
            WeaponKind::Chaingun => self.chaingun,
            WeaponKind::Bfg => self.bfg,
            WeaponKind::Rocket => self.rocket,
            WeaponKind::Charge => self.charge,
            WeaponKind::Bomb => self.bomb,
            WeaponKind::Railgun => self.railgun,
        }
    }
}

/// # Simulation Configuration
///
/// Every tunable of the missile engine. The defaults reproduce the reference
/// behavior (50 units/s missile speed, 20-unit grid cells, 0.15 homing
/// blend).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Maximum missile capacity; the transfer buffer is sized once for this
    pub max_missiles: usize,

    /// Uniform speed constant applied to every missile, in units/second
    pub missile_speed: f32,

    /// Spatial hash cell edge length
    pub cell_size: f32,

    /// Homing guidance acquisition range
    pub homing_range: f32,

    /// Per-frame blend factor steering velocity toward the target direction
    pub homing_strength: f32,

    /// Campaign lane half-width; missiles beyond +/- this on X are culled
    pub lateral_bound: f32,

    /// Campaign lane half-height; missiles beyond +/- this on Y are culled
    pub vertical_bound: f32,

    /// Depth on the player's side at which alien missiles are culled
    pub alien_depth_limit: f32,

    /// Per-weapon-kind maximum campaign range for player missiles
    pub weapon_ranges: WeaponRanges,

    /// Free-flight mode cull radius from the world origin
    pub free_flight_radius: f32,

    /// Extra margin added to entity + missile radii for contact tests
    pub collision_margin: f32,

    /// Player hull radius used for alien-missile contact tests
    pub player_radius: f32,

    /// Generous outer bound (squared before use) under which the exact
    /// player-contact distance is computed; a sqrt-avoidance knob only
    pub player_hit_outer: f32,

    /// Seconds between bomb deployment and forced detonation
    pub bomb_explosion_delay: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_missiles: 256,
            missile_speed: 50.0,
            cell_size: 20.0,
            homing_range: 120.0,
            homing_strength: 0.15,
            lateral_bound: 60.0,
            vertical_bound: 40.0,
            alien_depth_limit: 45.0,
            weapon_ranges: WeaponRanges::default(),
            free_flight_radius: 2000.0,
            collision_margin: 1.5,
            player_radius: 2.5,
            player_hit_outer: 50.0,
            bomb_explosion_delay: 2.5,
        }
    }
}

impl SimConfig {
    /// Create a configuration with a specific missile capacity
    pub fn with_capacity(mut self, max_missiles: usize) -> Self {
        self.max_missiles = max_missiles;
        self
    }

    /// Set the spatial hash cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set homing range and per-frame blend strength
    pub fn with_homing(mut self, range: f32, strength: f32) -> Self {
        self.homing_range = range;
        self.homing_strength = strength;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_missiles == 0 {
            return Err(ConfigError::Invalid(
                "max_missiles must be at least 1".to_string(),
            ));
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "cell_size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.homing_strength) {
            return Err(ConfigError::Invalid(
                "homing_strength must lie in [0, 1]".to_string(),
            ));
        }
        if self.missile_speed <= 0.0 {
            return Err(ConfigError::Invalid(
                "missile_speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for SimConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.missile_speed, 50.0);
        assert_eq!(config.cell_size, 20.0);
        assert_eq!(config.homing_strength, 0.15);
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config = SimConfig::default().with_capacity(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_heavier_weapons_reach_further() {
        let ranges = WeaponRanges::default();
        assert!(ranges.range(WeaponKind::Railgun) > ranges.range(WeaponKind::Default));
        assert!(ranges.range(WeaponKind::Bfg) > ranges.range(WeaponKind::Chaingun));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig::default().with_cell_size(25.0);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SimConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.cell_size, 25.0);
        assert_eq!(parsed.max_missiles, config.max_missiles);
    }
}
