//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`C3D_SECTION__KEY`)

use collide3d_collision::{GjkConfig, TreeConfig};
use collide3d_math::Vec3;
use collide3d_scene::SceneConfig;
use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collision tuning
    #[serde(default)]
    pub collision: CollisionConfig,
    /// Headless walk-through settings
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`C3D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // C3D_DEMO__FRAMES=10 -> demo.frames = 10
        figment = figment.merge(Env::prefixed("C3D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Library-level tuning for a [`Scene`](collide3d_scene::Scene)
    pub fn to_scene_config(&self) -> SceneConfig {
        self.collision.to_scene_config()
    }
}

/// Collision configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Maximum polygons per AABB tree leaf
    pub leaf_polygons: usize,
    /// AABB tree depth cap
    pub max_depth: usize,
    pub gjk_max_iterations: usize,
    pub epa_max_iterations: usize,
    pub epa_tolerance: f32,
    /// Penetrations up to this depth count as touching
    pub touch_tolerance: f32,
    /// Ground direction [x, y, z]
    pub ground_dir: [f32; 3],
}

impl Default for CollisionConfig {
    fn default() -> Self {
        let tree = TreeConfig::default();
        let gjk = GjkConfig::default();
        Self {
            leaf_polygons: tree.leaf_polygons,
            max_depth: tree.max_depth,
            gjk_max_iterations: gjk.gjk_max_iterations,
            epa_max_iterations: gjk.epa_max_iterations,
            epa_tolerance: gjk.epa_tolerance,
            touch_tolerance: gjk.touch_tolerance,
            ground_dir: [0.0, -1.0, 0.0],
        }
    }
}

impl CollisionConfig {
    pub fn to_scene_config(&self) -> SceneConfig {
        SceneConfig {
            tree: TreeConfig {
                leaf_polygons: self.leaf_polygons.max(1),
                max_depth: self.max_depth,
            },
            gjk: GjkConfig {
                gjk_max_iterations: self.gjk_max_iterations,
                epa_max_iterations: self.epa_max_iterations,
                epa_tolerance: self.epa_tolerance,
                touch_tolerance: self.touch_tolerance,
            },
            ground_dir: Vec3::from(self.ground_dir),
        }
    }
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to simulate
    pub frames: u32,
    /// Fixed time step in seconds
    pub time_step: f32,
    /// Player walking speed (units per second)
    pub player_speed: f32,
    pub player_radius: f32,
    pub player_height: f32,
    /// Player start position [x, y, z]
    pub player_start: [f32; 3],
    /// Half extent of the square landscape
    pub landscape_half_size: f32,
    /// Grid cells per landscape side
    pub landscape_subdivisions: u32,
    /// Log a frame report every N frames (0 = never)
    pub report_every: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            time_step: 1.0 / 60.0,
            player_speed: 2.5,
            player_radius: 0.2,
            player_height: 0.85,
            player_start: [0.0, 2.0, 0.0],
            landscape_half_size: 10.0,
            landscape_subdivisions: 16,
            report_every: 60,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.collision.max_depth, 32);
        assert_eq!(config.demo.player_radius, 0.2);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("leaf_polygons"));
        assert!(toml.contains("player_speed"));
    }

    #[test]
    fn test_default_scene_config_matches_library() {
        let scene = AppConfig::default().to_scene_config();
        assert_eq!(scene, SceneConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[collision]\nmax_depth = 8\n").unwrap();
        assert_eq!(config.collision.max_depth, 8);
        assert_eq!(config.collision.leaf_polygons, 2);
        assert_eq!(config.demo.frames, 600);
    }

    #[test]
    fn test_zero_leaf_size_is_raised() {
        let mut config = CollisionConfig::default();
        config.leaf_polygons = 0;
        assert_eq!(config.to_scene_config().tree.leaf_polygons, 1);
    }
}
