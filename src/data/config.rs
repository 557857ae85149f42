use bevy::prelude::*;
use once_cell::sync::Lazy;
use serde::Deserialize;

const EMBEDDED_CONFIG: &str = include_str!("intro_config.json");

/// Parsed embedded settings. A malformed embed falls back to the compiled
/// defaults rather than aborting startup.
pub static INTRO_CONFIG: Lazy<IntroConfig> = Lazy::new(|| {
    IntroConfig::from_json(EMBEDDED_CONFIG).unwrap_or_else(|e| {
        log::warn!("embedded intro config rejected ({e}); using built-in defaults");
        IntroConfig::default()
    })
});

pub struct ConfigPlugin;
impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(INTRO_CONFIG.clone());
    }
}

#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub headline: String,
    pub typing_secs: f32,
    pub hold_secs: f32,
    pub explosion_secs: f32,
    pub total_secs: f32,
    pub particle_count: usize,
    pub shell_inner_radius: f32,
    pub shell_band: f32,
    pub max_radius: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            headline: String::from("Hi, I build software."),
            typing_secs: 2.5,
            hold_secs: 0.5,
            explosion_secs: 1.0,
            total_secs: 6.0,
            particle_count: 500,
            shell_inner_radius: 1.0,
            shell_band: 3.5,
            max_radius: 4.5,
        }
    }
}

impl IntroConfig {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = IntroConfig::from_json(EMBEDDED_CONFIG).expect("embedded config");
        assert!(config.typing_secs > 0.0);
        assert!(config.particle_count > 0);
        assert!(!config.headline.is_empty());
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        assert!(IntroConfig::from_json("{ not json").is_err());
        let partial: IntroConfig = IntroConfig::from_json(r#"{"particle_count": 32}"#).unwrap();
        assert_eq!(partial.particle_count, 32);
        assert_eq!(partial.typing_secs, IntroConfig::default().typing_secs);
    }
}
