//! Skybox driver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::Error;
use crate::skybox::color::Color;
use crate::skybox::moon::MOON_ORBIT_SPEED;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Driver configuration. Every field has a default, so partial JSON files
/// are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Real seconds between day-part checks. 0 checks every tick.
    pub day_part_poll_seconds: f32,
    /// Game hours the sun and fog colors take to change at dawn and dusk.
    pub sun_fog_transition_hours: f32,
    /// Keep the skybox bound indoors (for mods that render see-through windows).
    pub transparent_windows: bool,
    /// Seed for wind directions and lightning. `None` seeds from entropy.
    pub wind_seed: Option<u64>,

    // -- Sub-configs -------------------------------------------------------

    pub scroll_speeds: ScrollSpeeds,
    pub material_defaults: MaterialDefaults,
    pub lightning: LightningConfig,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            day_part_poll_seconds: 5.0,
            sun_fog_transition_hours: 2.0,
            transparent_windows: false,
            wind_seed: None,
            scroll_speeds: ScrollSpeeds::default(),
            material_defaults: MaterialDefaults::default(),
            lightning: LightningConfig::default(),
        }
    }
}

impl SkyboxConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.day_part_poll_seconds >= 0.0) {
            return Err(Error::Config(format!(
                "day_part_poll_seconds must be >= 0, got {}",
                self.day_part_poll_seconds
            )));
        }
        if !(self.sun_fog_transition_hours >= 0.0) {
            return Err(Error::Config(format!(
                "sun_fog_transition_hours must be >= 0, got {}",
                self.sun_fog_transition_hours
            )));
        }
        self.lightning.validate()
    }
}

// ---------------------------------------------------------------------------
// Scroll speeds
// ---------------------------------------------------------------------------

/// Realtime speeds at a time scale of 1. Written multiplied by the host's
/// time scale whenever it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSpeeds {
    pub clouds: f32,
    pub moon_orbit: f32,
    pub star_twinkle: f32,
}

impl Default for ScrollSpeeds {
    fn default() -> Self {
        Self {
            clouds: 0.001 / 12.0,
            moon_orbit: MOON_ORBIT_SPEED,
            star_twinkle: 0.024 / 12.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Material defaults
// ---------------------------------------------------------------------------

/// Values written to the material before the first preset is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDefaults {
    pub atmosphere_thickness: f32,
    pub sky_tint: Color,
    pub sun_size: f32,
    pub sun_size_convergence: i32,
    pub sky_fade_start: f32,
    pub sky_fade_end: f32,
    pub night_start_height: f32,
    pub night_end_height: f32,
}

impl Default for MaterialDefaults {
    fn default() -> Self {
        Self {
            atmosphere_thickness: 0.75,
            sky_tint: Color::rgb(0.529, 0.808, 0.922),
            sun_size: 0.04,
            sun_size_convergence: 2,
            sky_fade_start: -0.01,
            sky_fade_end: -0.04,
            night_start_height: 0.01,
            night_end_height: -0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Lightning
// ---------------------------------------------------------------------------

/// Lightning flash tuning. Ranges are inclusive `[min, max]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    /// Chance per ambient effect at a time scale of 1.
    pub flash_chance: f32,
    /// Chance that a flash is a double flash, at a time scale of 1.
    pub double_flash_chance: f32,
    /// Real seconds one flash stays lit.
    pub flash_duration: f32,
    /// Real seconds between the two halves of a double flash.
    pub double_flash_gap: f32,
    pub color_range: [f32; 2],
    pub intensity_range: [f32; 2],
    pub range_range: [f32; 2],
    /// Horizontal offset from the player, applied to x and z.
    pub horizontal_offset: [f32; 2],
    pub height_offset: [f32; 2],
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            flash_chance: 0.5,
            double_flash_chance: 0.33,
            flash_duration: 0.1,
            double_flash_gap: 0.1,
            color_range: [0.8, 1.0],
            intensity_range: [0.5, 1.5],
            range_range: [500.0, 1000.0],
            horizontal_offset: [-10.0, 10.0],
            height_offset: [20.0, 40.0],
        }
    }
}

impl LightningConfig {
    fn validate(&self) -> Result<()> {
        let ranges = [
            ("color_range", self.color_range),
            ("intensity_range", self.intensity_range),
            ("range_range", self.range_range),
            ("horizontal_offset", self.horizontal_offset),
            ("height_offset", self.height_offset),
        ];
        for (name, [min, max]) in ranges {
            if !(min <= max) {
                return Err(Error::Config(format!("lightning.{} is empty: [{}, {}]", name, min, max)));
            }
        }
        if !(self.flash_duration > 0.0) {
            return Err(Error::Config("lightning.flash_duration must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SkyboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.day_part_poll_seconds, 5.0);
        assert_eq!(config.scroll_speeds.moon_orbit, 0.00024 / 12.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SkyboxConfig =
            serde_json::from_str(r#"{"transparent_windows": true, "lightning": {"flash_chance": 0.9}}"#).unwrap();
        assert!(config.transparent_windows);
        assert_eq!(config.lightning.flash_chance, 0.9);
        assert_eq!(config.lightning.double_flash_chance, 0.33);
        assert_eq!(config.sun_fog_transition_hours, 2.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("skybox.json");

        let mut config = SkyboxConfig::default();
        config.wind_seed = Some(7);
        config.day_part_poll_seconds = 0.0;
        config.save(&path).unwrap();

        let loaded = SkyboxConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybox.json");
        std::fs::write(&path, r#"{"lightning": {"intensity_range": [2.0, 1.0]}}"#).unwrap();
        assert!(matches!(SkyboxConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(SkyboxConfig::load(&path), Err(Error::Config(_))));

        assert!(matches!(
            SkyboxConfig::load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
