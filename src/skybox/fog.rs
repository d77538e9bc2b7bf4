//! Render fog settings per weather kind.
//!
//! Five fog assets cover the seven weather kinds; kinds whose asset is
//! missing or broken keep built-in linear defaults.

use std::collections::HashMap;

use serde::Deserialize;

use crate::skybox::store::PresetSource;
use crate::skybox::weather::WeatherKind;

/// Render fog falloff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FogMode {
    #[default]
    Linear,
    Exponential,
    ExponentialSquared,
}

impl FogMode {
    /// Decode the integer stored in fog assets. Unknown values fall back to linear.
    pub fn from_int(value: i32) -> FogMode {
        match value {
            2 => FogMode::Exponential,
            3 => FogMode::ExponentialSquared,
            1 => FogMode::Linear,
            other => {
                log::warn!("Unknown fog mode {}, using linear", other);
                FogMode::Linear
            }
        }
    }

    pub fn as_int(self) -> i32 {
        match self {
            FogMode::Linear => 1,
            FogMode::Exponential => 2,
            FogMode::ExponentialSquared => 3,
        }
    }
}

/// Render fog parameters pushed to the sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogSetting {
    pub mode: FogMode,
    pub density: f32,
    pub start_distance: f32,
    pub end_distance: f32,
    pub exclude_skybox: bool,
}

impl FogSetting {
    /// Linear fog from zero out to `end_distance`.
    pub fn linear(end_distance: f32) -> Self {
        Self {
            mode: FogMode::Linear,
            density: 0.0,
            start_distance: 0.0,
            end_distance,
            exclude_skybox: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct FogRecord {
    fog_mode_int: i32,
    density: f32,
    start_distance: f32,
    end_distance: f32,
    exclude_skybox: bool,
}

impl Default for FogRecord {
    fn default() -> Self {
        Self {
            fog_mode_int: 1,
            density: 0.0,
            start_distance: 0.0,
            end_distance: 0.0,
            exclude_skybox: false,
        }
    }
}

impl From<FogRecord> for FogSetting {
    fn from(record: FogRecord) -> Self {
        Self {
            mode: FogMode::from_int(record.fog_mode_int),
            density: record.density,
            start_distance: record.start_distance,
            end_distance: record.end_distance,
            exclude_skybox: record.exclude_skybox,
        }
    }
}

/// Fog asset shared by one or more weather kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FogBucket {
    Sunny,
    Overcast,
    HeavyFog,
    Rainy,
    Snowy,
}

impl FogBucket {
    pub const ALL: [FogBucket; 5] = [
        FogBucket::Sunny,
        FogBucket::Overcast,
        FogBucket::HeavyFog,
        FogBucket::Rainy,
        FogBucket::Snowy,
    ];

    pub fn asset(self) -> &'static str {
        match self {
            FogBucket::Sunny => "FogSunny",
            FogBucket::Overcast => "FogOvercast",
            FogBucket::HeavyFog => "FogHeavyFog",
            FogBucket::Rainy => "FogRainy",
            FogBucket::Snowy => "FogSnowy",
        }
    }

    pub fn for_weather(weather: WeatherKind) -> Option<FogBucket> {
        match weather {
            WeatherKind::None => None,
            WeatherKind::Sunny | WeatherKind::Cloudy => Some(FogBucket::Sunny),
            WeatherKind::Overcast => Some(FogBucket::Overcast),
            WeatherKind::Fog => Some(FogBucket::HeavyFog),
            WeatherKind::Rain | WeatherKind::Thunder => Some(FogBucket::Rainy),
            WeatherKind::Snow => Some(FogBucket::Snowy),
        }
    }
}

/// Built-in fog for a weather kind.
pub fn default_fog(weather: WeatherKind) -> FogSetting {
    let end = match weather {
        WeatherKind::None | WeatherKind::Sunny => 1920.0,
        WeatherKind::Cloudy => 1600.0,
        WeatherKind::Overcast => 1440.0,
        WeatherKind::Fog => 64.0,
        WeatherKind::Rain => 1200.0,
        WeatherKind::Thunder => 960.0,
        WeatherKind::Snow => 720.0,
    };
    FogSetting::linear(end)
}

/// Fog settings for every weather kind.
#[derive(Clone, Debug)]
pub struct FogTable {
    settings: HashMap<WeatherKind, FogSetting>,
}

impl Default for FogTable {
    fn default() -> Self {
        let settings = WeatherKind::ALL.iter().map(|&w| (w, default_fog(w))).collect();
        Self { settings }
    }
}

impl FogTable {
    /// Load all fog assets from `source`, keeping defaults for missing ones.
    pub fn load(source: &dyn PresetSource) -> Self {
        let mut table = Self::default();
        for bucket in FogBucket::ALL {
            let Some(data) = source.read(bucket.asset()) else {
                log::warn!("Fog asset {} not found, keeping defaults", bucket.asset());
                continue;
            };
            let setting: FogSetting = match serde_json::from_str::<FogRecord>(&data) {
                Ok(record) => record.into(),
                Err(e) => {
                    log::warn!("Failed to parse fog asset {}: {}", bucket.asset(), e);
                    continue;
                }
            };
            for weather in WeatherKind::ALL {
                if FogBucket::for_weather(weather) == Some(bucket) {
                    table.settings.insert(weather, setting);
                }
            }
        }
        table
    }

    /// Fog for `weather`; `None` weather uses the sunny defaults.
    pub fn get(&self, weather: WeatherKind) -> FogSetting {
        self.settings
            .get(&weather)
            .copied()
            .unwrap_or_else(|| default_fog(weather))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skybox::store::MemoryPresetSource;

    #[test]
    fn test_mode_decoding() {
        assert_eq!(FogMode::from_int(1), FogMode::Linear);
        assert_eq!(FogMode::from_int(2), FogMode::Exponential);
        assert_eq!(FogMode::from_int(3), FogMode::ExponentialSquared);
        assert_eq!(FogMode::from_int(42), FogMode::Linear);
        assert_eq!(FogMode::ExponentialSquared.as_int(), 3);
    }

    #[test]
    fn test_defaults_without_assets() {
        let table = FogTable::load(&MemoryPresetSource::new());
        assert_eq!(table.get(WeatherKind::Fog).end_distance, 64.0);
        assert_eq!(table.get(WeatherKind::Thunder).end_distance, 960.0);
        assert_eq!(table.get(WeatherKind::None).end_distance, 1920.0);
    }

    #[test]
    fn test_bucket_shared_between_kinds() {
        let mut source = MemoryPresetSource::new();
        source.insert(
            "FogRainy",
            r#"{"FogModeInt": 2, "Density": 0.01, "StartDistance": 0, "EndDistance": 800, "ExcludeSkybox": true}"#,
        );
        let table = FogTable::load(&source);

        for weather in [WeatherKind::Rain, WeatherKind::Thunder] {
            let fog = table.get(weather);
            assert_eq!(fog.mode, FogMode::Exponential);
            assert!((fog.density - 0.01).abs() < 1e-6);
            assert!(fog.exclude_skybox);
        }
        assert_eq!(table.get(WeatherKind::Snow), default_fog(WeatherKind::Snow));
    }

    #[test]
    fn test_broken_asset_keeps_defaults() {
        let mut source = MemoryPresetSource::new();
        source.insert("FogSnowy", "{ nope");
        let table = FogTable::load(&source);
        assert_eq!(table.get(WeatherKind::Snow).end_distance, 720.0);
    }
}
