//! Preset loading and lookup keyed by weather kind and day/night slot.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::types::Result;
use crate::core::Error;
use crate::skybox::preset::SkyboxPreset;
use crate::skybox::weather::{DayNight, WeatherKind};

/// Supplies raw preset text by logical asset name (e.g. `SkyboxRainNight`).
pub trait PresetSource {
    /// Text of the named asset, or `None` if it does not exist.
    fn read(&self, name: &str) -> Option<String>;
}

/// Reads `<dir>/<name>.json`.
#[derive(Clone, Debug)]
pub struct DirPresetSource {
    dir: PathBuf,
}

impl DirPresetSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl PresetSource for DirPresetSource {
    fn read(&self, name: &str) -> Option<String> {
        let path = self.path_for(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read preset asset {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// In-memory assets, mostly for hosts that bundle presets.
#[derive(Clone, Debug, Default)]
pub struct MemoryPresetSource {
    assets: HashMap<String, String>,
}

impl MemoryPresetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<String>) {
        self.assets.insert(name.into(), data.into());
    }
}

impl PresetSource for MemoryPresetSource {
    fn read(&self, name: &str) -> Option<String> {
        self.assets.get(name).cloned()
    }
}

/// Loaded presets, two slots per weather kind.
///
/// Presets are shared behind `Rc` and never mutated after loading; a reload
/// replaces the slot wholesale.
pub struct PresetStore {
    source: Box<dyn PresetSource>,
    presets: HashMap<WeatherKind, [Rc<SkyboxPreset>; 2]>,
}

impl PresetStore {
    pub fn new(source: Box<dyn PresetSource>) -> Self {
        Self {
            source,
            presets: HashMap::new(),
        }
    }

    /// Create a store and load every weather kind.
    ///
    /// Kinds that fail to load are reported in the returned error list; the
    /// rest are usable.
    pub fn load_all(source: Box<dyn PresetSource>) -> (Self, Vec<Error>) {
        let mut store = Self::new(source);
        let mut errors = Vec::new();
        for kind in WeatherKind::ALL {
            if let Err(e) = store.load_weather(kind) {
                log::error!("Skybox preset for {:?} unavailable: {}", kind, e);
                errors.push(e);
            }
        }
        log::info!(
            "Loaded skybox presets for {}/{} weather kinds",
            store.presets.len(),
            WeatherKind::ALL.len()
        );
        (store, errors)
    }

    /// The asset source presets are read from.
    pub fn source(&self) -> &dyn PresetSource {
        self.source.as_ref()
    }

    /// Load the day preset and, if present, the night variant of `kind`.
    pub fn load_weather(&mut self, kind: WeatherKind) -> Result<()> {
        self.load(kind, DayNight::Day)?;
        self.load(kind, DayNight::Night)
    }

    /// Load one variant of `kind`.
    ///
    /// A day preset fills both slots. A missing night preset is not an error;
    /// the night slot keeps the day preset.
    pub fn load(&mut self, kind: WeatherKind, variant: DayNight) -> Result<()> {
        let Some(base) = kind.preset_asset() else {
            return Err(Error::Config(format!("weather {:?} has no preset asset", kind)));
        };
        let name = format!("{}{}", base, variant.suffix());

        let Some(data) = self.source.read(&name) else {
            return match variant {
                DayNight::Day => Err(Error::MissingPreset {
                    weather: kind,
                    variant: "day",
                }),
                DayNight::Night => {
                    log::debug!("No night preset {}, using the day preset", name);
                    Ok(())
                }
            };
        };

        let preset = Rc::new(SkyboxPreset::parse(&name, &data)?);
        match variant {
            DayNight::Day => {
                self.presets.insert(kind, [preset.clone(), preset]);
            }
            DayNight::Night => {
                let Some(slots) = self.presets.get_mut(&kind) else {
                    return Err(Error::PresetNotLoaded {
                        weather: kind,
                        index: DayNight::Day,
                    });
                };
                slots[DayNight::Night.index()] = preset;
            }
        }
        log::debug!("Loaded preset {}", name);
        Ok(())
    }

    /// Preset for `(kind, slot)`.
    pub fn get(&self, kind: WeatherKind, slot: DayNight) -> Result<Rc<SkyboxPreset>> {
        self.presets
            .get(&kind)
            .map(|slots| slots[slot.index()].clone())
            .ok_or(Error::PresetNotLoaded {
                weather: kind,
                index: slot,
            })
    }

    /// Whether `kind` has presets loaded.
    pub fn contains(&self, kind: WeatherKind) -> bool {
        self.presets.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skybox::preset::tests::sample_preset_json;

    fn source_with(kinds: &[WeatherKind], night: &[WeatherKind]) -> MemoryPresetSource {
        let mut source = MemoryPresetSource::new();
        for kind in kinds {
            let name = kind.preset_asset().unwrap();
            source.insert(name, sample_preset_json(0.3, "87CEEBFF"));
        }
        for kind in night {
            let name = format!("{}Night", kind.preset_asset().unwrap());
            source.insert(name, sample_preset_json(0.9, "000010FF"));
        }
        source
    }

    #[test]
    fn test_night_falls_back_to_day() {
        let (store, errors) = PresetStore::load_all(Box::new(source_with(&WeatherKind::ALL, &[])));
        assert!(errors.is_empty(), "{errors:?}");
        for kind in WeatherKind::ALL {
            let day = store.get(kind, DayNight::Day).unwrap();
            let night = store.get(kind, DayNight::Night).unwrap();
            assert_eq!(*day, *night, "{kind:?}");
            assert!(Rc::ptr_eq(&day, &night));
        }
    }

    #[test]
    fn test_night_variant_overrides() {
        let (store, _) =
            PresetStore::load_all(Box::new(source_with(&WeatherKind::ALL, &[WeatherKind::Rain])));
        let day = store.get(WeatherKind::Rain, DayNight::Day).unwrap();
        let night = store.get(WeatherKind::Rain, DayNight::Night).unwrap();
        assert!((day.fog_distance - 0.3).abs() < 1e-6);
        assert!((night.fog_distance - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_missing_day_asset_fails_only_that_kind() {
        let kinds = [WeatherKind::Sunny, WeatherKind::Rain];
        let (store, errors) = PresetStore::load_all(Box::new(source_with(&kinds, &[])));
        assert_eq!(errors.len(), WeatherKind::ALL.len() - kinds.len());
        assert!(errors.iter().all(|e| matches!(e, Error::MissingPreset { variant: "day", .. })));
        assert!(store.contains(WeatherKind::Rain));
        assert!(!store.contains(WeatherKind::Snow));
        assert!(matches!(
            store.get(WeatherKind::Snow, DayNight::Night),
            Err(Error::PresetNotLoaded { weather: WeatherKind::Snow, .. })
        ));
    }

    #[test]
    fn test_parse_failure_reported() {
        let mut source = MemoryPresetSource::new();
        source.insert("SkyboxFog", "not json");
        let mut store = PresetStore::new(Box::new(source));
        let err = store.load_weather(WeatherKind::Fog).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "{err}");
        assert!(!store.contains(WeatherKind::Fog));
    }

    #[test]
    fn test_none_weather_has_no_asset() {
        let mut store = PresetStore::new(Box::new(MemoryPresetSource::new()));
        assert!(matches!(store.load(WeatherKind::None, DayNight::Day), Err(Error::Config(_))));
    }

    #[test]
    fn test_dir_source_reads_json_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("SkyboxSnow.json"),
            sample_preset_json(0.5, "FFFFFFFF"),
        )
        .unwrap();

        let mut store = PresetStore::new(Box::new(DirPresetSource::new(dir.path())));
        store.load_weather(WeatherKind::Snow).unwrap();
        let preset = store.get(WeatherKind::Snow, DayNight::Night).unwrap();
        assert!((preset.fog_distance - 0.5).abs() < 1e-6);
        assert!(store.source().read("SkyboxMissing").is_none());
    }
}
