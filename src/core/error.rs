//! Error types for the skybox driver

use thiserror::Error;

use crate::skybox::moon::LunarPhase;
use crate::skybox::weather::{DayNight, WeatherKind};

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing {variant} preset asset for {weather:?}")]
    MissingPreset {
        weather: WeatherKind,
        variant: &'static str,
    },

    #[error("no preset loaded for {weather:?} ({index:?})")]
    PresetNotLoaded { weather: WeatherKind, index: DayNight },

    #[error("failed to parse preset '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse nested setting '{field}': {source}")]
    NestedParse {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no phase coordinates for lunar phase {0:?}")]
    PhaseLookup(LunarPhase),

    #[error("parameter sink is not bound yet")]
    SinkNotReady,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
