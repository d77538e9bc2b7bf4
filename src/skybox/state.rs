//! Reconciliation bookkeeping and the observable controller state.

use std::rc::Rc;

use crate::skybox::day_part::DayPart;
use crate::skybox::moon::{LunarPhase, MoonSolution};
use crate::skybox::preset::SkyboxPreset;
use crate::skybox::weather::{DayNight, WeatherKind};

/// Where the controller is in its reconcile cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconcilePhase {
    #[default]
    Idle,
    /// A change was detected and is waiting for the reconcile step.
    PendingChange,
    /// A preset is being written to the sink.
    Applying,
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

/// Change requests collected since the last reconcile step.
///
/// Requests merge last-write-wins on the weather; `force` and `reload` are
/// sticky until the change is flushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedChange {
    pub weather: WeatherKind,
    /// Apply even if the weather did not change.
    pub force: bool,
    /// Also push textures (save loaded, or first start).
    pub reload: bool,
}

impl StagedChange {
    pub fn new(weather: WeatherKind, force: bool) -> Self {
        Self {
            weather,
            force,
            reload: false,
        }
    }

    /// A forced change that also reloads textures.
    pub fn reload(weather: WeatherKind) -> Self {
        Self {
            weather,
            force: true,
            reload: true,
        }
    }

    /// Fold a newer request into this one.
    pub fn merge(&mut self, newer: StagedChange) {
        self.weather = newer.weather;
        self.force |= newer.force;
        self.reload |= newer.reload;
    }
}

/// Merge `newer` into an optional staged change.
pub fn stage(slot: &mut Option<StagedChange>, newer: StagedChange) {
    match slot {
        Some(staged) => staged.merge(newer),
        None => *slot = Some(newer),
    }
}

/// A decided change, ready to be written to the sink.
#[derive(Clone, Debug)]
pub struct PendingApplication {
    pub weather: WeatherKind,
    pub slot: DayNight,
    /// Wind direction in degrees, `[0, 360)`.
    pub wind_direction: f32,
    pub preset: Rc<SkyboxPreset>,
    pub force: bool,
    pub reload: bool,
}

impl PendingApplication {
    /// Identity of the preset being applied.
    #[inline]
    pub fn key(&self) -> (WeatherKind, DayNight) {
        (self.weather, self.slot)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Snapshot of the controller, as returned by `SkyboxController::state`.
#[derive(Clone, Debug, Default)]
pub struct SkyboxState {
    /// Weather of the last applied preset.
    pub weather: WeatherKind,
    pub day_part: DayPart,
    pub phase: ReconcilePhase,
    /// Whether the player is in an interior.
    pub inside: bool,
    /// Time scale the scroll speeds were last written for.
    pub time_scale: f32,
    /// Lunar phase whose coordinates were last flipped in.
    pub lunar_phase: LunarPhase,
    /// Identity of the last applied preset.
    pub applied: Option<(WeatherKind, DayNight)>,
    pub wind_direction: f32,
    pub masser: Option<MoonSolution>,
    pub secunda: Option<MoonSolution>,
    /// Completed reconciliations.
    pub applications: u64,
    /// Whether a staged change is waiting for the next tick.
    pub has_staged: bool,
}
