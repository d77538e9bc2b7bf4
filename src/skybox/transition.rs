//! Timed parameter transitions driven by real (unscaled) time.
//!
//! Each animatable parameter has at most one running transition. Starting a
//! new one snaps the old one to its end value first, so two lerps never
//! compete for the same parameter.

use std::collections::BTreeMap;

use crate::skybox::color::{Color, Lerp};
use crate::skybox::sink::{ParameterSink, Property};

/// Seconds in one game hour.
const SECONDS_PER_HOUR: f32 = 3600.0;

/// Convert a duration in game hours to real seconds at `time_scale`.
///
/// Never shorter than one second. A non-positive scale is treated as 1.
pub fn scaled_duration(hours: f32, time_scale: f32) -> f32 {
    let scale = if time_scale > 0.0 { time_scale } else { 1.0 };
    (SECONDS_PER_HOUR / scale * hours).max(1.0)
}

/// Parameters that can be animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamId {
    AtmosphereThickness,
    SunColor,
    FogColor,
}

impl ParamId {
    /// Push `value` for this parameter into the sink.
    fn write(self, value: TransitionValue, sink: &mut dyn ParameterSink) {
        match (self, value) {
            (ParamId::AtmosphereThickness, TransitionValue::Scalar(v)) => sink.set_float(Property::ATMOSPHERE_THICKNESS, v),
            (ParamId::SunColor, TransitionValue::Color(c)) => sink.set_sun_color(c),
            (ParamId::FogColor, TransitionValue::Color(c)) => sink.set_fog_color(c),
            (param, value) => log::warn!("Ignoring {:?} value for {:?}", value, param),
        }
    }
}

/// A value being animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionValue {
    Scalar(f32),
    Color(Color),
}

impl TransitionValue {
    /// Interpolate toward `end`. Mismatched kinds jump to `end`.
    pub fn interpolate(&self, end: &TransitionValue, t: f32) -> TransitionValue {
        match (self, end) {
            (TransitionValue::Scalar(a), TransitionValue::Scalar(b)) => TransitionValue::Scalar(a.lerp(b, t)),
            (TransitionValue::Color(a), TransitionValue::Color(b)) => TransitionValue::Color(a.lerp(b, t)),
            _ => *end,
        }
    }
}

/// One running transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub start: TransitionValue,
    pub end: TransitionValue,
    /// Real seconds.
    pub duration: f32,
    pub elapsed: f32,
}

impl TransitionState {
    pub fn new(start: TransitionValue, end: TransitionValue, duration: f32) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
        }
    }

    /// Fraction complete in `[0, 1]`.
    #[inline]
    pub fn t(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn value(&self) -> TransitionValue {
        self.start.interpolate(&self.end, self.t())
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.t() >= 1.0
    }
}

/// Arena of running transitions, one slot per parameter.
#[derive(Clone, Debug, Default)]
pub struct TransitionEngine {
    active: BTreeMap<ParamId, TransitionState>,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition, superseding any running one on `param`.
    ///
    /// The superseded transition is snapped to its end value, then the start
    /// value is written.
    pub fn begin(
        &mut self,
        param: ParamId,
        start: TransitionValue,
        end: TransitionValue,
        duration: f32,
        sink: &mut dyn ParameterSink,
    ) {
        self.abort(param, sink);
        let state = TransitionState::new(start, end, duration);
        param.write(state.value(), sink);
        if state.is_finished() {
            log::debug!("{:?} transition has no duration, snapped", param);
            return;
        }
        log::debug!("Begin {:?} transition over {:.1}s", param, duration);
        self.active.insert(param, state);
    }

    pub fn begin_scalar(&mut self, param: ParamId, start: f32, end: f32, duration: f32, sink: &mut dyn ParameterSink) {
        self.begin(param, TransitionValue::Scalar(start), TransitionValue::Scalar(end), duration, sink);
    }

    pub fn begin_color(&mut self, param: ParamId, start: Color, end: Color, duration: f32, sink: &mut dyn ParameterSink) {
        self.begin(param, TransitionValue::Color(start), TransitionValue::Color(end), duration, sink);
    }

    /// Advance every running transition by `dt` real seconds and write values.
    pub fn tick(&mut self, dt: f32, sink: &mut dyn ParameterSink) {
        let dt = dt.max(0.0);
        self.active.retain(|&param, state| {
            state.elapsed += dt;
            param.write(state.value(), sink);
            let running = !state.is_finished();
            if !running {
                log::debug!("{:?} transition finished", param);
            }
            running
        });
    }

    /// Snap `param` to its end value and stop it. Returns whether one was running.
    pub fn abort(&mut self, param: ParamId, sink: &mut dyn ParameterSink) -> bool {
        match self.active.remove(&param) {
            Some(state) => {
                param.write(state.end, sink);
                true
            }
            None => false,
        }
    }

    /// Change the end value of a running transition, keeping its progress.
    pub fn retarget(&mut self, param: ParamId, end: TransitionValue) -> bool {
        match self.active.get_mut(&param) {
            Some(state) => {
                state.end = end;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_running(&self, param: ParamId) -> bool {
        self.active.contains_key(&param)
    }

    pub fn state(&self, param: ParamId) -> Option<&TransitionState> {
        self.active.get(&param)
    }

    /// Number of running transitions.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
