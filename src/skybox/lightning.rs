//! Lightning flashes during thunder storms.
//!
//! Each ambient effect from the host may start a flash: a short burst of a
//! randomized point light above the player, sometimes doubled. Flash timing
//! runs on real time so it looks the same at every time scale; only the
//! chance of a flash shrinks as the game runs faster.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::Vec3;
use crate::skybox::color::Color;
use crate::skybox::config::LightningConfig;
use crate::skybox::sink::{LightningLight, ParameterSink};

#[derive(Clone, Copy, Debug, PartialEq)]
enum FlashStep {
    Lit(f32),
    Dark(f32),
}

impl FlashStep {
    fn duration(self) -> f32 {
        match self {
            FlashStep::Lit(d) | FlashStep::Dark(d) => d,
        }
    }
}

/// Probability scaled down by the time scale, clamped to `[0, 1]`.
fn scaled_chance(chance: f32, time_scale: f32) -> f64 {
    let scale = if time_scale > 0.0 { time_scale } else { 1.0 };
    let p = chance / scale;
    if p.is_finite() { p.clamp(0.0, 1.0) as f64 } else { 0.0 }
}

fn roll(rng: &mut StdRng, [min, max]: [f32; 2]) -> f32 {
    if min < max { rng.gen_range(min..=max) } else { min }
}

/// Flash sequencer.
pub struct LightningFlash {
    config: LightningConfig,
    rng: StdRng,
    steps: VecDeque<FlashStep>,
    /// Real seconds left in the front step.
    remaining: f32,
}

impl LightningFlash {
    pub fn new(config: LightningConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            steps: VecDeque::new(),
            remaining: 0.0,
        }
    }

    /// Whether a flash sequence is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Whether the light is currently on.
    #[inline]
    pub fn is_lit(&self) -> bool {
        matches!(self.steps.front(), Some(FlashStep::Lit(_)))
    }

    /// Roll for a flash. Returns whether one started.
    ///
    /// A new flash replaces one still in progress.
    pub fn trigger(&mut self, time_scale: f32, sink: &mut dyn ParameterSink) -> bool {
        if !self.rng.gen_bool(scaled_chance(self.config.flash_chance, time_scale)) {
            log::trace!("Lightning roll missed");
            return false;
        }

        let duration = self.config.flash_duration;
        let double = self.rng.gen_bool(scaled_chance(self.config.double_flash_chance, time_scale));

        if self.is_lit() {
            sink.set_lightning(None);
        }
        self.steps.clear();
        if double {
            self.steps.extend([
                FlashStep::Lit(duration / 2.0),
                FlashStep::Dark(self.config.double_flash_gap),
                FlashStep::Lit(duration / 2.0),
            ]);
        } else {
            self.steps.push_back(FlashStep::Lit(duration));
        }
        log::debug!("Lightning flash (double: {})", double);

        self.remaining = 0.0;
        self.enter_front(sink);
        true
    }

    /// Advance by `dt` real seconds.
    pub fn tick(&mut self, dt: f32, sink: &mut dyn ParameterSink) {
        if self.steps.is_empty() {
            return;
        }
        self.remaining -= dt.max(0.0);
        while self.remaining <= 0.0 {
            if let Some(FlashStep::Lit(_)) = self.steps.pop_front() {
                sink.set_lightning(None);
            }
            if self.steps.is_empty() {
                self.remaining = 0.0;
                break;
            }
            self.enter_front(sink);
        }
    }

    /// Turn the light off and drop any pending flash.
    pub fn cancel(&mut self, sink: &mut dyn ParameterSink) {
        if self.is_lit() {
            sink.set_lightning(None);
        }
        self.steps.clear();
        self.remaining = 0.0;
    }

    fn enter_front(&mut self, sink: &mut dyn ParameterSink) {
        let Some(&step) = self.steps.front() else {
            return;
        };
        self.remaining += step.duration();
        if let FlashStep::Lit(_) = step {
            let light = self.roll_light();
            sink.set_lightning(Some(light));
        }
    }

    fn roll_light(&mut self) -> LightningLight {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let color = Color::rgb(roll(rng, cfg.color_range), roll(rng, cfg.color_range), roll(rng, cfg.color_range));
        let intensity = roll(rng, cfg.intensity_range);
        let range = roll(rng, cfg.range_range);
        let offset = Vec3::new(
            roll(rng, cfg.horizontal_offset),
            roll(rng, cfg.height_offset),
            roll(rng, cfg.horizontal_offset),
        );
        LightningLight {
            color,
            intensity,
            range,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skybox::sink::{RecordingSink, SinkWrite};

    fn config(flash: f32, double: f32) -> LightningConfig {
        LightningConfig {
            flash_chance: flash,
            double_flash_chance: double,
            ..LightningConfig::default()
        }
    }

    fn lit_count(sink: &RecordingSink) -> usize {
        sink.writes()
            .iter()
            .filter(|w| matches!(w, SinkWrite::Lightning(Some(_))))
            .count()
    }

    #[test]
    fn test_single_flash() {
        let mut sink = RecordingSink::new();
        let mut flash = LightningFlash::new(config(1.0, 0.0), Some(1));
        assert!(flash.trigger(1.0, &mut sink));
        assert!(flash.is_lit());

        let light = sink.lightning().unwrap();
        assert!((0.8..=1.0).contains(&light.color.r));
        assert!((0.5..=1.5).contains(&light.intensity));
        assert!((500.0..=1000.0).contains(&light.range));
        assert!((20.0..=40.0).contains(&light.offset.y));
        assert!((-10.0..=10.0).contains(&light.offset.x));

        flash.tick(0.05, &mut sink);
        assert!(flash.is_lit());
        flash.tick(0.06, &mut sink);
        assert!(!flash.is_active());
        assert!(sink.lightning().is_none());
    }

    #[test]
    fn test_double_flash_sequence() {
        let mut sink = RecordingSink::new();
        let mut flash = LightningFlash::new(config(1.0, 1.0), Some(2));
        assert!(flash.trigger(1.0, &mut sink));

        flash.tick(0.06, &mut sink); // first half done, gap begins
        assert!(flash.is_active());
        assert!(!flash.is_lit());
        flash.tick(0.1, &mut sink); // second flash lit
        assert!(flash.is_lit());
        flash.tick(0.1, &mut sink);
        assert!(!flash.is_active());
        assert_eq!(lit_count(&sink), 2);
    }

    #[test]
    fn test_large_step_runs_whole_sequence() {
        let mut sink = RecordingSink::new();
        let mut flash = LightningFlash::new(config(1.0, 1.0), Some(3));
        flash.trigger(1.0, &mut sink);
        flash.tick(5.0, &mut sink);
        assert!(!flash.is_active());
        assert_eq!(lit_count(&sink), 2);
        assert!(sink.lightning().is_none());
    }

    #[test]
    fn test_chance_is_clamped_at_slow_time() {
        let mut sink = RecordingSink::new();
        // 0.5 / 0.1 would be 5.0; clamped to certainty.
        let mut flash = LightningFlash::new(config(0.5, 0.0), Some(4));
        for _ in 0..20 {
            assert!(flash.trigger(0.1, &mut sink));
        }
    }

    #[test]
    fn test_no_flash_at_zero_chance() {
        let mut sink = RecordingSink::new();
        let mut flash = LightningFlash::new(config(0.0, 0.0), Some(5));
        for _ in 0..20 {
            assert!(!flash.trigger(1.0, &mut sink));
        }
        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_scaled_chance() {
        assert_eq!(scaled_chance(0.5, 1.0), 0.5);
        assert!((scaled_chance(0.5, 12.0) - 0.5 / 12.0).abs() < 1e-6);
        assert_eq!(scaled_chance(0.5, 0.1), 1.0);
        assert_eq!(scaled_chance(0.5, 0.0), 0.5);
        assert_eq!(scaled_chance(f32::NAN, 1.0), 0.0);
    }
}
