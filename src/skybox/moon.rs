//! Lunar phase progress and orbit angles for the two moons.
//!
//! The calendar runs a 32-day lunar cycle. Each moon reads its position in
//! that cycle from `(day_of_year + year * 360 + offset) mod 32`, maps it to a
//! phase, and interpolates between the fixed angular coordinates of that
//! phase and the next one by how far through the phase the clock is.
//!
//! Everything here is pure and recomputed every tick.

use std::collections::HashMap;

use crate::core::types::{Result, Vec4};
use crate::core::Error;
use crate::skybox::time::SECONDS_PER_DAY;

/// Days in one lunar cycle.
pub const LUNAR_CYCLE_DAYS: i64 = 32;

/// Days in a calendar year.
pub const DAYS_PER_YEAR: i64 = 360;

/// Realtime orbit speed of both moons at a time scale of 1.
pub const MOON_ORBIT_SPEED: f32 = 0.00024 / 12.0;

/// Lunar phase of one moon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LunarPhase {
    #[default]
    None,
    New,
    OneWax,
    HalfWax,
    ThreeWax,
    Full,
    ThreeWane,
    HalfWane,
    OneWane,
}

impl LunarPhase {
    /// Phases in cycle order, starting at ratio 0.
    pub const CYCLE: [LunarPhase; 8] = [
        LunarPhase::Full,
        LunarPhase::ThreeWane,
        LunarPhase::HalfWane,
        LunarPhase::OneWane,
        LunarPhase::New,
        LunarPhase::OneWax,
        LunarPhase::HalfWax,
        LunarPhase::ThreeWax,
    ];

    /// Phase for a position `0..32` in the lunar cycle.
    pub fn from_ratio(ratio: u32) -> LunarPhase {
        match ratio % LUNAR_CYCLE_DAYS as u32 {
            0 => LunarPhase::Full,
            1..=5 => LunarPhase::ThreeWane,
            6..=10 => LunarPhase::HalfWane,
            11..=15 => LunarPhase::OneWane,
            16 => LunarPhase::New,
            17..=22 => LunarPhase::OneWax,
            23..=28 => LunarPhase::HalfWax,
            _ => LunarPhase::ThreeWax,
        }
    }

    /// First cycle position of this phase.
    pub fn start_ratio(self) -> Option<u32> {
        match self {
            LunarPhase::None => None,
            LunarPhase::Full => Some(0),
            LunarPhase::ThreeWane => Some(1),
            LunarPhase::HalfWane => Some(6),
            LunarPhase::OneWane => Some(11),
            LunarPhase::New => Some(16),
            LunarPhase::OneWax => Some(17),
            LunarPhase::HalfWax => Some(23),
            LunarPhase::ThreeWax => Some(29),
        }
    }

    /// Length of this phase in days.
    pub fn length_days(self) -> Option<u32> {
        match self {
            LunarPhase::None => None,
            LunarPhase::New | LunarPhase::Full => Some(1),
            LunarPhase::ThreeWax => Some(3),
            LunarPhase::OneWax | LunarPhase::HalfWax => Some(6),
            LunarPhase::ThreeWane | LunarPhase::HalfWane | LunarPhase::OneWane => Some(5),
        }
    }

    /// The phase that follows this one. `None` has no successor.
    pub fn next(self) -> LunarPhase {
        match Self::CYCLE.iter().position(|&p| p == self) {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => LunarPhase::None,
        }
    }
}

/// The two moons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoonId {
    Masser,
    Secunda,
}

impl MoonId {
    pub const ALL: [MoonId; 2] = [MoonId::Masser, MoonId::Secunda];

    /// Calendar offset in days.
    #[inline]
    pub fn calendar_offset(self) -> i64 {
        match self {
            MoonId::Masser => 3,
            MoonId::Secunda => -1,
        }
    }

    /// Orbit tilt in degrees.
    #[inline]
    pub fn tilt_degrees(self) -> f32 {
        match self {
            MoonId::Masser => 10.0,
            MoonId::Secunda => 6.0,
        }
    }

    /// Horizontal push in degrees that keeps the moons apart around new moon.
    #[inline]
    pub fn eclipse_guard_degrees(self) -> f32 {
        match self {
            MoonId::Masser => 6.0,
            MoonId::Secunda => -6.0,
        }
    }

    /// Position of this moon in the 32-day cycle.
    pub fn ratio(self, day_of_year: u32, year: i32) -> u32 {
        let days = day_of_year as i64 + year as i64 * DAYS_PER_YEAR + self.calendar_offset();
        days.rem_euclid(LUNAR_CYCLE_DAYS) as u32
    }
}

/// Angular coordinates of a phase, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseCoordinates {
    pub x: f32,
    pub y: f32,
}

impl PhaseCoordinates {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// As a shader phase vector `(x, y, 0, 0)`.
    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, 0.0, 0.0)
    }
}

/// Lookup of fixed phase coordinates.
#[derive(Clone, Debug)]
pub struct PhaseTable {
    coordinates: HashMap<LunarPhase, PhaseCoordinates>,
}

impl Default for PhaseTable {
    fn default() -> Self {
        let coordinates = HashMap::from([
            (LunarPhase::New, PhaseCoordinates::new(180.0, 0.0)),
            (LunarPhase::OneWax, PhaseCoordinates::new(135.0, 0.0)),
            (LunarPhase::HalfWax, PhaseCoordinates::new(90.0, 0.0)),
            (LunarPhase::ThreeWax, PhaseCoordinates::new(45.0, 0.0)),
            (LunarPhase::Full, PhaseCoordinates::new(0.0, 0.0)),
            (LunarPhase::ThreeWane, PhaseCoordinates::new(-45.0, -45.0)),
            (LunarPhase::HalfWane, PhaseCoordinates::new(-90.0, -45.0)),
            (LunarPhase::OneWane, PhaseCoordinates::new(-135.0, -45.0)),
        ]);
        Self { coordinates }
    }
}

impl PhaseTable {
    /// Drop the coordinates of `phase`. Moons whose interpolation needs it
    /// fail their lookup and are skipped by the controller.
    pub fn without(mut self, phase: LunarPhase) -> Self {
        self.coordinates.remove(&phase);
        self
    }

    pub fn coordinates(&self, phase: LunarPhase) -> Result<PhaseCoordinates> {
        self.coordinates
            .get(&phase)
            .copied()
            .ok_or(Error::PhaseLookup(phase))
    }
}

/// Interpolate between two angles in degrees along the shorter arc.
///
/// The result is wrapped into `(-180, 180]`.
pub fn interpolate_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    let mut angle = from + delta * t;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Result of one moon's per-tick computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoonSolution {
    pub moon: MoonId,
    pub phase: LunarPhase,
    /// Fraction of the current phase elapsed, in `[0, 1)`.
    pub progress: f32,
    /// Interpolated phase angle in degrees.
    pub angle_x: f32,
    pub angle_y: f32,
    /// Orbit angle `(x, y, z, 0)` in degrees.
    pub orbit_angle: Vec4,
}

impl MoonSolution {
    /// Shader phase vector `(x, y, 0, 0)`.
    #[inline]
    pub fn phase_vector(&self) -> Vec4 {
        Vec4::new(self.angle_x, self.angle_y, 0.0, 0.0)
    }
}

/// Compute phase progress and angles for `moon` at the given calendar time.
///
/// `current_phase` is the phase the moon is considered to be in; the day
/// offset into it is measured from the phase's first cycle position.
pub fn compute_moon_phase(
    table: &PhaseTable,
    day_of_year: u32,
    year: i32,
    second_of_day: u32,
    current_phase: LunarPhase,
    moon: MoonId,
) -> Result<MoonSolution> {
    let (Some(length), Some(start)) = (current_phase.length_days(), current_phase.start_ratio()) else {
        return Err(Error::PhaseLookup(current_phase));
    };

    let ratio = moon.ratio(day_of_year, year);
    let day_offset = (ratio as i64 - start as i64).rem_euclid(LUNAR_CYCLE_DAYS) as f32;
    let second = second_of_day.min(SECONDS_PER_DAY - 1) as f32;
    let day_seconds = SECONDS_PER_DAY as f32;

    let progress = ((day_offset * day_seconds + second) / (length as f32 * day_seconds))
        .clamp(0.0, 1.0 - f32::EPSILON);

    let from = table.coordinates(current_phase)?;
    let to = table.coordinates(current_phase.next())?;

    let angle_x = interpolate_angle(from.x, to.x, progress);
    let angle_y = from.y + (to.y - from.y) * progress;

    let guard = match current_phase {
        LunarPhase::OneWane | LunarPhase::New => moon.eclipse_guard_degrees(),
        _ => 0.0,
    };
    let orbit_angle = Vec4::new(
        angle_x + guard,
        angle_y,
        moon.tilt_degrees() * angle_x.to_radians().sin(),
        0.0,
    );

    Ok(MoonSolution {
        moon,
        phase: current_phase,
        progress,
        angle_x,
        angle_y,
        orbit_angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(day: u32, year: i32, second: u32, moon: MoonId) -> MoonSolution {
        let phase = LunarPhase::from_ratio(moon.ratio(day, year));
        compute_moon_phase(&PhaseTable::default(), day, year, second, phase, moon).unwrap()
    }

    #[test]
    fn test_ratio_offsets() {
        assert_eq!(MoonId::Masser.ratio(10, 0), 13);
        assert_eq!(MoonId::Secunda.ratio(10, 0), 9);
        assert_eq!(MoonId::Secunda.ratio(0, 0), 31);
        // 360 % 32 == 8
        assert_eq!(MoonId::Masser.ratio(0, 1), 11);
        assert_eq!(MoonId::Masser.ratio(0, -1), (3 - 360i64).rem_euclid(32) as u32);
    }

    #[test]
    fn test_phase_buckets() {
        let lengths: u32 = LunarPhase::CYCLE.iter().filter_map(|p| p.length_days()).sum();
        assert_eq!(lengths, 32);
        for phase in LunarPhase::CYCLE {
            let start = phase.start_ratio().unwrap();
            let len = phase.length_days().unwrap();
            for r in start..start + len {
                assert_eq!(LunarPhase::from_ratio(r), phase, "ratio {r}");
            }
        }
        assert_eq!(LunarPhase::None.length_days(), None);
    }

    #[test]
    fn test_cycle_order() {
        assert_eq!(LunarPhase::Full.next(), LunarPhase::ThreeWane);
        assert_eq!(LunarPhase::OneWane.next(), LunarPhase::New);
        assert_eq!(LunarPhase::ThreeWax.next(), LunarPhase::Full);
        assert_eq!(LunarPhase::None.next(), LunarPhase::None);
    }

    #[test]
    fn test_masser_day_ten_is_one_wane() {
        let s = solve(10, 0, 0, MoonId::Masser);
        assert_eq!(s.phase, LunarPhase::OneWane);
        // Ratio 13 is two days into a five-day phase.
        assert!((s.progress - 0.4).abs() < 1e-6, "progress = {}", s.progress);
        assert!((0.0..1.0).contains(&s.progress));
    }

    #[test]
    fn test_progress_monotonic_within_phase() {
        // Masser ratio 17..=22 is OneWax (days 14..=19 of year 0).
        let mut last = -1.0;
        for day in 14..=19 {
            for second in (0..SECONDS_PER_DAY).step_by(3600 * 6) {
                let s = solve(day, 0, second, MoonId::Masser);
                assert_eq!(s.phase, LunarPhase::OneWax);
                assert!(s.progress >= last, "day {day} second {second}: {} < {last}", s.progress);
                last = s.progress;
            }
        }
        // Next day starts HalfWax from zero.
        let s = solve(20, 0, 0, MoonId::Masser);
        assert_eq!(s.phase, LunarPhase::HalfWax);
        assert!(s.progress < 1e-6);
    }

    #[test]
    fn test_single_day_phase_progress() {
        // Masser ratio 16 -> New, day 13
        let s = solve(13, 0, SECONDS_PER_DAY / 2, MoonId::Masser);
        assert_eq!(s.phase, LunarPhase::New);
        assert!((s.progress - 0.5).abs() < 1e-6);
        assert!((s.angle_x - 157.5).abs() < 1e-3, "angle = {}", s.angle_x);
    }

    #[test]
    fn test_interpolate_angle_short_arc() {
        assert!((interpolate_angle(170.0, -170.0, 0.5).abs() - 180.0).abs() < 1e-4);
        assert!((interpolate_angle(-170.0, 170.0, 0.5).abs() - 180.0).abs() < 1e-4);
        assert!((interpolate_angle(0.0, 90.0, 0.5) - 45.0).abs() < 1e-4);
        assert!((interpolate_angle(10.0, 350.0, 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_one_wane_to_new_wraps() {
        let table = PhaseTable::default();
        // Masser ratio 11 (day 8) is the first day of OneWane; late in the phase
        // the angle heads from -135 toward 180 through -180.
        let s = compute_moon_phase(&table, 12, 0, SECONDS_PER_DAY - 1, LunarPhase::OneWane, MoonId::Masser).unwrap();
        assert!(s.angle_x < -170.0 || s.angle_x > 170.0, "angle = {}", s.angle_x);
        assert!((s.orbit_angle.x - (s.angle_x + 6.0)).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_synthesis() {
        let s = solve(0, 0, 0, MoonId::Secunda); // ratio 31, ThreeWax
        assert_eq!(s.phase, LunarPhase::ThreeWax);
        assert_eq!(s.orbit_angle.x, s.angle_x);
        assert_eq!(s.orbit_angle.y, s.angle_y);
        let z = 6.0 * s.angle_x.to_radians().sin();
        assert!((s.orbit_angle.z - z).abs() < 1e-4);
        assert_eq!(s.orbit_angle.w, 0.0);
    }

    #[test]
    fn test_none_phase_is_lookup_error() {
        let err = compute_moon_phase(&PhaseTable::default(), 0, 0, 0, LunarPhase::None, MoonId::Masser).unwrap_err();
        assert!(matches!(err, Error::PhaseLookup(LunarPhase::None)));
    }

    #[test]
    fn test_missing_next_phase_fails_lookup() {
        let table = PhaseTable::default().without(LunarPhase::New);
        assert!(matches!(table.coordinates(LunarPhase::New), Err(Error::PhaseLookup(LunarPhase::New))));

        // Masser on day 10 is in OneWane and interpolates toward New.
        let err = compute_moon_phase(&table, 10, 0, 0, LunarPhase::OneWane, MoonId::Masser).unwrap_err();
        assert!(matches!(err, Error::PhaseLookup(LunarPhase::New)));

        // Secunda is in HalfWane and never touches New.
        assert!(compute_moon_phase(&table, 10, 0, 0, LunarPhase::HalfWane, MoonId::Secunda).is_ok());
    }
}
