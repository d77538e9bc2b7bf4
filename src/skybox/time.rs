//! Read-only view of the host world clock.

use crate::skybox::moon::LunarPhase;

/// Seconds in one in-game day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// One sample of the host clock, taken once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockReading {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Day of the year, starting at 0.
    pub day_of_year: u32,
    pub year: i32,
    /// Game-time seconds per real second.
    pub time_scale: f32,
}

impl Default for ClockReading {
    fn default() -> Self {
        Self {
            hour: 12,
            minute: 0,
            second: 0,
            day_of_year: 0,
            year: 0,
            time_scale: 12.0,
        }
    }
}

impl ClockReading {
    pub fn new(hour: u32, minute: u32, second: u32, day_of_year: u32, year: i32, time_scale: f32) -> Self {
        Self {
            hour,
            minute,
            second,
            day_of_year,
            year,
            time_scale,
        }
    }

    /// Seconds elapsed since midnight.
    #[inline]
    pub fn second_of_day(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    /// Calendar phase of the first moon as reported by the host calendar.
    ///
    /// Both moons share this value when the sky flips phase coordinates on a
    /// day-part change.
    pub fn masser_phase(&self) -> LunarPhase {
        LunarPhase::from_ratio(crate::skybox::moon::MoonId::Masser.ratio(self.day_of_year, self.year))
    }
}

/// Host clock provider, read every frame.
pub trait WorldClock {
    fn now(&self) -> ClockReading;
}

impl WorldClock for ClockReading {
    fn now(&self) -> ClockReading {
        *self
    }
}
