//! Day-part classification and transition detection.

use crate::skybox::weather::DayNight;

/// Named segment of the 24-hour clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DayPart {
    /// Nothing classified yet.
    #[default]
    None,
    Dawn,
    /// Single hour marking the end of the dawn lerp.
    DawnEnd,
    Morning,
    Midday,
    Dusk,
    /// Single hour marking the end of the dusk lerp.
    DuskEnd,
    Evening,
    Night,
}

impl DayPart {
    /// Classify an hour of day. Hours past 23 wrap at midnight.
    pub fn classify(hour: u32) -> DayPart {
        match hour % 24 {
            0..=3 => DayPart::Night,
            4..=5 => DayPart::Dawn,
            6 => DayPart::DawnEnd,
            7..=11 => DayPart::Morning,
            12..=15 => DayPart::Midday,
            16..=17 => DayPart::Dusk,
            18 => DayPart::DuskEnd,
            _ => DayPart::Evening,
        }
    }

    /// Preset slot used while this part is current.
    #[inline]
    pub fn day_night(self) -> DayNight {
        match self {
            DayPart::Evening | DayPart::Night => DayNight::Night,
            _ => DayNight::Day,
        }
    }

    /// Side of the dawn and dusk color lerps this part settles on.
    ///
    /// Unlike [`day_night`](Self::day_night), dusk already counts as night
    /// here: once the dusk lerp is done the sun and fog stay on their night
    /// colors until dawn.
    #[inline]
    pub fn settled_side(self) -> DayNight {
        match self {
            DayPart::Dusk | DayPart::DuskEnd | DayPart::Evening | DayPart::Night => DayNight::Night,
            _ => DayNight::Day,
        }
    }

    /// Whether the moons flip to the calendar phase when entering this part.
    #[inline]
    pub fn refreshes_lunar_phase(self) -> bool {
        matches!(self, DayPart::Night | DayPart::Morning)
    }
}

/// Remembers the current day part and reports changes.
#[derive(Clone, Debug, Default)]
pub struct DayPartTracker {
    current: DayPart,
}

impl DayPartTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> DayPart {
        self.current
    }

    /// Classify `hour` and return `(previous, new)` when the part changed.
    ///
    /// The new part is stored before returning, so side effects run by the
    /// caller already observe it.
    pub fn update(&mut self, hour: u32) -> Option<(DayPart, DayPart)> {
        let next = DayPart::classify(hour);
        if next == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next);
        log::info!("Day part changed: {:?} -> {:?}", previous, next);
        Some((previous, next))
    }

    /// Forget the current part so the next update fires again.
    pub fn reset(&mut self) {
        self.current = DayPart::None;
    }
}
