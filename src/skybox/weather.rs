//! Weather kinds reported by the host and the day/night preset index.

use serde::{Deserialize, Serialize};

/// Weather kinds the host weather manager can report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    None,
    Sunny,
    Cloudy,
    Overcast,
    Fog,
    Rain,
    Thunder,
    Snow,
}

impl WeatherKind {
    /// Every kind that has a preset bucket (everything except `None`).
    pub const ALL: [WeatherKind; 7] = [
        WeatherKind::Sunny,
        WeatherKind::Cloudy,
        WeatherKind::Overcast,
        WeatherKind::Fog,
        WeatherKind::Rain,
        WeatherKind::Thunder,
        WeatherKind::Snow,
    ];

    /// Logical asset name of the day preset, e.g. `SkyboxRain`.
    ///
    /// The night variant appends `Night`. `None` has no asset.
    pub fn preset_asset(self) -> Option<&'static str> {
        match self {
            WeatherKind::None => None,
            WeatherKind::Sunny => Some("SkyboxSunny"),
            WeatherKind::Cloudy => Some("SkyboxCloudy"),
            WeatherKind::Overcast => Some("SkyboxOvercast"),
            WeatherKind::Fog => Some("SkyboxFog"),
            WeatherKind::Rain => Some("SkyboxRain"),
            WeatherKind::Thunder => Some("SkyboxThunder"),
            WeatherKind::Snow => Some("SkyboxSnow"),
        }
    }
}

/// Day or night slot of a weather's preset pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayNight {
    #[default]
    Day,
    Night,
}

impl DayNight {
    /// Slot index into a preset pair (day = 0, night = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            DayNight::Day => 0,
            DayNight::Night => 1,
        }
    }

    /// Asset-name suffix for this slot.
    #[inline]
    pub fn suffix(self) -> &'static str {
        match self {
            DayNight::Day => "",
            DayNight::Night => "Night",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_asset() {
        for kind in WeatherKind::ALL {
            assert!(kind.preset_asset().is_some(), "{kind:?} has no asset name");
        }
        assert!(WeatherKind::None.preset_asset().is_none());
    }

    #[test]
    fn test_day_night_index() {
        assert_eq!(DayNight::Day.index(), 0);
        assert_eq!(DayNight::Night.index(), 1);
        assert_eq!(DayNight::Night.suffix(), "Night");
    }
}
