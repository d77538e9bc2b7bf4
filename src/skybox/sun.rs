//! Sun light color by hour.

use crate::skybox::color::Color;
use crate::skybox::weather::DayNight;

/// Low sun, night and dusk.
pub const SUN_LOW: Color = Color::rgb(0.8705882, 0.3803922, 0.1607843);
/// Dawn.
pub const SUN_DAWN: Color = Color::rgb(1.0, 0.7607843, 0.3215686);
/// Full daylight.
pub const SUN_DAY: Color = Color::rgb(0.9647059, 0.9803922, 0.8039216);

/// Sun color for an hour of day.
pub fn sun_color(hour: u32) -> Color {
    match hour % 24 {
        5..=7 => SUN_DAWN,
        8..=15 => SUN_DAY,
        _ => SUN_LOW,
    }
}

/// Start and end colors of the dawn lerp.
pub fn dawn_colors() -> (Color, Color) {
    (sun_color(4), sun_color(12))
}

/// Start and end colors of the dusk lerp.
pub fn dusk_colors() -> (Color, Color) {
    (sun_color(18), sun_color(2))
}

/// Color the sun holds once the dawn or dusk lerp toward `side` is done.
pub fn settled_color(side: DayNight) -> Color {
    match side {
        DayNight::Day => dawn_colors().1,
        DayNight::Night => dusk_colors().1,
    }
}
