//! Dynamic Skies - a weather and time-of-day reactive procedural skybox driver
//!
//! The host game supplies a world clock, weather/interior notifications and
//! a parameter sink bound to its skybox material; [`skybox::SkyboxController`]
//! keeps the sink in sync with the active weather preset, the part of the
//! day and the two moons.

pub mod core;
pub mod skybox;
