//! Per-weather skybox presets and their two-stage JSON format.
//!
//! A preset file is a flat JSON record. Cloud layers, stars and both moons
//! are stored as JSON strings inside that record (`TopCloudsFlat`,
//! `MasserFlat`, ...) and are parsed in a second pass. Colors are HTML hex
//! strings; an unparsable color becomes `None` and is skipped when applied.
//!
//! Textures are referenced by file name and resolved lazily through a
//! [`TextureResolver`]; the resolved handle is cached inside the preset.

use std::cell::OnceCell;

use serde::{Deserialize, Deserializer};

use crate::core::types::{Result, Vec2, Vec4};
use crate::core::Error;
use crate::skybox::color::Color;

// ---------------------------------------------------------------------------
// Textures
// ---------------------------------------------------------------------------

/// Opaque handle to a texture owned by the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Resolves texture file names referenced by presets.
pub trait TextureResolver {
    fn resolve(&self, file: &str) -> Option<TextureHandle>;
}

/// Resolver for hosts without texture support; resolves nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextures;

impl TextureResolver for NoTextures {
    fn resolve(&self, _file: &str) -> Option<TextureHandle> {
        None
    }
}

/// A texture file reference with its lazily resolved handle.
#[derive(Clone, Debug, Default)]
pub struct TextureSlot {
    pub file: String,
    handle: OnceCell<Option<TextureHandle>>,
}

impl TextureSlot {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            handle: OnceCell::new(),
        }
    }

    /// Resolve the handle on first use; later calls return the cached result.
    pub fn handle(&self, resolver: &dyn TextureResolver) -> Option<TextureHandle> {
        if self.file.is_empty() {
            return None;
        }
        *self.handle.get_or_init(|| {
            let handle = resolver.resolve(&self.file);
            if handle.is_none() {
                log::warn!("Texture '{}' could not be resolved", self.file);
            }
            handle
        })
    }

    /// Whether the handle has already been resolved.
    pub fn is_resolved(&self) -> bool {
        self.handle.get().is_some()
    }
}

// The cache is not part of a slot's identity.
impl PartialEq for TextureSlot {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl<'de> Deserialize<'de> for TextureSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(TextureSlot::new(String::deserialize(deserializer)?))
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Color>, D::Error> {
    let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    let color = Color::from_hex(&text);
    if color.is_none() && !text.is_empty() {
        log::warn!("Ignoring invalid preset color '{}'", text);
    }
    Ok(color)
}

fn unity_vec4<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec4, D::Error> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Raw {
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    }
    let raw = Raw::deserialize(deserializer)?;
    Ok(Vec4::new(raw.x, raw.y, raw.z, raw.w))
}

// ---------------------------------------------------------------------------
// Cloud layer
// ---------------------------------------------------------------------------

/// One of the two cloud layers (top and bottom).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CloudLayerSetting {
    #[serde(rename = "cloudsTextureFile")]
    pub texture: TextureSlot,
    #[serde(rename = "cloudsNormalTextureFile")]
    pub normal_texture: TextureSlot,
    pub tiling_x: f32,
    pub tiling_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    #[serde(deserialize_with = "hex_color")]
    pub day_color: Option<Color>,
    #[serde(deserialize_with = "hex_color")]
    pub night_color: Option<Color>,
    #[serde(rename = "AlphaTreshold")]
    pub alpha_threshold: f32,
    pub alpha_max: f32,
    pub color_boost: f32,
    pub normal_effect: f32,
    pub normal_speed: f32,
    pub opacity: f32,
    pub bending: f32,
    /// Scroll speed multiplier on top of the realtime cloud speed.
    pub scroll_speed: f32,
    /// Scroll direction offset in degrees, added to the wind direction.
    pub scroll_direction: f32,
    pub blend_start: f32,
    pub blend_end: f32,
    pub sun_tint_scale: f32,
}

impl Default for CloudLayerSetting {
    fn default() -> Self {
        Self {
            texture: TextureSlot::default(),
            normal_texture: TextureSlot::default(),
            tiling_x: 1.0,
            tiling_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            day_color: None,
            night_color: None,
            alpha_threshold: 0.0,
            alpha_max: 1.0,
            color_boost: 0.0,
            normal_effect: 0.0,
            normal_speed: 0.0,
            opacity: 1.0,
            bending: 0.0,
            scroll_speed: 1.0,
            scroll_direction: 0.0,
            blend_start: 0.0,
            blend_end: 1.0,
            sun_tint_scale: 1.0,
        }
    }
}

impl CloudLayerSetting {
    #[inline]
    pub fn tiling(&self) -> Vec2 {
        Vec2::new(self.tiling_x, self.tiling_y)
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

// ---------------------------------------------------------------------------
// Celestial body
// ---------------------------------------------------------------------------

/// Render settings for one moon.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CelestialBodySetting {
    #[serde(deserialize_with = "hex_color")]
    pub moon_color: Option<Color>,
    #[serde(rename = "MoonTextureFile")]
    pub texture: TextureSlot,
    pub tiling_x: f32,
    pub tiling_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub min_size: f32,
    pub max_size: f32,
    #[serde(deserialize_with = "unity_vec4")]
    pub orbit_angle: Vec4,
    pub orbit_offset: f32,
    pub orbit_speed: f32,
    pub semi_min_axis: f32,
    pub semi_maj_axis: f32,
    /// Non-zero lets the shader derive the phase on its own.
    pub auto_phase: f32,
    #[serde(deserialize_with = "unity_vec4")]
    pub phase: Vec4,
    pub spin: f32,
    #[serde(deserialize_with = "unity_vec4")]
    pub tidal_angle: Vec4,
    #[serde(deserialize_with = "unity_vec4")]
    pub spin_speed: Vec4,
}

impl Default for CelestialBodySetting {
    fn default() -> Self {
        Self {
            moon_color: None,
            texture: TextureSlot::default(),
            tiling_x: 1.0,
            tiling_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            min_size: 0.0,
            max_size: 0.0,
            orbit_angle: Vec4::ZERO,
            orbit_offset: 0.0,
            orbit_speed: 0.0,
            semi_min_axis: 1.0,
            semi_maj_axis: 1.0,
            auto_phase: 0.0,
            phase: Vec4::ZERO,
            spin: 0.0,
            tidal_angle: Vec4::ZERO,
            spin_speed: Vec4::ZERO,
        }
    }
}

impl CelestialBodySetting {
    #[inline]
    pub fn tiling(&self) -> Vec2 {
        Vec2::new(self.tiling_x, self.tiling_y)
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

// ---------------------------------------------------------------------------
// Star field
// ---------------------------------------------------------------------------

/// Star and twinkle layer settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StarFieldSetting {
    #[serde(rename = "StarsTextureFile")]
    pub texture: TextureSlot,
    #[serde(rename = "StarsTwinkleTextureFile")]
    pub twinkle_mask: TextureSlot,
    pub stars_tiling_x: f32,
    pub stars_tiling_y: f32,
    pub stars_offset_x: f32,
    pub stars_offset_y: f32,
    pub star_bending: f32,
    pub star_brightness: f32,
    #[serde(rename = "TwinkleTextureFile")]
    pub twinkle_texture: TextureSlot,
    pub twinkle_tiling_x: f32,
    pub twinkle_tiling_y: f32,
    pub twinkle_offset_x: f32,
    pub twinkle_offset_y: f32,
    pub twinkle_boost: f32,
    pub twinkle_speed: f32,
}

impl Default for StarFieldSetting {
    fn default() -> Self {
        Self {
            texture: TextureSlot::default(),
            twinkle_mask: TextureSlot::default(),
            stars_tiling_x: 1.0,
            stars_tiling_y: 1.0,
            stars_offset_x: 0.0,
            stars_offset_y: 0.0,
            star_bending: 0.0,
            star_brightness: 1.0,
            twinkle_texture: TextureSlot::default(),
            twinkle_tiling_x: 1.0,
            twinkle_tiling_y: 1.0,
            twinkle_offset_x: 0.0,
            twinkle_offset_y: 0.0,
            twinkle_boost: 0.0,
            twinkle_speed: 0.0,
        }
    }
}

impl StarFieldSetting {
    #[inline]
    pub fn tiling(&self) -> Vec2 {
        Vec2::new(self.stars_tiling_x, self.stars_tiling_y)
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.stars_offset_x, self.stars_offset_y)
    }

    #[inline]
    pub fn twinkle_tiling(&self) -> Vec2 {
        Vec2::new(self.twinkle_tiling_x, self.twinkle_tiling_y)
    }
}

// ---------------------------------------------------------------------------
// Skybox preset
// ---------------------------------------------------------------------------

/// Outer record as stored on disk; nested settings are still strings here.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "PascalCase")]
struct PresetRecord {
    sun_size: f32,
    sun_size_convergence: i32,
    atmosphere_lerp_duration: f32,
    atmosphere_normal_thickness: f32,
    atmosphere_dawn_dusk_thickness: f32,
    #[serde(deserialize_with = "hex_color")]
    sky_tint: Option<Color>,
    #[serde(deserialize_with = "hex_color")]
    ground_color: Option<Color>,
    #[serde(deserialize_with = "hex_color")]
    ambient_color: Option<Color>,
    ambient_intensity: f32,
    exposure: f32,
    night_start_height: f32,
    night_end_height: f32,
    sky_fade_start: f32,
    // Field name as written by the preset exporter.
    #[serde(rename = "SkyEndStart")]
    sky_fade_end: f32,
    #[serde(rename = "stepSize")]
    step_size: f32,
    #[serde(deserialize_with = "hex_color")]
    fog_day_color: Option<Color>,
    #[serde(deserialize_with = "hex_color")]
    fog_night_color: Option<Color>,
    fog_distance: f32,
    cloud_fade_height: f32,
    top_clouds_flat: String,
    bottom_clouds_flat: String,
    stars_flat: String,
    masser_flat: String,
    secunda_flat: String,
}

/// Immutable visual parameters for one weather kind and day/night slot.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SkyboxPreset {
    pub sun_size: f32,
    pub sun_size_convergence: i32,
    /// Atmosphere dawn/dusk lerp duration in game hours.
    pub atmosphere_lerp_duration: f32,
    pub atmosphere_normal_thickness: f32,
    pub atmosphere_dawn_dusk_thickness: f32,
    pub sky_tint: Option<Color>,
    pub ground_color: Option<Color>,
    pub ambient_color: Option<Color>,
    pub ambient_intensity: f32,
    pub exposure: f32,
    pub night_start_height: f32,
    pub night_end_height: f32,
    pub sky_fade_start: f32,
    pub sky_fade_end: f32,
    pub step_size: f32,
    pub fog_day_color: Option<Color>,
    pub fog_night_color: Option<Color>,
    pub fog_distance: f32,
    pub cloud_fade_height: f32,
    pub top_clouds: CloudLayerSetting,
    pub bottom_clouds: CloudLayerSetting,
    pub stars: StarFieldSetting,
    pub masser: CelestialBodySetting,
    pub secunda: CelestialBodySetting,
}

impl SkyboxPreset {
    /// Parse a preset file. `name` is only used for error reporting.
    pub fn parse(name: &str, data: &str) -> Result<Self> {
        let record: PresetRecord = serde_json::from_str(data).map_err(|source| Error::Parse {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            sun_size: record.sun_size,
            sun_size_convergence: record.sun_size_convergence,
            atmosphere_lerp_duration: record.atmosphere_lerp_duration,
            atmosphere_normal_thickness: record.atmosphere_normal_thickness,
            atmosphere_dawn_dusk_thickness: record.atmosphere_dawn_dusk_thickness,
            sky_tint: record.sky_tint,
            ground_color: record.ground_color,
            ambient_color: record.ambient_color,
            ambient_intensity: record.ambient_intensity,
            exposure: record.exposure,
            night_start_height: record.night_start_height,
            night_end_height: record.night_end_height,
            sky_fade_start: record.sky_fade_start,
            sky_fade_end: record.sky_fade_end,
            step_size: record.step_size,
            fog_day_color: record.fog_day_color,
            fog_night_color: record.fog_night_color,
            fog_distance: record.fog_distance,
            cloud_fade_height: record.cloud_fade_height,
            top_clouds: parse_nested("TopCloudsFlat", &record.top_clouds_flat)?,
            bottom_clouds: parse_nested("BottomCloudsFlat", &record.bottom_clouds_flat)?,
            stars: parse_nested("StarsFlat", &record.stars_flat)?,
            masser: parse_nested("MasserFlat", &record.masser_flat)?,
            secunda: parse_nested("SecundaFlat", &record.secunda_flat)?,
        })
    }
}

/// Second parsing stage for settings stored as JSON strings.
fn parse_nested<T>(field: &'static str, flat: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if flat.trim().is_empty() {
        log::debug!("Preset field {} is empty, using defaults", field);
        return Ok(T::default());
    }
    serde_json::from_str(flat).map_err(|source| Error::NestedParse { field, source })
}
