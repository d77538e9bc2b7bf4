//! The render-side parameter sink.
//!
//! Shader property names are a stable protocol with the skybox material, so
//! they are kept as typed constants instead of free strings. The sink itself
//! is implemented by the host; [`RecordingSink`] records writes in memory.

use std::collections::HashMap;

use crate::core::types::{Vec2, Vec3, Vec4};
use crate::skybox::color::Color;
use crate::skybox::fog::FogSetting;
use crate::skybox::preset::TextureHandle;

/// A named material property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Property(&'static str);

impl Property {
    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }

    // ------------------------------------------------------------------
    // Sky
    // ------------------------------------------------------------------
    pub const SUN_SIZE: Property = Property("_SunSize");
    pub const SUN_SIZE_CONVERGENCE: Property = Property("_SunSizeConvergence");
    pub const ATMOSPHERE_THICKNESS: Property = Property("_AtmosphereThickness");
    pub const SKY_TINT: Property = Property("_SkyTint");
    pub const GROUND_COLOR: Property = Property("_GroundColor");
    pub const EXPOSURE: Property = Property("_Exposure");
    pub const NIGHT_START_HEIGHT: Property = Property("_NightStartHeight");
    pub const NIGHT_END_HEIGHT: Property = Property("_NightEndHeight");
    pub const SKY_FADE_START: Property = Property("_SkyFadeStart");
    pub const SKY_FADE_END: Property = Property("_SkyFadeEnd");

    // ------------------------------------------------------------------
    // Fog
    // ------------------------------------------------------------------
    pub const FOG_DAY_COLOR: Property = Property("_FogDayColor");
    pub const FOG_NIGHT_COLOR: Property = Property("_FogNightColor");
    pub const FOG_DISTANCE: Property = Property("_FogDistance");
    pub const CLOUD_FADE_HEIGHT: Property = Property("_CloudFadeHeight");
    pub const STEP_SIZE: Property = Property("_StepSize");

    // ------------------------------------------------------------------
    // Clouds (shared by both layers)
    // ------------------------------------------------------------------
    pub const CLOUD_DIRECTION: Property = Property("_CloudDirection");
    pub const CLOUD_SPEED: Property = Property("_CloudSpeed");

    // ------------------------------------------------------------------
    // Stars
    // ------------------------------------------------------------------
    pub const STAR_TEX: Property = Property("_StarTex");
    pub const STAR_TWINKLE_TEX: Property = Property("_StarTwinkleTex");
    pub const TWINKLE_TEX: Property = Property("_TwinkleTex");
    pub const STAR_BENDING: Property = Property("_StarBending");
    pub const STAR_BRIGHTNESS: Property = Property("_StarBrightness");
    pub const TWINKLE_BOOST: Property = Property("_TwinkleBoost");
    pub const TWINKLE_SPEED: Property = Property("_TwinkleSpeed");
}

/// Property names of one cloud layer.
#[derive(Clone, Copy, Debug)]
pub struct CloudProperties {
    pub color: Property,
    pub night_color: Property,
    pub alpha_cutoff: Property,
    pub alpha_max: Property,
    pub color_boost: Property,
    pub normal_effect: Property,
    pub normal_speed: Property,
    pub opacity: Property,
    pub bending: Property,
    pub blend_start: Property,
    pub blend_end: Property,
    pub sun_tint: Property,
    pub diffuse: Property,
    pub normal: Property,
}

impl CloudProperties {
    pub const TOP: CloudProperties = CloudProperties {
        color: Property("_CloudTopColor"),
        night_color: Property("_CloudTopNightColor"),
        alpha_cutoff: Property("_CloudTopAlphaCutoff"),
        alpha_max: Property("_CloudTopAlphaMax"),
        color_boost: Property("_CloudTopColorBoost"),
        normal_effect: Property("_CloudTopNormalEffect"),
        normal_speed: Property("_CloudTopNormalSpeed"),
        opacity: Property("_CloudTopOpacity"),
        bending: Property("_CloudTopBending"),
        blend_start: Property("_CloudTopBlendStart"),
        blend_end: Property("_CloudTopBlendEnd"),
        sun_tint: Property("_CloudTopSunTint"),
        diffuse: Property("_CloudTopDiffuse"),
        normal: Property("_CloudTopNormal"),
    };

    pub const BOTTOM: CloudProperties = CloudProperties {
        color: Property("_CloudColor"),
        night_color: Property("_CloudNightColor"),
        alpha_cutoff: Property("_CloudAlphaCutoff"),
        alpha_max: Property("_CloudAlphaMax"),
        color_boost: Property("_CloudColorBoost"),
        normal_effect: Property("_CloudNormalEffect"),
        normal_speed: Property("_CloudNormalSpeed"),
        opacity: Property("_CloudOpacity"),
        bending: Property("_CloudBending"),
        blend_start: Property("_CloudBlendStart"),
        blend_end: Property("_CloudBlendEnd"),
        sun_tint: Property("_CloudSunTint"),
        diffuse: Property("_CloudDiffuse"),
        normal: Property("_CloudNormal"),
    };
}

/// Property names of one moon.
#[derive(Clone, Copy, Debug)]
pub struct MoonProperties {
    pub color: Property,
    pub texture: Property,
    pub min_size: Property,
    pub max_size: Property,
    pub orbit_angle: Property,
    pub orbit_offset: Property,
    pub orbit_speed: Property,
    pub semi_min_axis: Property,
    pub semi_maj_axis: Property,
    pub phase_option: Property,
    pub phase: Property,
    pub spin_option: Property,
    pub tidal_angle: Property,
    pub spin_speed: Property,
}

impl MoonProperties {
    pub const MASSER: MoonProperties = MoonProperties {
        color: Property("_MoonColor"),
        texture: Property("_MoonTex"),
        min_size: Property("_MoonMinSize"),
        max_size: Property("_MoonMaxSize"),
        orbit_angle: Property("_MoonOrbitAngle"),
        orbit_offset: Property("_MoonOrbitOffset"),
        orbit_speed: Property("_MoonOrbitSpeed"),
        semi_min_axis: Property("_MoonSemiMinAxis"),
        semi_maj_axis: Property("_MoonSemiMajAxis"),
        phase_option: Property("_MoonPhaseOption"),
        phase: Property("_MoonPhase"),
        spin_option: Property("_MoonSpinOption"),
        tidal_angle: Property("_MasserTidalAngle"),
        spin_speed: Property("_MoonSpinSpeed"),
    };

    pub const SECUNDA: MoonProperties = MoonProperties {
        color: Property("_SecundaColor"),
        texture: Property("_SecundaTex"),
        min_size: Property("_SecundaMinSize"),
        max_size: Property("_SecundaMaxSize"),
        orbit_angle: Property("_SecundaOrbitAngle"),
        orbit_offset: Property("_SecundaOrbitOffset"),
        orbit_speed: Property("_SecundaOrbitSpeed"),
        semi_min_axis: Property("_SecundaSemiMinAxis"),
        semi_maj_axis: Property("_SecundaSemiMajAxis"),
        phase_option: Property("_SecundaPhaseOption"),
        phase: Property("_SecundaPhase"),
        spin_option: Property("_SecundaSpinOption"),
        tidal_angle: Property("_SecundaTidalAngle"),
        spin_speed: Property("_SecundaSpinSpeed"),
    };
}

/// How the player camera clears its background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClearMode {
    #[default]
    Skybox,
    /// Depth only; used indoors when the skybox is unbound.
    Depth,
}

/// A point light flash above the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightningLight {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
    /// Offset from the player position.
    pub offset: Vec3,
}

/// Write-only view of the skybox material and the scene state around it.
pub trait ParameterSink {
    /// Whether the skybox material is bound and can accept writes.
    fn is_ready(&self) -> bool;

    fn set_float(&mut self, property: Property, value: f32);
    fn set_int(&mut self, property: Property, value: i32);
    fn set_color(&mut self, property: Property, value: Color);
    fn set_vector(&mut self, property: Property, value: Vec4);
    fn set_texture(&mut self, property: Property, texture: Option<TextureHandle>);
    fn set_texture_scale(&mut self, property: Property, scale: Vec2);
    fn set_texture_offset(&mut self, property: Property, offset: Vec2);

    /// Color of the scene's directional sun light.
    fn set_sun_color(&mut self, color: Color);
    /// Render fog color.
    fn set_fog_color(&mut self, color: Color);
    /// Render fog mode and distances.
    fn apply_fog(&mut self, fog: &FogSetting);
    /// Scene ambient light.
    fn set_ambient_light(&mut self, color: Color, intensity: f32);

    /// Bind (or unbind) the skybox material together with the sun.
    fn bind_skybox(&mut self, bound: bool);
    fn set_camera_clear(&mut self, mode: ClearMode);

    /// Show a lightning light, or hide it with `None`.
    fn set_lightning(&mut self, light: Option<LightningLight>);
}

/// One recorded write.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkWrite {
    Float(Property, f32),
    Int(Property, i32),
    Color(Property, Color),
    Vector(Property, Vec4),
    Texture(Property, Option<TextureHandle>),
    TextureScale(Property, Vec2),
    TextureOffset(Property, Vec2),
    SunColor(Color),
    FogColor(Color),
    Fog(FogSetting),
    Ambient(Color, f32),
    Bind(bool),
    Clear(ClearMode),
    Lightning(Option<LightningLight>),
}

impl SinkWrite {
    /// Property written, if this is a material write.
    pub fn property(&self) -> Option<Property> {
        match self {
            SinkWrite::Float(p, _)
            | SinkWrite::Int(p, _)
            | SinkWrite::Color(p, _)
            | SinkWrite::Vector(p, _)
            | SinkWrite::Texture(p, _)
            | SinkWrite::TextureScale(p, _)
            | SinkWrite::TextureOffset(p, _) => Some(*p),
            _ => None,
        }
    }
}

/// In-memory sink that records every write.
///
/// The write log grows until [`RecordingSink::clear_writes`] unless a limit
/// is set with [`RecordingSink::with_log_limit`]; latest values are kept
/// either way.
#[derive(Clone, Debug)]
pub struct RecordingSink {
    ready: bool,
    writes: Vec<SinkWrite>,
    log_limit: Option<usize>,
    floats: HashMap<Property, f32>,
    colors: HashMap<Property, Color>,
    vectors: HashMap<Property, Vec4>,
    sun_color: Option<Color>,
    fog_color: Option<Color>,
    fog: Option<FogSetting>,
    ambient: Option<(Color, f32)>,
    bound: bool,
    clear_mode: ClearMode,
    lightning: Option<LightningLight>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// A ready sink.
    pub fn new() -> Self {
        Self {
            ready: true,
            writes: Vec::new(),
            log_limit: None,
            floats: HashMap::new(),
            colors: HashMap::new(),
            vectors: HashMap::new(),
            sun_color: None,
            fog_color: None,
            fog: None,
            ambient: None,
            bound: false,
            clear_mode: ClearMode::Skybox,
            lightning: None,
        }
    }

    /// Keep only the newest `limit` writes in the log.
    pub fn with_log_limit(mut self, limit: usize) -> Self {
        self.log_limit = Some(limit);
        self
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    fn record(&mut self, write: SinkWrite) {
        self.writes.push(write);
        if let Some(limit) = self.log_limit {
            if self.writes.len() > limit {
                let excess = self.writes.len() - limit;
                self.writes.drain(..excess);
            }
        }
    }

    pub fn writes(&self) -> &[SinkWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Number of recorded writes to `property`.
    pub fn count(&self, property: Property) -> usize {
        self.writes.iter().filter(|w| w.property() == Some(property)).count()
    }

    pub fn float(&self, property: Property) -> Option<f32> {
        self.floats.get(&property).copied()
    }

    pub fn color(&self, property: Property) -> Option<Color> {
        self.colors.get(&property).copied()
    }

    pub fn vector(&self, property: Property) -> Option<Vec4> {
        self.vectors.get(&property).copied()
    }

    pub fn sun_color(&self) -> Option<Color> {
        self.sun_color
    }

    pub fn fog_color(&self) -> Option<Color> {
        self.fog_color
    }

    pub fn fog(&self) -> Option<FogSetting> {
        self.fog
    }

    /// Last ambient light color and intensity.
    pub fn ambient(&self) -> Option<(Color, f32)> {
        self.ambient
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn clear_mode(&self) -> ClearMode {
        self.clear_mode
    }

    pub fn lightning(&self) -> Option<LightningLight> {
        self.lightning
    }
}

impl ParameterSink for RecordingSink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_float(&mut self, property: Property, value: f32) {
        self.floats.insert(property, value);
        self.record(SinkWrite::Float(property, value));
    }

    fn set_int(&mut self, property: Property, value: i32) {
        self.floats.insert(property, value as f32);
        self.record(SinkWrite::Int(property, value));
    }

    fn set_color(&mut self, property: Property, value: Color) {
        self.colors.insert(property, value);
        self.record(SinkWrite::Color(property, value));
    }

    fn set_vector(&mut self, property: Property, value: Vec4) {
        self.vectors.insert(property, value);
        self.record(SinkWrite::Vector(property, value));
    }

    fn set_texture(&mut self, property: Property, texture: Option<TextureHandle>) {
        self.record(SinkWrite::Texture(property, texture));
    }

    fn set_texture_scale(&mut self, property: Property, scale: Vec2) {
        self.record(SinkWrite::TextureScale(property, scale));
    }

    fn set_texture_offset(&mut self, property: Property, offset: Vec2) {
        self.record(SinkWrite::TextureOffset(property, offset));
    }

    fn set_sun_color(&mut self, color: Color) {
        self.sun_color = Some(color);
        self.record(SinkWrite::SunColor(color));
    }

    fn set_fog_color(&mut self, color: Color) {
        self.fog_color = Some(color);
        self.record(SinkWrite::FogColor(color));
    }

    fn apply_fog(&mut self, fog: &FogSetting) {
        self.fog = Some(*fog);
        self.record(SinkWrite::Fog(*fog));
    }

    fn set_ambient_light(&mut self, color: Color, intensity: f32) {
        self.ambient = Some((color, intensity));
        self.record(SinkWrite::Ambient(color, intensity));
    }

    fn bind_skybox(&mut self, bound: bool) {
        self.bound = bound;
        self.record(SinkWrite::Bind(bound));
    }

    fn set_camera_clear(&mut self, mode: ClearMode) {
        self.clear_mode = mode;
        self.record(SinkWrite::Clear(mode));
    }

    fn set_lightning(&mut self, light: Option<LightningLight>) {
        self.lightning = light;
        self.record(SinkWrite::Lightning(light));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_are_stable() {
        assert_eq!(Property::ATMOSPHERE_THICKNESS.name(), "_AtmosphereThickness");
        assert_eq!(CloudProperties::TOP.alpha_cutoff.name(), "_CloudTopAlphaCutoff");
        assert_eq!(CloudProperties::BOTTOM.diffuse.name(), "_CloudDiffuse");
        assert_eq!(MoonProperties::MASSER.tidal_angle.name(), "_MasserTidalAngle");
        assert_eq!(MoonProperties::SECUNDA.phase.name(), "_SecundaPhase");
        assert_eq!(CloudProperties::TOP.sun_tint.name(), "_CloudTopSunTint");
        assert_eq!(CloudProperties::BOTTOM.normal_speed.name(), "_CloudNormalSpeed");
    }

    #[test]
    fn test_recording_sink_tracks_values_and_counts() {
        let mut sink = RecordingSink::new();
        sink.set_float(Property::EXPOSURE, 1.0);
        sink.set_float(Property::EXPOSURE, 1.5);
        sink.set_int(Property::SUN_SIZE_CONVERGENCE, 4);
        sink.set_sun_color(Color::WHITE);

        assert_eq!(sink.count(Property::EXPOSURE), 2);
        assert_eq!(sink.float(Property::EXPOSURE), Some(1.5));
        assert_eq!(sink.float(Property::SUN_SIZE_CONVERGENCE), Some(4.0));
        assert_eq!(sink.sun_color(), Some(Color::WHITE));
        assert_eq!(sink.writes().len(), 4);

        sink.clear_writes();
        assert!(sink.writes().is_empty());
        assert_eq!(sink.float(Property::EXPOSURE), Some(1.5));
    }

    #[test]
    fn test_scene_state() {
        let mut sink = RecordingSink::new();
        assert!(sink.is_ready());
        sink.set_ready(false);
        assert!(!sink.is_ready());

        sink.bind_skybox(true);
        sink.set_camera_clear(ClearMode::Depth);
        assert!(sink.is_bound());
        assert_eq!(sink.clear_mode(), ClearMode::Depth);
    }

    #[test]
    fn test_log_limit_keeps_newest_writes() {
        let mut sink = RecordingSink::new().with_log_limit(3);
        for i in 0..5 {
            sink.set_float(Property::EXPOSURE, i as f32);
        }
        sink.set_ambient_light(Color::WHITE, 0.5);

        assert_eq!(sink.writes().len(), 3);
        assert_eq!(sink.writes()[0], SinkWrite::Float(Property::EXPOSURE, 3.0));
        assert_eq!(sink.writes()[2], SinkWrite::Ambient(Color::WHITE, 0.5));
        assert_eq!(sink.float(Property::EXPOSURE), Some(4.0));
        assert_eq!(sink.ambient(), Some((Color::WHITE, 0.5)));
    }

    #[test]
    fn test_unlimited_log_by_default() {
        let mut sink = RecordingSink::new();
        for i in 0..100 {
            sink.set_float(Property::EXPOSURE, i as f32);
        }
        assert_eq!(sink.writes().len(), 100);
    }
}
