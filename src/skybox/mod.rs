//! Weather and time-of-day reactive skybox.
//!
//! The main entry point is [`SkyboxController`]. The host calls
//! [`tick`](SkyboxController::tick) once per frame with the unscaled frame
//! delta and its world clock; every tick runs, in order:
//!
//! 1. time-scale speed update,
//! 2. day-part classification (throttled),
//! 3. moon phase and orbit computation,
//! 4. reconciliation of staged weather/day-part/load changes,
//! 5. transition and lightning advancement.
//!
//! Host events are pushed through a channel registered with the host's
//! [`EventSource`] and drained at step 4, so several events landing in the
//! same frame produce a single preset application.

pub mod color;
pub mod config;
pub mod day_part;
pub mod events;
pub mod fog;
pub mod lightning;
pub mod moon;
pub mod preset;
pub mod sink;
pub mod state;
pub mod store;
pub mod sun;
pub mod time;
pub mod transition;
pub mod weather;

// Re-exports
pub use color::{Color, Lerp};
pub use config::{LightningConfig, MaterialDefaults, ScrollSpeeds, SkyboxConfig};
pub use day_part::{DayPart, DayPartTracker};
pub use events::{EventBus, EventSource, HostEvent, SubscriptionId};
pub use fog::{FogMode, FogSetting, FogTable};
pub use lightning::LightningFlash;
pub use moon::{LunarPhase, MoonId, MoonSolution, PhaseTable, compute_moon_phase, interpolate_angle};
pub use preset::{
    CelestialBodySetting, CloudLayerSetting, NoTextures, SkyboxPreset, StarFieldSetting, TextureHandle,
    TextureResolver,
};
pub use sink::{ClearMode, ParameterSink, Property, RecordingSink};
pub use state::{PendingApplication, ReconcilePhase, SkyboxState, StagedChange};
pub use store::{DirPresetSource, MemoryPresetSource, PresetSource, PresetStore};
pub use time::{ClockReading, WorldClock};
pub use transition::{ParamId, TransitionEngine, TransitionValue, scaled_duration};
pub use weather::{DayNight, WeatherKind};

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::{Result, Vec2};
use crate::core::Error;
use self::preset::TextureSlot;
use self::sink::{CloudProperties, MoonProperties};

// ---------------------------------------------------------------------------
// SkyboxController
// ---------------------------------------------------------------------------

/// Owns the skybox state and drives the parameter sink.
///
/// [`tick`](Self::tick) and [`handle_event`](Self::handle_event) never fail.
/// Problems are logged and the last applied visuals stay in place.
pub struct SkyboxController<S: ParameterSink> {
    config: SkyboxConfig,
    store: PresetStore,
    fog: FogTable,
    phases: PhaseTable,
    sink: S,
    textures: Box<dyn TextureResolver>,
    engine: TransitionEngine,
    tracker: DayPartTracker,
    lightning: LightningFlash,
    rng: StdRng,
    events_tx: Sender<HostEvent>,
    events_rx: Receiver<HostEvent>,
    staged: Option<StagedChange>,
    current_preset: Option<Rc<SkyboxPreset>>,
    clock: ClockReading,
    poll_timer: f32,
    started: bool,
    /// Day part whose transitions wait for the sink.
    pending_part: Option<DayPart>,
    pending_lunar_flip: bool,
    pending_inside: bool,
    state: SkyboxState,
}

impl<S: ParameterSink> SkyboxController<S> {
    /// Create a controller. Fog settings are read from the store's source.
    pub fn new(config: SkyboxConfig, store: PresetStore, sink: S) -> Self {
        let fog = FogTable::load(store.source());
        let rng = match config.wind_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let lightning = LightningFlash::new(config.lightning.clone(), config.wind_seed.map(|s| s.wrapping_add(1)));
        let (events_tx, events_rx) = mpsc::channel();

        Self {
            config,
            store,
            fog,
            phases: PhaseTable::default(),
            sink,
            textures: Box::new(NoTextures),
            engine: TransitionEngine::new(),
            tracker: DayPartTracker::new(),
            lightning,
            rng,
            events_tx,
            events_rx,
            staged: None,
            current_preset: None,
            clock: ClockReading::default(),
            poll_timer: 0.0,
            started: false,
            pending_part: None,
            pending_lunar_flip: false,
            pending_inside: false,
            state: SkyboxState::default(),
        }
    }

    /// Use `resolver` for preset textures.
    pub fn with_textures(mut self, resolver: impl TextureResolver + 'static) -> Self {
        self.textures = Box::new(resolver);
        self
    }

    /// Use `table` for lunar phase coordinates.
    pub fn with_phase_table(mut self, table: PhaseTable) -> Self {
        self.phases = table;
        self
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Write material defaults, bind the skybox and apply `weather`.
    ///
    /// Fails only if the sink is not ready yet; call again once it is.
    pub fn start(&mut self, clock: &dyn WorldClock, weather: WeatherKind) -> Result<()> {
        if !self.sink.is_ready() {
            log::warn!("Skybox material not bound, cannot start yet");
            return Err(Error::SinkNotReady);
        }

        let defaults = &self.config.material_defaults;
        self.sink.set_float(Property::ATMOSPHERE_THICKNESS, defaults.atmosphere_thickness);
        self.sink.set_color(Property::SKY_TINT, defaults.sky_tint);
        self.sink.set_float(Property::SUN_SIZE, defaults.sun_size);
        self.sink.set_int(Property::SUN_SIZE_CONVERGENCE, defaults.sun_size_convergence);
        self.sink.set_float(Property::SKY_FADE_START, defaults.sky_fade_start);
        self.sink.set_float(Property::SKY_FADE_END, defaults.sky_fade_end);
        self.sink.set_float(Property::NIGHT_START_HEIGHT, defaults.night_start_height);
        self.sink.set_float(Property::NIGHT_END_HEIGHT, defaults.night_end_height);
        let wind = self.roll_wind_direction();
        self.sink.set_float(Property::CLOUD_DIRECTION, wind);
        self.state.wind_direction = wind;

        self.set_inside(false);

        self.state.weather = WeatherKind::None;
        self.state.applied = None;
        self.current_preset = None;
        self.tracker.reset();
        self.poll_timer = 0.0;
        self.pending_part = None;
        self.pending_lunar_flip = false;
        self.stage(StagedChange::reload(weather));
        self.started = true;

        log::info!("Skybox started with {:?}", weather);
        self.tick(0.0, clock);
        Ok(())
    }

    /// Register this controller with a host event source.
    pub fn attach(&mut self, source: &mut dyn EventSource) -> SubscriptionId {
        source.subscribe(self.events_tx.clone())
    }

    /// Deregister from a host event source.
    pub fn detach(&mut self, source: &mut dyn EventSource, id: SubscriptionId) -> bool {
        source.unsubscribe(id)
    }

    /// A sender hosts can push events into directly.
    pub fn event_sender(&self) -> Sender<HostEvent> {
        self.events_tx.clone()
    }

    // -- Per-frame update ----------------------------------------------------

    /// Advance by `dt` real (unscaled) seconds.
    pub fn tick(&mut self, dt: f32, clock: &dyn WorldClock) {
        if !self.started {
            log::trace!("Skybox tick before start ignored");
            return;
        }
        self.clock = clock.now();

        if self.clock.time_scale != self.state.time_scale {
            self.update_speeds();
        }

        self.poll_timer -= dt;
        if self.poll_timer <= 0.0 {
            self.poll_timer = self.config.day_part_poll_seconds;
            if let Some((previous, next)) = self.tracker.update(self.clock.hour) {
                self.on_day_part_change(previous, next);
            }
        }

        if self.sink.is_ready() {
            if self.pending_inside {
                self.project_inside();
            }
            if self.pending_lunar_flip {
                self.pending_lunar_flip = false;
                self.flip_lunar_phase();
            }
        }

        self.update_moons();
        self.reconcile();

        if self.sink.is_ready() {
            self.engine.tick(dt, &mut self.sink);
            self.lightning.tick(dt, &mut self.sink);
        }
    }

    /// Process one host event.
    ///
    /// Weather and load events are staged and applied at the next reconcile
    /// step; interior/exterior toggles and lightning take effect immediately.
    pub fn handle_event(&mut self, event: HostEvent) {
        log::debug!("Host event {:?}", event);
        match event {
            HostEvent::WeatherChanged(weather) => self.stage(StagedChange::new(weather, false)),
            HostEvent::PlayerEnteredInterior => self.set_inside(true),
            HostEvent::PlayerEnteredExterior => self.set_inside(false),
            HostEvent::GameLoaded {
                weather,
                player_inside,
            } => {
                self.stage(StagedChange::reload(weather));
                self.set_inside(player_inside);
            }
            HostEvent::AmbientEffect => {
                if self.state.weather == WeatherKind::Thunder && !self.state.inside && self.sink.is_ready() {
                    self.lightning.trigger(self.clock.time_scale, &mut self.sink);
                }
            }
        }
    }

    // -- Accessors -----------------------------------------------------------

    #[inline]
    pub fn state(&self) -> &SkyboxState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &SkyboxConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    #[inline]
    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The preset most recently written to the sink.
    pub fn current_preset(&self) -> Option<&SkyboxPreset> {
        self.current_preset.as_deref()
    }

    // -- Internals -----------------------------------------------------------

    fn stage(&mut self, change: StagedChange) {
        state::stage(&mut self.staged, change);
        self.state.has_staged = true;
        if self.state.phase == ReconcilePhase::Idle {
            self.state.phase = ReconcilePhase::PendingChange;
        }
    }

    /// Weather the next application will use.
    fn effective_weather(&self) -> WeatherKind {
        self.staged.map_or(self.state.weather, |s| s.weather)
    }

    fn roll_wind_direction(&mut self) -> f32 {
        self.rng.gen_range(0.0..360.0)
    }

    fn set_inside(&mut self, inside: bool) {
        self.state.inside = inside;
        if !self.sink.is_ready() {
            log::warn!("Skybox material not bound, deferring {} toggle", if inside { "interior" } else { "exterior" });
            self.pending_inside = true;
            return;
        }
        self.project_inside();
    }

    /// Bind or unbind the skybox for the current interior state.
    fn project_inside(&mut self) {
        self.pending_inside = false;
        if self.state.inside {
            if self.config.transparent_windows {
                log::debug!("Transparent windows enabled, keeping skybox indoors");
                return;
            }
            log::debug!("Deactivating skybox");
            self.sink.bind_skybox(false);
            self.sink.set_camera_clear(ClearMode::Depth);
            self.lightning.cancel(&mut self.sink);
        } else {
            log::debug!("Activating skybox");
            self.sink.bind_skybox(true);
            self.sink.set_camera_clear(ClearMode::Skybox);
        }
    }

    /// Rewrite scroll and orbit speeds for the current time scale.
    fn update_speeds(&mut self) {
        if !self.sink.is_ready() {
            return;
        }
        let scale = self.clock.time_scale;
        let speeds = &self.config.scroll_speeds;
        let cloud_multiplier = self.current_preset.as_ref().map_or(1.0, |p| p.top_clouds.scroll_speed);

        self.sink.set_float(Property::CLOUD_SPEED, speeds.clouds * scale * cloud_multiplier);
        self.sink.set_float(MoonProperties::MASSER.orbit_speed, speeds.moon_orbit * scale);
        self.sink.set_float(MoonProperties::SECUNDA.orbit_speed, speeds.moon_orbit * scale);
        self.sink.set_float(Property::TWINKLE_SPEED, speeds.star_twinkle * scale);
        self.state.time_scale = scale;
        log::debug!("Scroll speeds updated for time scale {}", scale);
    }

    fn on_day_part_change(&mut self, previous: DayPart, next: DayPart) {
        log::debug!("Day part {:?} -> {:?}", previous, next);
        self.state.day_part = next;
        self.stage(StagedChange::new(self.effective_weather(), true));
        self.pending_part = Some(next);
        if next.refreshes_lunar_phase() {
            self.pending_lunar_flip = true;
        }
    }

    /// Start the dawn/dusk lerps for `part`.
    ///
    /// Runs after the frame's events are drained so the lerps begin from the
    /// preset of the weather about to be applied.
    fn begin_day_part_transitions(&mut self, part: DayPart) {
        let weather = self.effective_weather();
        let preset = match self.store.get(weather, part.day_night()) {
            Ok(preset) => preset,
            Err(e) => {
                log::error!("Cannot run {:?} transitions: {}", part, e);
                return;
            }
        };

        let scale = self.clock.time_scale;
        let atmosphere_secs = scaled_duration(preset.atmosphere_lerp_duration, scale);
        let sun_fog_secs = scaled_duration(self.config.sun_fog_transition_hours, scale);
        let normal = preset.atmosphere_normal_thickness;
        let dawn_dusk = preset.atmosphere_dawn_dusk_thickness;
        let fog_day = preset.fog_day_color;
        let fog_night = preset.fog_night_color;

        match part {
            DayPart::Dawn | DayPart::Dusk => {
                self.engine
                    .begin_scalar(ParamId::AtmosphereThickness, normal, dawn_dusk, atmosphere_secs, &mut self.sink);

                let (sun_start, sun_end) = if part == DayPart::Dawn {
                    sun::dawn_colors()
                } else {
                    sun::dusk_colors()
                };
                self.engine
                    .begin_color(ParamId::SunColor, sun_start, sun_end, sun_fog_secs, &mut self.sink);

                let fog = if part == DayPart::Dawn {
                    fog_night.zip(fog_day)
                } else {
                    fog_day.zip(fog_night)
                };
                if let Some((fog_start, fog_end)) = fog {
                    self.engine
                        .begin_color(ParamId::FogColor, fog_start, fog_end, sun_fog_secs, &mut self.sink);
                }
            }
            DayPart::DawnEnd | DayPart::DuskEnd => {
                self.engine
                    .begin_scalar(ParamId::AtmosphereThickness, dawn_dusk, normal, atmosphere_secs, &mut self.sink);
            }
            _ => {}
        }
    }

    /// Snap both moons to the calendar phase when it changed.
    fn flip_lunar_phase(&mut self) {
        let phase = self.clock.masser_phase();
        if phase == self.state.lunar_phase {
            return;
        }
        match self.phases.coordinates(phase) {
            Ok(coords) => {
                self.sink.set_vector(MoonProperties::MASSER.phase, coords.to_vec4());
                self.sink.set_vector(MoonProperties::SECUNDA.phase, coords.to_vec4());
                self.state.lunar_phase = phase;
                log::info!("Lunar phase is now {:?}", phase);
            }
            Err(e) => log::warn!("Lunar phase flip skipped: {}", e),
        }
    }

    /// Recompute both moons. A failure affects only that moon.
    fn update_moons(&mut self) {
        if !self.sink.is_ready() {
            return;
        }
        let clock = self.clock;
        for moon in MoonId::ALL {
            let phase = LunarPhase::from_ratio(moon.ratio(clock.day_of_year, clock.year));
            let solution = match compute_moon_phase(
                &self.phases,
                clock.day_of_year,
                clock.year,
                clock.second_of_day(),
                phase,
                moon,
            ) {
                Ok(solution) => solution,
                Err(e) => {
                    log::warn!("Skipping {:?} update: {}", moon, e);
                    continue;
                }
            };

            let props = match moon {
                MoonId::Masser => MoonProperties::MASSER,
                MoonId::Secunda => MoonProperties::SECUNDA,
            };
            self.sink.set_vector(props.phase, solution.phase_vector());
            self.sink.set_vector(props.orbit_angle, solution.orbit_angle);
            match moon {
                MoonId::Masser => self.state.masser = Some(solution),
                MoonId::Secunda => self.state.secunda = Some(solution),
            }
        }
    }

    /// Flush the staged change, if any, as one preset application.
    fn reconcile(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }

        if self.sink.is_ready() {
            if let Some(part) = self.pending_part.take() {
                self.begin_day_part_transitions(part);
            }
        }

        let Some(staged) = self.staged else {
            self.state.phase = ReconcilePhase::Idle;
            return;
        };

        if staged.weather == self.state.weather && !staged.force {
            log::trace!("Weather unchanged ({:?}), nothing to apply", staged.weather);
            self.clear_staged();
            return;
        }
        self.state.phase = ReconcilePhase::PendingChange;

        if !self.sink.is_ready() {
            log::warn!("Skybox material not bound, retrying {:?} next tick", staged.weather);
            self.staged = Some(StagedChange { force: true, ..staged });
            return;
        }

        let slot = self.tracker.current().day_night();
        let preset = match self.store.get(staged.weather, slot) {
            Ok(preset) => preset,
            Err(e) => {
                log::error!("Skybox reconciliation dropped: {}", e);
                self.clear_staged();
                return;
            }
        };

        let pending = PendingApplication {
            weather: staged.weather,
            slot,
            wind_direction: self.roll_wind_direction(),
            preset,
            force: staged.force,
            reload: staged.reload,
        };
        self.clear_staged();

        self.state.phase = ReconcilePhase::Applying;
        self.apply(&pending);
        self.state.phase = ReconcilePhase::Idle;
    }

    fn clear_staged(&mut self) {
        self.staged = None;
        self.state.has_staged = false;
        self.state.phase = ReconcilePhase::Idle;
    }

    /// Write a pending application to the sink.
    fn apply(&mut self, pending: &PendingApplication) {
        let preset = pending.preset.as_ref();
        let part = self.tracker.current();
        let refresh_textures = pending.reload || self.state.applied != Some(pending.key());

        // Sky
        self.sink.set_float(Property::SUN_SIZE, preset.sun_size);
        self.sink.set_int(Property::SUN_SIZE_CONVERGENCE, preset.sun_size_convergence);
        let thickness = match part {
            DayPart::Dawn | DayPart::Dusk => preset.atmosphere_dawn_dusk_thickness,
            _ => preset.atmosphere_normal_thickness,
        };
        if !self
            .engine
            .retarget(ParamId::AtmosphereThickness, TransitionValue::Scalar(thickness))
        {
            self.sink.set_float(Property::ATMOSPHERE_THICKNESS, thickness);
        }
        set_color(&mut self.sink, Property::SKY_TINT, preset.sky_tint);
        set_color(&mut self.sink, Property::GROUND_COLOR, preset.ground_color);
        self.sink.set_float(Property::EXPOSURE, preset.exposure);
        self.sink.set_float(Property::NIGHT_START_HEIGHT, preset.night_start_height);
        self.sink.set_float(Property::NIGHT_END_HEIGHT, preset.night_end_height);
        self.sink.set_float(Property::SKY_FADE_START, preset.sky_fade_start);
        self.sink.set_float(Property::SKY_FADE_END, preset.sky_fade_end);
        self.sink.set_float(Property::STEP_SIZE, preset.step_size);
        self.sink.set_float(Property::CLOUD_FADE_HEIGHT, preset.cloud_fade_height);

        // Sun and ambient
        let side = part.settled_side();
        if !self.engine.is_running(ParamId::SunColor) {
            self.sink.set_sun_color(sun::settled_color(side));
        }
        if let Some(ambient) = preset.ambient_color {
            self.sink.set_ambient_light(ambient, preset.ambient_intensity);
        }

        // Fog colors
        set_color(&mut self.sink, Property::FOG_DAY_COLOR, preset.fog_day_color);
        set_color(&mut self.sink, Property::FOG_NIGHT_COLOR, preset.fog_night_color);
        let fog_color = match side {
            DayNight::Night => preset.fog_night_color,
            DayNight::Day => preset.fog_day_color,
        };
        if let Some(color) = fog_color {
            if !self.engine.retarget(ParamId::FogColor, TransitionValue::Color(color)) {
                self.sink.set_fog_color(color);
            }
        }

        // Clouds
        let textures = self.textures.as_ref();
        write_cloud_layer(&mut self.sink, &CloudProperties::TOP, &preset.top_clouds, refresh_textures, textures);
        write_cloud_layer(&mut self.sink, &CloudProperties::BOTTOM, &preset.bottom_clouds, refresh_textures, textures);
        let direction = (pending.wind_direction + preset.top_clouds.scroll_direction).rem_euclid(360.0);
        self.sink.set_float(Property::CLOUD_DIRECTION, direction);

        // Stars
        let stars = &preset.stars;
        if refresh_textures {
            write_texture(&mut self.sink, Property::STAR_TEX, &stars.texture, stars.tiling(), stars.offset(), textures);
            write_texture(
                &mut self.sink,
                Property::STAR_TWINKLE_TEX,
                &stars.twinkle_mask,
                stars.tiling(),
                stars.offset(),
                textures,
            );
            write_texture(
                &mut self.sink,
                Property::TWINKLE_TEX,
                &stars.twinkle_texture,
                stars.twinkle_tiling(),
                stars.offset(),
                textures,
            );
        }
        self.sink.set_float(Property::STAR_BENDING, stars.star_bending);
        self.sink.set_float(Property::STAR_BRIGHTNESS, stars.star_brightness);
        self.sink.set_float(Property::TWINKLE_BOOST, stars.twinkle_boost);

        // Moons
        write_moon(&mut self.sink, &MoonProperties::MASSER, &preset.masser, refresh_textures, textures);
        write_moon(&mut self.sink, &MoonProperties::SECUNDA, &preset.secunda, refresh_textures, textures);

        // Distance fog
        self.sink.apply_fog(&self.fog.get(pending.weather));
        self.sink.set_float(Property::FOG_DISTANCE, preset.fog_distance);

        let weather_changed = self.state.weather != pending.weather;
        self.state.weather = pending.weather;
        self.state.applied = Some(pending.key());
        self.state.wind_direction = pending.wind_direction;
        self.state.applications += 1;
        self.current_preset = Some(pending.preset.clone());

        // The cloud speed multiplier comes from the preset.
        self.update_speeds();

        if weather_changed && pending.weather != WeatherKind::Thunder {
            self.lightning.cancel(&mut self.sink);
        }

        log::info!(
            "Applied {:?} {:?} preset (forced: {}, textures: {})",
            pending.weather,
            pending.slot,
            pending.force,
            refresh_textures
        );
    }
}

// ---------------------------------------------------------------------------
// Sink helpers
// ---------------------------------------------------------------------------

fn set_color(sink: &mut impl ParameterSink, property: Property, color: Option<Color>) {
    if let Some(color) = color {
        sink.set_color(property, color);
    }
}

fn write_texture(
    sink: &mut impl ParameterSink,
    property: Property,
    slot: &TextureSlot,
    scale: Vec2,
    offset: Vec2,
    textures: &dyn TextureResolver,
) {
    sink.set_texture(property, slot.handle(textures));
    sink.set_texture_scale(property, scale);
    sink.set_texture_offset(property, offset);
}

fn write_cloud_layer(
    sink: &mut impl ParameterSink,
    props: &CloudProperties,
    layer: &CloudLayerSetting,
    refresh_textures: bool,
    textures: &dyn TextureResolver,
) {
    set_color(sink, props.color, layer.day_color);
    set_color(sink, props.night_color, layer.night_color);
    sink.set_float(props.alpha_cutoff, layer.alpha_threshold);
    sink.set_float(props.alpha_max, layer.alpha_max);
    sink.set_float(props.color_boost, layer.color_boost);
    sink.set_float(props.normal_effect, layer.normal_effect);
    sink.set_float(props.normal_speed, layer.normal_speed);
    sink.set_float(props.opacity, layer.opacity);
    sink.set_float(props.bending, layer.bending);
    sink.set_float(props.blend_start, layer.blend_start);
    sink.set_float(props.blend_end, layer.blend_end);
    sink.set_float(props.sun_tint, layer.sun_tint_scale);

    if refresh_textures {
        write_texture(sink, props.diffuse, &layer.texture, layer.tiling(), layer.offset(), textures);
        sink.set_texture(props.normal, layer.normal_texture.handle(textures));
    }
}

/// Static moon parameters. Phase and orbit angle come from the celestial
/// computation and orbit speed from the scroll speeds.
fn write_moon(
    sink: &mut impl ParameterSink,
    props: &MoonProperties,
    moon: &CelestialBodySetting,
    refresh_textures: bool,
    textures: &dyn TextureResolver,
) {
    set_color(sink, props.color, moon.moon_color);
    sink.set_float(props.min_size, moon.min_size);
    sink.set_float(props.max_size, moon.max_size);
    sink.set_float(props.orbit_offset, moon.orbit_offset);
    sink.set_float(props.semi_min_axis, moon.semi_min_axis);
    sink.set_float(props.semi_maj_axis, moon.semi_maj_axis);
    sink.set_float(props.phase_option, moon.auto_phase);
    sink.set_float(props.spin_option, moon.spin);
    sink.set_vector(props.tidal_angle, moon.tidal_angle);
    sink.set_vector(props.spin_speed, moon.spin_speed);

    if refresh_textures {
        write_texture(sink, props.texture, &moon.texture, moon.tiling(), moon.offset(), textures);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
