use crate::canvas::{self, TrailCanvas};
use crate::color;
use crate::config::AppConfig;
use crate::export;
use crate::field::{DriftNoise, FlowField};
use crate::particle::{FrameContext, MovementType, Particle};
use crate::presets::Preset;
use crate::settings::EngineSettings;
use glam::Vec2;
use rand::rngs::ThreadRng;
use rand::Rng;

/// Focus state for parameter editing in the sidebar.
/// Alphabetically ordered for consistent UI display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Attraction,
    Fade,
    FieldScale,
    FieldStrength,
    HueOffset,
    Invert,
    MaxSpeed,
    Movement,
    Particles,
    Speed,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Attraction,
            Focus::Attraction => Focus::Fade,
            Focus::Fade => Focus::FieldScale,
            Focus::FieldScale => Focus::FieldStrength,
            Focus::FieldStrength => Focus::HueOffset,
            Focus::HueOffset => Focus::Invert,
            Focus::Invert => Focus::MaxSpeed,
            Focus::MaxSpeed => Focus::Movement,
            Focus::Movement => Focus::Particles,
            Focus::Particles => Focus::Speed,
            Focus::Speed => Focus::Attraction, // Loop back
        }
    }

    /// Shift+Tab cycles in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Speed,
            Focus::Attraction => Focus::Speed, // Loop back
            Focus::Fade => Focus::Attraction,
            Focus::FieldScale => Focus::Fade,
            Focus::FieldStrength => Focus::FieldScale,
            Focus::HueOffset => Focus::FieldStrength,
            Focus::Invert => Focus::HueOffset,
            Focus::MaxSpeed => Focus::Invert,
            Focus::Movement => Focus::MaxSpeed,
            Focus::Particles => Focus::Movement,
            Focus::Speed => Focus::Particles,
        }
    }

    /// Line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Attraction => 0,
            Focus::Fade => 1,
            Focus::FieldScale => 2,
            Focus::FieldStrength => 3,
            Focus::HueOffset => 4,
            Focus::Invert => 5,
            Focus::MaxSpeed => 6,
            Focus::Movement => 7,
            Focus::Particles => 8,
            Focus::Speed => 9,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state: the particle swarm, its collaborators (flow
/// field, drift noise, attractor set) and the trail canvas, plus UI state.
pub struct App {
    pub particles: Vec<Particle>,
    pub attractors: Vec<Vec2>,
    pub flow_field: FlowField,
    pub drift: DriftNoise,
    pub canvas: TrailCanvas,
    pub settings: EngineSettings,
    pub movement_type: MovementType,
    pub num_particles: usize,
    pub frame: u64,
    pub paused: bool,
    pub steps_per_frame: usize,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// One-line feedback shown in the status box (snapshot path, errors)
    pub status_note: Option<String>,
    width: f32,
    height: f32,
    rng: ThreadRng,
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16) -> Self {
        let (dots_w, dots_h) = canvas::calculate_dot_size(canvas_width, canvas_height);
        let settings = EngineSettings::default();
        let width = dots_w as f32;
        let height = dots_h as f32;
        let mut app = Self {
            particles: Vec::new(),
            attractors: Vec::new(),
            flow_field: Self::build_field(width, height, &settings),
            drift: DriftNoise::new(settings.field_seed),
            canvas: TrailCanvas::new(dots_w, dots_h),
            settings,
            movement_type: MovementType::default(),
            num_particles: 800,
            frame: 0,
            paused: false,
            steps_per_frame: 2,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            status_note: None,
            width,
            height,
            rng: rand::thread_rng(),
        };
        app.sync_particle_count();
        app
    }

    fn build_field(width: f32, height: f32, settings: &EngineSettings) -> FlowField {
        FlowField::new(
            width,
            height,
            settings.field_scale,
            settings.field_seed,
            settings.field_noise_scale,
            settings.field_time_scale,
            settings.field_strength,
        )
    }

    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            frame: self.frame,
            width: self.width,
            height: self.height,
        }
    }

    /// Run simulation steps for the current frame
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.step_frame();
        }
    }

    /// One frame: fade trails, refresh the field if the active pattern
    /// consumes it, then per particle follow -> update -> edges -> stamp
    fn step_frame(&mut self) {
        self.frame += 1;
        self.canvas.fade(self.settings.trail_fade);
        if self.movement_type == MovementType::Noise {
            self.flow_field.regenerate(self.frame);
        }
        let ctx = self.frame_context();
        let Self {
            particles,
            attractors,
            flow_field,
            drift,
            canvas,
            settings,
            ..
        } = self;
        for particle in particles.iter_mut() {
            if particle.movement_type == MovementType::Noise {
                particle.follow(flow_field);
            }
            particle.update(ctx, attractors.as_slice(), drift);
            particle.edges(ctx);
            let segment = particle.trail_segment(ctx);
            let rgb = color::segment_color(&segment, settings.hue_offset, settings.invert_colors);
            canvas.stamp_segment(&segment, rgb);
        }
    }

    fn spawn_particle(&mut self) -> Particle {
        let mut particle =
            Particle::spawn(&mut self.rng, self.width, self.height, self.movement_type);
        particle.max_speed = self.settings.max_speed;
        particle.attraction_strength = self.settings.attraction_strength;
        particle
    }

    /// Grow or shrink the swarm to match `num_particles`
    fn sync_particle_count(&mut self) {
        while self.particles.len() < self.num_particles {
            let particle = self.spawn_particle();
            self.particles.push(particle);
        }
        self.particles.truncate(self.num_particles);
    }

    /// Push the motion settings into every particle
    fn apply_motion_settings(&mut self) {
        for particle in &mut self.particles {
            particle.max_speed = self.settings.max_speed;
            particle.attraction_strength = self.settings.attraction_strength;
        }
    }

    fn rebuild_field(&mut self) {
        self.flow_field = Self::build_field(self.width, self.height, &self.settings);
        self.drift = DriftNoise::new(self.settings.field_seed);
    }

    /// Switch every particle to a new motion pattern
    pub fn set_movement_type(&mut self, movement_type: MovementType) {
        self.movement_type = movement_type;
        for particle in &mut self.particles {
            particle.set_movement_type(movement_type);
        }
    }

    /// Re-scatter the swarm and wipe the trails
    pub fn respawn(&mut self) {
        self.particles.clear();
        self.sync_particle_count();
        self.canvas.clear();
        self.frame = 0;
        self.status_note = None;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame + 1).min(10);
    }

    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1);
    }

    /// Drop an attractor at a random canvas position
    pub fn add_attractor(&mut self) {
        let point = Vec2::new(
            self.rng.gen_range(0.0..self.width),
            self.rng.gen_range(0.0..self.height),
        );
        self.attractors.push(point);
    }

    pub fn clear_attractors(&mut self) {
        self.attractors.clear();
    }

    pub fn adjust_particles(&mut self, delta: i32) {
        self.num_particles = (self.num_particles as i32 + delta).clamp(1, 20_000) as usize;
        self.sync_particle_count();
    }

    pub fn toggle_invert_colors(&mut self) {
        self.settings.toggle_invert_colors();
    }

    /// Write a PNG of the current trail canvas next to the working
    /// directory and note the outcome in the status box
    pub fn snapshot(&mut self) {
        self.status_note = Some(match export::save_snapshot(&self.canvas) {
            Ok(path) => format!("saved {}", path.display()),
            Err(err) => format!("snapshot failed: {}", err),
        });
    }

    /// Write the current configuration as JSON into the working directory
    /// and note the outcome in the status box
    pub fn save_config(&mut self) {
        let path = std::path::Path::new("particle-flow-config.json");
        self.status_note = Some(match self.to_config().save_to_file(path) {
            Ok(()) => format!("saved {}", path.display()),
            Err(err) => format!("config save failed: {}", err),
        });
    }

    /// Handle adjusting the currently focused parameter upward
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Attraction => {
                self.settings.adjust_attraction_strength(0.25);
                self.apply_motion_settings();
            }
            Focus::Fade => self.settings.adjust_trail_fade(0.01),
            Focus::FieldScale => {
                self.settings.adjust_field_scale(2.0);
                self.rebuild_field();
            }
            Focus::FieldStrength => {
                self.settings.adjust_field_strength(0.1);
                self.rebuild_field();
            }
            Focus::HueOffset => self.settings.adjust_hue_offset(15.0),
            Focus::Invert => self.settings.toggle_invert_colors(),
            Focus::MaxSpeed => {
                self.settings.adjust_max_speed(0.5);
                self.apply_motion_settings();
            }
            Focus::Movement => self.set_movement_type(self.movement_type.next()),
            Focus::Particles => self.adjust_particles(100),
            Focus::Speed => self.increase_speed(),
        }
    }

    /// Handle adjusting the currently focused parameter downward
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Attraction => {
                self.settings.adjust_attraction_strength(-0.25);
                self.apply_motion_settings();
            }
            Focus::Fade => self.settings.adjust_trail_fade(-0.01),
            Focus::FieldScale => {
                self.settings.adjust_field_scale(-2.0);
                self.rebuild_field();
            }
            Focus::FieldStrength => {
                self.settings.adjust_field_strength(-0.1);
                self.rebuild_field();
            }
            Focus::HueOffset => self.settings.adjust_hue_offset(-15.0),
            Focus::Invert => self.settings.toggle_invert_colors(),
            Focus::MaxSpeed => {
                self.settings.adjust_max_speed(-0.5);
                self.apply_motion_settings();
            }
            Focus::Movement => self.set_movement_type(self.movement_type.prev()),
            Focus::Particles => self.adjust_particles(-100),
            Focus::Speed => self.decrease_speed(),
        }
    }

    /// Resize everything to a new terminal canvas; particles outside the
    /// new bounds wrap back in
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (dots_w, dots_h) = canvas::calculate_dot_size(canvas_width, canvas_height);
        if dots_w as f32 == self.width && dots_h as f32 == self.height {
            return;
        }
        self.width = dots_w as f32;
        self.height = dots_h as f32;
        self.canvas = TrailCanvas::new(dots_w, dots_h);
        self.rebuild_field();
        let ctx = self.frame_context();
        for particle in &mut self.particles {
            particle.edges(ctx);
        }
    }

    /// Apply a loaded configuration wholesale
    pub fn apply_config(&mut self, config: AppConfig) {
        self.settings = config.settings;
        self.num_particles = config.num_particles.clamp(1, 20_000);
        self.steps_per_frame = config.steps_per_frame.clamp(1, 10);
        self.set_movement_type(config.movement_type);
        self.rebuild_field();
        self.sync_particle_count();
        self.apply_motion_settings();
    }

    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            version: 1,
            settings: self.settings.clone(),
            movement_type: self.movement_type,
            num_particles: self.num_particles,
            steps_per_frame: self.steps_per_frame,
        }
    }

    /// Apply a named preset's settings and pattern
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.settings = preset.settings.clone();
        self.num_particles = preset.num_particles.clamp(1, 20_000);
        self.set_movement_type(preset.movement_type);
        self.rebuild_field();
        self.sync_particle_count();
        self.apply_motion_settings();
        self.respawn();
    }
}
