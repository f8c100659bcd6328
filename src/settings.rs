use serde::{Deserialize, Serialize};

/// All engine settings consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    // === Motion Parameters ===
    /// Speed cap for velocity-driven patterns (0.5-10.0)
    pub max_speed: f32,
    /// Force magnitude toward the nearest attractor (0.0-5.0)
    pub attraction_strength: f32,

    // === Flow Field Parameters ===
    /// Grid cell size in dots (4.0-40.0)
    pub field_scale: f32,
    /// Spatial scale of the field's noise sampling
    pub field_noise_scale: f64,
    /// Time-axis step per frame when the field regenerates
    pub field_time_scale: f64,
    /// Magnitude of each cell's force vector (0.1-2.0)
    pub field_strength: f32,
    /// Seed for the field and drift noise generators
    pub field_seed: u32,

    // === Visual Parameters ===
    /// Per-frame trail decay factor (0.80-0.99, higher = longer trails)
    pub trail_fade: f32,
    /// Hue rotation in degrees applied to every segment (0-360)
    pub hue_offset: f32,
    /// Invert the brightness gradient
    pub invert_colors: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            attraction_strength: 1.0,

            field_scale: 10.0,
            field_noise_scale: 0.1,
            field_time_scale: 0.01,
            field_strength: 0.5,
            field_seed: 0,

            trail_fade: 0.92,
            hue_offset: 0.0,
            invert_colors: false,
        }
    }
}

impl EngineSettings {
    /// Adjust max speed within bounds
    pub fn adjust_max_speed(&mut self, delta: f32) {
        self.max_speed = (self.max_speed + delta).clamp(0.5, 10.0);
    }

    /// Adjust attraction strength within bounds
    pub fn adjust_attraction_strength(&mut self, delta: f32) {
        self.attraction_strength = (self.attraction_strength + delta).clamp(0.0, 5.0);
    }

    /// Adjust flow-field cell size within bounds
    pub fn adjust_field_scale(&mut self, delta: f32) {
        self.field_scale = (self.field_scale + delta).clamp(4.0, 40.0);
    }

    /// Adjust flow-field force magnitude within bounds
    pub fn adjust_field_strength(&mut self, delta: f32) {
        self.field_strength = (self.field_strength + delta).clamp(0.1, 2.0);
    }

    /// Adjust trail fade within bounds
    pub fn adjust_trail_fade(&mut self, delta: f32) {
        self.trail_fade = (self.trail_fade + delta).clamp(0.80, 0.99);
    }

    /// Adjust hue offset (wraps around)
    pub fn adjust_hue_offset(&mut self, delta: f32) {
        self.hue_offset = (self.hue_offset + delta).rem_euclid(360.0);
    }

    /// Toggle brightness inversion
    pub fn toggle_invert_colors(&mut self) {
        self.invert_colors = !self.invert_colors;
    }
}
