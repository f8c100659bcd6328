use crate::color::map_range;
use crate::field::{DriftNoise, FlowField};
use glam::Vec2;
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Motion pattern governing a particle's per-frame displacement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementType {
    /// Orbit a center that itself circles the canvas center
    #[default]
    Circle,
    /// Steering physics driven by the external flow field
    Noise,
    /// Radial wave interference around the canvas center
    Sin1,
    /// Horizontal traveling wave
    Sin2,
    /// Non-linear angular field, diverging near the center
    Tau,
    /// Two coherent-noise fields at different scales
    PerlinFlow,
    /// Sum of three sine waves in x, y and x+y
    WaveInterference,
}

impl MovementType {
    pub fn name(&self) -> &str {
        match self {
            MovementType::Circle => "Circle",
            MovementType::Noise => "Noise Field",
            MovementType::Sin1 => "Radial Wave",
            MovementType::Sin2 => "Traveling Wave",
            MovementType::Tau => "Tau",
            MovementType::PerlinFlow => "Perlin Drift",
            MovementType::WaveInterference => "Interference",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MovementType::Circle => MovementType::Noise,
            MovementType::Noise => MovementType::Sin1,
            MovementType::Sin1 => MovementType::Sin2,
            MovementType::Sin2 => MovementType::Tau,
            MovementType::Tau => MovementType::PerlinFlow,
            MovementType::PerlinFlow => MovementType::WaveInterference,
            MovementType::WaveInterference => MovementType::Circle,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            MovementType::Circle => MovementType::WaveInterference,
            MovementType::Noise => MovementType::Circle,
            MovementType::Sin1 => MovementType::Noise,
            MovementType::Sin2 => MovementType::Sin1,
            MovementType::Tau => MovementType::Sin2,
            MovementType::PerlinFlow => MovementType::Tau,
            MovementType::WaveInterference => MovementType::PerlinFlow,
        }
    }
}

/// Per-frame context passed into every update: the monotonic frame counter
/// and the canvas extent in dots. Motion functions take this explicitly so
/// they stay pure and testable, with no ambient globals.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}

impl FrameContext {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A drawable line segment plus its style, handed to the render loop.
/// The engine never draws anything itself.
#[derive(Debug, Clone, Copy)]
pub struct TrailSegment {
    pub from: Vec2,
    pub to: Vec2,
    /// Hue in degrees, mapped from the particle's x position
    pub hue: f32,
    /// Saturation 50-100, mapped from the particle's y position
    pub saturation: f32,
    /// Brightness 50-100, mapped from distance to the canvas center
    pub brightness: f32,
    /// Stamp opacity per frame; trails accumulate over many frames
    pub alpha: f32,
    /// Stroke weight interpolated from total canvas dot count
    pub weight: f32,
}

/// A single particle: position, trailing position, steering state and the
/// motion pattern it follows. Particles never read each other's state; the
/// only shared inputs are the attractor slice and the flow field, both
/// read-only from here.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub max_speed: f32,
    pub attraction_strength: f32,
    pub movement_type: MovementType,
}

impl Particle {
    /// Spawn at a uniform-random position inside the canvas
    pub fn spawn(rng: &mut ThreadRng, width: f32, height: f32, movement_type: MovementType) -> Self {
        let pos = Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        Self::at(pos, movement_type)
    }

    /// Construct at an exact position (tests and deterministic setups)
    pub fn at(pos: Vec2, movement_type: MovementType) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            max_speed: 2.0,
            attraction_strength: 1.0,
            movement_type,
        }
    }

    pub fn set_movement_type(&mut self, movement_type: MovementType) {
        self.movement_type = movement_type;
    }

    /// Advance one frame. Exactly one motion branch executes per call.
    pub fn update(&mut self, ctx: FrameContext, attractors: &[Vec2], drift: &DriftNoise) {
        match self.movement_type {
            MovementType::Circle => self.update_circle(ctx),
            MovementType::Noise => self.update_noise(attractors),
            MovementType::Sin1 => self.update_sin1(ctx),
            MovementType::Sin2 => self.update_sin2(ctx),
            MovementType::Tau => self.update_tau(ctx),
            MovementType::PerlinFlow => self.pos += drift.displacement(self.pos),
            MovementType::WaveInterference => self.update_wave_interference(ctx),
        }
    }

    /// Circle around a center that itself orbits the canvas center. The
    /// direction toward the moving center is rotated 90° so the particle
    /// circles it instead of approaching it. No decay, no inertia.
    fn update_circle(&mut self, ctx: FrameContext) {
        let t = ctx.frame as f32 * 0.01;
        let center = ctx.center() + Vec2::new(t.sin() * ctx.width / 4.0, t.cos() * ctx.height / 4.0);
        self.vel = (center - self.pos).normalize_or_zero().perp() * self.max_speed;
        self.pos += self.vel;
    }

    /// Classic steering update: forces accumulated in `acc` (from `follow`)
    /// integrate into velocity, clamped to `max_speed`. Attraction feeds
    /// back into `acc` so the next frame's clamp bounds it.
    fn update_noise(&mut self, attractors: &[Vec2]) {
        self.vel += self.acc;
        self.vel = self.vel.clamp_length_max(self.max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
        self.apply_attraction(attractors);
    }

    fn update_sin1(&mut self, ctx: FrameContext) {
        let center = ctx.center();
        let dist = self.pos.distance(center);
        let angle = ctx.frame as f32 * 0.01;
        let phase = dist * 0.01;
        let amplitude = map_range(dist, 0.0, ctx.width / 2.0, 50.0, 150.0);
        let offset = (dist * 0.01 + angle + phase).sin() * amplitude;
        self.pos += (center - self.pos).normalize_or_zero() * offset;
        self.pos.x += self.horizontal_drift();
    }

    fn update_sin2(&mut self, ctx: FrameContext) {
        let angle = ctx.frame as f32 * 0.01;
        let phase = self.pos.y * 0.01;
        let amplitude = map_range((self.pos.x * 0.01).sin(), -1.0, 1.0, 50.0, 150.0);
        let frequency = map_range(self.pos.y, 0.0, ctx.height, 0.005, 0.02);
        self.pos.y += (self.pos.x * frequency + angle + phase).sin() * amplitude;
        self.pos.x += self.horizontal_drift();
    }

    /// Angle `-tau / (1 + x^2 + y^2)` over the position normalized into
    /// [-1,1]^2: changes rapidly near the center, flattens toward the edges.
    /// Displacement magnitude is exactly `max_speed` every frame.
    fn update_tau(&mut self, ctx: FrameContext) {
        let nx = map_range(self.pos.x, 0.0, ctx.width, -1.0, 1.0);
        let ny = map_range(self.pos.y, 0.0, ctx.height, -1.0, 1.0);
        let angle = -TAU / (1.0 + nx * nx + ny * ny);
        self.pos += Vec2::from_angle(angle) * self.max_speed;
    }

    fn update_wave_interference(&mut self, ctx: FrameContext) {
        let t = ctx.frame as f32;
        let wave1 = (self.pos.x * 0.01 + t * 0.05).sin();
        let wave2 = (self.pos.y * 0.02 + t * 0.07).sin();
        let wave3 = ((self.pos.x + self.pos.y) * 0.015 + t * 0.03).sin();
        self.pos += Vec2::splat((wave1 + wave2 + wave3) * 2.0);
    }

    /// Rightward nudge shared by the two wave patterns, 0.5x-1.5x max_speed
    /// depending on the particle's y position
    fn horizontal_drift(&self) -> f32 {
        self.max_speed * map_range((self.pos.y * 0.01).cos(), -1.0, 1.0, 0.5, 1.5)
    }

    /// Steer toward the nearest attractor: linear scan, first one wins on
    /// ties. The force goes into `acc` rather than straight into velocity
    /// so the speed clamp naturally bounds it on the next frame.
    pub fn apply_attraction(&mut self, attractors: &[Vec2]) {
        let Some(first) = attractors.first() else {
            return;
        };
        let mut closest = *first;
        let mut min_dist = self.pos.distance(closest);
        for &point in &attractors[1..] {
            let dist = self.pos.distance(point);
            if dist < min_dist {
                closest = point;
                min_dist = dist;
            }
        }
        self.acc += (closest - self.pos).normalize_or_zero() * self.attraction_strength;
    }

    /// Read the flow-field cell under the particle and accumulate its force
    pub fn follow(&mut self, field: &FlowField) {
        self.acc += field.force_at(self.pos);
    }

    /// Toroidal wrap. Any wrap also resets `prev_pos` so no trail line is
    /// drawn across the screen at the seam.
    pub fn edges(&mut self, ctx: FrameContext) {
        let mut wrapped = false;
        if self.pos.x >= ctx.width || self.pos.x < 0.0 {
            self.pos.x = self.pos.x.rem_euclid(ctx.width);
            wrapped = true;
        }
        if self.pos.y >= ctx.height || self.pos.y < 0.0 {
            self.pos.y = self.pos.y.rem_euclid(ctx.height);
            wrapped = true;
        }
        if wrapped {
            self.update_prev();
        }
    }

    /// Produce this frame's drawable segment and style, then advance the
    /// trailing position
    pub fn trail_segment(&mut self, ctx: FrameContext) -> TrailSegment {
        let total_dots = ctx.width * ctx.height;
        let weight = map_range(total_dots, 800.0 * 600.0, 2560.0 * 1440.0, 0.2, 0.7);

        let center = ctx.center();
        let max_dist = center.length();
        let segment = TrailSegment {
            from: self.prev_pos,
            to: self.pos,
            hue: map_range(self.pos.x, 0.0, ctx.width, 0.0, 360.0),
            saturation: map_range(self.pos.y, 0.0, ctx.height, 50.0, 100.0),
            brightness: map_range(self.pos.distance(center), 0.0, max_dist, 50.0, 100.0),
            alpha: 0.1,
            weight,
        };
        self.update_prev();
        segment
    }

    /// Copy, not alias: later position mutation must not move the old point
    pub fn update_prev(&mut self) {
        self.prev_pos = self.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn ctx(frame: u64) -> FrameContext {
        FrameContext {
            frame,
            width: 400.0,
            height: 200.0,
        }
    }

    fn drift() -> DriftNoise {
        DriftNoise::new(42)
    }

    #[test]
    fn edges_keeps_position_in_bounds() {
        let c = ctx(0);
        let mut p = Particle::at(Vec2::new(c.width + 4.5, -3.0), MovementType::Circle);
        p.edges(c);
        assert!(p.pos.x >= 0.0 && p.pos.x < c.width, "x out of bounds: {}", p.pos.x);
        assert!(p.pos.y >= 0.0 && p.pos.y < c.height, "y out of bounds: {}", p.pos.y);
    }

    #[test]
    fn edges_wrap_resets_prev_pos() {
        let c = ctx(0);
        let mut p = Particle::at(Vec2::new(c.width - 0.5, 50.0), MovementType::Circle);
        p.update_prev();
        p.pos.x += 5.0; // crosses the right edge
        p.edges(c);
        assert!(p.pos.x < c.width && p.pos.x < 10.0, "expected wrap near 0, got {}", p.pos.x);
        assert_eq!(p.prev_pos, p.pos, "wrap must suppress the trail streak");
    }

    #[test]
    fn edges_without_wrap_keeps_prev_pos() {
        let c = ctx(0);
        let mut p = Particle::at(Vec2::new(100.0, 50.0), MovementType::Circle);
        p.update_prev();
        p.pos += Vec2::new(3.0, 1.0);
        let old_prev = p.prev_pos;
        p.edges(c);
        assert_eq!(p.prev_pos, old_prev);
    }

    #[test]
    fn circle_velocity_magnitude_equals_max_speed() {
        let c = ctx(7);
        let d = drift();
        let mut p = Particle::at(Vec2::new(30.0, 40.0), MovementType::Circle);
        for frame in 0..20 {
            p.update(FrameContext { frame, ..c }, &[], &d);
            assert!(
                (p.vel.length() - p.max_speed).abs() < EPS,
                "frame {}: |vel| = {}",
                frame,
                p.vel.length()
            );
        }
    }

    #[test]
    fn tau_displacement_equals_max_speed() {
        let c = ctx(0);
        let d = drift();
        let mut p = Particle::at(Vec2::new(120.0, 90.0), MovementType::Tau);
        let before = p.pos;
        p.update(c, &[], &d);
        assert!(((p.pos - before).length() - p.max_speed).abs() < EPS);
    }

    #[test]
    fn attraction_targets_nearest_point() {
        let mut p = Particle::at(Vec2::new(90.0, 0.0), MovementType::Noise);
        p.apply_attraction(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]);
        // (100, 0) is nearer, so the steering delta points in +x
        assert!(p.acc.x > 0.0, "expected pull toward (100,0), got {:?}", p.acc);
        assert!((p.acc.length() - p.attraction_strength).abs() < EPS);
    }

    #[test]
    fn attraction_tie_prefers_first_point() {
        let mut p = Particle::at(Vec2::new(10.0, 0.0), MovementType::Noise);
        p.apply_attraction(&[Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0)]);
        assert!(p.acc.x < 0.0, "equidistant tie must pick the first point");
    }

    #[test]
    fn attraction_with_no_points_is_noop() {
        let mut p = Particle::at(Vec2::new(10.0, 10.0), MovementType::Noise);
        p.apply_attraction(&[]);
        assert_eq!(p.acc, Vec2::ZERO);
    }

    #[test]
    fn noise_velocity_stays_bounded_under_attraction() {
        // Attraction feeds acceleration, so the per-frame speed clamp must
        // hold no matter how long the pull accumulates.
        let c = ctx(0);
        let d = drift();
        let attractors = [Vec2::new(350.0, 150.0)];
        let mut p = Particle::at(Vec2::new(10.0, 10.0), MovementType::Noise);
        for frame in 0..200 {
            p.update(FrameContext { frame, ..c }, &attractors, &d);
            assert!(
                p.vel.length() <= p.max_speed + EPS,
                "frame {}: |vel| = {} exceeds max_speed",
                frame,
                p.vel.length()
            );
        }
    }

    #[test]
    fn update_prev_gives_zero_length_segment() {
        let c = ctx(0);
        let mut p = Particle::at(Vec2::new(55.0, 66.0), MovementType::Sin1);
        p.update_prev();
        let segment = p.trail_segment(c);
        assert_eq!(segment.from, segment.to);
    }

    #[test]
    fn prev_pos_is_a_copy_not_an_alias() {
        let mut p = Particle::at(Vec2::new(5.0, 5.0), MovementType::Circle);
        p.update_prev();
        p.pos = Vec2::new(50.0, 50.0);
        assert_eq!(p.prev_pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn sin1_at_exact_center_does_not_produce_nan() {
        let c = ctx(3);
        let d = drift();
        let mut p = Particle::at(c.center(), MovementType::Sin1);
        p.update(c, &[], &d);
        assert!(p.pos.x.is_finite() && p.pos.y.is_finite());
    }

    #[test]
    fn trail_segment_style_ranges() {
        let c = ctx(0);
        let mut p = Particle::at(Vec2::new(c.width - 1.0, c.height - 1.0), MovementType::Sin2);
        let segment = p.trail_segment(c);
        assert!(segment.hue >= 0.0 && segment.hue < 360.0);
        assert!(segment.saturation >= 50.0 && segment.saturation <= 100.0);
        assert!(segment.brightness >= 50.0 && segment.brightness <= 100.0);
    }

    #[test]
    fn stroke_weight_interpolation_endpoints() {
        let small = FrameContext { frame: 0, width: 800.0, height: 600.0 };
        let large = FrameContext { frame: 0, width: 2560.0, height: 1440.0 };
        let mut p = Particle::at(Vec2::new(1.0, 1.0), MovementType::Circle);
        assert!((p.trail_segment(small).weight - 0.2).abs() < EPS);
        assert!((p.trail_segment(large).weight - 0.7).abs() < EPS);
    }

    #[test]
    fn movement_type_cycle_is_closed() {
        let mut t = MovementType::Circle;
        for _ in 0..7 {
            assert_eq!(t.next().prev(), t);
            t = t.next();
        }
        assert_eq!(t, MovementType::Circle);
    }
}
