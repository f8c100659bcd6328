use glam::Vec2;
use noise::{NoiseFn, Perlin};
use std::f32::consts::TAU;

/// Spatial scale of the coarse drift layer
const DRIFT_COARSE_SCALE: f64 = 0.01;
/// Spatial scale of the fine drift layer
const DRIFT_FINE_SCALE: f64 = 0.02;
/// Weight of the coarse layer's unit vector
const DRIFT_COARSE_STRENGTH: f32 = 1.0;
/// Weight of the fine layer's unit vector
const DRIFT_FINE_STRENGTH: f32 = 0.5;

/// Maps a Perlin sample (-1..1) to an angle in [0, tau)
fn noise_to_angle(n: f64) -> f32 {
    ((n + 1.0) * 0.5) as f32 * TAU
}

/// Two independent coherent-noise layers sampled at the particle's
/// position, used by the Perlin Drift motion pattern. Coarse layer at full
/// strength, fine layer at half, summed.
pub struct DriftNoise {
    coarse: Perlin,
    fine: Perlin,
}

impl DriftNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            coarse: Perlin::new(seed),
            fine: Perlin::new(seed.wrapping_add(7919)),
        }
    }

    pub fn displacement(&self, pos: Vec2) -> Vec2 {
        let coarse = self
            .coarse
            .get([pos.x as f64 * DRIFT_COARSE_SCALE, pos.y as f64 * DRIFT_COARSE_SCALE]);
        let fine = self
            .fine
            .get([pos.x as f64 * DRIFT_FINE_SCALE, pos.y as f64 * DRIFT_FINE_SCALE]);
        Vec2::from_angle(noise_to_angle(coarse)) * DRIFT_COARSE_STRENGTH
            + Vec2::from_angle(noise_to_angle(fine)) * DRIFT_FINE_STRENGTH
    }
}

/// A uniform grid of force vectors covering the canvas, row-major with cell
/// size `scl`. Regenerated from 3D Perlin noise (the third axis is time) at
/// whatever cadence the owning loop chooses.
pub struct FlowField {
    scl: f32,
    cols: usize,
    rows: usize,
    vectors: Vec<Vec2>,
    noise: Perlin,
    noise_scale: f64,
    time_scale: f64,
    strength: f32,
}

impl FlowField {
    pub fn new(
        width: f32,
        height: f32,
        scl: f32,
        seed: u32,
        noise_scale: f64,
        time_scale: f64,
        strength: f32,
    ) -> Self {
        let cols = ((width / scl).ceil() as usize).max(1);
        let rows = ((height / scl).ceil() as usize).max(1);
        let mut field = Self {
            scl,
            cols,
            rows,
            vectors: vec![Vec2::ZERO; cols * rows],
            noise: Perlin::new(seed),
            noise_scale,
            time_scale,
            strength,
        };
        field.regenerate(0);
        field
    }

    #[allow(dead_code)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Resample every cell's force from the noise volume at the given frame
    pub fn regenerate(&mut self, frame: u64) {
        let t = frame as f64 * self.time_scale;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let n = self.noise.get([
                    col as f64 * self.noise_scale,
                    row as f64 * self.noise_scale,
                    t,
                ]);
                self.vectors[row * self.cols + col] =
                    Vec2::from_angle(noise_to_angle(n)) * self.strength;
            }
        }
    }

    /// Row-major index of the cell containing `pos`, clamped to the grid.
    /// Positions outside the covered area read the nearest edge cell
    /// instead of indexing out of bounds.
    pub fn index_of(&self, pos: Vec2) -> usize {
        let col = ((pos.x / self.scl).floor() as isize).clamp(0, self.cols as isize - 1) as usize;
        let row = ((pos.y / self.scl).floor() as isize).clamp(0, self.rows as isize - 1) as usize;
        col + row * self.cols
    }

    pub fn force_at(&self, pos: Vec2) -> Vec2 {
        self.vectors[self.index_of(pos)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FlowField {
        // 10 columns x 5 rows covering a 200x100 canvas
        FlowField::new(200.0, 100.0, 20.0, 42, 0.1, 0.01, 0.5)
    }

    #[test]
    fn index_arithmetic_is_row_major() {
        let f = field();
        assert_eq!(f.cols(), 10);
        assert_eq!(f.rows(), 5);
        // floor(45/20) + floor(25/20) * 10 = 2 + 10
        assert_eq!(f.index_of(Vec2::new(45.0, 25.0)), 12);
        assert_eq!(f.index_of(Vec2::new(195.0, 5.0)), 9);
        assert_eq!(f.index_of(Vec2::new(0.0, 0.0)), 0);
    }

    #[test]
    fn out_of_range_lookup_clamps_to_edge_cells() {
        let f = field();
        // x past the right edge reads the last column, not past the row
        assert_eq!(f.index_of(Vec2::new(205.0, 5.0)), 9);
        assert_eq!(f.index_of(Vec2::new(-3.0, -3.0)), 0);
        assert_eq!(f.index_of(Vec2::new(1000.0, 1000.0)), 49);
    }

    #[test]
    fn forces_have_configured_magnitude() {
        let f = field();
        for row in 0..f.rows() {
            for col in 0..f.cols() {
                let force = f.force_at(Vec2::new(col as f32 * 20.0 + 1.0, row as f32 * 20.0 + 1.0));
                assert!((force.length() - 0.5).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn same_seed_regenerates_identically() {
        let mut a = field();
        let mut b = field();
        a.regenerate(17);
        b.regenerate(17);
        assert_eq!(a.force_at(Vec2::new(55.0, 35.0)), b.force_at(Vec2::new(55.0, 35.0)));
    }

    #[test]
    fn field_evolves_over_time() {
        let mut f = field();
        let before = f.force_at(Vec2::new(55.0, 35.0));
        f.regenerate(500);
        let after = f.force_at(Vec2::new(55.0, 35.0));
        assert_ne!(before, after);
    }

    #[test]
    fn drift_displacement_is_finite_and_bounded() {
        let drift = DriftNoise::new(7);
        for i in 0..50 {
            let pos = Vec2::new(i as f32 * 13.7, i as f32 * 5.3);
            let d = drift.displacement(pos);
            assert!(d.x.is_finite() && d.y.is_finite());
            // sum of a unit vector and a half-length unit vector
            assert!(d.length() <= 1.5 + 1e-4);
        }
    }

    #[test]
    fn drift_is_deterministic_for_a_seed() {
        let a = DriftNoise::new(99);
        let b = DriftNoise::new(99);
        let pos = Vec2::new(12.3, 45.6);
        assert_eq!(a.displacement(pos), b.displacement(pos));
    }
}
