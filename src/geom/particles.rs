// particles.rs - Point-cloud builders
//
// Flat xyz f32 buffers, ready to hand to the host as vertex data.
// Only material opacity/rotation animates per frame; positions are
// immutable after construction.

use glam::Vec3;

use super::XorShift32;
use crate::error::{EngineError, Result};

// Swirl shape (intro sequence)
const SWIRL_TURNS: f32 = 6.0;           // total angle = turns * 2pi
const SWIRL_RADIUS_BASE: f32 = 40.0;
const SWIRL_RADIUS_GROWTH: f32 = 220.0;
const SWIRL_RADIUS_WOBBLE: f32 = 13.0;
const SWIRL_DEPTH_STEP: f32 = 3.0;
const SWIRL_DEPTH_WOBBLE: f32 = 8.0;

/// An immutable point cloud.
pub struct ParticleField {
    positions: Vec<f32>,
}

impl ParticleField {
    /// Sample `count` points uniformly over a spherical shell.
    ///
    /// Radius is uniform in [inner, outer], azimuth uniform in [0, 2pi),
    /// and the polar angle comes from `acos(uniform(-1, 1))` so points do
    /// not cluster at the poles.
    pub fn shell(count: usize, inner: f32, outer: f32, seed: u32) -> Result<Self> {
        if !inner.is_finite() || !outer.is_finite() {
            return Err(EngineError::invalid("shell radius is not finite"));
        }
        if inner < 0.0 || outer < inner {
            return Err(EngineError::invalid(format!(
                "shell radius range [{inner}, {outer}] is inverted or negative"
            )));
        }

        let mut rng = XorShift32::new(seed);
        let mut positions = Vec::with_capacity(count * 3);
        for _ in 0..count {
            let r = rng.range(inner, outer);
            let theta = rng.next_f32() * std::f32::consts::TAU;
            let phi = rng.range(-1.0, 1.0).acos();

            positions.push(r * phi.sin() * theta.cos());
            positions.push(r * phi.sin() * theta.sin());
            positions.push(r * phi.cos());
        }
        Ok(Self { positions })
    }

    /// Parametric spiral for the intro sequence: radius grows along the
    /// curve while a per-point wobble keeps it from reading as a perfect
    /// coil. Fully deterministic, no sampling involved.
    pub fn swirl(count: usize) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let n = count as f32;
        for i in 0..count {
            let fi = i as f32;
            let t = fi / n.max(1.0);
            let angle = t * SWIRL_TURNS * std::f32::consts::TAU;
            let radius = SWIRL_RADIUS_BASE
                + t * SWIRL_RADIUS_GROWTH
                + (fi * 0.19).sin() * SWIRL_RADIUS_WOBBLE;

            positions.push(angle.cos() * radius);
            positions.push(angle.sin() * radius);
            positions.push((fi - n / 2.0) * SWIRL_DEPTH_STEP + (fi * 0.7).sin() * SWIRL_DEPTH_WOBBLE);
        }
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat xyz buffer.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn point(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_produces_exact_count_within_radius_bounds() {
        let field = ParticleField::shell(1000, 200.0, 1400.0, 42).unwrap();
        assert_eq!(field.len(), 1000);
        for i in 0..field.len() {
            let d = field.point(i).length();
            assert!(
                (200.0 - 1e-2..=1400.0 + 1e-2).contains(&d),
                "point {i} at distance {d} escaped the shell"
            );
        }
    }

    #[test]
    fn shell_is_deterministic_for_a_seed() {
        let a = ParticleField::shell(64, 10.0, 20.0, 7).unwrap();
        let b = ParticleField::shell(64, 10.0, 20.0, 7).unwrap();
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn shell_zero_count_is_valid_and_empty() {
        let field = ParticleField::shell(0, 100.0, 200.0, 1).unwrap();
        assert!(field.is_empty());
    }

    #[test]
    fn shell_rejects_inverted_and_nan_radii() {
        assert!(ParticleField::shell(10, 500.0, 100.0, 1).is_err());
        assert!(ParticleField::shell(10, -1.0, 100.0, 1).is_err());
        assert!(ParticleField::shell(10, f32::NAN, 100.0, 1).is_err());
        assert!(ParticleField::shell(10, 0.0, f32::INFINITY, 1).is_err());
    }

    #[test]
    fn swirl_radius_grows_along_the_curve() {
        let field = ParticleField::swirl(1000);
        assert_eq!(field.len(), 1000);
        let near_start = field.point(10).truncate().length();
        let near_end = field.point(990).truncate().length();
        assert!(near_end > near_start);
    }
}
