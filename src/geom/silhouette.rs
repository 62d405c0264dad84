// silhouette.rs - Layered mountain silhouettes
//
// A 1-D ridge height-field from a sum of sinusoids, decorrelated per
// layer through its seed index, closed far below the horizon so the
// filled shape never shows a gap at the screen edges.

use glam::Vec2;

use super::XorShift32;
use crate::config::LayerSpec;
use crate::error::{EngineError, Result};

// Ridge shape
const FREQ_A: f32 = 0.13;
const FREQ_B: f32 = 0.07;
const PHASE_A: f32 = 0.19;
const PHASE_B: f32 = 0.31;
const SECONDARY_SCALE: f32 = 0.5;
const JITTER_SCALE: f32 = 0.17;
const LIFT_STEP: f32 = 30.0;

// Edge points dip further so extreme camera angles cannot see over
// the silhouette rim.
const EDGE_DIP: f32 = 100.0;
const EDGE_DIP_STEP: f32 = 30.0;

// Closing anchors sit well past the screen and far below the ridge.
const ANCHOR_SPAN: f32 = 2.0;
const ANCHOR_DEPTH: f32 = 3.0;

/// A closed silhouette polygon: `segments + 1` ridge points followed by
/// two far-below anchors, wound so the filled shape reads as terrain.
pub struct SilhouettePolygon {
    points: Vec<Vec2>,
    segments: usize,
}

impl SilhouettePolygon {
    pub fn build(spec: &LayerSpec, width: f32, base_drop: f32, segments: usize) -> Result<Self> {
        if !spec.amplitude.is_finite() {
            return Err(EngineError::invalid("silhouette amplitude is not finite"));
        }
        if !width.is_finite() || width < 0.0 {
            return Err(EngineError::invalid(format!(
                "silhouette width {width} is negative or not finite"
            )));
        }
        if !base_drop.is_finite() {
            return Err(EngineError::invalid("silhouette base drop is not finite"));
        }

        let idx = spec.seed_index as f32;
        let amp = spec.amplitude;
        let mut rng = XorShift32::new(0x51A0 ^ spec.seed_index.wrapping_mul(0x9E3779B9));

        let div = segments.max(1) as f32;
        let mut points = Vec::with_capacity(segments + 3);
        for i in 0..=segments {
            let fi = i as f32;
            let x = (fi / div - 0.5) * width;
            let mut y = (fi * FREQ_A + idx * PHASE_A).sin() * amp
                + (fi * FREQ_B + idx * PHASE_B).sin() * amp * SECONDARY_SCALE
                + rng.next_f32() * amp * JITTER_SCALE
                - base_drop
                + idx * LIFT_STEP;
            if i == 0 || i == segments {
                y -= EDGE_DIP + idx * EDGE_DIP_STEP;
            }
            points.push(Vec2::new(x, y));
        }

        // Close the shape far outside the visible frustum.
        let anchor_x = (width * ANCHOR_SPAN).max(1.0);
        let anchor_y = -(base_drop.abs().max(amp.abs()) * ANCHOR_DEPTH + EDGE_DIP);
        points.push(Vec2::new(anchor_x, anchor_y));
        points.push(Vec2::new(-anchor_x, anchor_y));

        Ok(Self { points, segments })
    }

    /// All polygon points, anchors included.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Ridge points only.
    pub fn ridge(&self) -> &[Vec2] {
        &self.points[..=self.segments]
    }

    /// Flat xy buffer for the host.
    pub fn flat_xy(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        for p in &self.points {
            out.push(p.x);
            out.push(p.y);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(amplitude: f32, seed_index: u32) -> LayerSpec {
        LayerSpec {
            depth_offset: -220.0,
            color: 0x16213e,
            opacity: 1.0,
            amplitude,
            seed_index,
        }
    }

    #[test]
    fn polygon_has_ridge_plus_two_anchors() {
        let poly = SilhouettePolygon::build(&spec(85.0, 0), 2600.0, 210.0, 75).unwrap();
        assert_eq!(poly.points().len(), 76 + 2);
        assert_eq!(poly.ridge().len(), 76);
    }

    #[test]
    fn anchors_sit_below_every_ridge_point_and_past_the_edges() {
        let poly = SilhouettePolygon::build(&spec(130.0, 1), 1400.0, 150.0, 46).unwrap();
        let anchors = &poly.points()[poly.points().len() - 2..];
        let lowest_ridge = poly.ridge().iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        for a in anchors {
            assert!(a.y < lowest_ridge);
            assert!(a.x.abs() > 1400.0 / 2.0);
        }
    }

    #[test]
    fn edge_points_dip_below_their_neighbors() {
        let poly = SilhouettePolygon::build(&spec(0.0, 2), 1000.0, 100.0, 50).unwrap();
        let ridge = poly.ridge();
        assert!(ridge[0].y < ridge[1].y);
        assert!(ridge[50].y < ridge[49].y);
    }

    #[test]
    fn zero_segments_and_zero_amplitude_still_close() {
        let poly = SilhouettePolygon::build(&spec(0.0, 0), 1000.0, 100.0, 0).unwrap();
        // One ridge point plus the two anchors: still a valid filled shape.
        assert_eq!(poly.points().len(), 3);
        assert!(poly.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn nan_amplitude_is_rejected() {
        let err = SilhouettePolygon::build(&spec(f32::NAN, 0), 1000.0, 100.0, 10);
        assert!(matches!(err, Err(crate::error::EngineError::InvalidParameter(_))));
    }

    #[test]
    fn layers_decorrelate_by_seed_index() {
        let a = SilhouettePolygon::build(&spec(100.0, 0), 1000.0, 100.0, 40).unwrap();
        let b = SilhouettePolygon::build(&spec(100.0, 1), 1000.0, 100.0, 40).unwrap();
        let same = a
            .ridge()
            .iter()
            .zip(b.ridge())
            .filter(|(p, q)| (p.y - q.y).abs() < 1e-6)
            .count();
        assert!(same < a.ridge().len() / 4);
    }
}
