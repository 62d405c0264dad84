// path.rs - Keyframe camera path
//
// An ordered list of (progress, position, look-target) waypoints and a
// clamped piecewise-linear sampler. Paths are short (<= 10 waypoints),
// so bracketing is a linear scan.

use glam::DVec3;

use crate::error::{EngineError, Result};

/// One keyframe on the fly-through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub progress: f64,
    pub position: DVec3,
    pub look_target: DVec3,
}

impl Waypoint {
    pub fn new(progress: f64, position: DVec3, look_target: DVec3) -> Self {
        Self { progress, position, look_target }
    }

    fn is_finite(&self) -> bool {
        self.progress.is_finite()
            && self.position.is_finite()
            && self.look_target.is_finite()
    }
}

/// Interpolated camera pose at some progress value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub look_target: DVec3,
}

impl From<&Waypoint> for CameraPose {
    fn from(w: &Waypoint) -> Self {
        Self { position: w.position, look_target: w.look_target }
    }
}

/// Validated waypoint sequence: at least two entries, progress values
/// finite, within [0, 1], and strictly increasing.
pub struct CameraPath {
    waypoints: Vec<Waypoint>,
}

impl CameraPath {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(EngineError::invalid(format!(
                "camera path needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }
        for (i, w) in waypoints.iter().enumerate() {
            if !w.is_finite() {
                return Err(EngineError::invalid(format!("waypoint {i} is not finite")));
            }
            if !(0.0..=1.0).contains(&w.progress) {
                return Err(EngineError::invalid(format!(
                    "waypoint {i} progress {} outside [0, 1]",
                    w.progress
                )));
            }
        }
        for pair in waypoints.windows(2) {
            if pair[1].progress <= pair[0].progress {
                return Err(EngineError::invalid(format!(
                    "waypoint progress not strictly increasing at {} -> {}",
                    pair[0].progress, pair[1].progress
                )));
            }
        }
        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Sample the pose at `progress`, clamped to the path's endpoints.
    /// Total over all inputs once construction has succeeded; out-of-range
    /// and non-finite progress clamp to the nearest endpoint pose.
    pub fn sample(&self, progress: f64) -> CameraPose {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };

        let first = &self.waypoints[0];
        let last = &self.waypoints[self.waypoints.len() - 1];
        if p <= first.progress {
            return first.into();
        }
        if p >= last.progress {
            return last.into();
        }

        // Linear scan for the bracketing pair.
        let mut i = 0;
        while self.waypoints[i + 1].progress < p {
            i += 1;
        }
        let (w0, w1) = (&self.waypoints[i], &self.waypoints[i + 1]);

        let span = w1.progress - w0.progress;
        // Validation forbids duplicate progress; keep the hard-cut guard anyway.
        let t = if span > 0.0 { (p - w0.progress) / span } else { 1.0 };

        CameraPose {
            position: w0.position.lerp(w1.position, t),
            look_target: w0.look_target.lerp(w1.look_target, t),
        }
    }
}
