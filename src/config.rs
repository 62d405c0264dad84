// config.rs - Declarative scene description
//
// A scene is plain data: particle shells, silhouette layers, a camera
// path, and timing. Presets cover the stock looks; hosts can ship JSON
// to re-tune visuals without touching scheduler logic.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::path::{CameraPath, Waypoint};

/// What advances the scene: wall-clock time (cinematic intro) or the
/// page's normalized scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    Time,
    #[default]
    Scroll,
}

/// Which half of the scene a layer belongs to. The intro group is only
/// shown before the landscape reveal; the world group after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupId {
    Intro,
    #[default]
    World,
}

/// One parametric silhouette layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    /// Z placement; more negative sits further back.
    pub depth_offset: f32,
    /// 0xRRGGBB fill color.
    pub color: u32,
    pub opacity: f64,
    /// Ridge height scale.
    pub amplitude: f32,
    /// Decorrelates this layer's ridge from its neighbors.
    pub seed_index: u32,
}

/// One spherical star/fog shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSpec {
    pub count: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub size: f32,
    pub color: u32,
    pub opacity: f64,
    /// Radians per second around the vertical axis.
    pub rotation_speed: f64,
    #[serde(default)]
    pub group: GroupId,
    #[serde(default)]
    pub seed: u32,
}

/// Backdrop nebula plane with a slow opacity breathe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NebulaSpec {
    pub color: u32,
    pub opacity: f64,
    #[serde(default = "default_nebula_width")]
    pub width: f32,
    #[serde(default = "default_nebula_height")]
    pub height: f32,
    #[serde(default = "default_nebula_depth")]
    pub depth: f32,
    #[serde(default = "default_breathe_freq")]
    pub breathe_freq: f64,
    #[serde(default = "default_breathe_amp")]
    pub breathe_amp: f64,
}

fn default_nebula_width() -> f32 { 8000.0 }
fn default_nebula_height() -> f32 { 4000.0 }
fn default_nebula_depth() -> f32 { -1050.0 }
fn default_breathe_freq() -> f64 { 0.7 }
fn default_breathe_amp() -> f64 { 0.04 }

/// Intro swirl point cloud (cinematic mode only).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwirlSpec {
    pub count: u32,
    pub size: f32,
    pub color: u32,
    pub opacity: f64,
}

/// Shared silhouette shape parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SilhouetteSettings {
    pub width: f32,
    pub segments: u32,
    /// How far the ridge midline sits below the horizon.
    pub base_drop: f32,
}

impl Default for SilhouetteSettings {
    fn default() -> Self {
        Self { width: 1400.0, segments: 46, base_drop: 150.0 }
    }
}

/// Stage thresholds and the intro fade window, all in seconds of
/// elapsed time (time mode). `reveal_progress` gates the Revealed latch
/// in scroll mode instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimeline {
    pub transition_at: f64,
    pub landscape_at: f64,
    pub reveal_at: f64,
    pub fade_start: f64,
    pub fade_duration: f64,
    /// Seconds the full camera path spans in time mode.
    pub path_duration: f64,
    #[serde(default)]
    pub reveal_progress: f64,
}

impl Default for StageTimeline {
    fn default() -> Self {
        Self {
            transition_at: 1.1,
            landscape_at: 3.05,
            reveal_at: 11.2,
            fade_start: 2.6,
            fade_duration: 0.7,
            path_duration: 10.5,
            reveal_progress: 0.0,
        }
    }
}

/// Projection and camera motion tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Exponential approach factor per tick toward the sampled pose;
    /// `None` snaps directly.
    #[serde(default)]
    pub smoothing: Option<f64>,
    /// Small sinusoidal drift once the landscape is visible.
    #[serde(default)]
    pub idle_float: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self { fov_degrees: 75.0, near: 0.1, far: 2000.0, smoothing: None, idle_float: false }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<PathPoint> for DVec3 {
    fn from(p: PathPoint) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

/// One declarative waypoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointSpec {
    pub progress: f64,
    pub position: PathPoint,
    pub look_target: PathPoint,
}

/// The full declarative scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    #[serde(default)]
    pub drive_mode: DriveMode,
    pub camera_path: Vec<WaypointSpec>,
    #[serde(default)]
    pub particle_layers: Vec<ParticleSpec>,
    #[serde(default)]
    pub mountain_layers: Vec<LayerSpec>,
    #[serde(default)]
    pub silhouette: SilhouetteSettings,
    #[serde(default)]
    pub nebula: Option<NebulaSpec>,
    #[serde(default)]
    pub swirl: Option<SwirlSpec>,
    #[serde(default)]
    pub timeline: StageTimeline,
    #[serde(default)]
    pub camera: CameraSettings,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation. Degenerate-but-valid values (zero counts,
    /// zero amplitude) pass; NaN and out-of-domain values do not.
    pub fn validate(&self) -> Result<()> {
        self.build_path()?;

        for (i, layer) in self.particle_layers.iter().enumerate() {
            check_opacity(layer.opacity, &format!("particle layer {i}"))?;
            if !layer.rotation_speed.is_finite() {
                return Err(EngineError::invalid(format!(
                    "particle layer {i} rotation speed is not finite"
                )));
            }
        }
        for (i, layer) in self.mountain_layers.iter().enumerate() {
            check_opacity(layer.opacity, &format!("mountain layer {i}"))?;
            if !layer.depth_offset.is_finite() {
                return Err(EngineError::invalid(format!(
                    "mountain layer {i} depth offset is not finite"
                )));
            }
        }
        if let Some(nebula) = &self.nebula {
            check_opacity(nebula.opacity, "nebula")?;
        }
        if let Some(swirl) = &self.swirl {
            check_opacity(swirl.opacity, "swirl")?;
        }

        let t = &self.timeline;
        let ordered = t.transition_at < t.landscape_at && t.landscape_at < t.reveal_at;
        if !ordered || ![t.transition_at, t.landscape_at, t.reveal_at].iter().all(|v| v.is_finite()) {
            return Err(EngineError::invalid("stage thresholds must be finite and increasing"));
        }
        if !(t.fade_duration > 0.0) || !t.fade_start.is_finite() {
            return Err(EngineError::invalid("fade window must have positive duration"));
        }
        if !(t.path_duration > 0.0) {
            return Err(EngineError::invalid("camera path duration must be positive"));
        }
        if !(t.reveal_progress.is_finite() && (0.0..=1.0).contains(&t.reveal_progress)) {
            return Err(EngineError::invalid("reveal progress must lie in [0, 1]"));
        }

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(EngineError::invalid(format!(
                "field of view {} outside (0, 180)",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(EngineError::invalid("camera planes must satisfy 0 < near < far"));
        }
        if let Some(s) = cam.smoothing {
            if !(s.is_finite() && (0.0..=1.0).contains(&s)) {
                return Err(EngineError::invalid("camera smoothing must lie in [0, 1]"));
            }
        }
        Ok(())
    }

    /// The validated runtime path.
    pub fn build_path(&self) -> Result<CameraPath> {
        let waypoints = self
            .camera_path
            .iter()
            .map(|w| Waypoint::new(w.progress, w.position.into(), w.look_target.into()))
            .collect();
        CameraPath::new(waypoints)
    }
}

fn check_opacity(value: f64, what: &str) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid(format!("{what} opacity {value} outside [0, 1]")))
    }
}

/// Split 0xRRGGBB into linear-ish [r, g, b] in [0, 1].
pub fn color_rgb(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}
