// scene.rs - Scene graph: built geometry plus per-frame parameters
//
// Geometry is generated once at build and never rebuilt; only opacity,
// rotation, and sway offsets move per frame. The scheduler writes the
// driver's SceneState into the graph through `animate`.

use glam::{Vec2, Vec3};

use crate::config::{GroupId, SceneConfig};
use crate::error::Result;
use crate::geom::{ParticleField, SilhouettePolygon};
use crate::stage::{LayerRole, SceneState};

// Intro swirl motion (cinematic)
const SWIRL_SPIN: f64 = 0.47;
const SWIRL_TILT_FREQ: f64 = 0.54;
const SWIRL_TILT_AMP: f32 = 0.12;
const SWIRL_TILT_BASE: f32 = 0.17;
const SWIRL_BOB: f32 = 30.0;

// Mountain sway
const SWAY_FREQ_X: f64 = 0.7;
const SWAY_FREQ_Y: f64 = 0.9;
const SWAY_AMP_X: f32 = 14.0;
const SWAY_AMP_Y: f32 = 3.0;
const DEPTH_Y_FACTOR: f32 = 0.13;

/// Stable identifier for one animatable layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u16);

/// A star/fog shell or the intro swirl.
pub struct ParticleGroup {
    pub id: LayerId,
    pub group: GroupId,
    pub field: ParticleField,
    pub size: f32,
    pub color: u32,
    pub base_opacity: f64,
    pub rotation_speed: f64,
    swirl_motion: bool,

    // Animated per frame
    pub opacity: f64,
    pub rotation: Vec3,
    pub bob_z: f32,
    pub visible: bool,
}

/// One filled silhouette layer.
pub struct SilhouetteMesh {
    pub id: LayerId,
    pub polygon: SilhouettePolygon,
    pub depth: f32,
    pub color: u32,
    pub base_opacity: f64,
    order: usize,

    // Animated per frame
    pub opacity: f64,
    pub offset: Vec2,
    pub visible: bool,
}

/// Backdrop plane behind everything else.
pub struct NebulaPlane {
    pub id: LayerId,
    pub color: u32,
    pub base_opacity: f64,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    breathe_freq: f64,
    breathe_amp: f64,

    pub opacity: f64,
    pub visible: bool,
}

pub struct SceneGraph {
    pub particles: Vec<ParticleGroup>,
    pub mountains: Vec<SilhouetteMesh>,
    pub nebula: Option<NebulaPlane>,
}

impl SceneGraph {
    /// Generate all geometry from the declarative config. Runs once at
    /// init; invalid specs fail here, never at frame time.
    pub fn build(config: &SceneConfig) -> Result<Self> {
        let mut next_id = 0u16;
        let mut id = || {
            let v = LayerId(next_id);
            next_id += 1;
            v
        };

        let mut particles = Vec::new();
        if let Some(swirl) = &config.swirl {
            particles.push(ParticleGroup {
                id: id(),
                group: GroupId::Intro,
                field: ParticleField::swirl(swirl.count as usize),
                size: swirl.size,
                color: swirl.color,
                base_opacity: swirl.opacity,
                rotation_speed: SWIRL_SPIN,
                swirl_motion: true,
                opacity: swirl.opacity,
                rotation: Vec3::ZERO,
                bob_z: 0.0,
                visible: true,
            });
        }
        for spec in &config.particle_layers {
            particles.push(ParticleGroup {
                id: id(),
                group: spec.group,
                field: ParticleField::shell(
                    spec.count as usize,
                    spec.inner_radius,
                    spec.outer_radius,
                    spec.seed,
                )?,
                size: spec.size,
                color: spec.color,
                base_opacity: spec.opacity,
                rotation_speed: spec.rotation_speed,
                swirl_motion: false,
                opacity: spec.opacity,
                rotation: Vec3::ZERO,
                bob_z: 0.0,
                visible: true,
            });
        }

        let mut mountains = Vec::new();
        for (order, spec) in config.mountain_layers.iter().enumerate() {
            let s = &config.silhouette;
            mountains.push(SilhouetteMesh {
                id: id(),
                polygon: SilhouettePolygon::build(spec, s.width, s.base_drop, s.segments as usize)?,
                depth: spec.depth_offset,
                color: spec.color,
                base_opacity: spec.opacity,
                order,
                opacity: spec.opacity,
                offset: Vec2::new(0.0, spec.depth_offset * DEPTH_Y_FACTOR),
                visible: true,
            });
        }

        let nebula = config.nebula.as_ref().map(|spec| NebulaPlane {
            id: id(),
            color: spec.color,
            base_opacity: spec.opacity,
            width: spec.width,
            height: spec.height,
            depth: spec.depth,
            breathe_freq: spec.breathe_freq,
            breathe_amp: spec.breathe_amp,
            opacity: spec.opacity,
            visible: true,
        });

        Ok(Self { particles, mountains, nebula })
    }

    /// Stage-relevant layer facts for the driver.
    pub fn layer_roles(&self) -> Vec<LayerRole> {
        let mut roles = Vec::new();
        for p in &self.particles {
            roles.push(LayerRole { id: p.id, group: p.group, base_opacity: p.base_opacity });
        }
        for m in &self.mountains {
            roles.push(LayerRole { id: m.id, group: GroupId::World, base_opacity: m.base_opacity });
        }
        if let Some(n) = &self.nebula {
            roles.push(LayerRole { id: n.id, group: GroupId::World, base_opacity: n.base_opacity });
        }
        roles
    }

    /// Write the frame's state into the mutable scene parameters and
    /// advance the ambient motion (rotation, sway, breathing).
    pub fn animate(&mut self, elapsed_seconds: f64, state: &SceneState) {
        let t = elapsed_seconds;

        for p in &mut self.particles {
            p.opacity = state.layer_opacities.get(&p.id).copied().unwrap_or(p.base_opacity);
            p.visible = state.visibility.get(&p.group).copied().unwrap_or(true);
            if p.swirl_motion {
                p.rotation.y = (t * SWIRL_SPIN) as f32;
                p.rotation.x = ((t * SWIRL_TILT_FREQ).sin() as f32) * SWIRL_TILT_AMP + SWIRL_TILT_BASE;
                p.bob_z = ((t * SWIRL_SPIN).sin() as f32) * SWIRL_BOB;
            } else {
                p.rotation.y = (t * p.rotation_speed) as f32;
            }
        }

        let world_visible = state.visibility.get(&GroupId::World).copied().unwrap_or(true);
        for m in &mut self.mountains {
            m.opacity = state.layer_opacities.get(&m.id).copied().unwrap_or(m.base_opacity);
            m.visible = world_visible;
            let i = m.order as f64;
            let factor = (m.order + 1) as f32;
            m.offset.x = ((t * SWAY_FREQ_X + i).sin() as f32) * SWAY_AMP_X * factor;
            m.offset.y =
                m.depth * DEPTH_Y_FACTOR + ((t * SWAY_FREQ_Y + i).cos() as f32) * SWAY_AMP_Y * factor;
        }

        if let Some(n) = &mut self.nebula {
            let driven = state.layer_opacities.get(&n.id).copied().unwrap_or(n.base_opacity);
            n.opacity = (driven + (t * n.breathe_freq).sin() * n.breathe_amp).max(0.0);
            n.visible = world_visible;
        }
    }

    /// Drop all generated geometry. Called from teardown.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.mountains.clear();
        self.nebula = None;
    }
}
