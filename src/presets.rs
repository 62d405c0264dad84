// presets.rs - Stock scene configurations
//
// One preset per hero-background look. Constants that differed between
// the site's variants live here as data, not in engine code.

use crate::config::{
    CameraSettings, DriveMode, GroupId, LayerSpec, NebulaSpec, ParticleSpec, PathPoint,
    SceneConfig, SilhouetteSettings, StageTimeline, SwirlSpec, WaypointSpec,
};

fn waypoint(progress: f64, pos: [f64; 3], look: [f64; 3]) -> WaypointSpec {
    WaypointSpec {
        progress,
        position: PathPoint { x: pos[0], y: pos[1], z: pos[2] },
        look_target: PathPoint { x: look[0], y: look[1], z: look[2] },
    }
}

/// Time-driven cinematic: swirl intro, fade, then a fly-through over the
/// landscape. Waypoint times from the original 10.5 s timeline,
/// normalized to progress.
pub fn cinematic() -> SceneConfig {
    SceneConfig {
        drive_mode: DriveMode::Time,
        camera_path: vec![
            waypoint(0.0, [0.0, 0.0, 780.0], [0.0, 0.0, 0.0]),
            waypoint(1.5 / 10.5, [0.0, 0.0, 390.0], [0.0, 0.0, 0.0]),
            waypoint(2.7 / 10.5, [0.0, 20.0, 170.0], [0.0, 0.0, 0.0]),
            waypoint(4.1 / 10.5, [0.0, 55.0, 120.0], [0.0, 0.0, -600.0]),
            waypoint(7.2 / 10.5, [0.0, 95.0, -600.0], [0.0, 40.0, -900.0]),
            waypoint(1.0, [0.0, 220.0, -1700.0], [0.0, 100.0, -1700.0]),
        ],
        particle_layers: vec![ParticleSpec {
            // Depth fog around the swirl; fades out with it.
            count: 2100,
            inner_radius: 350.0,
            outer_radius: 1650.0,
            size: 22.0,
            color: 0x7fdfff,
            opacity: 0.13,
            rotation_speed: 0.47,
            group: GroupId::Intro,
            seed: 11,
        }],
        mountain_layers: vec![
            LayerSpec { depth_offset: -220.0, color: 0x16213e, opacity: 1.0, amplitude: 85.0, seed_index: 0 },
            LayerSpec { depth_offset: -400.0, color: 0x1a1a2e, opacity: 0.79, amplitude: 130.0, seed_index: 1 },
            LayerSpec { depth_offset: -650.0, color: 0x0f3460, opacity: 0.53, amplitude: 210.0, seed_index: 2 },
            LayerSpec { depth_offset: -1050.0, color: 0x0a4668, opacity: 0.22, amplitude: 360.0, seed_index: 3 },
        ],
        silhouette: SilhouetteSettings { width: 2600.0, segments: 75, base_drop: 210.0 },
        nebula: Some(NebulaSpec {
            color: 0x215aff,
            opacity: 0.17,
            width: 9000.0,
            height: 4000.0,
            depth: -1100.0,
            breathe_freq: 0.7,
            breathe_amp: 0.04,
        }),
        swirl: Some(SwirlSpec { count: 1000, size: 12.0, color: 0xffffff, opacity: 0.87 }),
        timeline: StageTimeline::default(),
        camera: CameraSettings {
            fov_degrees: 80.0,
            near: 0.1,
            far: 6000.0,
            smoothing: None,
            idle_float: false,
        },
    }
}

/// Scroll-driven parallax: three star shells and four mountain layers,
/// camera cut directly to the sampled pose.
pub fn parallax() -> SceneConfig {
    SceneConfig {
        drive_mode: DriveMode::Scroll,
        camera_path: vec![
            waypoint(0.0, [0.0, 30.0, 300.0], [0.0, 10.0, -600.0]),
            waypoint(0.5, [0.0, 40.0, -50.0], [0.0, 10.0, -600.0]),
            waypoint(1.0, [0.0, 55.0, -700.0], [0.0, 10.0, -600.0]),
        ],
        particle_layers: vec![
            star_shell(1600, 200.0, 1400.0, 1.5, 0xffffff, 0.70, 0.21, 1),
            star_shell(1600, 200.0, 1400.0, 2.4, 0x9fdcff, 0.50, 0.15, 2),
            star_shell(1600, 200.0, 1400.0, 3.3, 0xffe6fc, 0.30, 0.105, 3),
        ],
        mountain_layers: vec![
            LayerSpec { depth_offset: -40.0, color: 0x14213d, opacity: 1.0, amplitude: 60.0, seed_index: 0 },
            LayerSpec { depth_offset: -90.0, color: 0x163060, opacity: 0.7, amplitude: 90.0, seed_index: 1 },
            LayerSpec { depth_offset: -160.0, color: 0x0a1c35, opacity: 0.5, amplitude: 120.0, seed_index: 2 },
            LayerSpec { depth_offset: -230.0, color: 0x0e1733, opacity: 0.27, amplitude: 170.0, seed_index: 3 },
        ],
        silhouette: SilhouetteSettings { width: 1400.0, segments: 46, base_drop: 150.0 },
        nebula: Some(NebulaSpec {
            color: 0x3344aa,
            opacity: 0.16,
            width: 4000.0,
            height: 2000.0,
            depth: -1050.0,
            breathe_freq: 0.7,
            breathe_amp: 0.04,
        }),
        swirl: None,
        timeline: StageTimeline::default(),
        camera: CameraSettings::default(),
    }
}

/// Scroll-driven cosmos look: smoothed camera with idle float, tighter
/// star shells, shallower mountain stack.
pub fn cosmos() -> SceneConfig {
    SceneConfig {
        drive_mode: DriveMode::Scroll,
        camera_path: vec![
            waypoint(0.0, [0.0, 30.0, 300.0], [0.0, 10.0, -600.0]),
            waypoint(0.5, [0.0, 40.0, -50.0], [0.0, 10.0, -600.0]),
            waypoint(1.0, [0.0, 50.0, -700.0], [0.0, 10.0, -600.0]),
        ],
        particle_layers: vec![
            star_shell(2200, 200.0, 1000.0, 1.1, 0xffffff, 0.75, 0.050, 1),
            star_shell(2200, 200.0, 1000.0, 1.7, 0xffe0c2, 0.55, 0.035, 2),
            star_shell(2200, 200.0, 1000.0, 2.3, 0x9fb9ff, 0.35, 0.020, 3),
        ],
        mountain_layers: vec![
            LayerSpec { depth_offset: -50.0, color: 0x1a1a2e, opacity: 1.0, amplitude: 60.0, seed_index: 0 },
            LayerSpec { depth_offset: -100.0, color: 0x16213e, opacity: 0.8, amplitude: 80.0, seed_index: 1 },
            LayerSpec { depth_offset: -150.0, color: 0x0f3460, opacity: 0.6, amplitude: 100.0, seed_index: 2 },
            LayerSpec { depth_offset: -200.0, color: 0x0a4668, opacity: 0.4, amplitude: 120.0, seed_index: 3 },
        ],
        silhouette: SilhouetteSettings { width: 1000.0, segments: 50, base_drop: 100.0 },
        nebula: Some(NebulaSpec {
            color: 0x3355ff,
            opacity: 0.17,
            width: 8000.0,
            height: 4000.0,
            depth: -1050.0,
            breathe_freq: 0.5,
            breathe_amp: 0.03,
        }),
        swirl: None,
        timeline: StageTimeline::default(),
        camera: CameraSettings {
            fov_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
            smoothing: Some(0.07),
            idle_float: true,
        },
    }
}

/// Minimal single-shell starfield with a fixed camera.
pub fn starfield() -> SceneConfig {
    SceneConfig {
        drive_mode: DriveMode::Scroll,
        camera_path: vec![
            waypoint(0.0, [0.0, 0.0, 700.0], [0.0, 0.0, 0.0]),
            waypoint(1.0, [0.0, 0.0, 700.0], [0.0, 0.0, 0.0]),
        ],
        particle_layers: vec![star_shell(1200, 400.0, 1600.0, 2.0, 0xffffff, 1.0, 0.042, 7)],
        mountain_layers: vec![],
        silhouette: SilhouetteSettings::default(),
        nebula: None,
        swirl: None,
        timeline: StageTimeline::default(),
        camera: CameraSettings::default(),
    }
}

fn star_shell(
    count: u32,
    inner: f32,
    outer: f32,
    size: f32,
    color: u32,
    opacity: f64,
    rotation_speed: f64,
    seed: u32,
) -> ParticleSpec {
    ParticleSpec {
        count,
        inner_radius: inner,
        outer_radius: outer,
        size,
        color,
        opacity,
        rotation_speed,
        group: GroupId::World,
        seed,
    }
}
