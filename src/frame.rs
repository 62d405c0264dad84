// frame.rs - Frame scheduler and lifecycle
//
// One tick per display refresh: read signals, advance the driver,
// sample the path, write the results into the scene graph, issue a
// single draw call. The host environment drives `frame()`; this side
// guarantees at most one pending callback, a dead engine stays dead,
// and teardown is idempotent.

use glam::DVec3;

use crate::config::SceneConfig;
use crate::error::{EngineError, Result};
use crate::path::{CameraPath, CameraPose};
use crate::scene::SceneGraph;
use crate::stage::{SceneState, Stage, StageDriver};

// Idle camera drift (landscape stages only)
const FLOAT_FREQ_X: f64 = 0.1;
const FLOAT_FREQ_Y: f64 = 0.15;
const FLOAT_AMP_X: f64 = 2.0;
const FLOAT_AMP_Y: f64 = 1.0;

/// Projection parameters. Only the aspect changes after construction,
/// and only through `resize`.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// The drawable surface collaborator. The engine does not know how
/// pixels are produced; it hands over the scene graph and a pose once
/// per frame.
pub trait DrawSurface {
    fn resize(&mut self, width: u32, height: u32);
    fn render_frame(
        &mut self,
        graph: &SceneGraph,
        camera: &CameraPose,
        projection: &Projection,
    ) -> Result<()>;
}

/// The scroll/time signal collaborator. Values are read once per tick,
/// latest wins; stale events are never queued.
pub trait SignalSource {
    fn elapsed_seconds(&self) -> f64;
    fn scroll_fraction(&self) -> f64;
}

/// Everything the per-frame path touches, owned in one place and
/// passed by reference - no module-level singletons.
pub struct SceneContext {
    pub graph: SceneGraph,
    pub path: CameraPath,
    pub driver: StageDriver,
    pub state: SceneState,
    pub projection: Projection,
    smoothing: Option<f64>,
    idle_float: bool,
    render_pose: CameraPose,
}

pub struct FrameScheduler<S, C> {
    surface: S,
    signals: C,
    ctx: SceneContext,
    alive: bool,
    running: bool,
    pending: bool,
    surface_lost: bool,
}

impl<S: DrawSurface, C: SignalSource> FrameScheduler<S, C> {
    /// Validate the config, generate all geometry, and wire the
    /// collaborators. Everything that can fail fails here.
    pub fn new(config: &SceneConfig, surface: S, signals: C) -> Result<Self> {
        config.validate()?;
        let graph = SceneGraph::build(config)?;
        let path = config.build_path()?;
        let driver = StageDriver::new(config.drive_mode, config.timeline, graph.layer_roles());
        let initial_pose = path.sample(0.0);

        log::info!(
            "scene built: {} particle groups, {} silhouettes, nebula: {}",
            graph.particles.len(),
            graph.mountains.len(),
            graph.nebula.is_some(),
        );

        Ok(Self {
            ctx: SceneContext {
                graph,
                path,
                driver,
                state: SceneState::initial(initial_pose),
                projection: Projection {
                    fov_degrees: config.camera.fov_degrees,
                    aspect: 1.0,
                    near: config.camera.near,
                    far: config.camera.far,
                },
                smoothing: config.camera.smoothing,
                idle_float: config.camera.idle_float,
                render_pose: initial_pose,
            },
            surface,
            signals,
            alive: true,
            running: false,
            pending: false,
            surface_lost: false,
        })
    }

    /// Begin scheduling. A no-op once torn down or after surface loss.
    pub fn start(&mut self) {
        if !self.alive || self.surface_lost {
            return;
        }
        self.running = true;
        self.pending = true;
    }

    /// Stop scheduling and drop the pending callback. The scene stays
    /// intact; `start` resumes it.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = false;
    }

    /// One display tick. Runs only if a callback is pending and the
    /// engine is alive; otherwise it is a no-op, so a tick already in
    /// flight when teardown lands writes nothing.
    pub fn frame(&mut self) -> Result<()> {
        if !self.alive || !self.pending {
            return Ok(());
        }
        self.pending = false;

        let elapsed = self.signals.elapsed_seconds();
        let scroll = self.signals.scroll_fraction();

        let ctx = &mut self.ctx;
        ctx.driver.advance(&mut ctx.state, &ctx.path, elapsed, scroll);
        ctx.graph.animate(elapsed, &ctx.state);
        ctx.render_pose = Self::resolve_pose(ctx, elapsed);

        if let Err(err) = self
            .surface
            .render_frame(&ctx.graph, &ctx.render_pose, &ctx.projection)
        {
            // Fatal but local: stop scheduling, report once.
            log::warn!("draw surface lost, stopping: {err}");
            self.surface_lost = true;
            self.running = false;
            self.pending = false;
            return Err(match err {
                EngineError::ResourceUnavailable(_) => err,
                other => EngineError::ResourceUnavailable(other.to_string()),
            });
        }

        if self.running {
            self.pending = true;
        }
        Ok(())
    }

    /// Smoothed pose plus the idle float, both optional per config.
    fn resolve_pose(ctx: &mut SceneContext, elapsed: f64) -> CameraPose {
        let target = ctx.state.camera_pose;
        let mut pose = match ctx.smoothing {
            Some(s) => CameraPose {
                position: ctx.render_pose.position.lerp(target.position, s),
                look_target: ctx.render_pose.look_target.lerp(target.look_target, s),
            },
            None => target,
        };
        if ctx.idle_float && ctx.state.stage >= Stage::Landscape {
            pose.position += DVec3::new(
                (elapsed * FLOAT_FREQ_X).sin() * FLOAT_AMP_X,
                (elapsed * FLOAT_FREQ_Y).cos() * FLOAT_AMP_Y,
                0.0,
            );
        }
        pose
    }

    /// Viewport change: recompute the aspect and the output buffer,
    /// nothing else. Geometry is never rebuilt here.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.alive {
            return;
        }
        self.ctx.projection.aspect = width as f32 / height.max(1) as f32;
        self.surface.resize(width, height);
    }

    /// Cancel scheduling and release all generated geometry. Safe to
    /// call any number of times.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.running = false;
        self.pending = false;
        self.ctx.graph.clear();
        log::info!("scene torn down");
    }

    /// Scheduled-but-not-run callbacks: 0 or 1 by construction.
    pub fn pending_callbacks(&self) -> usize {
        self.pending as usize
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Read-only state published to the DOM side each tick.
    pub fn published(&self) -> (Stage, f64) {
        (self.ctx.state.stage, self.ctx.state.progress)
    }

    pub fn state(&self) -> &SceneState {
        &self.ctx.state
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.ctx.graph
    }

    pub fn render_pose(&self) -> &CameraPose {
        &self.ctx.render_pose
    }

    pub fn projection(&self) -> &Projection {
        &self.ctx.projection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn signals_mut(&mut self) -> &mut C {
        &mut self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    struct MockSurface {
        renders: usize,
        resizes: Vec<(u32, u32)>,
        fail: bool,
    }

    impl MockSurface {
        fn new() -> Self {
            Self { renders: 0, resizes: Vec::new(), fail: false }
        }
    }

    impl DrawSurface for MockSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }

        fn render_frame(
            &mut self,
            _graph: &SceneGraph,
            _camera: &CameraPose,
            _projection: &Projection,
        ) -> Result<()> {
            self.renders += 1;
            if self.fail {
                Err(EngineError::ResourceUnavailable("canvas detached".into()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct TestSignals {
        elapsed: f64,
        scroll: f64,
    }

    impl SignalSource for TestSignals {
        fn elapsed_seconds(&self) -> f64 {
            self.elapsed
        }

        fn scroll_fraction(&self) -> f64 {
            self.scroll
        }
    }

    fn scheduler(
        config: &crate::config::SceneConfig,
    ) -> FrameScheduler<MockSurface, TestSignals> {
        FrameScheduler::new(config, MockSurface::new(), TestSignals::default()).unwrap()
    }

    #[test]
    fn draws_once_per_tick_while_running() {
        let mut sched = scheduler(&presets::parallax());
        sched.start();
        for _ in 0..3 {
            sched.frame().unwrap();
        }
        assert_eq!(sched.surface().renders, 3);
        assert_eq!(sched.pending_callbacks(), 1);
    }

    #[test]
    fn no_frames_before_start_or_after_stop() {
        let mut sched = scheduler(&presets::parallax());
        sched.frame().unwrap();
        assert_eq!(sched.surface().renders, 0);

        sched.start();
        sched.stop();
        assert_eq!(sched.pending_callbacks(), 0);
        sched.frame().unwrap();
        assert_eq!(sched.surface().renders, 0);
    }

    #[test]
    fn teardown_is_idempotent_and_cancels_the_pending_callback() {
        let mut sched = scheduler(&presets::cosmos());
        sched.start();
        assert_eq!(sched.pending_callbacks(), 1);

        sched.teardown();
        sched.teardown();
        assert_eq!(sched.pending_callbacks(), 0);
        assert!(!sched.is_alive());

        // A tick that was already queued in the host is a no-op.
        sched.frame().unwrap();
        assert_eq!(sched.surface().renders, 0);
        assert!(sched.graph().particles.is_empty());
    }

    #[test]
    fn start_after_teardown_stays_dead() {
        let mut sched = scheduler(&presets::starfield());
        sched.teardown();
        sched.start();
        assert_eq!(sched.pending_callbacks(), 0);
    }

    #[test]
    fn surface_loss_reports_once_then_goes_quiet() {
        let mut sched = scheduler(&presets::parallax());
        sched.start();
        sched.frame().unwrap();

        // Surface dies under us.
        sched.surface_mut().fail = true;
        let err = sched.frame();
        assert!(matches!(err, Err(EngineError::ResourceUnavailable(_))));

        // Reported once: later ticks are silent no-ops, no further draws.
        let renders = sched.surface().renders;
        sched.frame().unwrap();
        sched.frame().unwrap();
        assert_eq!(sched.surface().renders, renders);
        assert_eq!(sched.pending_callbacks(), 0);
    }

    #[test]
    fn resize_touches_projection_but_not_geometry() {
        let mut sched = scheduler(&presets::parallax());
        let before = sched.graph().particles[0].field.positions().as_ptr();

        sched.resize(1920, 1080);
        assert!((sched.projection().aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(sched.surface().resizes, vec![(1920, 1080)]);

        let after = sched.graph().particles[0].field.positions().as_ptr();
        assert_eq!(before, after, "resize must not rebuild geometry");

        // Degenerate height clamps instead of dividing by zero.
        sched.resize(800, 0);
        assert!(sched.projection().aspect.is_finite());
    }

    #[test]
    fn scroll_ticks_move_the_camera_along_the_path() {
        let mut sched = scheduler(&presets::parallax());
        sched.start();

        let mut prev_z = f64::INFINITY;
        for scroll in [0.0, 0.25, 0.5, 0.75, 1.0] {
            sched.signals_mut().scroll = scroll;
            sched.frame().unwrap();
            let z = sched.render_pose().position.z;
            assert!(z < prev_z, "camera z must fall as scroll grows");
            prev_z = z;
        }
        let (stage, progress) = sched.published();
        assert_eq!(progress, 1.0);
        assert!(stage >= Stage::Landscape);
    }

    #[test]
    fn smoothed_camera_approaches_the_target_without_overshoot() {
        let mut sched = scheduler(&presets::cosmos());
        sched.start();
        sched.signals_mut().scroll = 1.0;

        let target_z = -700.0;
        let mut prev_gap = f64::INFINITY;
        for _ in 0..50 {
            sched.frame().unwrap();
            let render_gap = (sched.render_pose().position.z - target_z).abs();
            assert!(render_gap <= prev_gap + 1e-9, "smoothing must not oscillate outward");
            prev_gap = render_gap;
        }
        assert!(prev_gap < 700.0 * 0.5, "pose should have closed most of the gap");
    }
}
