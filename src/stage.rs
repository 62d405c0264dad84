// stage.rs - Stage machine and per-frame scene state
//
// Converts the two external signals (elapsed time, scroll fraction)
// into a progress value, a latched stage, and per-layer opacity and
// visibility. Transitions are one-way; nothing here can error once
// construction has succeeded.

use std::collections::HashMap;

use crate::config::{DriveMode, GroupId, StageTimeline};
use crate::path::{CameraPath, CameraPose};
use crate::scene::LayerId;

/// Cinematic stages, strictly ordered. The latch never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Intro,
    Transition,
    Landscape,
    Revealed,
}

/// Per-frame aggregate the scheduler applies to the scene graph.
/// Re-derived on every advance; owned by the frame scheduler.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub progress: f64,
    pub stage: Stage,
    pub camera_pose: CameraPose,
    pub layer_opacities: HashMap<LayerId, f64>,
    pub visibility: HashMap<GroupId, bool>,
}

impl SceneState {
    pub(crate) fn initial(pose: CameraPose) -> Self {
        Self {
            progress: 0.0,
            stage: Stage::Intro,
            camera_pose: pose,
            layer_opacities: HashMap::new(),
            visibility: HashMap::new(),
        }
    }
}

/// Stage-relevant facts about one layer, captured at scene build.
#[derive(Debug, Clone, Copy)]
pub struct LayerRole {
    pub id: LayerId,
    pub group: GroupId,
    pub base_opacity: f64,
}

pub struct StageDriver {
    mode: DriveMode,
    timeline: StageTimeline,
    layers: Vec<LayerRole>,
    stage: Stage,
}

impl StageDriver {
    pub fn new(mode: DriveMode, timeline: StageTimeline, layers: Vec<LayerRole>) -> Self {
        let stage = match mode {
            DriveMode::Time => Stage::Intro,
            // Scroll scenes have no intro sequence to play.
            DriveMode::Scroll => Stage::Landscape,
        };
        Self { mode, timeline, layers, stage }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Derive the frame's state from the external signals. Progress and
    /// opacities are clamped rather than checked; the stage latch only
    /// ever moves forward.
    pub fn advance(
        &mut self,
        state: &mut SceneState,
        path: &CameraPath,
        elapsed_seconds: f64,
        scroll_fraction: f64,
    ) {
        let progress = match self.mode {
            DriveMode::Time => {
                let p = elapsed_seconds / self.timeline.path_duration;
                if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
            }
            DriveMode::Scroll => {
                if scroll_fraction.is_nan() { 0.0 } else { scroll_fraction.clamp(0.0, 1.0) }
            }
        };

        let candidate = match self.mode {
            DriveMode::Time => {
                let t = &self.timeline;
                if elapsed_seconds > t.reveal_at {
                    Stage::Revealed
                } else if elapsed_seconds > t.landscape_at {
                    Stage::Landscape
                } else if elapsed_seconds > t.transition_at {
                    Stage::Transition
                } else {
                    Stage::Intro
                }
            }
            DriveMode::Scroll => {
                if progress >= self.timeline.reveal_progress {
                    Stage::Revealed
                } else {
                    Stage::Landscape
                }
            }
        };
        self.stage = self.stage.max(candidate);

        state.progress = progress;
        state.stage = self.stage;
        state.camera_pose = path.sample(progress);

        let fade = self.intro_fade(elapsed_seconds);
        state.layer_opacities.clear();
        for layer in &self.layers {
            let opacity = match layer.group {
                GroupId::Intro => layer.base_opacity * fade,
                GroupId::World => layer.base_opacity,
            };
            state.layer_opacities.insert(layer.id, opacity);
        }

        state.visibility.clear();
        state.visibility.insert(GroupId::Intro, self.stage <= Stage::Transition);
        state.visibility.insert(GroupId::World, self.stage >= Stage::Landscape);
    }

    /// Linear intro fade: 1 before the window, ramping to exactly 0 at
    /// the window end, clamped so it can never go negative.
    pub fn intro_fade(&self, elapsed_seconds: f64) -> f64 {
        let t = &self.timeline;
        (1.0 - (elapsed_seconds - t.fade_start) / t.fade_duration).clamp(0.0, 1.0)
    }
}

/// Normalized scroll position per the host formula:
/// `clamp(scroll_y / max(1, document_height - viewport_height), 0, 1)`.
pub fn scroll_fraction(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let denom = (document_height - viewport_height).max(1.0);
    (scroll_y / denom).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Waypoint;
    use glam::DVec3;

    fn path() -> CameraPath {
        CameraPath::new(vec![
            Waypoint::new(0.0, DVec3::new(0.0, 0.0, 780.0), DVec3::ZERO),
            Waypoint::new(1.0, DVec3::new(0.0, 220.0, -1700.0), DVec3::ZERO),
        ])
        .unwrap()
    }

    fn timeline() -> StageTimeline {
        StageTimeline::default()
    }

    fn roles() -> Vec<LayerRole> {
        vec![
            LayerRole { id: LayerId(0), group: GroupId::Intro, base_opacity: 0.87 },
            LayerRole { id: LayerId(1), group: GroupId::World, base_opacity: 0.7 },
        ]
    }

    #[test]
    fn time_stages_never_move_backward() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Time, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));

        let times = [0.0, 0.5, 1.0, 1.2, 2.0, 3.0, 3.1, 5.0, 11.0, 11.3, 20.0];
        let mut prev = Stage::Intro;
        for t in times {
            driver.advance(&mut state, &path, t, 0.0);
            assert!(state.stage >= prev, "stage regressed at t={t}");
            prev = state.stage;
        }
        assert_eq!(prev, Stage::Revealed);
    }

    #[test]
    fn latched_stage_survives_a_clock_step_backward() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Time, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));
        driver.advance(&mut state, &path, 4.0, 0.0);
        assert_eq!(state.stage, Stage::Landscape);
        driver.advance(&mut state, &path, 0.5, 0.0);
        assert_eq!(state.stage, Stage::Landscape);
    }

    #[test]
    fn transitions_fire_at_the_configured_thresholds() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Time, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));

        driver.advance(&mut state, &path, 1.0, 0.0);
        assert_eq!(state.stage, Stage::Intro);
        driver.advance(&mut state, &path, 1.11, 0.0);
        assert_eq!(state.stage, Stage::Transition);
        driver.advance(&mut state, &path, 3.06, 0.0);
        assert_eq!(state.stage, Stage::Landscape);
        driver.advance(&mut state, &path, 11.21, 0.0);
        assert_eq!(state.stage, Stage::Revealed);
    }

    #[test]
    fn intro_fade_clamps_and_hits_zero_at_window_end() {
        let driver = StageDriver::new(DriveMode::Time, timeline(), roles());
        let t = timeline();
        assert_eq!(driver.intro_fade(0.0), 1.0);
        assert_eq!(driver.intro_fade(t.fade_start), 1.0);
        let mid = driver.intro_fade(t.fade_start + t.fade_duration / 2.0);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(driver.intro_fade(t.fade_start + t.fade_duration), 0.0);
        // Never negative, for any elapsed past the window.
        for extra in [0.0, 0.1, 1.0, 100.0] {
            assert!(driver.intro_fade(t.fade_start + t.fade_duration + extra) >= 0.0);
        }
    }

    #[test]
    fn intro_layer_opacity_fades_while_world_holds() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Time, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));
        let t = timeline();

        driver.advance(&mut state, &path, t.fade_start + t.fade_duration, 0.0);
        assert_eq!(state.layer_opacities[&LayerId(0)], 0.0);
        assert_eq!(state.layer_opacities[&LayerId(1)], 0.7);
    }

    #[test]
    fn scroll_mode_maps_fraction_straight_to_progress() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Scroll, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));

        for s in [0.0, 0.25, 0.5, 0.75, 1.0, 1.5, -0.2] {
            driver.advance(&mut state, &path, 99.0, s);
            assert_eq!(state.progress, s.clamp(0.0, 1.0));
        }
    }

    #[test]
    fn scroll_mode_shows_world_and_hides_intro() {
        let path = path();
        let mut driver = StageDriver::new(DriveMode::Scroll, timeline(), roles());
        let mut state = SceneState::initial(path.sample(0.0));
        driver.advance(&mut state, &path, 0.0, 0.3);
        assert!(state.visibility[&GroupId::World]);
        assert!(!state.visibility[&GroupId::Intro]);
    }

    #[test]
    fn scroll_fraction_formula_matches_the_host_contract() {
        assert_eq!(scroll_fraction(0.0, 3000.0, 800.0), 0.0);
        assert_eq!(scroll_fraction(1100.0, 3000.0, 800.0), 0.5);
        assert_eq!(scroll_fraction(2200.0, 3000.0, 800.0), 1.0);
        assert_eq!(scroll_fraction(5000.0, 3000.0, 800.0), 1.0);
        // Document shorter than the viewport: denominator pins to 1.
        assert_eq!(scroll_fraction(0.0, 500.0, 800.0), 0.0);
        assert_eq!(scroll_fraction(10.0, 500.0, 800.0), 1.0);
    }
}
