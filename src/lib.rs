//! Scroll-reactive 3D hero background engine.
//!
//! One configurable core behind the portfolio site's animated hero
//! looks: procedural starfields and mountain silhouettes, a keyframe
//! camera fly-through, and a staged cinematic intro. The host supplies
//! a drawable surface and the scroll/time signals; this crate owns the
//! scene graph and the per-frame update loop.
//!
//! Scenes are declarative: a [`config::SceneConfig`] (or one of the
//! [`presets`]) lists the particle shells, silhouette layers, camera
//! waypoints, and timing. The [`frame::FrameScheduler`] drives it one
//! tick at a time.

pub mod config;
pub mod error;
pub mod frame;
pub mod geom;
pub mod path;
pub mod presets;
pub mod render;
pub mod scene;
pub mod stage;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::{DriveMode, GroupId, LayerSpec, SceneConfig};
pub use error::{EngineError, Result};
pub use frame::{DrawSurface, FrameScheduler, Projection, SignalSource};
pub use path::{CameraPath, CameraPose, Waypoint};
pub use scene::{LayerId, SceneGraph};
pub use stage::{scroll_fraction, SceneState, Stage, StageDriver};

#[cfg(target_arch = "wasm32")]
pub use wasm::HeroScene;
