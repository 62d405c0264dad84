// wasm.rs - Browser-facing facade
//
// JS owns the canvas, the clock, and the scroll listener; it pushes
// both signals in with each requestAnimationFrame tick and reads the
// frame buffer back. Static geometry is uploaded once at init.

use wasm_bindgen::prelude::*;

use crate::config::SceneConfig;
use crate::error::EngineError;
use crate::frame::{FrameScheduler, SignalSource};
use crate::presets;
use crate::render::FrameEncoder;
use crate::stage::Stage;

/// Latest-wins signal values pushed from the host.
#[derive(Default)]
pub struct HostSignals {
    elapsed: f64,
    scroll: f64,
}

impl HostSignals {
    fn set(&mut self, elapsed: f64, scroll: f64) {
        self.elapsed = elapsed;
        self.scroll = scroll;
    }
}

impl SignalSource for HostSignals {
    fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    fn scroll_fraction(&self) -> f64 {
        self.scroll
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct HeroScene {
    sched: FrameScheduler<FrameEncoder, HostSignals>,
}

#[wasm_bindgen]
impl HeroScene {
    /// Build a scene from a JSON config (empty string = parallax preset).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: u32, height: u32) -> Result<HeroScene, JsValue> {
        init_logging();
        let config = if config_json.is_empty() {
            presets::parallax()
        } else {
            SceneConfig::from_json(config_json).map_err(to_js)?
        };
        Self::from_config(&config, width, height)
    }

    /// Build one of the stock looks: "cinematic", "parallax", "cosmos",
    /// or "starfield".
    pub fn preset(name: &str, width: u32, height: u32) -> Result<HeroScene, JsValue> {
        init_logging();
        let config = match name {
            "cinematic" => presets::cinematic(),
            "parallax" => presets::parallax(),
            "cosmos" => presets::cosmos(),
            "starfield" => presets::starfield(),
            other => return Err(JsValue::from_str(&format!("unknown preset: {other}"))),
        };
        Self::from_config(&config, width, height)
    }

    fn from_config(config: &SceneConfig, width: u32, height: u32) -> Result<HeroScene, JsValue> {
        let mut sched =
            FrameScheduler::new(config, FrameEncoder::new(width, height), HostSignals::default())
                .map_err(to_js)?;
        sched.resize(width, height);
        Ok(HeroScene { sched })
    }

    pub fn start(&mut self) {
        self.sched.start();
    }

    pub fn stop(&mut self) {
        self.sched.stop();
    }

    /// One requestAnimationFrame tick.
    pub fn frame(&mut self, elapsed_seconds: f64, scroll_fraction: f64) -> Result<(), JsValue> {
        self.sched.signals_mut().set(elapsed_seconds, scroll_fraction);
        self.sched.frame().map_err(to_js)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.sched.resize(width, height);
    }

    /// Idempotent; the host also detaches its own scroll/resize
    /// listeners when it calls this.
    pub fn teardown(&mut self) {
        self.sched.teardown();
    }

    /// Published stage for the DOM side: 0 intro, 1 transition,
    /// 2 landscape, 3 revealed.
    pub fn stage(&self) -> u32 {
        match self.sched.published().0 {
            Stage::Intro => 0,
            Stage::Transition => 1,
            Stage::Landscape => 2,
            Stage::Revealed => 3,
        }
    }

    /// Published progress in [0, 1] for the scroll widget.
    pub fn progress(&self) -> f64 {
        self.sched.published().1
    }

    /// The per-frame draw buffer (layout documented in render.rs).
    pub fn frame_data(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.sched.surface().as_slice())
    }

    /// Flat xyz positions for one particle layer, for the one-time
    /// geometry upload.
    pub fn particle_positions(&self, layer_id: u16) -> Option<js_sys::Float32Array> {
        self.sched
            .graph()
            .particles
            .iter()
            .find(|p| p.id.0 == layer_id)
            .map(|p| js_sys::Float32Array::from(p.field.positions()))
    }

    /// Static styling for every layer, for the one-time material setup.
    /// One record per layer, stride 6: id, r, g, b, base opacity, size.
    pub fn layer_styles(&self) -> js_sys::Float32Array {
        let graph = self.sched.graph();
        let mut out = Vec::new();
        let mut push = |id: u16, color: u32, opacity: f64, size: f32| {
            let [r, g, b] = crate::config::color_rgb(color);
            out.extend_from_slice(&[id as f32, r, g, b, opacity as f32, size]);
        };
        for p in &graph.particles {
            push(p.id.0, p.color, p.base_opacity, p.size);
        }
        for m in &graph.mountains {
            push(m.id.0, m.color, m.base_opacity, 0.0);
        }
        if let Some(n) = &graph.nebula {
            push(n.id.0, n.color, n.base_opacity, 0.0);
        }
        js_sys::Float32Array::from(out.as_slice())
    }

    /// Flat xy polygon points for one silhouette layer.
    pub fn silhouette_points(&self, layer_id: u16) -> Option<js_sys::Float32Array> {
        self.sched
            .graph()
            .mountains
            .iter()
            .find(|m| m.id.0 == layer_id)
            .map(|m| js_sys::Float32Array::from(m.polygon.flat_xy().as_slice()))
    }
}
