// render.rs - Encode per-frame draw state to a flat output buffer
//
// The host owns the actual pixels; it reads this buffer once per frame
// and applies it to whatever GPU objects it built from the static
// geometry at init.
//
// Output layout (f32):
//   [0..3]   camera position xyz
//   [3..6]   look target xyz
//   [6..10]  fov degrees, aspect, near, far
//   [10..12] viewport width, height
//   [12]     layer count
//   then one record per layer, stride 8:
//     [0] kind: 0 = particle group, 1 = silhouette, 2 = nebula
//     [1] layer id
//     [2] visible (0 or 1)
//     [3] opacity
//     [4] rotation x   | sway offset x
//     [5] rotation y   | sway offset y
//     [6] bob z        | depth
//     [7] point size   | unused

use crate::error::Result;
use crate::frame::{DrawSurface, Projection};
use crate::path::CameraPose;
use crate::scene::SceneGraph;

pub const HEADER_LEN: usize = 13;
pub const RECORD_LEN: usize = 8;

pub const KIND_PARTICLES: f32 = 0.0;
pub const KIND_SILHOUETTE: f32 = 1.0;
pub const KIND_NEBULA: f32 = 2.0;

pub struct FrameEncoder {
    buf: Vec<f32>,
    w: u32,
    h: u32,
}

impl FrameEncoder {
    pub fn new(w: u32, h: u32) -> Self {
        Self { buf: Vec::new(), w, h }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buf
    }

    pub fn ptr(&self) -> *const f32 {
        self.buf.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn record(
        &mut self,
        kind: f32,
        id: u16,
        visible: bool,
        opacity: f64,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
    ) {
        self.buf.extend_from_slice(&[
            kind,
            id as f32,
            visible as u32 as f32,
            opacity as f32,
            a,
            b,
            c,
            d,
        ]);
    }
}

impl DrawSurface for FrameEncoder {
    fn resize(&mut self, width: u32, height: u32) {
        self.w = width;
        self.h = height;
    }

    fn render_frame(
        &mut self,
        graph: &SceneGraph,
        camera: &CameraPose,
        projection: &Projection,
    ) -> Result<()> {
        self.buf.clear();

        self.buf.extend_from_slice(&[
            camera.position.x as f32,
            camera.position.y as f32,
            camera.position.z as f32,
            camera.look_target.x as f32,
            camera.look_target.y as f32,
            camera.look_target.z as f32,
            projection.fov_degrees,
            projection.aspect,
            projection.near,
            projection.far,
            self.w as f32,
            self.h as f32,
        ]);
        let layer_count =
            graph.particles.len() + graph.mountains.len() + graph.nebula.is_some() as usize;
        self.buf.push(layer_count as f32);

        for p in &graph.particles {
            self.record(
                KIND_PARTICLES,
                p.id.0,
                p.visible,
                p.opacity,
                p.rotation.x,
                p.rotation.y,
                p.bob_z,
                p.size,
            );
        }
        for m in &graph.mountains {
            self.record(
                KIND_SILHOUETTE,
                m.id.0,
                m.visible,
                m.opacity,
                m.offset.x,
                m.offset.y,
                m.depth,
                0.0,
            );
        }
        if let Some(n) = &graph.nebula {
            self.record(KIND_NEBULA, n.id.0, n.visible, n.opacity, 0.0, 0.0, n.depth, 0.0);
        }
        Ok(())
    }
}
