//! Software rasterizer
//!
//! Fixed-function triangle and quad fill into an RGBA5551 frame buffer with a
//! 16-bit depth buffer. Vertices are transformed by the view-projection set
//! with `set_view` and the fixed-point model matrix of each draw.

use glam::{Mat4, Vec2, Vec4};
use skyfly_core::{
    DEPTH_FAR, DepthSampler, DeviceError, DisplaySpecs, FixedMat4, FrameStats, ModeChange,
    ModelHandle, Rasterizer, ScreenQuad, ViewState,
};
use skyfly_shared::Rgba8;

use super::frame::FramePool;
use super::render_state::RenderState;
use super::shading::{blend, combine};
use crate::assets::MeshTable;
use crate::procedural::Vertex;

/// Clip-space w below which a vertex counts as behind the eye
const MIN_CLIP_W: f32 = 1e-4;

/// Triangle vertex after projection
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    position: Vec2,
    depth: f32,
    inv_w: f32,
    uv_over_w: Vec2,
    color: Vec4,
}

impl ScreenVertex {
    fn project(vertex: &Vertex, mvp: &Mat4, width: f32, height: f32) -> Option<Self> {
        let clip = *mvp * vertex.position.extend(1.0);
        // Near-plane rejection, no clipping
        if !clip.is_finite() || clip.w <= MIN_CLIP_W || clip.z < 0.0 {
            return None;
        }

        let inv_w = 1.0 / clip.w;
        let ndc = clip.truncate() * inv_w;
        Some(Self {
            position: Vec2::new(
                (ndc.x * 0.5 + 0.5) * width,
                (1.0 - (ndc.y * 0.5 + 0.5)) * height,
            ),
            depth: ndc.z,
            inv_w,
            uv_over_w: vertex.uv * inv_w,
            color: color_to_vec4(vertex.color),
        })
    }
}

fn color_to_vec4(color: Rgba8) -> Vec4 {
    Vec4::new(color.r as f32, color.g as f32, color.b as f32, color.a as f32)
}

fn vec4_to_color(v: Vec4) -> Rgba8 {
    let v = v.clamp(Vec4::ZERO, Vec4::splat(255.0)).round();
    Rgba8::new(v.x as u8, v.y as u8, v.z as u8, v.w as u8)
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Depth in 0..1 to buffer units
fn quantize_depth(z: f32) -> u16 {
    (z.clamp(0.0, 1.0) * DEPTH_FAR as f32) as u16
}

/// Target buffers borrowed for one draw
struct Target<'a> {
    color: &'a mut [u16],
    depth: &'a mut [u16],
    width: u32,
    height: u32,
    state: &'a RenderState,
}

impl Target<'_> {
    /// Depth test, combine, blend and write one pixel
    fn shade_pixel(&mut self, index: usize, depth: u16, shade: Rgba8, uv: Vec2) -> bool {
        if self.state.depth_compare && depth >= self.depth[index] {
            return false;
        }

        let src = combine(self.state, shade, uv);
        let dst = Rgba8::from_5551(self.color[index]);
        self.color[index] = blend(self.state.blender, src, dst).to_5551();
        if self.state.depth_update {
            self.depth[index] = depth;
        }
        true
    }

    fn fill_triangle(&mut self, v: [ScreenVertex; 3]) -> u32 {
        let area = edge(v[0].position, v[1].position, v[2].position);
        if area.abs() < f32::EPSILON {
            return 0;
        }

        let min = v[0].position.min(v[1].position).min(v[2].position).floor();
        let max = v[0].position.max(v[1].position).max(v[2].position).ceil();
        let x0 = min.x.max(0.0) as u32;
        let y0 = min.y.max(0.0) as u32;
        let x1 = (max.x.min(self.width as f32)).max(0.0) as u32;
        let y1 = (max.y.min(self.height as f32)).max(0.0) as u32;

        let mut written = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b0 = edge(v[1].position, v[2].position, p) / area;
                let b1 = edge(v[2].position, v[0].position, p) / area;
                let b2 = 1.0 - b0 - b1;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let z = b0 * v[0].depth + b1 * v[1].depth + b2 * v[2].depth;
                let inv_w = b0 * v[0].inv_w + b1 * v[1].inv_w + b2 * v[2].inv_w;
                let uv = (v[0].uv_over_w * b0 + v[1].uv_over_w * b1 + v[2].uv_over_w * b2) / inv_w;
                let shade = vec4_to_color(v[0].color * b0 + v[1].color * b1 + v[2].color * b2);

                let index = (y * self.width + x) as usize;
                if self.shade_pixel(index, quantize_depth(z), shade, uv) {
                    written += 1;
                }
            }
        }
        written
    }
}

/// Rasterizer drawing into a [`FramePool`]
#[derive(Debug)]
pub struct SoftRasterizer {
    pool: FramePool,
    depth: Vec<u16>,
    meshes: MeshTable,
    state: RenderState,
    view_projection: Mat4,
    stats: FrameStats,
}

impl SoftRasterizer {
    /// Rasterizer matching the display specs
    pub fn new(specs: &DisplaySpecs, meshes: MeshTable) -> Self {
        let (width, height) = specs.resolution;
        Self::with_resolution(width, height, specs.buffer_count, meshes)
    }

    pub fn with_resolution(width: u32, height: u32, buffer_count: usize, meshes: MeshTable) -> Self {
        Self {
            pool: FramePool::new(width, height, buffer_count),
            depth: vec![DEPTH_FAR; (width * height) as usize],
            meshes,
            state: RenderState::default(),
            view_projection: Mat4::IDENTITY,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn depth_buffer(&self) -> &[u16] {
        &self.depth
    }

    /// Last presented frame in RGBA5551
    pub fn front_buffer(&self) -> Option<&[u16]> {
        self.pool.front()
    }

    /// Last presented frame expanded to 8-bit RGBA
    pub fn front_rgba(&self) -> Option<Vec<Rgba8>> {
        let front = self.pool.front()?;
        Some(
            front
                .iter()
                .map(|&packed| Rgba8 {
                    a: 0xFF,
                    ..Rgba8::from_5551(packed)
                })
                .collect(),
        )
    }

    fn target(&mut self) -> Option<Target<'_>> {
        let (width, height) = self.pool.resolution();
        let color = self.pool.attached_mut()?;
        Some(Target {
            color,
            depth: &mut self.depth,
            width,
            height,
            state: &self.state,
        })
    }
}

impl DepthSampler for SoftRasterizer {
    fn resolution(&self) -> (u32, u32) {
        self.pool.resolution()
    }

    fn sample_depth(&self, x: u32, y: u32) -> Option<u16> {
        let (width, height) = self.pool.resolution();
        if x >= width || y >= height {
            return None;
        }
        self.depth.get((y * width + x) as usize).copied()
    }
}

impl Rasterizer for SoftRasterizer {
    fn attach(&mut self) -> Result<(), DeviceError> {
        self.pool.acquire()?;
        self.stats.buffer_waits = self.pool.waits();
        Ok(())
    }

    fn frame_start(&mut self) {
        tracing::trace!("frame {} start", self.stats.frames);
    }

    fn set_view(&mut self, view: &ViewState) {
        self.view_projection = view.view_projection();
    }

    fn clear_depth(&mut self) {
        self.depth.fill(DEPTH_FAR);
    }

    fn set_mode(&mut self, change: &ModeChange) {
        self.state.apply(change);
    }

    fn draw_model(&mut self, model: ModelHandle, transform: &FixedMat4) -> Result<(), DeviceError> {
        let meshes = self.meshes.clone();
        let mesh = meshes.get(model).ok_or(DeviceError::UnknownModel(model.0))?;

        let (width, height) = self.pool.resolution();
        let mvp = self.view_projection * transform.to_mat4();
        let mut target = self.target().ok_or(DeviceError::NotAttached)?;

        let mut submitted = 0u64;
        for [a, b, c] in mesh.triangles() {
            let projected = (
                ScreenVertex::project(a, &mvp, width as f32, height as f32),
                ScreenVertex::project(b, &mvp, width as f32, height as f32),
                ScreenVertex::project(c, &mvp, width as f32, height as f32),
            );
            let (Some(a), Some(b), Some(c)) = projected else {
                continue;
            };
            target.fill_triangle([a, b, c]);
            submitted += 1;
        }

        self.stats.model_draws += 1;
        self.stats.triangles += submitted;
        Ok(())
    }

    fn draw_quad(&mut self, quad: &ScreenQuad) {
        let (width, height) = self.pool.resolution();
        let min = Vec2::from_array(quad.min).max(Vec2::ZERO);
        let max = Vec2::from_array(quad.max).min(Vec2::new(width as f32, height as f32));
        let size = Vec2::from_array(quad.max) - Vec2::from_array(quad.min);
        if max.x <= min.x || max.y <= min.y || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        // Quad colour feeds the combiner as the primitive colour
        let state = RenderState {
            prim_color: quad.color,
            ..self.state
        };
        let depth_value = quantize_depth(quad.depth);
        let origin = Vec2::from_array(quad.min);

        let Some(color) = self.pool.attached_mut() else {
            tracing::warn!("draw_quad: no render target attached, skipping");
            return;
        };
        let mut target = Target {
            color,
            depth: &mut self.depth,
            width,
            height,
            state: &state,
        };

        for y in min.y as u32..max.y.ceil() as u32 {
            for x in min.x as u32..max.x.ceil() as u32 {
                let uv = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - origin) / size;
                target.shade_pixel((y * width + x) as usize, depth_value, Rgba8::WHITE, uv);
            }
        }
        self.stats.quad_draws += 1;
    }

    fn depth(&self) -> &dyn DepthSampler {
        self
    }

    fn present(&mut self) -> Result<(), DeviceError> {
        self.pool.present()?;
        self.stats.frames += 1;
        Ok(())
    }

    fn stats(&self) -> FrameStats {
        self.stats
    }
}
