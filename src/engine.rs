//! The per-frame pipeline: vertex transform and lighting, back-face culling,
//! and the frame driver that feeds accepted triangles to the rasterizer.
//!
//! Each frame runs two strictly ordered phases. [`Engine::update`] transforms
//! and lights every active object to completion; only then does
//! [`Engine::render`] map vertices to pixel coordinates, clear the buffers and
//! fill triangles. Nothing rasterizes while any object is mid-transform.

use std::fmt;

use crate::camera::Camera;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::render::rasterizer::{ScanlineRasterizer, ScreenVertex};
use crate::render::ColorBuffer;
use crate::scene::Scene;

/// Depth scale applied while mapping normalized device coordinates to screen
/// space; spreads the [-1, 1] depth range over a wide integer band so the
/// z-buffer's integer comparisons keep their resolution.
const Z_SCALE: f32 = 100_000_000.0;

/// Smallest |w| accepted at the perspective divide. Anything closer to zero
/// is clamped (keeping its sign) instead of producing an unbounded result.
const MIN_W: f32 = 1e-6;

const DEFAULT_BACKGROUND: u32 = 0xFF10_1018;

/// Errors surfaced by the frame driver.
#[derive(Debug)]
pub enum RenderError {
    /// The camera transform has no inverse, so no view transform exists.
    SingularCamera,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SingularCamera => {
                write!(f, "camera transform is singular and cannot be inverted")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Divides x, y, z by w and resets w to 1.
///
/// A w at (or extremely near) zero is clamped to a signed epsilon first; the
/// result is a huge but finite coordinate rather than infinity or NaN.
fn perspective_divide(clip: Vec4) -> Vec4 {
    let w = if clip.w.abs() < MIN_W {
        MIN_W.copysign(clip.w)
    } else {
        clip.w
    };
    Vec4::new(clip.x / w, clip.y / w, clip.z / w, 1.0)
}

/// Whether a triangle faces the viewer, from the sign of the 2D cross product
/// of its projected edges.
///
/// Front-facing means a strictly negative signed area: clockwise in screen
/// space, the winding that counter-clockwise model-space triangles acquire
/// through the Y flip applied at mesh import. A zero area (degenerate
/// triangle) is not front-facing, so degenerate triangles draw nothing.
pub fn is_front_face(v0: Vec4, v1: Vec4, v2: Vec4) -> bool {
    (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y) < 0.0
}

/// Software rendering pipeline bound to one output buffer.
pub struct Engine {
    scene: Scene,
    camera: Camera,
    projection: Mat4,
    background: u32,
    color_buffer: ColorBuffer,
    rasterizer: ScanlineRasterizer,
}

impl Engine {
    /// Creates an engine rendering to a `width` x `height` buffer with a
    /// 45-degree vertical field of view.
    pub fn new(width: u32, height: u32) -> Self {
        let aspect_ratio = width as f32 / height as f32;
        Self {
            scene: Scene::new(),
            camera: Camera::new(Vec3::ZERO),
            projection: Mat4::perspective_rh(45f32.to_radians(), aspect_ratio, 0.1, 100.0),
            background: DEFAULT_BACKGROUND,
            color_buffer: ColorBuffer::new(width, height),
            rasterizer: ScanlineRasterizer::new(width, height),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_background(&mut self, color: u32) {
        self.background = color;
    }

    /// The most recently rendered frame.
    pub fn color_buffer(&self) -> &ColorBuffer {
        &self.color_buffer
    }

    /// Transform and lighting stage: recomputes every active object's derived
    /// buffers from its mesh, model transform, the camera and its light.
    ///
    /// Mesh data is read-only here; only derived buffers are written, in full,
    /// so they always hold exactly the latest frame's values.
    pub fn update(&mut self) -> Result<(), RenderError> {
        let view = self
            .camera
            .view_matrix()
            .ok_or(RenderError::SingularCamera)?;

        let Scene {
            meshes,
            lights,
            objects,
        } = &mut self.scene;

        for object in objects.iter_mut().filter(|o| o.active) {
            let mesh = &meshes[object.mesh().0];
            let light = lights[object.light().0];

            let combined = view * object.model_transform();
            let combined_projection = self.projection * combined;

            for index in 0..mesh.len() {
                let clip = combined_projection * mesh.positions()[index];

                // Normals transform as directions (w = 0): rotation and scale
                // apply, translation does not.
                let normal = match mesh.normals() {
                    Some(normals) => combined * normals[index],
                    None => Vec4::ZERO,
                };
                object.transformed_normals[index] = normal;

                let base = mesh.colors()[index];
                object.transformed_colors[index] = if object.lit {
                    match light.intensity(normal) {
                        Some(intensity) => base.scaled(intensity).to_argb(),
                        None => base.to_argb(),
                    }
                } else {
                    base.to_argb()
                };

                object.transformed_positions[index] = perspective_divide(clip);
            }
        }
        Ok(())
    }

    /// Rasterization phase: screen-map every active object, clear the color
    /// and depth buffers, then cull and fill each triangle flat-shaded with
    /// its first vertex's color.
    pub fn render(&mut self) {
        let half_width = self.color_buffer.width() as f32 / 2.0;
        let half_height = self.color_buffer.height() as f32 / 2.0;
        let to_screen = Mat4::translation(Vec3::new(half_width, half_height, 0.0))
            * Mat4::scaling(half_width, half_height, Z_SCALE);

        // Screen-mapping pass for all objects before any triangle is filled.
        for object in self.scene.objects.iter_mut().filter(|o| o.active) {
            for (screen, &position) in object
                .screen_vertices
                .iter_mut()
                .zip(&object.transformed_positions)
            {
                let mapped = to_screen * position;
                *screen = ScreenVertex::new(mapped.x as i32, mapped.y as i32, mapped.z as i32);
            }
        }

        self.color_buffer.clear(self.background);
        self.rasterizer.clear_depth();
        let frame = self.color_buffer.pixels_mut();

        for object in self.scene.objects.iter().filter(|o| o.active) {
            let mesh = &self.scene.meshes[object.mesh().0];
            for face in mesh.faces() {
                let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
                if !is_front_face(
                    object.transformed_positions[a],
                    object.transformed_positions[b],
                    object.transformed_positions[c],
                ) {
                    continue;
                }
                self.rasterizer.set_color(object.transformed_colors[a]);
                self.rasterizer
                    .fill_convex_polygon_z(frame, &object.screen_vertices, &[a, b, c]);
            }
        }
    }

    /// Runs a full frame and returns the finished buffer for presentation.
    pub fn render_frame(&mut self) -> Result<&ColorBuffer, RenderError> {
        self.update()?;
        self.render();
        Ok(&self.color_buffer)
    }
}
