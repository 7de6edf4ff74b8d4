//! A CPU-based software rasterizer with scanline convex-polygon filling.
//!
//! This crate renders flat-shaded 3D scenes entirely on the CPU: meshes are
//! transformed, lit and projected per frame, back faces are culled, and the
//! surviving triangles are filled with a fixed-point scanline algorithm
//! against an integer z-buffer. SDL2 is used only for window management and
//! presenting the finished pixel buffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use rasterra::prelude::*;
//!
//! let mut window = Window::new("My App", 800, 600)?;
//! let mut engine = Engine::new(800, 600);
//! let mesh = engine.scene_mut().add_mesh(Mesh::cube(Rgb::new(200, 80, 40)));
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod color;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use engine::{Engine, RenderError};
pub use mesh::{LoadError, Mesh};
pub use scene::{ObjectDef, Scene};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rasterra::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{Engine, RenderError};

    // Scene
    pub use crate::scene::{LightId, MeshId, ObjectDef, ObjectId, Scene};

    // Assets
    pub use crate::color::Rgb;
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{LoadError, Mesh};

    // Camera
    pub use crate::camera::Camera;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Window
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{ColorBuffer, ScanlineRasterizer, ScreenVertex};
}
