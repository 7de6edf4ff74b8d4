//! Rendering back end: the owning color buffer and the scanline rasterizer.

pub mod framebuffer;
pub mod rasterizer;

pub use framebuffer::ColorBuffer;
pub use rasterizer::{ScanlineRasterizer, ScreenVertex};
