//! Slate Render Library
//!
//! Renderer abstraction and implementations for Slate.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod export;
mod renderer;
pub mod smoothing;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use export::{EXPORT_FILE_NAME, ExportError, PngRenderResult, encode_png, strip_row_padding};
pub use renderer::{GridStyle, RenderContext, Renderer, RendererError};
pub use smoothing::smooth_path;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
