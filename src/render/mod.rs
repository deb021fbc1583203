//! Rendering boundary.
//!
//! The library never draws by itself: emitted shader sources are handed to a
//! [`RenderBackend`] supplied by the caller. Backends own whatever context
//! they need; callers that reuse contexts across calls keep them in a
//! [`ContextPool`]. A backend context must not be used by two renders at
//! once, so concurrent callers either hold separate contexts or serialize.

mod expr;
mod pool;
mod software;

pub use expr::Expr;
pub use pool::{ContextPool, DEFAULT_IDLE_PER_SIZE};
pub use software::{Program, SoftwareBackend, SoftwareError};

use crate::shader::ShaderSource;

/// Everything a backend needs for one draw.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Vertex and fragment sources, expression already substituted.
    pub shader: &'a ShaderSource,
    /// Canvas width in pixels; bound to `resolution.x`.
    pub width: u32,
    /// Canvas height in pixels; bound to `resolution.y`.
    pub height: u32,
    /// Coordinate scale; bound to the `scale` uniform.
    pub scale: f32,
}

/// Compiles shader sources and rasterizes them.
pub trait RenderBackend {
    /// Handle to the produced image.
    type Image;
    /// Compilation or drawing failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Draw the shader on a `width x height` canvas.
    fn render(&mut self, request: &RenderRequest<'_>) -> Result<Self::Image, Self::Error>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type Image = B::Image;
    type Error = B::Error;

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<Self::Image, Self::Error> {
        (**self).render(request)
    }
}
