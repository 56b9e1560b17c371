//! Host-facing draw interface.

use crate::skybox::{Rgba, SkyTextures, SkyboxDefinition};

/// One skybox layer to composite this frame.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    pub skybox: &'a SkyboxDefinition,
    pub textures: SkyTextures<'a>,
    /// Opacity in `(0.0, 1.0]`.
    pub alpha: f32,
    /// Set on at most one call per frame.
    pub draw_decorations: bool,
}

impl DrawCall<'_> {
    #[inline]
    pub fn should_rotate(&self) -> bool {
        self.skybox.properties().should_rotate
    }

    #[inline]
    pub fn blend(&self) -> bool {
        self.skybox.payload().blend()
    }
}

/// Renderer that turns draw calls into pixels. Geometry and blending are
/// entirely up to the implementor.
pub trait DrawSurface {
    fn draw(&mut self, call: &DrawCall<'_>);
}

/// Result of one dispatched frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Fog color requested by the last visible fog-changing skybox.
    pub fog: Option<Rgba>,
    /// Number of draw calls issued.
    pub drawn: usize,
}

/// Surface that discards every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn draw(&mut self, _call: &DrawCall<'_>) {}
}
