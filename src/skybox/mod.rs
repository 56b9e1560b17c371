//! Skybox definitions and the per-frame visibility logic.
//!
//! A [`SkyboxDefinition`] is decoded once per reload (see [`decode()`]) and is
//! immutable afterwards. Everything that changes per frame lives in
//! [`RuntimeState`], which the dispatcher owns:
//!
//! - [`conditions`] gates visibility on world, biome, height and weather;
//! - [`fade`] turns the day clock into an opacity;
//! - [`animation`] steps multi-frame variants on the wall clock.

pub mod animation;
pub mod conditions;
pub mod decode;
pub mod fade;
pub mod time;
pub mod variant;

// Re-exports
pub use animation::{AnimationCursor, frame_interval_millis};
pub use conditions::{Conditions, EnvironmentSnapshot, HeightRange, Precipitation, Weather};
pub use decode::{Document, FieldReader, decode, decode_with_version, encode};
pub use fade::{Fade, FadeOutput, FadePhase};
pub use time::TimeOfDay;
pub use variant::{SkyTextures, Textures, VariantCodec, VariantPayload, VariantRegistry};

use crate::core::Identifier;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Linear RGBA color with components in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    #[inline]
    pub fn to_rgb_array(self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::ZERO
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Opacity, fog and rotation settings shared by every variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Properties {
    pub fade: Fade,
    /// Upper bound on alpha, `[0.0, 1.0]`.
    pub max_alpha: f32,
    /// Alpha change per frame, `> 0`.
    pub transition_speed: f32,
    pub change_fog: bool,
    pub fog_color: Rgba,
    pub should_rotate: bool,
}

impl Properties {
    pub const DEFAULT_MAX_ALPHA: f32 = 1.0;
    pub const DEFAULT_TRANSITION_SPEED: f32 = 1.0;
    /// Opaque black; fog colours default to alpha 1.0 in both schemas.
    pub const DEFAULT_FOG_COLOR: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    /// Default properties around the given fade window.
    pub fn with_fade(fade: Fade) -> Self {
        Self {
            fade,
            max_alpha: Self::DEFAULT_MAX_ALPHA,
            transition_speed: Self::DEFAULT_TRANSITION_SPEED,
            change_fog: false,
            fog_color: Self::DEFAULT_FOG_COLOR,
            should_rotate: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Decorations
// ---------------------------------------------------------------------------

/// Celestial decorations drawn on top of the skybox layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Decorations {
    pub sun_texture: Identifier,
    pub moon_texture: Identifier,
    pub show_sun: bool,
    pub show_moon: bool,
    pub show_stars: bool,
}

impl Decorations {
    pub fn default_sun_texture() -> Identifier {
        Identifier::new(Identifier::DEFAULT_NAMESPACE, "textures/environment/sun.png")
    }

    pub fn default_moon_texture() -> Identifier {
        Identifier::new(Identifier::DEFAULT_NAMESPACE, "textures/environment/moon_phases.png")
    }

    /// Whether any decoration would be drawn at all.
    pub fn any_enabled(&self) -> bool {
        self.show_sun || self.show_moon || self.show_stars
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            sun_texture: Self::default_sun_texture(),
            moon_texture: Self::default_moon_texture(),
            show_sun: true,
            show_moon: true,
            show_stars: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SkyboxDefinition
// ---------------------------------------------------------------------------

/// Immutable configuration of one skybox layer.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyboxDefinition {
    id: String,
    variant_kind: String,
    properties: Properties,
    conditions: Conditions,
    decorations: Decorations,
    payload: VariantPayload,
}

impl SkyboxDefinition {
    pub fn new(
        id: impl Into<String>,
        variant_kind: impl Into<String>,
        properties: Properties,
        conditions: Conditions,
        decorations: Decorations,
        payload: VariantPayload,
    ) -> Self {
        Self {
            id: id.into(),
            variant_kind: variant_kind.into(),
            properties,
            conditions,
            decorations,
            payload,
        }
    }

    /// Id of the document this skybox was loaded from.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn variant_kind(&self) -> &str {
        &self.variant_kind
    }

    #[inline]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    #[inline]
    pub fn fade(&self) -> &Fade {
        &self.properties.fade
    }

    #[inline]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    #[inline]
    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    #[inline]
    pub fn payload(&self) -> &VariantPayload {
        &self.payload
    }
}

// ---------------------------------------------------------------------------
// RuntimeState
// ---------------------------------------------------------------------------

/// Mutable per-skybox state carried between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeState {
    /// Current opacity, `[0.0, max_alpha]` (1.0 for always-on skyboxes).
    pub alpha: f32,
    /// Frame cursor, only advanced for multi-frame variants.
    pub cursor: AnimationCursor,
}
