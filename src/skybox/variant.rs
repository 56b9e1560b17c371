//! Skybox variants and the kind → codec registration table.
//!
//! A variant is selected by the document's `type` string. Built-in kinds
//! are registered by [`VariantRegistry::default`]; hosts add their own with
//! [`VariantRegistry::register`] and decode them into
//! [`VariantPayload::Custom`].

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::core::{DecodeError, Identifier};
use crate::skybox::Rgba;
use crate::skybox::animation::{AnimationCursor, frame_interval_millis};
use crate::skybox::decode::{Document, FieldReader, decode_rgba, encode_rgba};

pub const MONOCOLOR: &str = "monocolor";
pub const SQUARE_TEXTURED: &str = "square-textured";
pub const ANIMATED_SQUARE_TEXTURED: &str = "animated-square-textured";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Six cube-face textures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Textures {
    pub north: Identifier,
    pub south: Identifier,
    pub east: Identifier,
    pub west: Identifier,
    pub top: Identifier,
    pub bottom: Identifier,
}

impl Textures {
    const FACES: [&'static str; 6] = ["north", "south", "east", "west", "top", "bottom"];

    fn faces(&self) -> [&Identifier; 6] {
        [&self.north, &self.south, &self.east, &self.west, &self.top, &self.bottom]
    }

    /// Read six ids named `<prefix><face>`, e.g. `texture_north` or `north`.
    fn decode(reader: &FieldReader<'_>, prefix: &str) -> Result<Self, DecodeError> {
        let face = |name: &str| reader.required_id(&format!("{prefix}{name}"));
        Ok(Self {
            north: face("north")?,
            south: face("south")?,
            east: face("east")?,
            west: face("west")?,
            top: face("top")?,
            bottom: face("bottom")?,
        })
    }

    fn encode(&self) -> Value {
        let object: Document = Self::FACES
            .iter()
            .zip(self.faces())
            .map(|(name, id)| ((*name).to_string(), json!(id.to_string())))
            .collect();
        Value::Object(object)
    }
}

/// Variant-specific part of a skybox definition.
#[derive(Clone, Debug, PartialEq)]
pub enum VariantPayload {
    /// Flat color sky.
    Monocolor { color: Rgba },
    /// Static cube map.
    Textured { textures: Textures, blend: bool },
    /// Cube maps cycled on the wall clock.
    AnimatedTextured {
        frames: Vec<Textures>,
        fps: f32,
        blend: bool,
    },
    /// Raw fields of a host-registered kind.
    Custom(Document),
}

impl VariantPayload {
    /// Frame interval for multi-frame variants.
    pub fn frame_interval_millis(&self) -> Option<u64> {
        match self {
            Self::AnimatedTextured { fps, .. } => Some(frame_interval_millis(*fps)),
            _ => None,
        }
    }

    /// Whether textured layers blend with the layers below.
    pub fn blend(&self) -> bool {
        match self {
            Self::Textured { blend, .. } | Self::AnimatedTextured { blend, .. } => *blend,
            Self::Monocolor { .. } | Self::Custom(_) => false,
        }
    }

    /// What to draw at `now_millis`, stepping `cursor` for animated payloads.
    ///
    /// Animated payloads advance on every call whether or not the result is
    /// drawn.
    pub fn select_textures(&self, cursor: &mut AnimationCursor, now_millis: u64) -> Option<SkyTextures<'_>> {
        match self {
            Self::Monocolor { color } => Some(SkyTextures::Color(*color)),
            Self::Textured { textures, .. } => Some(SkyTextures::Faces(textures)),
            Self::AnimatedTextured { frames, fps, .. } => cursor
                .tick(frames, frame_interval_millis(*fps), now_millis)
                .map(SkyTextures::Faces),
            Self::Custom(fields) => Some(SkyTextures::Custom(fields)),
        }
    }
}

/// What the draw surface should put on the sky this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkyTextures<'a> {
    Color(Rgba),
    Faces(&'a Textures),
    Custom(&'a Document),
}

// ---------------------------------------------------------------------------
// Codecs
// ---------------------------------------------------------------------------

/// Reads a variant payload from the document root.
pub type DecodeFn = fn(&FieldReader<'_>) -> Result<VariantPayload, DecodeError>;
/// Writes a variant payload's fields into a v2 document.
pub type EncodeFn = fn(&VariantPayload, &mut Document);

/// Decoder/encoder pair registered for one variant kind.
#[derive(Clone, Copy, Debug)]
pub struct VariantCodec {
    /// Schema v2 decoder.
    pub decode: DecodeFn,
    /// Legacy decoder; `None` rejects legacy documents of this kind.
    pub decode_legacy: Option<DecodeFn>,
    pub encode: EncodeFn,
}

/// Table of known variant kinds.
#[derive(Clone, Debug)]
pub struct VariantRegistry {
    codecs: HashMap<String, VariantCodec>,
}

impl VariantRegistry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register `codec` for `kind`, returning the codec it replaced.
    pub fn register(&mut self, kind: impl Into<String>, codec: VariantCodec) -> Option<VariantCodec> {
        self.codecs.insert(kind.into(), codec)
    }

    pub fn get(&self, kind: &str) -> Option<&VariantCodec> {
        self.codecs.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.codecs.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for VariantRegistry {
    /// Registry with the built-in monocolor, square-textured and animated kinds.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            MONOCOLOR,
            VariantCodec {
                decode: decode_monocolor,
                decode_legacy: Some(decode_monocolor_legacy),
                encode: encode_builtin,
            },
        );
        registry.register(
            SQUARE_TEXTURED,
            VariantCodec {
                decode: decode_textured,
                decode_legacy: Some(decode_textured_legacy),
                encode: encode_builtin,
            },
        );
        registry.register(
            ANIMATED_SQUARE_TEXTURED,
            VariantCodec {
                decode: decode_animated,
                decode_legacy: None,
                encode: encode_builtin,
            },
        );
        registry
    }
}

// ---------------------------------------------------------------------------
// Built-in decoders
// ---------------------------------------------------------------------------

fn decode_monocolor(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
    let color = decode_rgba(&reader.required_nested("color")?, 1.0)?;
    Ok(VariantPayload::Monocolor { color })
}

fn decode_monocolor_legacy(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
    Ok(VariantPayload::Monocolor {
        color: decode_rgba(reader, 1.0)?,
    })
}

fn decode_textured(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
    Ok(VariantPayload::Textured {
        textures: Textures::decode(&reader.required_nested("textures")?, "")?,
        blend: reader.optional_bool("blend", false)?,
    })
}

fn decode_textured_legacy(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
    Ok(VariantPayload::Textured {
        textures: Textures::decode(reader, "texture_")?,
        blend: false,
    })
}

fn decode_animated(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
    let entries = reader.required_array("animationTextures")?;
    if entries.is_empty() {
        return Err(reader.invalid("animationTextures"));
    }
    let frames = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Textures::decode(&reader.element("animationTextures", index, entry)?, ""))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VariantPayload::AnimatedTextured {
        frames,
        fps: reader.required_f32("fps")?,
        blend: reader.required_bool("blend")?,
    })
}

fn encode_builtin(payload: &VariantPayload, document: &mut Document) {
    match payload {
        VariantPayload::Monocolor { color } => {
            document.insert("color".into(), encode_rgba(*color));
        }
        VariantPayload::Textured { textures, blend } => {
            document.insert("textures".into(), textures.encode());
            document.insert("blend".into(), json!(blend));
        }
        VariantPayload::AnimatedTextured { frames, fps, blend } => {
            let frames: Vec<Value> = frames.iter().map(Textures::encode).collect();
            document.insert("animationTextures".into(), Value::Array(frames));
            document.insert("fps".into(), json!(fps));
            document.insert("blend".into(), json!(blend));
        }
        VariantPayload::Custom(fields) => {
            document.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skybox::decode::{decode, encode};

    fn textures_json(tag: &str) -> Value {
        json!({
            "north": format!("sky:{tag}_n"), "south": format!("sky:{tag}_s"),
            "east": format!("sky:{tag}_e"), "west": format!("sky:{tag}_w"),
            "top": format!("sky:{tag}_t"), "bottom": format!("sky:{tag}_b")
        })
    }

    fn animated(fps: Value, frames: Value) -> Document {
        let value = json!({
            "schemaVersion": 2,
            "type": ANIMATED_SQUARE_TEXTURED,
            "properties": { "fade": { "alwaysOn": true } },
            "animationTextures": frames,
            "fps": fps,
            "blend": false
        });
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = VariantRegistry::default();
        assert_eq!(registry.kinds(), vec![ANIMATED_SQUARE_TEXTURED, MONOCOLOR, SQUARE_TEXTURED]);
        assert!(registry.get(ANIMATED_SQUARE_TEXTURED).unwrap().decode_legacy.is_none());
        assert!(VariantRegistry::empty().kinds().is_empty());
    }

    #[test]
    fn test_decode_animated() {
        let doc = animated(json!(10.0), json!([textures_json("a"), textures_json("b")]));
        let skybox = decode("anim", &doc, &VariantRegistry::default()).unwrap();
        match skybox.payload() {
            VariantPayload::AnimatedTextured { frames, fps, blend } => {
                assert_eq!(frames.len(), 2);
                assert_eq!(frames[1].top, Identifier::parse("sky:b_t").unwrap());
                assert_eq!(*fps, 10.0);
                assert!(!blend);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(skybox.payload().frame_interval_millis(), Some(100));
    }

    #[test]
    fn test_animated_out_of_range_fps_still_decodes() {
        let doc = animated(json!(400.0), json!([textures_json("a")]));
        let skybox = decode("anim", &doc, &VariantRegistry::default()).unwrap();
        assert_eq!(skybox.payload().frame_interval_millis(), Some(16));
    }

    #[test]
    fn test_animated_errors() {
        let registry = VariantRegistry::default();
        assert_eq!(
            decode("a", &animated(json!(10.0), json!([])), &registry),
            Err(DecodeError::InvalidField("animationTextures".into()))
        );
        assert_eq!(
            decode("a", &animated(json!(10.0), json!(["sky:x"])), &registry),
            Err(DecodeError::InvalidField("animationTextures[0]".into()))
        );

        let mut missing_face = textures_json("a");
        missing_face.as_object_mut().unwrap().remove("west");
        assert_eq!(
            decode("a", &animated(json!(10.0), json!([textures_json("b"), missing_face])), &registry),
            Err(DecodeError::MissingField("animationTextures[1].west".into()))
        );

        let mut doc = animated(json!(10.0), json!([textures_json("a")]));
        doc.remove("fps");
        assert_eq!(decode("a", &doc, &registry), Err(DecodeError::MissingField("fps".into())));

        let mut doc = animated(json!(10.0), json!([textures_json("a")]));
        doc.remove("blend");
        assert_eq!(decode("a", &doc, &registry), Err(DecodeError::MissingField("blend".into())));

        let mut doc = animated(json!(10.0), json!([textures_json("a")]));
        doc.insert("blend".into(), json!("yes"));
        assert_eq!(decode("a", &doc, &registry), Err(DecodeError::InvalidField("blend".into())));
    }

    #[test]
    fn test_select_textures() {
        let doc = animated(json!(10.0), json!([textures_json("a"), textures_json("b")]));
        let skybox = decode("anim", &doc, &VariantRegistry::default()).unwrap();
        let mut cursor = AnimationCursor::default();

        let first = skybox.payload().select_textures(&mut cursor, 1_000);
        assert!(matches!(first, Some(SkyTextures::Faces(t)) if t.top == Identifier::parse("sky:a_t").unwrap()));
        assert!(matches!(skybox.payload().select_textures(&mut cursor, 1_099), Some(SkyTextures::Faces(t)) if t.top.path() == "a_t"));
        assert!(matches!(skybox.payload().select_textures(&mut cursor, 1_100), Some(SkyTextures::Faces(t)) if t.top.path() == "b_t"));
        assert_eq!(cursor.index(), 1);

        let color = Rgba::rgb(1.0, 0.0, 0.0);
        let mono = VariantPayload::Monocolor { color };
        assert_eq!(mono.select_textures(&mut AnimationCursor::default(), 0), Some(SkyTextures::Color(color)));
        assert!(!mono.blend());
    }

    #[test]
    fn test_monocolor_round_trip() {
        let registry = VariantRegistry::default();
        let value = json!({
            "schemaVersion": 2,
            "type": MONOCOLOR,
            "properties": { "fade": { "startFadeIn": 0, "endFadeIn": 10, "startFadeOut": 20, "endFadeOut": 30 } },
            "color": { "red": 0.5, "green": 0.25, "blue": 0.125, "alpha": 0.5 }
        });
        let doc = value.as_object().cloned().unwrap();
        let skybox = decode("mono", &doc, &registry).unwrap();
        assert_eq!(
            skybox.payload(),
            &VariantPayload::Monocolor { color: Rgba::new(0.5, 0.25, 0.125, 0.5) }
        );
        assert_eq!(decode("mono", &encode(&skybox, &registry), &registry).unwrap(), skybox);
    }

    #[test]
    fn test_animated_round_trip() {
        let registry = VariantRegistry::default();
        let doc = animated(json!(24.0), json!([textures_json("a"), textures_json("b")]));
        let skybox = decode("anim", &doc, &registry).unwrap();
        assert_eq!(decode("anim", &encode(&skybox, &registry), &registry).unwrap(), skybox);
    }

    fn decode_gradient(reader: &FieldReader<'_>) -> Result<VariantPayload, DecodeError> {
        let stops = reader.required_array("stops")?;
        let mut fields = Document::new();
        fields.insert("stops".into(), Value::Array(stops.clone()));
        Ok(VariantPayload::Custom(fields))
    }

    #[test]
    fn test_custom_kind_registers_without_dispatcher_changes() {
        let mut registry = VariantRegistry::default();
        let previous = registry.register(
            "gradient",
            VariantCodec {
                decode: decode_gradient,
                decode_legacy: None,
                encode: encode_builtin,
            },
        );
        assert!(previous.is_none());

        let value = json!({
            "schemaVersion": 2,
            "type": "gradient",
            "properties": { "fade": { "alwaysOn": true } },
            "stops": [0.0, 0.5, 1.0]
        });
        let doc = value.as_object().cloned().unwrap();
        let skybox = decode("gradient", &doc, &registry).unwrap();
        assert_eq!(skybox.variant_kind(), "gradient");
        assert!(matches!(skybox.payload(), VariantPayload::Custom(fields) if fields.contains_key("stops")));
        assert_eq!(decode("gradient", &encode(&skybox, &registry), &registry).unwrap(), skybox);
    }
}
