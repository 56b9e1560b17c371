//! Skybox document decoding for both schema generations.
//!
//! The `schemaVersion` key is read first and selects one of two independent
//! decoders that produce the same [`SkyboxDefinition`]:
//!
//! - **v2+** (`decode_v2`): nested `properties` / `conditions` /
//!   `decorations` sections plus variant fields read by the
//!   [`VariantCodec`](crate::skybox::VariantCodec) registered for `type`.
//! - **legacy** (`decode_legacy`): flat top-level fields with fixed defaults.
//!
//! Required fields are checked explicitly and reported as
//! [`DecodeError::MissingField`]; present values of the wrong shape are
//! [`DecodeError::InvalidField`].

use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use crate::core::{DecodeError, Identifier};
use crate::skybox::variant::{SQUARE_TEXTURED, VariantRegistry};
use crate::skybox::{
    Conditions, Decorations, Fade, HeightRange, Properties, Rgba, SkyboxDefinition, Weather,
};

/// Generic key/value document a skybox is decoded from.
pub type Document = Map<String, Value>;

pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";
pub const TYPE_KEY: &str = "type";

/// Version assumed when `schemaVersion` is absent.
pub const DEFAULT_SCHEMA_VERSION: i64 = 1;
/// First version using per-variant declarative decoding.
pub const DECLARATIVE_SCHEMA_VERSION: i64 = 2;

// ---------------------------------------------------------------------------
// FieldReader
// ---------------------------------------------------------------------------

/// Typed accessors over one JSON object, reporting errors by dotted path.
///
/// `null` is treated the same as an absent key.
#[derive(Clone, Debug)]
pub struct FieldReader<'a> {
    object: &'a Document,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a Document) -> Self {
        Self {
            object,
            prefix: String::new(),
        }
    }

    fn with_prefix(object: &'a Document, prefix: String) -> Self {
        Self { object, prefix }
    }

    /// Full path of `name` relative to the document root.
    pub fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    pub fn missing(&self, name: &str) -> DecodeError {
        DecodeError::MissingField(self.path(name))
    }

    pub fn invalid(&self, name: &str) -> DecodeError {
        DecodeError::InvalidField(self.path(name))
    }

    /// The underlying object.
    pub fn object(&self) -> &'a Document {
        self.object
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn required(&self, name: &str) -> Result<&'a Value, DecodeError> {
        self.get(name).ok_or_else(|| self.missing(name))
    }

    // -- scalars ------------------------------------------------------------

    fn as_i32(&self, name: &str, value: &Value) -> Result<i32, DecodeError> {
        let number = match value.as_i64() {
            Some(n) => n,
            None => match value.as_f64() {
                Some(f) if f.fract() == 0.0 => f as i64,
                _ => return Err(self.invalid(name)),
            },
        };
        i32::try_from(number).map_err(|_| self.invalid(name))
    }

    pub fn required_i32(&self, name: &str) -> Result<i32, DecodeError> {
        self.as_i32(name, self.required(name)?)
    }

    pub fn optional_i32(&self, name: &str, default: i32) -> Result<i32, DecodeError> {
        self.get(name).map_or(Ok(default), |v| self.as_i32(name, v))
    }

    fn as_f32(&self, name: &str, value: &Value) -> Result<f32, DecodeError> {
        value
            .as_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
            .ok_or_else(|| self.invalid(name))
    }

    pub fn required_f32(&self, name: &str) -> Result<f32, DecodeError> {
        self.as_f32(name, self.required(name)?)
    }

    pub fn optional_f32(&self, name: &str, default: f32) -> Result<f32, DecodeError> {
        self.get(name).map_or(Ok(default), |v| self.as_f32(name, v))
    }

    /// Optional float that must lie in `[0.0, 1.0]`.
    pub fn optional_unit_f32(&self, name: &str, default: f32) -> Result<f32, DecodeError> {
        let value = self.optional_f32(name, default)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(self.invalid(name))
        }
    }

    pub fn required_bool(&self, name: &str) -> Result<bool, DecodeError> {
        self.required(name)?
            .as_bool()
            .ok_or_else(|| self.invalid(name))
    }

    pub fn optional_bool(&self, name: &str, default: bool) -> Result<bool, DecodeError> {
        match self.get(name) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| self.invalid(name)),
        }
    }

    pub fn required_str(&self, name: &str) -> Result<&'a str, DecodeError> {
        self.required(name)?
            .as_str()
            .ok_or_else(|| self.invalid(name))
    }

    pub fn optional_str(&self, name: &str) -> Result<Option<&'a str>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| self.invalid(name)),
        }
    }

    pub fn required_id(&self, name: &str) -> Result<Identifier, DecodeError> {
        Identifier::parse(self.required_str(name)?).ok_or_else(|| self.invalid(name))
    }

    pub fn optional_id(&self, name: &str, default: Identifier) -> Result<Identifier, DecodeError> {
        match self.optional_str(name)? {
            None => Ok(default),
            Some(text) => Identifier::parse(text).ok_or_else(|| self.invalid(name)),
        }
    }

    // -- collections --------------------------------------------------------

    /// A single string or a list of strings; absent means empty.
    pub fn string_list(&self, name: &str) -> Result<Vec<&'a str>, DecodeError> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.as_str()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(|| self.invalid(name)))
                .collect(),
            Some(_) => Err(self.invalid(name)),
        }
    }

    /// Array-or-scalar identifiers normalised to a set.
    pub fn id_set(&self, name: &str) -> Result<BTreeSet<Identifier>, DecodeError> {
        self.string_list(name)?
            .into_iter()
            .map(|text| Identifier::parse(text).ok_or_else(|| self.invalid(name)))
            .collect()
    }

    pub fn weather_set(&self, name: &str) -> Result<BTreeSet<Weather>, DecodeError> {
        self.string_list(name)?
            .into_iter()
            .map(|text| Weather::parse(text).ok_or_else(|| self.invalid(name)))
            .collect()
    }

    pub fn required_array(&self, name: &str) -> Result<&'a Vec<Value>, DecodeError> {
        self.required(name)?
            .as_array()
            .ok_or_else(|| self.invalid(name))
    }

    pub fn optional_array(&self, name: &str) -> Result<Option<&'a Vec<Value>>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v.as_array().map(Some).ok_or_else(|| self.invalid(name)),
        }
    }

    // -- nesting ------------------------------------------------------------

    pub fn nested(&self, name: &str) -> Result<Option<FieldReader<'a>>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Object(object)) => Ok(Some(Self::with_prefix(object, self.path(name)))),
            Some(_) => Err(self.invalid(name)),
        }
    }

    pub fn required_nested(&self, name: &str) -> Result<FieldReader<'a>, DecodeError> {
        self.nested(name)?.ok_or_else(|| self.missing(name))
    }

    /// Reader over the object at `index` of the array field `name`.
    pub fn element(&self, name: &str, index: usize, value: &'a Value) -> Result<FieldReader<'a>, DecodeError> {
        let path = format!("{}[{}]", self.path(name), index);
        match value {
            Value::Object(object) => Ok(Self::with_prefix(object, path)),
            _ => Err(DecodeError::InvalidField(path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read `schemaVersion` (default 1).
pub fn schema_version(document: &Document) -> Result<i64, DecodeError> {
    let reader = FieldReader::new(document);
    match reader.get(SCHEMA_VERSION_KEY) {
        None => Ok(DEFAULT_SCHEMA_VERSION),
        Some(v) => v.as_i64().ok_or_else(|| reader.invalid(SCHEMA_VERSION_KEY)),
    }
}

/// Decode a document, selecting the schema from its `schemaVersion` key.
pub fn decode(id: &str, document: &Document, variants: &VariantRegistry) -> Result<SkyboxDefinition, DecodeError> {
    let version = schema_version(document)?;
    decode_with_version(id, document, version, variants)
}

/// Decode a document with an explicitly supplied schema version.
pub fn decode_with_version(
    id: &str,
    document: &Document,
    schema_version: i64,
    variants: &VariantRegistry,
) -> Result<SkyboxDefinition, DecodeError> {
    if schema_version >= DECLARATIVE_SCHEMA_VERSION {
        decode_v2(id, document, variants)
    } else {
        decode_legacy(id, document, variants)
    }
}

// ---------------------------------------------------------------------------
// Schema v2
// ---------------------------------------------------------------------------

fn decode_v2(id: &str, document: &Document, variants: &VariantRegistry) -> Result<SkyboxDefinition, DecodeError> {
    let reader = FieldReader::new(document);
    let kind = reader.required_str(TYPE_KEY)?;
    let codec = variants
        .get(kind)
        .ok_or_else(|| DecodeError::UnknownVariant(kind.to_string()))?;

    let properties = decode_properties(&reader.required_nested("properties")?)?;
    let conditions = match reader.nested("conditions")? {
        Some(section) => decode_conditions(&section)?,
        None => Conditions::default(),
    };
    let decorations = match reader.nested("decorations")? {
        Some(section) => decode_decorations(&section)?,
        None => Decorations::default(),
    };
    let payload = (codec.decode)(&reader)?;

    Ok(SkyboxDefinition::new(id, kind, properties, conditions, decorations, payload))
}

fn decode_properties(reader: &FieldReader<'_>) -> Result<Properties, DecodeError> {
    let fade = decode_fade(&reader.required_nested("fade")?)?;
    let fog_color = match reader.nested("fogColors")? {
        Some(section) => decode_rgba(&section, 1.0)?,
        None => Properties::DEFAULT_FOG_COLOR,
    };

    Ok(Properties {
        fade,
        max_alpha: reader.optional_unit_f32("maxAlpha", Properties::DEFAULT_MAX_ALPHA)?,
        transition_speed: transition_speed(reader)?,
        change_fog: reader.optional_bool("changeFog", false)?,
        fog_color,
        should_rotate: reader.optional_bool("shouldRotate", false)?,
    })
}

/// The four ticks are required unless `alwaysOn` is set.
fn decode_fade(reader: &FieldReader<'_>) -> Result<Fade, DecodeError> {
    if reader.optional_bool("alwaysOn", false)? {
        return Ok(Fade {
            start_fade_in: reader.optional_i32("startFadeIn", 0)?,
            end_fade_in: reader.optional_i32("endFadeIn", 0)?,
            start_fade_out: reader.optional_i32("startFadeOut", 0)?,
            end_fade_out: reader.optional_i32("endFadeOut", 0)?,
            always_on: true,
        });
    }
    required_fade_ticks(reader)
}

fn decode_conditions(reader: &FieldReader<'_>) -> Result<Conditions, DecodeError> {
    let mut heights = Vec::new();
    if let Some(entries) = reader.optional_array("heights")? {
        for (index, entry) in entries.iter().enumerate() {
            let range = reader.element("heights", index, entry)?;
            let min = range.required_f32("min")?;
            let max = range.required_f32("max")?;
            let range = HeightRange::new(min, max)
                .ok_or_else(|| DecodeError::InvalidField(format!("{}[{index}]", reader.path("heights"))))?;
            heights.push(range);
        }
    }

    Ok(Conditions {
        worlds: reader.id_set("worlds")?,
        biomes: reader.id_set("biomes")?,
        heights,
        weather: reader.weather_set("weather")?,
    })
}

fn decode_decorations(reader: &FieldReader<'_>) -> Result<Decorations, DecodeError> {
    Ok(Decorations {
        sun_texture: reader.optional_id("sun", Decorations::default_sun_texture())?,
        moon_texture: reader.optional_id("moon", Decorations::default_moon_texture())?,
        show_sun: reader.optional_bool("showSun", true)?,
        show_moon: reader.optional_bool("showMoon", true)?,
        show_stars: reader.optional_bool("showStars", true)?,
    })
}

/// `{ red, green, blue, alpha }` with every component in `[0, 1]`.
pub fn decode_rgba(reader: &FieldReader<'_>, default_alpha: f32) -> Result<Rgba, DecodeError> {
    Ok(Rgba {
        red: reader.optional_unit_f32("red", 0.0)?,
        green: reader.optional_unit_f32("green", 0.0)?,
        blue: reader.optional_unit_f32("blue", 0.0)?,
        alpha: reader.optional_unit_f32("alpha", default_alpha)?,
    })
}

// ---------------------------------------------------------------------------
// Legacy schema
// ---------------------------------------------------------------------------

fn decode_legacy(id: &str, document: &Document, variants: &VariantRegistry) -> Result<SkyboxDefinition, DecodeError> {
    let reader = FieldReader::new(document);
    let kind = reader.optional_str(TYPE_KEY)?.unwrap_or(SQUARE_TEXTURED);
    let codec = variants
        .get(kind)
        .ok_or_else(|| DecodeError::UnknownVariant(kind.to_string()))?;
    let decode_payload = codec
        .decode_legacy
        .ok_or_else(|| DecodeError::UnsupportedOnLegacySchema(kind.to_string()))?;

    let properties = Properties {
        fade: required_fade_ticks(&reader)?,
        max_alpha: reader.optional_unit_f32("maxAlpha", Properties::DEFAULT_MAX_ALPHA)?,
        transition_speed: transition_speed(&reader)?,
        change_fog: reader.optional_bool("changeFog", false)?,
        fog_color: Rgba::rgb(
            reader.optional_unit_f32("fogRed", 0.0)?,
            reader.optional_unit_f32("fogGreen", 0.0)?,
            reader.optional_unit_f32("fogBlue", 0.0)?,
        ),
        should_rotate: reader.optional_bool("shouldRotate", false)?,
    };

    let mut heights = Vec::new();
    if let Some(entries) = reader.optional_array("heightRanges")? {
        for entry in entries {
            let pair = match entry.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                _ => return Err(reader.invalid("heightRanges")),
            };
            let bound = |v: &Value| v.as_f64().map(|f| f as f32).ok_or_else(|| reader.invalid("heightRanges"));
            let range = HeightRange::new(bound(&pair[0])?, bound(&pair[1])?)
                .ok_or_else(|| reader.invalid("heightRanges"))?;
            heights.push(range);
        }
    }

    let conditions = Conditions {
        worlds: reader.id_set("dimensions")?,
        biomes: reader.id_set("biomes")?,
        heights,
        weather: reader.weather_set("weather")?,
    };

    let decorations = match reader.nested("decorations")? {
        Some(section) => decode_decorations(&section)?,
        None => Decorations::default(),
    };

    let payload = decode_payload(&reader)?;

    Ok(SkyboxDefinition::new(id, kind, properties, conditions, decorations, payload))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn required_fade_ticks(reader: &FieldReader<'_>) -> Result<Fade, DecodeError> {
    Ok(Fade::new(
        reader.required_i32("startFadeIn")?,
        reader.required_i32("endFadeIn")?,
        reader.required_i32("startFadeOut")?,
        reader.required_i32("endFadeOut")?,
    ))
}

fn transition_speed(reader: &FieldReader<'_>) -> Result<f32, DecodeError> {
    let speed = reader.optional_f32("transitionSpeed", Properties::DEFAULT_TRANSITION_SPEED)?;
    if speed > 0.0 {
        Ok(speed)
    } else {
        Err(reader.invalid("transitionSpeed"))
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a definition as a schema v2 document.
///
/// Variant fields are written by the codec registered for the definition's
/// kind; an unregistered kind only gets the shared sections.
pub fn encode(definition: &SkyboxDefinition, variants: &VariantRegistry) -> Document {
    let mut document = Document::new();
    document.insert(SCHEMA_VERSION_KEY.into(), json!(DECLARATIVE_SCHEMA_VERSION));
    document.insert(TYPE_KEY.into(), json!(definition.variant_kind()));
    document.insert("properties".into(), encode_properties(definition.properties()));
    document.insert("conditions".into(), encode_conditions(definition.conditions()));
    document.insert("decorations".into(), encode_decorations(definition.decorations()));

    match variants.get(definition.variant_kind()) {
        Some(codec) => (codec.encode)(definition.payload(), &mut document),
        None => log::warn!(
            "Encoding skybox {} without variant fields: type `{}` is not registered",
            definition.id(),
            definition.variant_kind()
        ),
    }

    document
}

fn encode_properties(properties: &Properties) -> Value {
    let fade = &properties.fade;
    json!({
        "fade": {
            "startFadeIn": fade.start_fade_in,
            "endFadeIn": fade.end_fade_in,
            "startFadeOut": fade.start_fade_out,
            "endFadeOut": fade.end_fade_out,
            "alwaysOn": fade.always_on,
        },
        "maxAlpha": properties.max_alpha,
        "transitionSpeed": properties.transition_speed,
        "changeFog": properties.change_fog,
        "fogColors": encode_rgba(properties.fog_color),
        "shouldRotate": properties.should_rotate,
    })
}

fn encode_conditions(conditions: &Conditions) -> Value {
    let ids = |set: &BTreeSet<Identifier>| set.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    json!({
        "worlds": ids(&conditions.worlds),
        "biomes": ids(&conditions.biomes),
        "weather": conditions.weather.iter().map(|w| w.as_str()).collect::<Vec<_>>(),
        "heights": conditions
            .heights
            .iter()
            .map(|r| json!({ "min": r.min(), "max": r.max() }))
            .collect::<Vec<_>>(),
    })
}

fn encode_decorations(decorations: &Decorations) -> Value {
    json!({
        "sun": decorations.sun_texture.to_string(),
        "moon": decorations.moon_texture.to_string(),
        "showSun": decorations.show_sun,
        "showMoon": decorations.show_moon,
        "showStars": decorations.show_stars,
    })
}

pub fn encode_rgba(color: Rgba) -> Value {
    json!({
        "red": color.red,
        "green": color.green,
        "blue": color.blue,
        "alpha": color.alpha,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
