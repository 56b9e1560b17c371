//! Error types for skybox loading and decoding

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read skybox document {id}: {reason}")]
    DocumentRead { id: String, reason: String },

    #[error("Failed to decode skybox {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: DecodeError,
    },
}

/// Structured failure produced while decoding a single skybox document.
///
/// Field names are reported as dotted paths relative to the document root,
/// e.g. `properties.fade.endFadeOut`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("invalid value for field `{0}`")]
    InvalidField(String),

    #[error("unknown skybox type `{0}`")]
    UnknownVariant(String),

    #[error("skybox type `{0}` only supports schemaVersion 2 or above")]
    UnsupportedOnLegacySchema(String),
}

impl DecodeError {
    /// Name of the field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField(name) | Self::InvalidField(name) => Some(name),
            Self::UnknownVariant(_) | Self::UnsupportedOnLegacySchema(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_field() {
        assert_eq!(
            DecodeError::MissingField("endFadeOut".into()).field(),
            Some("endFadeOut")
        );
        assert_eq!(DecodeError::UnknownVariant("x".into()).field(), None);
    }

    #[test]
    fn test_error_display_names_document() {
        let err = Error::Decode {
            id: "sky/night.json".into(),
            source: DecodeError::InvalidField("maxAlpha".into()),
        };
        let text = err.to_string();
        assert!(text.contains("sky/night.json"));
        assert!(text.contains("maxAlpha"));
    }
}
