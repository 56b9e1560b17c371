//! Core type aliases and shared identifier type

use std::fmt;
use std::str::FromStr;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Namespaced resource identifier (`namespace:path`).
///
/// Used for worlds, biomes and textures. A bare `path` is placed in the
/// [`Identifier::DEFAULT_NAMESPACE`] namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    namespace: String,
    path: String,
}

/// Returned when a string is not a valid [`Identifier`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier `{0}`")]
pub struct InvalidIdentifier(pub String);

impl Identifier {
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    /// Build an identifier from trusted parts without validation.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse `namespace:path` or a bare `path`.
    ///
    /// Namespaces allow `[a-z0-9_.-]`, paths additionally allow `/`.
    pub fn parse(text: &str) -> Option<Self> {
        let (namespace, path) = match text.split_once(':') {
            Some((ns, path)) => (ns, path),
            None => (Self::DEFAULT_NAMESPACE, text),
        };

        let valid_ns = |c: char| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-');
        let valid_path = |c: char| valid_ns(c) || c == '/';

        if namespace.is_empty() || path.is_empty() {
            return None;
        }
        if !namespace.chars().all(valid_ns) || !path.chars().all(valid_path) {
            return None;
        }

        Some(Self::new(namespace, path))
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidIdentifier(s.to_string()))
    }
}
