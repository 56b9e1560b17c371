//! Document discovery and batch decoding.
//!
//! A [`DocumentSource`] hands out raw documents keyed by id; [`load_batch`]
//! decodes every matching one and collects per-document failures in a
//! [`ReloadReport`] instead of aborting.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::core::{Error, Result};
use crate::resource::config::LoaderConfig;
use crate::skybox::{Document, SkyboxDefinition, VariantRegistry, decode};

/// One document as handed out by a source: its id and its parsed body.
pub type LoadedDocument = (String, Result<Document>);

/// Provider of skybox documents.
pub trait DocumentSource {
    /// Every document whose id satisfies `predicate`, in a stable order.
    ///
    /// An `Err` entry is a document that exists but could not be read or
    /// parsed; the outer `Err` means the source itself is unavailable.
    fn load_all_matching(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<LoadedDocument>>;
}

fn parse_document(id: &str, text: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(Error::DocumentRead {
            id: id.to_string(),
            reason: "top-level value is not an object".to_string(),
        }),
        Err(e) => Err(Error::DocumentRead {
            id: id.to_string(),
            reason: e.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// Reads documents from files below a root directory.
///
/// Ids are paths relative to the root with `/` separators, so
/// `<root>/pack/sky/day.json` has id `pack/sky/day.json`. Symbolic links
/// are not followed.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn id_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = relative.iter().map(|part| part.to_str()).collect();
        Some(parts?.join("/"))
    }
}

impl DocumentSource for DirectorySource {
    fn load_all_matching(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<LoadedDocument>> {
        let mut matching: Vec<(String, PathBuf)> = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            match self.id_of(entry.path()) {
                Some(id) if predicate(&id) => matching.push((id, entry.into_path())),
                _ => {}
            }
        }
        matching.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(matching
            .into_iter()
            .map(|(id, path)| {
                let document = std::fs::read_to_string(&path)
                    .map_err(|e| Error::DocumentRead {
                        id: id.clone(),
                        reason: e.to_string(),
                    })
                    .and_then(|text| parse_document(&id, &text));
                (id, document)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// In-memory documents keyed by id, yielded in id order.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the raw JSON text for `id`.
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(id.into(), text.into());
    }

    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn load_all_matching(&self, predicate: &dyn Fn(&str) -> bool) -> Result<Vec<LoadedDocument>> {
        Ok(self
            .documents
            .iter()
            .filter(|(id, _)| predicate(id))
            .map(|(id, text)| (id.clone(), parse_document(id, text)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Batch loading
// ---------------------------------------------------------------------------

/// Outcome of one reload.
#[derive(Debug, Default)]
pub struct ReloadReport {
    /// Ids of decoded skyboxes, in load order.
    pub loaded: Vec<String>,
    /// Skipped documents with the reason each was skipped.
    pub failures: Vec<(String, Error)>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decode every document `source` offers for `config`.
///
/// Individual documents that fail to read or decode are logged and skipped.
/// A disabled config yields an empty batch without touching the source.
pub fn load_batch(
    source: &dyn DocumentSource,
    config: &LoaderConfig,
    variants: &VariantRegistry,
) -> Result<(Vec<SkyboxDefinition>, ReloadReport)> {
    let mut report = ReloadReport::default();
    if !config.enabled {
        log::info!("Skybox loading disabled, clearing skyboxes");
        return Ok((Vec::new(), report));
    }

    let documents = source.load_all_matching(&|id| config.matches(id))?;
    let mut definitions = Vec::with_capacity(documents.len());

    for (id, document) in documents {
        let decoded = document.and_then(|document| {
            decode(&id, &document, variants).map_err(|source| Error::Decode {
                id: id.clone(),
                source,
            })
        });
        match decoded {
            Ok(definition) => {
                log::debug!("Loaded skybox {} ({})", id, definition.variant_kind());
                report.loaded.push(id);
                definitions.push(definition);
            }
            Err(e) => {
                log::warn!("Skipping skybox {}: {}", id, e);
                report.failures.push((id, e));
            }
        }
    }

    log::info!(
        "Loaded {} skyboxes ({} skipped)",
        report.loaded.len(),
        report.failures.len()
    );
    Ok((definitions, report))
}
