//! Skybox document discovery and loading configuration.

pub mod config;
pub mod loader;

pub use config::LoaderConfig;
pub use loader::{DirectorySource, DocumentSource, LoadedDocument, MemorySource, ReloadReport, load_batch};
