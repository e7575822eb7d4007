//! Loading an initial namespace from a YAML manifest.

mod tree_manifest;

pub use tree_manifest::{DEFAULT_MANIFEST_FILE_NAME, Manifest, ManifestError};
