use std::sync::Arc;

use super::{FileKind, Metadata};

/// A leaf node. The body is fixed at construction and never mutated, so a
/// file needs no lock of its own.
#[derive(Debug)]
pub struct File {
    name: String,
    body: Arc<[u8]>,
}

impl File {
    pub fn new(name: impl Into<String>, body: impl Into<Arc<[u8]>>) -> Arc<Self> {
        Arc::new(File {
            name: name.into(),
            body: body.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the file contents.
    pub fn body(&self) -> &Arc<[u8]> {
        &self.body
    }

    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(&self.name, self.size(), FileKind::File)
    }
}
