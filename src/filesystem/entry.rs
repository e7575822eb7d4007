use std::sync::Arc;
use std::time::SystemTime;

use derive_more::{Display, From, IsVariant};

use super::{Directory, File};

/// What kind of node an [`Entry`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum FileKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// A node in the tree: either a container or a leaf.
///
/// Cloning an entry clones the handle, never the node, so two clones always
/// refer to the same directory or file. Use [`Entry::ptr_eq`] to compare
/// identity.
#[derive(Debug, Clone, From, IsVariant)]
pub enum Entry {
    Directory(Arc<Directory>),
    File(Arc<File>),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Directory(dir) => dir.name(),
            Entry::File(file) => file.name(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.is_directory()
    }

    pub fn kind(&self) -> FileKind {
        match self {
            Entry::Directory(_) => FileKind::Directory,
            Entry::File(_) => FileKind::File,
        }
    }

    /// Content length for files, always 0 for directories.
    pub fn size(&self) -> u64 {
        match self {
            Entry::Directory(_) => 0,
            Entry::File(file) => file.size(),
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Entry::Directory(dir) => dir.metadata(),
            Entry::File(file) => file.metadata(),
        }
    }

    pub fn as_directory(&self) -> Option<&Arc<Directory>> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<File>> {
        match self {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        }
    }

    /// Whether both entries refer to the very same node.
    pub fn ptr_eq(&self, other: &Entry) -> bool {
        match (self, other) {
            (Entry::Directory(a), Entry::Directory(b)) => Arc::ptr_eq(a, b),
            (Entry::File(a), Entry::File(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Snapshot of an entry's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    name: String,
    size: u64,
    kind: FileKind,
}

impl Metadata {
    pub(crate) fn new(name: impl Into<String>, size: u64, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_directory()
    }

    /// Nodes carry no timestamps; every entry reports the Unix epoch.
    pub fn modified(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }
}
