use std::io::Read;
use std::sync::Arc;

use crate::filesystem::{Entry, Metadata, PathError};

/// A hierarchical namespace that can open entries by relative path.
pub trait Fs {
    type File: Read;

    fn open(&self, path: &str) -> Result<Self::File, PathError>;
}

pub trait StatFs: Fs {
    fn stat(&self, path: &str) -> Result<Metadata, PathError>;
}

pub trait ReadDirFs: Fs {
    /// Immediate children of the directory at `path`, sorted by name.
    fn read_dir(&self, path: &str) -> Result<Vec<Entry>, PathError>;
}

pub trait ReadFileFs: Fs {
    fn read_file(&self, path: &str) -> Result<Arc<[u8]>, PathError>;
}

pub trait SubFs: Fs {
    /// A namespace rooted at the directory at `dir`.
    fn sub(&self, dir: &str) -> Result<Self, PathError>
    where
        Self: Sized;
}
