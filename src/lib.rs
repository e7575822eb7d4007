//! Concurrent, in-memory hierarchical namespace of directories and files.

pub mod filesystem;
pub mod manifest;
pub mod namespace;

pub use filesystem::{Directory, Entry, ErrorKind, File, FileKind, Metadata, Op, PathError};
pub use namespace::{Fs, MemFs, ReadDirFs, ReadFileFs, StatFs, SubFs};
