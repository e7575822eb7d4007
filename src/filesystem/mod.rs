//! Concurrent in-memory tree of directories and files.
//!
//! A [`Directory`] owns its children behind its own lock, a [`File`] holds
//! immutable bytes, and [`Entry`] ties the two together. Paths are relative,
//! slash-delimited and resolved one segment at a time (see [`path`]).

mod directory;
mod entry;
mod error;
mod file;
pub mod path;

pub use directory::Directory;
pub use entry::{Entry, FileKind, Metadata};
pub use error::{ErrorKind, Op, PathError};
pub use file::File;
