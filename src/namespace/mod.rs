//! Filesystem-style access to a [`Directory`](crate::filesystem::Directory)
//! tree: open, stat, listing, whole-file reads and aliasing subviews.

mod fs_traits;
mod handle;
mod mem_fs;

pub use fs_traits::{Fs, ReadDirFs, ReadFileFs, StatFs, SubFs};
pub use handle::{DirHandle, FileReader, Handle};
pub use mem_fs::MemFs;
