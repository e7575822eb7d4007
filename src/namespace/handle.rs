use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::filesystem::{Directory, Entry, ErrorKind, File, Metadata, Op, PathError, path};

/// An opened entry.
#[derive(Debug)]
pub enum Handle {
    File(FileReader),
    Dir(DirHandle),
}

impl Handle {
    /// Wraps `entry`, which was opened at `path`.
    pub(crate) fn new(path: &str, entry: Entry) -> Self {
        match entry {
            Entry::File(file) => Handle::File(FileReader::new(&file)),
            Entry::Directory(dir) => Handle::Dir(DirHandle::new(path, dir)),
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Handle::File(reader) => reader.metadata(),
            Handle::Dir(dir) => dir.metadata(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Dir(_))
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::File(reader) => reader.read(buf),
            Handle::Dir(dir) => dir.read(buf),
        }
    }
}

/// Byte stream over a file's contents.
///
/// Shares the file's body instead of copying it.
#[derive(Debug)]
pub struct FileReader {
    metadata: Metadata,
    cursor: Cursor<Arc<[u8]>>,
}

impl FileReader {
    fn new(file: &File) -> Self {
        Self {
            metadata: file.metadata(),
            cursor: Cursor::new(Arc::clone(file.body())),
        }
    }

    pub fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for FileReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Listing cursor over an opened directory.
///
/// Children are snapshotted on the first `read_dir` call; later changes to
/// the directory are not reflected in an ongoing listing.
#[derive(Debug)]
pub struct DirHandle {
    path: String,
    dir: Arc<Directory>,
    pending: Option<Vec<Entry>>,
}

impl DirHandle {
    fn new(opened_at: &str, dir: Arc<Directory>) -> Self {
        let path = if path::is_self(opened_at) { path::SELF } else { opened_at };
        Self {
            path: path.to_string(),
            dir,
            pending: None,
        }
    }

    /// The path this directory was opened at.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn metadata(&self) -> Metadata {
        self.dir.metadata()
    }

    /// Returns up to `n` of the entries not yet listed, in name order.
    ///
    /// With `n == 0` every remaining entry is returned at once and an
    /// exhausted listing yields an empty vector. With `n > 0` an exhausted
    /// listing is an [`io::ErrorKind::UnexpectedEof`] error.
    pub fn read_dir(&mut self, n: usize) -> io::Result<Vec<Entry>> {
        let pending = self.pending.get_or_insert_with(|| self.dir.entries());
        if n == 0 {
            return Ok(pending.drain(..).collect());
        }
        if pending.is_empty() {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        let count = n.min(pending.len());
        Ok(pending.drain(..count).collect())
    }
}

impl Read for DirHandle {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(PathError::new(Op::Read, &self.path, ErrorKind::Permission).into())
    }
}
