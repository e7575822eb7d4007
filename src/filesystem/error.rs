use std::io;

use derive_more::Display;
use snafu::Snafu;

/// The category of a failed tree operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Malformed path, or an operation against the wrong kind of entry
    #[display("invalid argument")]
    Invalid,
    /// A path segment or the final target is missing
    #[display("file does not exist")]
    NotExist,
    /// Descending through or creating over an entry of the wrong kind
    #[display("file already exists")]
    Exist,
    /// The operation is not allowed for the target's kind
    #[display("permission denied")]
    Permission,
}

impl From<ErrorKind> for io::ErrorKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Invalid => io::ErrorKind::InvalidInput,
            ErrorKind::NotExist => io::ErrorKind::NotFound,
            ErrorKind::Exist => io::ErrorKind::AlreadyExists,
            ErrorKind::Permission => io::ErrorKind::PermissionDenied,
        }
    }
}

/// The operation that produced a [`PathError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Op {
    #[display("open")]
    Open,
    #[display("add")]
    Add,
    #[display("mkdir")]
    Mkdir,
    #[display("mkdirall")]
    MkdirAll,
    #[display("create")]
    Create,
    #[display("remove")]
    Remove,
    #[display("read")]
    Read,
    #[display("readdir")]
    ReadDir,
    #[display("readfile")]
    ReadFile,
    #[display("sub")]
    Sub,
}

/// Error returned by every tree and namespace operation.
///
/// Carries the operation, the path exactly as the caller supplied it and the
/// [`ErrorKind`] describing what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)), display("{op} {path}: {kind}"))]
pub struct PathError {
    op: Op,
    path: String,
    kind: ErrorKind,
}

impl PathError {
    pub(crate) fn new(op: Op, path: impl Into<String>, kind: ErrorKind) -> Self {
        PathSnafu { op, path, kind }.build()
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<PathError> for io::Error {
    fn from(err: PathError) -> Self {
        io::Error::new(err.kind.into(), err)
    }
}
