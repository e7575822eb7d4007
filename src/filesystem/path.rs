//! Validation and splitting of slash-delimited relative paths.

use super::ErrorKind;

/// Token naming the directory an operation is invoked on.
pub const SELF: &str = ".";

pub const SEPARATOR: char = '/';

/// Splits `path` into its segments.
///
/// The self token and the empty path both yield no segments. Anything with a
/// leading or trailing separator, an empty segment, or a `.`/`..` segment is
/// [`ErrorKind::Invalid`].
pub fn split(path: &str) -> Result<Vec<&str>, ErrorKind> {
    if is_self(path) {
        return Ok(Vec::new());
    }

    path.split(SEPARATOR)
        .map(|segment| match segment {
            "" | "." | ".." => Err(ErrorKind::Invalid),
            segment => Ok(segment),
        })
        .collect()
}

pub fn is_valid(path: &str) -> bool {
    split(path).is_ok()
}

pub fn is_self(path: &str) -> bool {
    path.is_empty() || path == SELF
}

/// Whether `name` can be used as a single entry name.
pub fn is_valid_name(name: &str) -> bool {
    !is_self(name) && name != ".." && !name.contains(SEPARATOR)
}

/// Splits a valid, non-self path into its parent directory path and final name.
pub fn split_parent(path: &str) -> Result<(&str, &str), ErrorKind> {
    if is_self(path) || !is_valid(path) {
        return Err(ErrorKind::Invalid);
    }
    Ok(path.rsplit_once(SEPARATOR).unwrap_or((SELF, path)))
}

/// Joins a child name onto a directory path, collapsing the self token.
pub fn join(parent: &str, name: &str) -> String {
    if is_self(parent) {
        name.to_string()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}
