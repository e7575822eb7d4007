use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use super::{Entry, ErrorKind, FileKind, Metadata, Op, PathError, path};

/// Serialises inserts of existing directories, so that two of them cannot
/// pass the cycle check against each other's stale subtree. Only taken while
/// no directory lock is held.
static DIRECTORY_INSERTS: Mutex<()> = Mutex::new(());

/// A container node mapping child names to entries.
///
/// Each directory owns its own lock, scoped to its own children. Operations
/// walking a path hold at most one directory's lock at a time and release it
/// before moving to the next level, so concurrent callers never deadlock.
/// A multi-segment operation is not atomic as a whole: a concurrent change to
/// an ancestor shows up as a `NotExist`/`Exist` error for the later step.
///
/// A directory has at most one parent. Inserting one that is already stored
/// somewhere fails with [`ErrorKind::Exist`] until it is removed again.
#[derive(Debug)]
pub struct Directory {
    name: String,
    attached: AtomicBool,
    children: RwLock<HashMap<String, Entry>>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Self::with_parent(name.into(), false)
    }

    fn with_parent(name: String, attached: bool) -> Arc<Self> {
        Arc::new(Directory {
            name,
            attached: AtomicBool::new(attached),
            children: RwLock::new(HashMap::new()),
        })
    }

    /// An unnamed directory to use as the top of a tree.
    pub fn root() -> Arc<Self> {
        Self::new("")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(&self.name, 0, FileKind::Directory)
    }

    /// Whether this directory is currently stored under a parent.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.children.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.read().is_empty()
    }

    /// Looks up an immediate child by name.
    pub fn child(&self, name: &str) -> Option<Entry> {
        self.children.read().get(name).cloned()
    }

    /// Snapshot of the immediate children, sorted by name.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries = self.children.read().values().cloned().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
    }

    /// Resolves `path` relative to this directory.
    ///
    /// The self token resolves to this directory. Walking through a file is
    /// reported as [`ErrorKind::NotExist`].
    pub fn get(self: &Arc<Self>, path: &str) -> Result<Entry, PathError> {
        let segments = path::split(path).map_err(|kind| PathError::new(Op::Open, path, kind))?;
        let Some((last, intermediate)) = segments.split_last() else {
            return Ok(Entry::Directory(Arc::clone(self)));
        };

        let parent = self.walk(intermediate, Op::Open, path, ErrorKind::NotExist)?;
        parent
            .child(last)
            .ok_or_else(|| PathError::new(Op::Open, path, ErrorKind::NotExist))
    }

    /// Inserts `entry` under its own name into the existing directory at
    /// `dir_path`.
    ///
    /// An entry already stored under that name is replaced regardless of its
    /// kind. Walking through a file is reported as [`ErrorKind::Exist`], as is
    /// a directory that already has a parent. An entry name that is not a
    /// single path segment, or a directory placed inside its own subtree, is
    /// [`ErrorKind::Invalid`].
    pub fn add(self: &Arc<Self>, dir_path: &str, entry: impl Into<Entry>) -> Result<(), PathError> {
        let entry = entry.into();
        if !path::is_valid_name(entry.name()) {
            return Err(PathError::new(Op::Add, dir_path, ErrorKind::Invalid));
        }
        let segments =
            path::split(dir_path).map_err(|kind| PathError::new(Op::Add, dir_path, kind))?;
        let target = self.walk(&segments, Op::Add, dir_path, ErrorKind::Exist)?;
        debug!("Adding {} '{}' under '{}'", entry.kind(), entry.name(), dir_path);

        let Entry::Directory(inserted) = &entry else {
            target.insert(entry);
            return Ok(());
        };
        let _guard = DIRECTORY_INSERTS.lock();
        inserted.claim(Op::Add, dir_path)?;
        if let Err(err) = target.check_acyclic(inserted, Op::Add, dir_path) {
            inserted.release();
            return Err(err);
        }
        target.insert(entry);
        Ok(())
    }

    fn insert(&self, entry: Entry) {
        let replaced = self
            .children
            .write()
            .insert(entry.name().to_string(), entry);
        if let Some(Entry::Directory(replaced)) = replaced {
            replaced.release();
        }
    }

    /// Creates every missing directory along `path`, then places `leaf` in the
    /// last one and returns the directory stored under the leaf's name.
    ///
    /// Not transactional: directories created before hitting a file stay in
    /// the tree. A directory already stored under the leaf's name is kept and
    /// returned instead of `leaf`; a file there is [`ErrorKind::Exist`]. The
    /// leaf follows the same name, parent and cycle rules as [`Self::add`].
    pub fn mkdir_all(
        self: &Arc<Self>,
        path: &str,
        leaf: Arc<Directory>,
    ) -> Result<Arc<Directory>, PathError> {
        if !path::is_valid_name(leaf.name()) {
            return Err(PathError::new(Op::MkdirAll, path, ErrorKind::Invalid));
        }
        let segments =
            path::split(path).map_err(|kind| PathError::new(Op::MkdirAll, path, kind))?;

        let mut current = Arc::clone(self);
        for segment in segments {
            let next = {
                let mut children = current.children.write();
                match children.get(segment).cloned() {
                    Some(Entry::Directory(dir)) => dir,
                    Some(Entry::File(_)) => {
                        return Err(PathError::new(Op::MkdirAll, path, ErrorKind::Exist));
                    }
                    None => {
                        debug!("Creating directory '{}' while resolving '{}'", segment, path);
                        let dir = Directory::with_parent(segment.to_string(), true);
                        children.insert(segment.to_string(), Entry::Directory(Arc::clone(&dir)));
                        dir
                    }
                }
            };
            current = next;
        }

        let _guard = DIRECTORY_INSERTS.lock();
        leaf.claim(Op::MkdirAll, path)?;
        if let Err(err) = current.check_acyclic(&leaf, Op::MkdirAll, path) {
            leaf.release();
            return Err(err);
        }

        let mut children = current.children.write();
        match children.get(leaf.name()).cloned() {
            Some(Entry::Directory(existing)) => {
                leaf.release();
                Ok(existing)
            }
            Some(Entry::File(_)) => {
                leaf.release();
                Err(PathError::new(Op::MkdirAll, path, ErrorKind::Exist))
            }
            None => {
                debug!("Adding directory '{}' under '{}'", leaf.name(), path);
                children.insert(leaf.name().to_string(), Entry::Directory(Arc::clone(&leaf)));
                Ok(leaf)
            }
        }
    }

    /// Removes the entry at `path` and hands it back.
    ///
    /// The self token is [`ErrorKind::Invalid`], as is walking through a file.
    pub fn remove(self: &Arc<Self>, path: &str) -> Result<Entry, PathError> {
        let segments =
            path::split(path).map_err(|kind| PathError::new(Op::Remove, path, kind))?;
        let Some((last, intermediate)) = segments.split_last() else {
            return Err(PathError::new(Op::Remove, path, ErrorKind::Invalid));
        };

        let parent = self.walk(intermediate, Op::Remove, path, ErrorKind::Invalid)?;
        let removed = parent.children.write().remove(*last);
        match removed {
            Some(entry) => {
                debug!("Removed {} '{}'", entry.kind(), path);
                if let Entry::Directory(dir) = &entry {
                    dir.release();
                }
                Ok(entry)
            }
            None => Err(PathError::new(Op::Remove, path, ErrorKind::NotExist)),
        }
    }

    /// Follows `segments` down from this directory, taking each node's read
    /// lock only while reading the next child.
    fn walk(
        self: &Arc<Self>,
        segments: &[&str],
        op: Op,
        path: &str,
        through_file: ErrorKind,
    ) -> Result<Arc<Directory>, PathError> {
        segments.iter().try_fold(Arc::clone(self), |current, segment| {
            trace!("Resolving segment '{}' of '{}'", segment, path);
            match current.child(segment) {
                Some(Entry::Directory(dir)) => Ok(dir),
                Some(Entry::File(_)) => Err(PathError::new(op, path, through_file)),
                None => Err(PathError::new(op, path, ErrorKind::NotExist)),
            }
        })
    }

    fn claim(&self, op: Op, path: &str) -> Result<(), PathError> {
        self.attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| PathError::new(op, path, ErrorKind::Exist))
    }

    fn release(&self) {
        self.attached.store(false, Ordering::Release);
    }

    /// Rejects inserting a directory into itself or into one of its own
    /// descendants. Must be called without holding any directory lock.
    fn check_acyclic(
        self: &Arc<Self>,
        inserted: &Arc<Directory>,
        op: Op,
        path: &str,
    ) -> Result<(), PathError> {
        let mut visited = HashSet::new();
        let mut pending = vec![Arc::clone(inserted)];
        while let Some(dir) = pending.pop() {
            if Arc::ptr_eq(&dir, self) {
                return Err(PathError::new(op, path, ErrorKind::Invalid));
            }
            if !visited.insert(Arc::as_ptr(&dir)) {
                continue;
            }
            pending.extend(
                dir.children
                    .read()
                    .values()
                    .filter_map(|child| child.as_directory().cloned()),
            );
        }
        Ok(())
    }
}
