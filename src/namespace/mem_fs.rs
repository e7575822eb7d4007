use std::sync::Arc;

use tracing::debug;

use crate::filesystem::{Directory, Entry, ErrorKind, File, Metadata, Op, PathError, path};
use crate::namespace::{Fs, Handle, ReadDirFs, ReadFileFs, StatFs, SubFs};

/// Filesystem view over a [`Directory`] tree.
///
/// Clones and views produced by [`SubFs::sub`] alias the same nodes, so a
/// change made through one of them is visible through all of them.
#[derive(Debug, Clone)]
pub struct MemFs {
    root: Arc<Directory>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self::from_root(Directory::root())
    }

    pub fn from_root(root: Arc<Directory>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Arc<Directory> {
        &self.root
    }

    /// Creates a single directory whose parent must already exist.
    ///
    /// Like [`Directory::add`], an entry already stored under the name is
    /// replaced.
    pub fn mkdir(&self, path: &str) -> Result<(), PathError> {
        let (parent, name) =
            path::split_parent(path).map_err(|kind| PathError::new(Op::Mkdir, path, kind))?;
        debug!("Creating directory '{}'", path);
        self.root.add(parent, Directory::new(name))
    }

    /// Creates the directory at `path` along with any missing parents.
    pub fn mkdir_all(&self, path: &str) -> Result<Arc<Directory>, PathError> {
        if path::is_self(path) {
            return Ok(Arc::clone(&self.root));
        }
        let (parent, name) =
            path::split_parent(path).map_err(|kind| PathError::new(Op::MkdirAll, path, kind))?;
        self.root.mkdir_all(parent, Directory::new(name))
    }

    /// Stores `body` as a new file at `path`. The parent directory must exist.
    pub fn create_file(
        &self,
        path: &str,
        body: impl Into<Arc<[u8]>>,
    ) -> Result<Arc<File>, PathError> {
        let (parent, name) =
            path::split_parent(path).map_err(|kind| PathError::new(Op::Create, path, kind))?;
        let file = File::new(name, body);
        self.root.add(parent, Arc::clone(&file))?;
        Ok(file)
    }

    pub fn remove(&self, path: &str) -> Result<Entry, PathError> {
        self.root.remove(path)
    }
}

impl Fs for MemFs {
    type File = Handle;

    fn open(&self, path: &str) -> Result<Handle, PathError> {
        self.root.get(path).map(|entry| Handle::new(path, entry))
    }
}

impl StatFs for MemFs {
    fn stat(&self, path: &str) -> Result<Metadata, PathError> {
        self.root.get(path).map(|entry| entry.metadata())
    }
}

impl ReadDirFs for MemFs {
    fn read_dir(&self, path: &str) -> Result<Vec<Entry>, PathError> {
        match self.root.get(path)? {
            Entry::Directory(dir) => Ok(dir.entries()),
            Entry::File(_) => Err(PathError::new(Op::ReadDir, path, ErrorKind::Permission)),
        }
    }
}

impl ReadFileFs for MemFs {
    fn read_file(&self, path: &str) -> Result<Arc<[u8]>, PathError> {
        match self.root.get(path)? {
            Entry::File(file) => Ok(Arc::clone(file.body())),
            Entry::Directory(_) => Err(PathError::new(Op::ReadFile, path, ErrorKind::Invalid)),
        }
    }
}

impl SubFs for MemFs {
    fn sub(&self, dir: &str) -> Result<Self, PathError> {
        match self.root.get(dir)? {
            Entry::Directory(root) => Ok(Self::from_root(root)),
            Entry::File(_) => Err(PathError::new(Op::Sub, dir, ErrorKind::NotExist)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use rstest::*;

    /// docs/readme.txt, docs/guide/intro.md and top.txt
    fn sample_fs() -> MemFs {
        let fs = MemFs::new();
        fs.mkdir_all("docs/guide").unwrap();
        fs.create_file("docs/readme.txt", b"read me".as_slice()).unwrap();
        fs.create_file("docs/guide/intro.md", b"# intro".as_slice()).unwrap();
        fs.create_file("top.txt", b"top".as_slice()).unwrap();
        fs
    }

    #[test]
    fn new_fs_has_an_empty_unnamed_root() {
        let fs = MemFs::new();
        assert_eq!(fs.root().name(), "");
        assert!(fs.root().is_empty());
        assert!(fs.read_dir(".").unwrap().is_empty());
    }

    #[test]
    fn open_file_streams_its_contents() {
        let fs = sample_fs();
        let mut handle = fs.open("docs/readme.txt").unwrap();
        assert!(!handle.is_dir());
        assert_eq!(handle.metadata().name(), "readme.txt");

        let mut contents = String::new();
        handle.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "read me");
    }

    #[test]
    fn open_directory_lists_children() {
        let fs = sample_fs();
        let Handle::Dir(mut dir) = fs.open("docs").unwrap() else {
            panic!("expected a directory handle");
        };
        let names = dir
            .read_dir(0)
            .unwrap()
            .iter()
            .map(|entry| entry.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["guide", "readme.txt"]);
    }

    #[test]
    fn reading_an_opened_directory_names_its_path() {
        let fs = sample_fs();
        let mut handle = fs.open("docs/guide").unwrap();
        let err = handle.read(&mut [0u8; 8]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "read docs/guide: permission denied");
    }

    #[rstest]
    #[case("missing", ErrorKind::NotExist)]
    #[case("top.txt/below", ErrorKind::NotExist)]
    #[case("/docs", ErrorKind::Invalid)]
    fn open_reports_error_kind(#[case] path: &str, #[case] kind: ErrorKind) {
        let err = sample_fs().open(path).unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn stat_reports_metadata() {
        let fs = sample_fs();

        let file = fs.stat("docs/guide/intro.md").unwrap();
        assert_eq!(file.name(), "intro.md");
        assert_eq!(file.size(), 7);
        assert!(!file.is_dir());

        let dir = fs.stat("docs/guide").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.size(), 0);
    }

    #[test]
    fn read_dir_is_sorted_and_refuses_files() {
        let fs = sample_fs();
        let names = fs
            .read_dir(".")
            .unwrap()
            .iter()
            .map(|entry| entry.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["docs", "top.txt"]);

        let err = fs.read_dir("top.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
        assert_eq!(err.op(), Op::ReadDir);
    }

    #[test]
    fn read_file_shares_bytes_and_refuses_directories() {
        let fs = sample_fs();
        let body = fs.read_file("top.txt").unwrap();
        assert_eq!(&body[..], b"top");

        let stored = fs.root().get("top.txt").unwrap();
        assert!(Arc::ptr_eq(&body, stored.as_file().unwrap().body()));

        let err = fs.read_file("docs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.op(), Op::ReadFile);
    }

    #[test]
    fn sub_views_share_nodes_both_ways() {
        let fs = sample_fs();
        let docs = fs.sub("docs").unwrap();
        assert_eq!(&docs.read_file("readme.txt").unwrap()[..], b"read me");

        docs.create_file("new.txt", b"from sub".as_slice()).unwrap();
        assert_eq!(&fs.read_file("docs/new.txt").unwrap()[..], b"from sub");

        fs.remove("docs/readme.txt").unwrap();
        assert_eq!(
            docs.stat("readme.txt").unwrap_err().kind(),
            ErrorKind::NotExist
        );

        let guide = docs.sub("guide").unwrap();
        assert!(Arc::ptr_eq(
            guide.root(),
            fs.root().get("docs/guide").unwrap().as_directory().unwrap()
        ));
    }

    #[test]
    fn sub_of_a_file_does_not_exist() {
        let err = sample_fs().sub("top.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotExist);
        assert_eq!(err.op(), Op::Sub);
    }

    #[test]
    fn mkdir_creates_one_level() {
        let fs = sample_fs();
        fs.mkdir("docs/extra").unwrap();
        assert!(fs.stat("docs/extra").unwrap().is_dir());

        let err = fs.mkdir("missing/extra").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotExist);

        let err = fs.mkdir("top.txt/extra").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exist);
    }

    #[rstest]
    #[case(".")]
    #[case("docs/")]
    #[case("a//b")]
    fn mkdir_rejects_invalid_paths(#[case] path: &str) {
        let err = sample_fs().mkdir(path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.op(), Op::Mkdir);
        assert_eq!(err.path(), path);
    }

    #[test]
    fn mkdir_all_returns_the_created_directory() {
        let fs = MemFs::new();
        let created = fs.mkdir_all("a/b/c").unwrap();
        assert_eq!(created.name(), "c");
        assert!(fs.stat("a/b/c").unwrap().is_dir());
        assert!(Arc::ptr_eq(&fs.mkdir_all(".").unwrap(), fs.root()));
    }

    #[test]
    fn create_file_needs_an_existing_parent() {
        let fs = MemFs::new();
        let err = fs
            .create_file("a/missing/p", b"x".as_slice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotExist);

        let err = fs.create_file(".", b"x".as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.op(), Op::Create);
    }

    #[test]
    fn remove_then_stat_does_not_exist() {
        let fs = sample_fs();
        let removed = fs.remove("docs").unwrap();
        assert!(removed.is_dir());
        assert_eq!(fs.stat("docs").unwrap_err().kind(), ErrorKind::NotExist);
        assert_eq!(
            fs.stat("docs/guide/intro.md").unwrap_err().kind(),
            ErrorKind::NotExist
        );
    }

    #[test]
    fn namespace_is_shareable_across_threads() {
        let fs = MemFs::new();
        std::thread::scope(|scope| {
            for i in 0..8 {
                let fs = fs.clone();
                scope.spawn(move || {
                    let dir = format!("worker{i}");
                    fs.mkdir(&dir).unwrap();
                    fs.create_file(&path::join(&dir, "out.txt"), vec![i as u8])
                        .unwrap();
                });
            }
        });

        assert_eq!(fs.read_dir(".").unwrap().len(), 8);
        assert_eq!(&fs.read_file("worker3/out.txt").unwrap()[..], [3u8]);
    }
}
