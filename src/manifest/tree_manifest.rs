use std::{borrow::Cow, path::Path, string::FromUtf8Error, sync::Arc};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::filesystem::{Directory, File, PathError, path};
use crate::namespace::MemFs;

pub const DEFAULT_MANIFEST_FILE_NAME: &str = "memfs.yaml";

const TREE_KEY: &str = "tree";

/// A namespace built from a YAML description.
///
/// Under the top-level `tree` key a mapping is a directory and a scalar is a
/// file whose body is the scalar's text (`null` is an empty file).
#[derive(Debug, Clone)]
pub struct Manifest {
    fs: MemFs,
}

impl Manifest {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let file_path = path.display().to_string();

        debug!("Reading manifest file: {}", file_path);
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: &file_path,
        })?;
        debug!("Successfully read manifest file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu { file_path })?;
        contents.as_str().try_into()
    }

    pub fn fs(&self) -> &MemFs {
        &self.fs
    }

    pub fn into_fs(self) -> MemFs {
        self.fs
    }

    fn populate(
        dir: &Arc<Directory>,
        mapping: &LinkedHashMap<Yaml, Yaml>,
        location: &str,
    ) -> Result<(), ManifestError> {
        for (key, value) in mapping.iter() {
            let Yaml::Value(Scalar::String(name)) = key else {
                warn!("Skipping entry with non-string name {:?} in '{}'", key, location);
                continue;
            };
            if !path::is_valid_name(name) {
                warn!("Skipping entry with invalid name '{}' in '{}'", name, location);
                continue;
            }

            let entry_path = path::join(location, name);
            match value {
                Yaml::Mapping(children) => {
                    let child = Directory::new(name.to_string());
                    dir.add(path::SELF, Arc::clone(&child))
                        .context(InsertSnafu { path: &entry_path })?;
                    Self::populate(&child, children, &entry_path)?;
                }
                Yaml::Value(scalar) => match Self::file_body(scalar) {
                    Some(body) => {
                        dir.add(path::SELF, File::new(name.to_string(), body.into_bytes()))
                            .context(InsertSnafu { path: &entry_path })?;
                    }
                    None => warn!("Skipping '{}': unsupported file contents", entry_path),
                },
                _ => warn!("Skipping '{}': expected a mapping or a scalar", entry_path),
            }
        }

        Ok(())
    }

    fn file_body(scalar: &Scalar) -> Option<String> {
        match scalar {
            Scalar::String(body) => Some(body.to_string()),
            Scalar::Null => Some(String::new()),
            Scalar::Integer(number) => Some(number.to_string()),
            Scalar::Boolean(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Manifest {
    type Error = ManifestError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents
            .first()
            .ok_or(ManifestError::MalformedManifest)?;

        let top_level = document
            .as_mapping()
            .ok_or(ManifestError::TopLevelNotMap)?;

        let fs = MemFs::new();
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(TREE_KEY)))) {
            None | Some(Yaml::Value(Scalar::Null)) => {
                debug!("Manifest has no tree section, starting empty");
            }
            Some(tree) => {
                let tree = tree.as_mapping().ok_or(ManifestError::TreeNotMap)?;
                Self::populate(fs.root(), tree, path::SELF)?;
            }
        }

        Ok(Manifest { fs })
    }
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("Failed to read the manifest file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The manifest file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the manifest file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted manifest file"))]
    MalformedManifest,
    #[snafu(display("Top level of manifest should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Tree section should be a map"))]
    TreeNotMap,
    #[snafu(display("Failed to insert '{}' into the tree", path))]
    InsertError { path: String, source: PathError },
}
