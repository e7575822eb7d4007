use std::io::{self, Write};

use colored::Colorize;
use memfs::filesystem::{Entry, PathError, path};
use memfs::manifest::{Manifest, ManifestError};
use memfs::namespace::{ReadDirFs, ReadFileFs, StatFs};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::data::Command;

const TREE_INDENT: &str = "  ";

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let fs = Manifest::from_path(&runtime_config.manifest)
            .await
            .context(ManifestLoadSnafu)?
            .into_fs();
        info!(
            "Loaded {} top-level entries from {}",
            fs.root().len(),
            runtime_config.manifest.display()
        );

        let color = supports_color::on(supports_color::Stream::Stdout).is_some();
        colored::control::set_override(color);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        Self::execute(&fs, &runtime_config.command, color, &mut out)?;
        out.flush().context(OutputSnafu)
    }

    /// Runs a single query against `fs`, writing the result to `out`.
    pub fn execute<F>(
        fs: &F,
        command: &Command,
        color: bool,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError>
    where
        F: StatFs + ReadDirFs + ReadFileFs,
    {
        debug!("Executing {:?}", command);
        match command {
            Command::Ls { path } => {
                for entry in fs.read_dir(path).context(QuerySnafu)? {
                    writeln!(out, "{}", Self::display_name(&entry, color)).context(OutputSnafu)?;
                }
                Ok(())
            }
            Command::Cat { path } => {
                let body = fs.read_file(path).context(QuerySnafu)?;
                out.write_all(&body).context(OutputSnafu)
            }
            Command::Stat { path } => {
                let metadata = fs.stat(path).context(QuerySnafu)?;
                let name = match metadata.name() {
                    "" => path::SELF,
                    name => name,
                };
                writeln!(out, "name: {name}").context(OutputSnafu)?;
                writeln!(out, "kind: {}", metadata.kind()).context(OutputSnafu)?;
                writeln!(out, "size: {}", metadata.size()).context(OutputSnafu)
            }
            Command::Tree { path } => Self::write_tree(fs, path, 0, color, out),
        }
    }

    fn write_tree<F: ReadDirFs>(
        fs: &F,
        dir: &str,
        depth: usize,
        color: bool,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        for entry in fs.read_dir(dir).context(QuerySnafu)? {
            writeln!(
                out,
                "{}{}",
                TREE_INDENT.repeat(depth),
                Self::display_name(&entry, color)
            )
            .context(OutputSnafu)?;
            if entry.is_dir() {
                Self::write_tree(fs, &path::join(dir, entry.name()), depth + 1, color, out)?;
            }
        }
        Ok(())
    }

    fn display_name(entry: &Entry, color: bool) -> String {
        match (entry.is_dir(), color) {
            (true, true) => format!("{}/", entry.name()).blue().bold().to_string(),
            (true, false) => format!("{}/", entry.name()),
            (false, _) => entry.name().to_string(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the manifest"))]
    ManifestLoadError { source: ManifestError },
    #[snafu(display("Failed to resolve the requested path"))]
    QueryError { source: PathError },
    #[snafu(display("Failed to write the command output"))]
    OutputError { source: io::Error },
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use memfs::filesystem::ErrorKind;
    use memfs::namespace::MemFs;
    use rstest::*;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r##"
tree:
  docs:
    readme.txt: "read me"
    guide:
      intro.md: "# intro"
  top.txt: "top"
"##;

    fn sample_fs() -> MemFs {
        Manifest::try_from(MANIFEST).unwrap().into_fs()
    }

    fn run_command(command: Command) -> Result<String, ApplicationError> {
        let mut out = Vec::new();
        Application::execute(&sample_fs(), &command, false, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[rstest]
    #[case(Command::Ls { path: ".".into() }, "docs/\ntop.txt\n")]
    #[case(Command::Ls { path: "docs".into() }, "guide/\nreadme.txt\n")]
    #[case(Command::Cat { path: "docs/guide/intro.md".into() }, "# intro")]
    #[case(Command::Stat { path: "top.txt".into() }, "name: top.txt\nkind: file\nsize: 3\n")]
    #[case(Command::Stat { path: ".".into() }, "name: .\nkind: directory\nsize: 0\n")]
    #[case(
        Command::Tree { path: ".".into() },
        "docs/\n  guide/\n    intro.md\n  readme.txt\ntop.txt\n"
    )]
    fn command_output(#[case] command: Command, #[case] expected: &str) {
        assert_eq!(run_command(command).unwrap(), expected);
    }

    #[rstest]
    #[case(Command::Ls { path: "top.txt".into() }, ErrorKind::Permission)]
    #[case(Command::Cat { path: "docs".into() }, ErrorKind::Invalid)]
    #[case(Command::Stat { path: "missing".into() }, ErrorKind::NotExist)]
    #[case(Command::Tree { path: "docs/".into() }, ErrorKind::Invalid)]
    fn command_reports_query_errors(#[case] command: Command, #[case] kind: ErrorKind) {
        match run_command(command) {
            Err(ApplicationError::QueryError { source }) => assert_eq!(source.kind(), kind),
            other => panic!("expected a query error, got {other:?}"),
        }
    }

    #[test]
    fn colored_listing_keeps_names() {
        let mut out = Vec::new();
        Application::execute(&sample_fs(), &Command::Ls { path: ".".into() }, true, &mut out)
            .unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("docs/"));
        assert!(listing.contains("top.txt"));
    }

    #[compio::test]
    async fn run_loads_manifest_and_executes() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{MANIFEST}").expect("Failed to write manifest");

        let config = RuntimeConfig {
            manifest: file.path().to_path_buf(),
            command: Command::Stat {
                path: "docs".into(),
            },
        };
        assert!(Application::run(config).await.is_ok());
    }

    #[compio::test]
    async fn run_fails_on_missing_manifest() {
        let config = RuntimeConfig {
            manifest: PathBuf::from("definitely-missing-manifest.yaml"),
            command: Command::Ls { path: ".".into() },
        };
        let result = Application::run(config).await;
        assert!(matches!(
            result,
            Err(ApplicationError::ManifestLoadError { .. })
        ));
    }
}
