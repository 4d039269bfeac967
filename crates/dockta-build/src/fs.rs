use std::path::PathBuf;

use glob::Pattern;
use walkdir::WalkDir;

/// Directories never descended into when matching project files.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Abstraction over the project folder for testability.
///
/// Production code uses [`LocalFs`], tests use mockall-generated mocks.
/// All paths are relative to the project folder and `/`-separated.
pub trait ProjectFs {
    /// Does a file or directory exist at `path`?
    fn exists(&self, path: &str) -> bool;

    /// Recursively match files against a glob pattern.
    ///
    /// Results are sorted so callers can rely on lexical order.
    fn glob(&self, pattern: &str) -> Result<Vec<String>, FsError>;

    /// Write `content` to `path`, replacing any existing file.
    fn write(&self, path: &str, content: &str) -> Result<(), FsError>;
}

/// A project folder on the local disk.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProjectFs for LocalFs {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>, FsError> {
        let matcher = Pattern::new(pattern).map_err(|e| FsError::Pattern {
            pattern: pattern.to_owned(),
            source: e,
        })?;

        let mut matches = Vec::new();
        let walker = WalkDir::new(&self.root).into_iter().filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && e
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        });

        for entry in walker {
            let entry = entry.map_err(|e| FsError::Walk {
                path: self.root.clone(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| FsError::OutsideRoot {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?;
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if matcher.matches(&relative) {
                matches.push(relative);
            }
        }

        matches.sort();
        tracing::debug!(pattern, found = matches.len(), "glob completed");
        Ok(matches)
    }

    fn write(&self, path: &str, content: &str) -> Result<(), FsError> {
        let target = self.root.join(path);
        tracing::debug!(path = %target.display(), bytes = content.len(), "writing file");
        std::fs::write(&target, content).map_err(|e| FsError::Write {
            path: target,
            source: e,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("invalid glob pattern {pattern:?}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("failed to walk project folder {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("walked path {path} is outside the project folder")]
    OutsideRoot {
        path: PathBuf,
        source: std::path::StripPrefixError,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
