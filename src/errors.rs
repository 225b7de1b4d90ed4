use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop processing of a file or a whole run.
///
/// Schema violations and duplicate ids are not errors: they are collected
/// as data by `schema` and `duplicates` and never abort anything.
#[derive(Debug, Error)]
pub enum HeritageError {
    #[error("directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },
    #[error("no category files matching '{pattern}' in {}", dir.display())]
    NoCategoryFiles { dir: PathBuf, pattern: String },
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected structure in {}: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },
}

impl HeritageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Shape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the "nothing to process" family of discovery failures.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            Self::MissingDirectory { .. } | Self::NoCategoryFiles { .. } | Self::Pattern(_)
        )
    }
}
