use std::io;
use std::path::PathBuf;

use crate::collector::procfs::parser::ParseError;

/// Why a counter reader produced no record for this tick.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The source file could not be opened or read.
    #[error("{} unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source was read but its content does not match the expected grammar.
    #[error("failed to parse {}: {}", .path.display(), .error.message)]
    ParseFailure {
        path: PathBuf,
        #[source]
        error: ParseError,
    },
}

impl CollectError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CollectError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, error: ParseError) -> Self {
        CollectError::ParseFailure {
            path: path.into(),
            error,
        }
    }
}
