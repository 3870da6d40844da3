//! Configuration errors
//!
//! Only world setup can fail. Once a world exists, the simulation has no
//! recoverable error paths.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings JSON could not be decoded
    Parse(serde_json::Error),
    /// A size or count that must be positive was not
    InvalidDimension { field: &'static str, value: f32 },
    /// Terrain walk bounds do not fit inside the grid
    RowBounds {
        highest: usize,
        lowest: usize,
        rows: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
            Self::Parse(err) => write!(f, "failed to parse settings: {err}"),
            Self::InvalidDimension { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::RowBounds {
                highest,
                lowest,
                rows,
            } => write!(
                f,
                "terrain rows must satisfy highest ({highest}) < lowest ({lowest}) < rows ({rows})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
