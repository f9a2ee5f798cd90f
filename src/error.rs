//! Error handling for the editor core
//!
//! Each subsystem reports its own `thiserror` enum. `EditorError` gathers
//! them for callers that drive the whole session, so a frontend only has to
//! match on one type.

use crate::grid::GridError;
use crate::persistence::PersistenceError;
use crate::tools::ToolError;
use crate::upload::UploadError;
use std::error::Error as StdError;
use std::fmt;

/// Main error type for the editor
#[derive(Debug)]
pub enum EditorError {
    // Grid Errors
    Grid(GridError),

    // Tool Errors
    Tool(ToolError),

    // Persistence Errors
    Persistence {
        path: String,
        error: PersistenceError,
    },

    // Upload Errors
    Upload(UploadError),

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
    ConfigParse {
        error: String,
    },

    // System Errors
    IoError {
        path: String,
        error: String,
    },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Grid(e) => write!(f, "Grid error: {}", e),
            EditorError::Tool(e) => write!(f, "Tool error: {}", e),

            EditorError::Persistence { path, error } if path.is_empty() => {
                write!(f, "Model file error: {}", error)
            }
            EditorError::Persistence { path, error } => {
                write!(f, "Model file error for {}: {}", path, error)
            }

            EditorError::Upload(e) => write!(f, "Upload error: {}", e),

            EditorError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),
            EditorError::ConfigParse { error } => write!(f, "Config parse error: {}", error),

            EditorError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),
        }
    }
}

impl StdError for EditorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EditorError::Grid(e) => Some(e),
            EditorError::Tool(e) => Some(e),
            EditorError::Persistence { error, .. } => Some(error),
            EditorError::Upload(e) => Some(e),
            _ => None,
        }
    }
}

/// Type alias for Results across the editor
pub type EditorResult<T> = Result<T, EditorError>;

// Conversion traits for subsystem errors

impl From<GridError> for EditorError {
    fn from(error: GridError) -> Self {
        EditorError::Grid(error)
    }
}

impl From<ToolError> for EditorError {
    fn from(error: ToolError) -> Self {
        EditorError::Tool(error)
    }
}

impl From<UploadError> for EditorError {
    fn from(error: UploadError) -> Self {
        EditorError::Upload(error)
    }
}

impl From<PersistenceError> for EditorError {
    fn from(error: PersistenceError) -> Self {
        EditorError::Persistence {
            path: String::new(),
            error,
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(error: std::io::Error) -> Self {
        EditorError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(error: toml::de::Error) -> Self {
        EditorError::ConfigParse {
            error: error.to_string(),
        }
    }
}

// Helper functions for common error patterns

/// Attach a file path to persistence and IO failures
pub trait PathContext<T> {
    fn with_path(self, path: &std::path::Path) -> EditorResult<T>;
}

impl<T, E> PathContext<T> for Result<T, E>
where
    E: Into<EditorError>,
{
    fn with_path(self, path: &std::path::Path) -> EditorResult<T> {
        self.map_err(|e| match e.into() {
            EditorError::Persistence { error, .. } => EditorError::Persistence {
                path: path.display().to_string(),
                error,
            },
            EditorError::IoError { error, .. } => EditorError::IoError {
                path: path.display().to_string(),
                error,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_display() {
        let err = EditorError::InvalidConfig {
            field: "brush_radius".to_string(),
            value: "9".to_string(),
            reason: "must be 1..=6".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config: brush_radius = 9 (must be 1..=6)"
        );
    }

    #[test]
    fn test_grid_error_converts() {
        let err: EditorError = GridError::InvalidBrickSize(0).into();
        assert!(matches!(err, EditorError::Grid(GridError::InvalidBrickSize(0))));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_path_context() {
        let result: Result<(), PersistenceError> =
            Err(PersistenceError::CorruptedData("short".to_string()));
        let err = result.with_path(Path::new("model.nuum")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model file error for model.nuum: Corrupted data: short"
        );

        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = io.with_path(Path::new("cfg.toml")).unwrap_err();
        assert_eq!(err.to_string(), "IO error for cfg.toml: file not found");
    }
}
