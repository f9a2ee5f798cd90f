//! Persistence Module - NUUM v1 model files

pub mod model_data;
pub mod model_operations;

pub use model_data::NuumModel;
pub use model_operations::{apply_model, load_model, read_model, save_model, write_model};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Not a NUUM file (magic {0:?})")]
    InvalidMagic([u8; 4]),
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u16, found: u16 },
    #[error("Corrupted data: {0}")]
    CorruptedData(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Grid rejected model: {0}")]
    Grid(#[from] crate::grid::GridError),
}
