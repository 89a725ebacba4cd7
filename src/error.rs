use std::io;

use thiserror::Error;

/// Errors produced while building or rendering a scene.
///
/// Missing intersections are never errors; they are empty `Intersections`
/// and shade as the background color.
#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix is not invertible (determinant {determinant})")]
    NonInvertible { determinant: f64 },

    #[error("expected {expected} matrix elements, got {actual}")]
    MatrixSize { expected: usize, actual: usize },

    #[error("camera canvas must not be empty, got {hsize}x{vsize}")]
    EmptyCanvas { hsize: usize, vsize: usize },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("a render needs at least one worker")]
    NoWorkers,

    #[error("non-finite color computed at pixel ({x}, {y})")]
    NonFiniteColor { x: usize, y: usize },

    #[error("tile at ({x}, {y}) failed: {reason}")]
    TileFailed { x: usize, y: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("scene parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    Scene(String),
}

pub type Result<T> = std::result::Result<T, Error>;
