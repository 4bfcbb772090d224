use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the EVE industry library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Region catalog could not be located at the resolved path.
    #[error("region catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// Raised when a directory scan yielded no region catalog files.
    #[error("no region catalog files found in {path}")]
    EmptyCatalogDir { path: PathBuf },

    /// Raised when a product name could not be found in the production chain.
    #[error("unknown product: {name}")]
    UnknownProduct { name: String },

    /// Raised for malformed or out-of-range interactive selection input.
    /// Always recoverable; callers re-prompt instead of unwinding.
    #[error("invalid selection: {input}")]
    InvalidSelection { input: String },

    /// Raised when the external `dot` renderer is not on the PATH.
    #[error("graphviz `dot` binary not found; install graphviz or emit DOT output instead")]
    RendererUnavailable,

    /// Raised when the external renderer exited unsuccessfully.
    #[error("graph renderer exited with {status}")]
    RenderFailed { status: String },

    /// Wrapper for CSV errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
