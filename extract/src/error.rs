//! Error types for documentation extraction.
//!
//! Only one parse condition is fatal: an entity whose content lines mix
//! bare-name rows and field-table rows. Everything else in the parser falls
//! back to a best-effort result. The remaining variants cover the source
//! loader and serialized output.

use thiserror::Error;

/// Errors that can occur while loading or compiling documentation.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An entity mixes union-style and record-style content lines.
    #[error("inconsistent entity shape in {entity}: unexpected line {line:?}")]
    InconsistentEntityShape { entity: String, line: String },

    /// Cache file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Documentation download failure.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// JSON or YAML serialization failure.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
