//! Error types for image generation.

/// Errors that can occur while generating images or handling settings.
#[derive(Debug, thiserror::Error)]
pub enum GenPixError {
    /// The request was rejected before any network I/O (empty prompt, zero count).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The aspect ratio string is not of the form `W/H` with positive numbers.
    #[error("invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),

    /// A batch is already running; the submit gate is closed.
    #[error("a batch is already in progress")]
    Busy,

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response payload could not be interpreted.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., saving an image or the settings file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML.
    #[error("failed to read settings: {0}")]
    ConfigRead(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("failed to write settings: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl GenPixError {
    /// Returns true if this error marks a single slot as failed
    /// without affecting the rest of the batch.
    pub fn is_slot_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::Decode(_) | Self::Io(_)
        )
    }
}

/// Result type alias for genpix operations.
pub type Result<T> = std::result::Result<T, GenPixError>;
