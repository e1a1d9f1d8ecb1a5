//! Error types for message decoding.

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while classifying a hub message.
///
/// Both variants are expected operational noise on a live sensor network.
/// Neither one mutates decoder state.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not syntactically valid JSON.
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload parsed, but its `type` field is missing or unrecognized.
    #[error("Unknown message kind: {}", .discriminator.as_deref().unwrap_or("<missing>"))]
    UnknownKind {
        /// The `type` value, if it was present and a string.
        discriminator: Option<String>,
    },
}

impl DecodeError {
    /// Creates an unknown kind error.
    #[inline]
    pub fn unknown_kind(discriminator: Option<&str>) -> Self {
        Self::UnknownKind {
            discriminator: discriminator.map(str::to_owned),
        }
    }

    /// Returns true if the payload failed to parse.
    #[inline]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
