use thiserror::Error;

/// Errors raised while building events or interpolating templates.
///
/// Only [`InterpolationError::Serialization`] can come out of template
/// evaluation itself; the other variants belong to event construction.
#[derive(Error, Debug)]
pub enum InterpolationError {
    /// A map-valued field could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The input is not something the event model can represent.
    #[error("Unknown event representation: expected a JSON object, got {kind}")]
    UnknownEvent { kind: &'static str },

    /// The input looked like an event but could not be decoded.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl InterpolationError {
    /// True when the error came from JSON rendering of a field value.
    pub fn is_serialization(&self) -> bool {
        matches!(self, InterpolationError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, InterpolationError>;
