// error.rs - Engine error taxonomy
//
// Construction validates everything; per-frame math is total over
// valid inputs and never errors.

/// Errors surfaced by scene construction and the frame scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed scene data: NaN parameters, inverted radius ranges,
    /// empty or non-monotonic camera paths. Raised at construction only.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The drawable surface is missing or disposed. Fatal but local:
    /// the scheduler stops and reports this once.
    #[error("draw surface unavailable: {0}")]
    ResourceUnavailable(String),

    /// A scene config failed to deserialize.
    #[error("malformed scene config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidParameter(msg.into())
    }
}
