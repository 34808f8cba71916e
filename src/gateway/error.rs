use thiserror::Error;

/// Failures surfaced to the user when a gateway call or command fails.
///
/// None of these are fatal: callers report the message and keep their current
/// state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport failure, a non-2xx status without a structured body, a
    /// malformed payload, or the gateway running in fallback mode.
    #[error("backend unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The backend (or local command validation) rejected the input.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// A locally resolved entity is missing; no request was issued.
    #[error("not found: {0}")]
    NotFound(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub(crate) fn offline() -> Self {
        GatewayError::NetworkUnavailable(
            "the backend is unreachable; the catalog is read-only until it returns".to_string(),
        )
    }
}
