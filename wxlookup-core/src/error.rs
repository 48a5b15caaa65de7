use thiserror::Error;

/// Shown when the backend rejects a request without a usable `detail`.
pub const GENERIC_REJECTION: &str = "Failed to fetch weather data";

/// Shown when no usable response came back at all.
pub const NETWORK_ERROR: &str = "Network error: Could not connect to the server";

/// Why a submission did not produce a weather record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    BackendRejection { status: u16, message: String },

    /// No response was obtained. `cause` is for logs only.
    #[error("{}", NETWORK_ERROR)]
    TransportFailure { cause: String },
}

impl SubmitError {
    pub fn rejection(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        SubmitError::BackendRejection { status, message }
    }

    pub fn transport(cause: impl ToString) -> Self {
        SubmitError::TransportFailure { cause: cause.to_string() }
    }

    /// User-facing text for the inline status area.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Form input that must not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Location is required")]
    EmptyLocation,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
