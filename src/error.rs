use thiserror::Error;

/// Error surfaced at the binary boundary.
///
/// Carries the process exit code so `main` can stay a thin wrapper.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the belt construction and slicing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeltError {
    /// A run parameter is outside its valid range (detected before simulating).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The observed value has no simulated support in the belt.
    #[error("degenerate slice at observed value {observed}: {reason}")]
    DegenerateSlice { observed: f64, reason: String },
}

impl BeltError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BeltError::InvalidConfiguration(message.into())
    }
}

impl From<BeltError> for AppError {
    fn from(err: BeltError) -> Self {
        let code = match err {
            BeltError::InvalidConfiguration(_) => 2,
            BeltError::DegenerateSlice { .. } => 3,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn belt_errors_map_to_exit_codes() {
        let config: AppError = BeltError::invalid("measurement count must be >= 1").into();
        assert_eq!(config.exit_code(), 2);
        assert!(config.to_string().contains("measurement count"));

        let slice: AppError = BeltError::DegenerateSlice {
            observed: 42.0,
            reason: "column is empty".to_string(),
        }
        .into();
        assert_eq!(slice.exit_code(), 3);
        assert!(slice.to_string().contains("42"));
    }
}
