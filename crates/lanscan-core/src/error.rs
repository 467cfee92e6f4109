use thiserror::Error;

/// Errors raised when converting text into lanscan address types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid MAC address '{input}': {reason}")]
    InvalidMac { input: String, reason: String },
}

impl ParseError {
    pub(crate) fn invalid_mac(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidMac {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
