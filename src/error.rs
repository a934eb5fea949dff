//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Empty / unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Remote transport error: {0}")]
    RemoteTransport(String),

    #[error("Remote service failed after {attempts} attempts: {source}")]
    RemoteServiceExhausted {
        attempts: u32,
        #[source]
        source: Box<ScreenerError>,
    },

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("Malformed model JSON: {0}")]
    MalformedModelJson(String),

    #[error("Too many files: {count} uploaded, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl ScreenerError {
    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScreenerError::RemoteTransport(_))
    }
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(ScreenerError::RemoteTransport("timeout".into()).is_retryable());
        assert!(!ScreenerError::ResponseShape("no candidates".into()).is_retryable());
        assert!(!ScreenerError::MalformedModelJson("eof".into()).is_retryable());
    }

    #[test]
    fn test_exhausted_error_carries_last_cause() {
        let err = ScreenerError::RemoteServiceExhausted {
            attempts: 5,
            source: Box::new(ScreenerError::RemoteTransport("503 Service Unavailable".into())),
        };
        let message = err.to_string();
        assert!(message.contains("5 attempts"));
        assert!(message.contains("503"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
