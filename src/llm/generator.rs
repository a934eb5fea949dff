//! Text generation capability

use crate::error::Result;

/// Something that turns a prompt into generated text with a single attempt.
///
/// Implementations report transport problems as
/// [`ScreenerError::RemoteTransport`](crate::error::ScreenerError::RemoteTransport)
/// and unexpected payloads as
/// [`ScreenerError::ResponseShape`](crate::error::ScreenerError::ResponseShape);
/// retrying is the caller's business.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}
