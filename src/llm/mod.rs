//! Remote language model integration

pub mod generator;
pub mod gemini;
pub mod resilient;
pub mod prompts;
pub mod mock;

pub use gemini::GeminiClient;
pub use generator::TextGenerator;
pub use resilient::ResilientCaller;
