//! Response handling, normalization and the screening pipeline

pub mod sanitize;
pub mod duration;
pub mod match_score;
pub mod profile;
pub mod rows;
pub mod analyzer;

pub use analyzer::{PipelineSettings, ScreeningPipeline};
pub use rows::CandidateRow;
