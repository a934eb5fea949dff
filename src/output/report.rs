//! Result of one screening run

use crate::config::ExperienceMode;
use crate::output::progress::{Notice, NoticeLevel};
use crate::processing::rows::CandidateRow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Everything a run produced, handed to the formatters as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Ranked rows, best match first
    pub rows: Vec<CandidateRow>,

    /// Notices emitted by the pipeline, in order
    pub notices: Vec<Notice>,

    /// Resumes that produced no row
    pub skipped: Vec<SkippedDocument>,

    pub metadata: RunMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    /// Date used as "today" for open-ended durations
    pub reference_date: NaiveDate,
    pub experience_mode: ExperienceMode,
    pub min_match_score: u8,
    pub screener_version: String,
}

/// Matched and missing share of one candidate, summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSplit {
    pub matched: u8,
    pub gap: u8,
}

impl MatchSplit {
    pub fn from_score(score: u8) -> Self {
        let matched = score.min(100);
        Self {
            matched,
            gap: 100 - matched,
        }
    }
}

impl RunResult {
    /// `(display name, score)` for every row with a nonzero score.
    pub fn chart_points(&self) -> Vec<(&str, u8)> {
        self.rows
            .iter()
            .filter(|row| row.match_percentage > 0)
            .map(|row| (row.display_name.as_str(), row.match_percentage))
            .collect()
    }

    pub fn ranked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.rank > 0).count()
    }

    pub fn top_candidate(&self) -> Option<&CandidateRow> {
        self.rows.first().filter(|row| row.rank == 1)
    }

    pub fn error_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
            .count()
    }
}
