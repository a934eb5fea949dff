//! Screening pipeline: resumes in, ranked rows out

use crate::config::{Config, ExperienceMode};
use crate::error::{Result, ScreenerError};
use crate::input::RawDocument;
use crate::llm::generator::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use crate::llm::resilient::ResilientCaller;
use crate::output::progress::{Notice, ProgressReporter, SilentReporter};
use crate::output::report::{RunMetadata, RunResult, SkippedDocument};
use crate::processing::profile::ExtractedProfile;
use crate::processing::rows::{finalize_rows, CandidateRow};
use crate::processing::sanitize;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_files: usize,
    pub min_match_score: u8,
    pub experience_mode: ExperienceMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_files: 5,
            min_match_score: 30,
            experience_mode: ExperienceMode::Local,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_files: config.pipeline.max_files,
            min_match_score: config.pipeline.min_match_score,
            experience_mode: config.pipeline.experience_mode,
        }
    }
}

/// Processes resumes one at a time, strictly in upload order.
pub struct ScreeningPipeline<G> {
    caller: ResilientCaller<G>,
    prompts: PromptTemplates,
    reporter: Arc<dyn ProgressReporter>,
    settings: PipelineSettings,
    reference_date: NaiveDate,
}

impl<G: TextGenerator> ScreeningPipeline<G> {
    pub fn new(caller: ResilientCaller<G>, settings: PipelineSettings) -> Self {
        Self {
            caller,
            prompts: PromptTemplates::default(),
            reporter: Arc::new(SilentReporter),
            settings,
            reference_date: chrono::Local::now().date_naive(),
        }
    }

    /// Route pipeline and retry notices to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.caller = self.caller.with_reporter(reporter.clone());
        self.reporter = reporter;
        self
    }

    /// Pin "today" for open-ended durations and the experience prompt.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptTemplates) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn caller(&self) -> &ResilientCaller<G> {
        &self.caller
    }

    /// Screen every document against `job_description`.
    ///
    /// Batch-level problems (too many files, empty job description) fail
    /// the whole run before any remote call. Problems with one resume are
    /// recorded as notices and the run moves on.
    pub async fn run(&self, job_description: &str, documents: Vec<RawDocument>) -> Result<RunResult> {
        let start = Instant::now();

        if documents.len() > self.settings.max_files {
            return Err(ScreenerError::TooManyFiles {
                count: documents.len(),
                max: self.settings.max_files,
            });
        }

        if job_description.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "Job description is empty".to_string(),
            ));
        }

        info!(
            "Screening {} resume(s), experience mode {:?}",
            documents.len(),
            self.settings.experience_mode
        );

        let total = documents.len();
        let mut rows = Vec::with_capacity(total);
        let mut notices = Vec::new();
        let mut skipped = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            self.reporter.document_started(index + 1, total, &document.file_name);

            match self.screen_document(job_description, document, &mut notices).await {
                Ok(row) => rows.push(row),
                Err(error) => {
                    warn!("Skipping {}: {}", document.file_name, error);
                    self.emit(
                        &mut notices,
                        Notice::error(format!("Skipped: {}", error)).for_document(&document.file_name),
                    );
                    skipped.push(SkippedDocument {
                        file_name: document.file_name.clone(),
                        reason: error.to_string(),
                    });
                }
            }

            self.reporter.document_finished();
        }

        self.reporter.run_finished();

        let rows = finalize_rows(rows, self.settings.min_match_score);
        info!("Screening finished: {} row(s), {} skipped", rows.len(), skipped.len());

        Ok(RunResult {
            rows,
            notices,
            skipped,
            metadata: RunMetadata {
                generated_at: Utc::now(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                reference_date: self.reference_date,
                experience_mode: self.settings.experience_mode,
                min_match_score: self.settings.min_match_score,
                screener_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn screen_document(
        &self,
        job_description: &str,
        document: &RawDocument,
        notices: &mut Vec<Notice>,
    ) -> Result<CandidateRow> {
        let text = document.extract_text()?;
        if text.trim().is_empty() {
            return Err(ScreenerError::UnreadableDocument(document.file_name.clone()));
        }

        let reply = self
            .caller
            .call(&self.prompts.render_profile_extraction(&text))
            .await?;
        let profile = ExtractedProfile::from_model_response(&reply)?;

        let mut row = CandidateRow::from_profile(&document.file_name, &profile, self.reference_date);
        row.total_experience = self.total_experience(&profile, &row, document, notices).await;

        let feedback = match self
            .caller
            .call(&self.prompts.render_match_feedback(job_description, &text))
            .await
        {
            Ok(feedback) => feedback,
            Err(error) => {
                self.emit(
                    notices,
                    Notice::warning(format!("Match feedback failed: {}", error))
                        .for_document(&document.file_name),
                );
                format!("Error: {}", error)
            }
        };
        row.set_feedback(&feedback);

        self.emit(
            notices,
            Notice::success(format!(
                "Processed {} (Match {}%)",
                display_or_file(&row.full_name, &document.file_name),
                row.match_percentage
            ))
            .for_document(&document.file_name),
        );

        Ok(row)
    }

    async fn total_experience(
        &self,
        profile: &ExtractedProfile,
        row: &CandidateRow,
        document: &RawDocument,
        notices: &mut Vec<Notice>,
    ) -> String {
        match self.settings.experience_mode {
            ExperienceMode::Local => row.local_total_experience(),
            ExperienceMode::Model if profile.experience_by_company.is_empty() => row.local_total_experience(),
            ExperienceMode::Model => {
                let prompt = self
                    .prompts
                    .render_total_experience(self.reference_date, &profile.duration_lines());
                match self.caller.call(&prompt).await {
                    Ok(reply) => sanitize::first_line(&reply),
                    Err(error) => {
                        self.emit(
                            notices,
                            Notice::warning(format!("Total experience failed: {}", error))
                                .for_document(&document.file_name),
                        );
                        "Error".to_string()
                    }
                }
            }
        }
    }

    fn emit(&self, notices: &mut Vec<Notice>, notice: Notice) {
        self.reporter.notice(&notice);
        notices.push(notice);
    }
}

fn display_or_file<'a>(full_name: &'a str, file_name: &'a str) -> &'a str {
    if full_name.trim().is_empty() {
        file_name
    } else {
        full_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::input::FileType;
    use crate::llm::mock::{MockReply, ScriptedGenerator};
    use crate::output::progress::{CollectingReporter, NoticeLevel};
    use std::time::Duration;

    const PROFILE_JSON: &str = r#"```json
{"full_name": "Jane Doe", "contact": {"email": "jane@example.com"},
 "experience_by_company": [{"company": "Acme", "duration": "Jan 2020 - Present"}]}
```"#;

    fn pipeline(generator: ScriptedGenerator, settings: PipelineSettings) -> ScreeningPipeline<ScriptedGenerator> {
        let policy = RetryPolicy::bounded(2).with_cooloff(Duration::ZERO, Duration::ZERO);
        ScreeningPipeline::new(ResilientCaller::new(generator, policy), settings)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    fn text_resume(name: &str, body: &str) -> RawDocument {
        RawDocument::new(name, FileType::Text, body.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_rejects_too_many_files_before_any_call() {
        let generator = ScriptedGenerator::new();
        let settings = PipelineSettings { max_files: 1, ..Default::default() };
        let pipeline = pipeline(generator.clone(), settings);

        let documents = vec![text_resume("a.txt", "A"), text_resume("b.txt", "B")];
        let result = pipeline.run("Rust engineer", documents).await;

        assert!(matches!(result, Err(ScreenerError::TooManyFiles { count: 2, max: 1 })));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_empty_job_description() {
        let generator = ScriptedGenerator::new();
        let pipeline = pipeline(generator.clone(), PipelineSettings::default());

        let result = pipeline.run("   ", vec![text_resume("a.txt", "A")]).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_local_experience_and_feedback() {
        let generator = ScriptedGenerator::new()
            .with_rule("Extract JSON only", vec![MockReply::text(PROFILE_JSON)])
            .with_rule("Match Percentage (0-100)", vec![MockReply::text("Strong fit.\nMatch Percentage: 81%")]);
        let pipeline = pipeline(generator.clone(), PipelineSettings::default());

        let result = pipeline
            .run("Rust engineer", vec![text_resume("jane.txt", "Jane Doe, Acme")])
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.full_name, "Jane Doe");
        assert_eq!(row.companies[0].total_months, "48");
        assert_eq!(row.total_experience, "4y 0m");
        assert_eq!(row.match_percentage, 81);
        assert_eq!(row.rank, 1);
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_model_experience_uses_first_line() {
        let generator = ScriptedGenerator::new()
            .with_rule("Extract JSON only", vec![MockReply::text(PROFILE_JSON)])
            .with_rule("X years Y months", vec![MockReply::text("4 years 0 months\nBecause...")])
            .with_default(MockReply::text("Overall Match: 55%"));
        let settings = PipelineSettings { experience_mode: ExperienceMode::Model, ..Default::default() };
        let pipeline = pipeline(generator.clone(), settings);

        let result = pipeline
            .run("Rust engineer", vec![text_resume("jane.txt", "Jane Doe")])
            .await
            .unwrap();

        assert_eq!(result.rows[0].total_experience, "4 years 0 months");
        assert_eq!(generator.call_count(), 3);
        assert!(generator.prompts()[1].contains("Acme: Jan 2020 - Present"));
        assert!(generator.prompts()[1].contains("2024-01-15"));
    }

    #[tokio::test]
    async fn test_model_experience_failure_renders_error() {
        let generator = ScriptedGenerator::new()
            .with_rule("Extract JSON only", vec![MockReply::text(PROFILE_JSON)])
            .with_rule("X years Y months", vec![MockReply::shape("no candidates")])
            .with_default(MockReply::text("Match Percentage: 40%"));
        let settings = PipelineSettings { experience_mode: ExperienceMode::Model, ..Default::default() };
        let pipeline = pipeline(generator, settings);

        let result = pipeline
            .run("Rust engineer", vec![text_resume("jane.txt", "Jane Doe")])
            .await
            .unwrap();

        assert_eq!(result.rows[0].total_experience, "Error");
        assert_eq!(result.rows[0].match_percentage, 40);
    }

    #[tokio::test]
    async fn test_unreadable_and_malformed_resumes_are_skipped() {
        let generator = ScriptedGenerator::new()
            .with_rule("Extract JSON only", vec![MockReply::text("Sorry, I cannot help with that.")]);
        let reporter = Arc::new(CollectingReporter::new());
        let pipeline = pipeline(generator.clone(), PipelineSettings::default()).with_reporter(reporter.clone());

        let documents = vec![text_resume("blank.txt", "  \n "), text_resume("odd.txt", "Some resume")];
        let result = pipeline.run("Rust engineer", documents).await.unwrap();

        assert!(result.rows.is_empty());
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.skipped[0].file_name, "blank.txt");
        assert!(result.skipped[0].reason.contains("unreadable"));
        assert!(result.skipped[1].reason.contains("Malformed model JSON"));
        assert_eq!(generator.call_count(), 1);

        let errors: Vec<_> = reporter
            .notices()
            .into_iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
            .collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].document.as_deref(), Some("blank.txt"));
    }

    #[tokio::test]
    async fn test_feedback_failure_keeps_row() {
        let generator = ScriptedGenerator::new()
            .with_rule("Extract JSON only", vec![MockReply::text(PROFILE_JSON)])
            .with_default(MockReply::transport("Remote service returned 503 Service Unavailable"));
        let pipeline = pipeline(generator.clone(), PipelineSettings::default());

        let result = pipeline
            .run("Rust engineer", vec![text_resume("jane.txt", "Jane Doe")])
            .await
            .unwrap();

        let row = &result.rows[0];
        assert!(row.jd_feedback.starts_with("Error: "));
        assert_eq!(row.match_percentage, 0);
        assert_eq!(row.rank, 0);
        // one extraction call plus two feedback attempts
        assert_eq!(generator.call_count(), 3);
    }
}
