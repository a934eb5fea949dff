//! Prompt templates sent to the remote generation service

use chrono::NaiveDate;
use log::debug;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub profile_extraction: String,
    pub total_experience: String,
    pub match_feedback: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            profile_extraction: PROFILE_EXTRACTION_TEMPLATE.to_string(),
            total_experience: TOTAL_EXPERIENCE_TEMPLATE.to_string(),
            match_feedback: MATCH_FEEDBACK_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// JSON-only structured extraction of a resume.
    pub fn render_profile_extraction(&self, resume: &str) -> String {
        let prompt = self.profile_extraction.replace("{resume}", resume);
        debug!("Profile extraction prompt: {} chars", prompt.len());
        prompt
    }

    /// Single-line total experience over `"Company: duration"` lines.
    pub fn render_total_experience(&self, today: NaiveDate, duration_lines: &str) -> String {
        self.total_experience
            .replace("{today}", &today.format("%Y-%m-%d").to_string())
            .replace("{durations}", duration_lines)
    }

    /// Narrative feedback with an embedded match percentage.
    pub fn render_match_feedback(&self, job: &str, resume: &str) -> String {
        let prompt = self
            .match_feedback
            .replace("{job}", job)
            .replace("{resume}", resume);
        debug!("Match feedback prompt: {} chars", prompt.len());
        prompt
    }
}

const PROFILE_EXTRACTION_TEMPLATE: &str = r#"Extract JSON only:
{ "full_name":"","contact":{"phone":"","email":"","linkedin":"","location":""},"certifications":[],"projects":[{"title":"","description":""}],"experience_by_company":[{"company":"","duration":""}],"date_of_birth":"" }

Use "not mentioned" for a missing date of birth. Keep each duration exactly as written in the resume (e.g. "Jan 2019 - Present").

Resume:
{resume}"#;

const TOTAL_EXPERIENCE_TEMPLATE: &str = r#"Today's date is {today}.
Compute the candidate's total professional experience from the employment periods below.
Count overlapping periods only once. Treat "Present" or "Current" as today.
Reply with exactly one line in the form "X years Y months" and nothing else.

{durations}"#;

const MATCH_FEEDBACK_TEMPLATE: &str = r#"Job Description:
{job}

Resume:
{resume}

Provide feedback + Match Percentage (0-100)."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_extraction_rendering() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_profile_extraction("Jane Doe, Rust engineer at Acme.");

        assert!(prompt.starts_with("Extract JSON only"));
        assert!(prompt.contains("experience_by_company"));
        assert!(prompt.contains("projects"));
        assert!(prompt.ends_with("Jane Doe, Rust engineer at Acme."));
    }

    #[test]
    fn test_total_experience_rendering() {
        let templates = PromptTemplates::default();
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let prompt = templates.render_total_experience(today, "Acme: Jan 2019 - Present");

        assert!(prompt.contains("2024-01-15"));
        assert!(prompt.contains("Acme: Jan 2019 - Present"));
        assert!(prompt.contains("X years Y months"));
    }

    #[test]
    fn test_match_feedback_rendering() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_match_feedback("Senior Rust Engineer", "Jane Doe");

        assert!(prompt.contains("Job Description:\nSenior Rust Engineer"));
        assert!(prompt.contains("Resume:\nJane Doe"));
        assert!(prompt.contains("Match Percentage (0-100)"));
    }
}
