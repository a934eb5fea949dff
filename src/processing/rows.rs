//! Candidate rows: flattening, scoring, ranking and display names

use crate::processing::duration::{fmt_ym, months_between};
use crate::processing::match_score::extract_match_percentage;
use crate::processing::profile::ExtractedProfile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One company column group: name, raw duration and normalized months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyColumn {
    pub company: String,
    pub duration: String,
    /// Normalized month count, `""` when the duration could not be parsed
    pub total_months: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectColumn {
    pub title: String,
    pub description: String,
}

/// One output record per processed resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub source_file: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub location: String,
    pub certifications: Vec<String>,
    pub companies: Vec<CompanyColumn>,
    pub projects: Vec<ProjectColumn>,
    pub total_experience: String,
    pub date_of_birth: String,
    pub jd_feedback: String,
    pub match_percentage: u8,
    pub rank: u32,
    pub display_name: String,
}

impl CandidateRow {
    /// Flatten a profile. Total experience is left empty for the caller.
    pub fn from_profile(source_file: &str, profile: &ExtractedProfile, today: NaiveDate) -> Self {
        let companies = profile
            .experience_by_company
            .iter()
            .map(|entry| CompanyColumn {
                company: entry.company.clone(),
                duration: entry.duration.clone(),
                total_months: months_between(&entry.duration, today),
            })
            .collect();

        let projects = profile
            .projects
            .iter()
            .map(|project| ProjectColumn {
                title: project.title.clone(),
                description: project.description.clone(),
            })
            .collect();

        Self {
            source_file: source_file.to_string(),
            full_name: profile.full_name.clone(),
            phone: profile.contact.phone.clone(),
            email: profile.contact.email.clone(),
            linkedin: profile.contact.linkedin.clone(),
            location: profile.contact.location.clone(),
            certifications: profile.certifications.clone(),
            companies,
            projects,
            date_of_birth: profile.date_of_birth.clone(),
            ..Default::default()
        }
    }

    /// Sum of the company month counts that are clean non-negative integers.
    pub fn local_experience_months(&self) -> u32 {
        self.companies
            .iter()
            .filter_map(|company| company.total_months.parse::<u32>().ok())
            .sum()
    }

    pub fn local_total_experience(&self) -> String {
        fmt_ym(self.local_experience_months())
    }

    /// Store feedback and the match percentage derived from it.
    pub fn set_feedback(&mut self, feedback: &str) {
        self.jd_feedback = feedback.trim().to_string();
        self.match_percentage = extract_match_percentage(&self.jd_feedback);
    }

    pub fn certifications_joined(&self) -> String {
        self.certifications.join("; ")
    }
}

/// Turn per-resume rows into the final table: scores under `min_score`
/// drop to zero, rows are sorted by score (stable, so ties keep upload
/// order), nonzero rows get dense ranks and names get display suffixes.
pub fn finalize_rows(mut rows: Vec<CandidateRow>, min_score: u8) -> Vec<CandidateRow> {
    for row in &mut rows {
        row.match_percentage = row.match_percentage.min(100);
        if row.match_percentage < min_score {
            row.match_percentage = 0;
        }
    }

    rows.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));

    let mut next_rank = 0;
    for row in &mut rows {
        row.rank = if row.match_percentage == 0 {
            0
        } else {
            next_rank += 1;
            next_rank
        };
    }

    let names: Vec<&str> = rows.iter().map(|row| row.full_name.as_str()).collect();
    let display_names = dedupe_display_names(&names);
    for (row, display_name) in rows.iter_mut().zip(display_names) {
        row.display_name = display_name;
    }

    rows
}

/// `" #k"` suffixes from the second occurrence of a name onwards.
pub fn dedupe_display_names(names: &[&str]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let count = seen.entry(*name).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.to_string()
            } else {
                format!("{} #{}", name, count)
            }
        })
        .collect()
}

/// Largest number of company and project column groups over `rows`.
pub fn column_counts(rows: &[CandidateRow]) -> (usize, usize) {
    rows.iter().fold((0, 0), |(companies, projects), row| {
        (companies.max(row.companies.len()), projects.max(row.projects.len()))
    })
}
