//! Output formatters: console table with charts, JSON, CSV, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use crate::output::report::{MatchSplit, RunResult, SkippedDocument};
use crate::processing::rows::{column_counts, CandidateRow};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// File name the CSV export is saved under unless told otherwise
pub const DEFAULT_CSV_FILENAME: &str = "resume_analysis_with_jd.csv";

const CHART_WIDTH: usize = 40;
const SPLIT_WIDTH: usize = 20;
const FEEDBACK_PREVIEW: usize = 160;

/// Trait for formatting run results
pub trait OutputFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal table with bar charts
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Every field quoted, one column group per company and project index
pub struct CsvFormatter;

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    csv_formatter: CsvFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Screening Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1100px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #dee2e6; padding: 6px 10px; text-align: left; vertical-align: top; }
        th { background: #e9ecef; }
        .chart-row { display: flex; align-items: center; margin: 6px 0; }
        .chart-label { width: 220px; font-weight: bold; }
        .chart-track { flex: 1; background: #e9ecef; border-radius: 4px; }
        .chart-bar { background: #007acc; color: white; padding: 2px 6px; border-radius: 4px; white-space: nowrap; }
        .feedback { white-space: pre-wrap; background: #f8f9fa; padding: 15px; border-left: 4px solid #17a2b8; border-radius: 6px; }
        .skipped { border-left: 4px solid #dc3545; background: #f8f9fa; padding: 10px 15px; }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>📊 Resume Screening Report</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <div class="section">
            <h2>Candidates</h2>
            <table>
                <tr><th>Rank</th><th>Name</th><th>Match %</th><th>Total Experience</th><th>Email</th><th>Phone</th><th>Location</th><th>Certifications</th></tr>
                {% for row in rows %}
                <tr><td>{{ row.rank_label }}</td><td>{{ row.display_name }}</td><td>{{ row.match_percentage }}%</td><td>{{ row.total_experience }}</td><td>{{ row.email }}</td><td>{{ row.phone }}</td><td>{{ row.location }}</td><td>{{ row.certifications }}</td></tr>
                {% endfor %}
            </table>
        </div>

        <div class="section">
            <h2>Match % by Candidate</h2>
            {% if has_chart %}
            {% for bar in chart %}
            <div class="chart-row">
                <div class="chart-label">{{ bar.label }}</div>
                <div class="chart-track"><div class="chart-bar" style="width: {{ bar.score }}%">{{ bar.score }}%</div></div>
            </div>
            {% endfor %}
            {% else %}
            <p>No candidate scored above zero; nothing to plot.</p>
            {% endif %}
        </div>

        <div class="section">
            <h2>Feedback</h2>
            {% for row in rows %}
            <h3>{{ row.display_name }} ({{ row.match_percentage }}% match / {{ row.gap }}% gap)</h3>
            <div class="feedback">{{ row.feedback }}</div>
            {% endfor %}
        </div>

        {% if has_skipped %}
        <div class="section">
            <h2>Skipped Resumes</h2>
            {% for doc in skipped %}
            <p class="skipped"><strong>{{ doc.file_name }}</strong>: {{ doc.reason }}</p>
            {% endfor %}
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>ℹ️ Generated by Resume Screener v{{ version }}</strong></p>
            <p><strong>Experience:</strong> {{ experience_mode }} | <strong>Minimum score:</strong> {{ min_match_score }}%</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    rows: Vec<HtmlRow>,
    chart: Vec<HtmlBar>,
    has_chart: bool,
    skipped: Vec<SkippedDocument>,
    has_skipped: bool,
    experience_mode: String,
    min_match_score: u8,
    version: String,
}

struct HtmlRow {
    rank_label: String,
    display_name: String,
    match_percentage: u8,
    gap: u8,
    total_experience: String,
    email: String,
    phone: String,
    location: String,
    certifications: String,
    feedback: String,
}

struct HtmlBar {
    label: String,
    score: u8,
}

fn rank_label(rank: u32) -> String {
    if rank == 0 {
        "-".to_string()
    } else {
        rank.to_string()
    }
}

fn format_timestamp(report: &RunResult) -> String {
    report
        .metadata
        .generated_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Pad or cut `text` to exactly `width` graphemes.
fn fit(text: &str, width: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() > width {
        let mut cut: String = graphemes[..width.saturating_sub(1)].concat();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - graphemes.len()))
    }
}

/// Single-line preview of at most `max` graphemes.
fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let graphemes: Vec<&str> = flat.graphemes(true).collect();
    if graphemes.len() <= max {
        flat
    } else {
        format!("{}...", graphemes[..max].concat().trim_end())
    }
}

fn scaled(score: u8, width: usize) -> usize {
    (score.min(100) as usize * width + 50) / 100
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn score_color(score: u8) -> Color {
        match score {
            80..=100 => Color::Green,
            60..=79 => Color::BrightGreen,
            30..=59 => Color::Yellow,
            _ => Color::BrightBlack,
        }
    }

    fn format_table(&self, rows: &[CandidateRow]) -> String {
        let mut output = String::new();
        let header = format!(
            "{} │ {} │ {} │ {} │ {} │ {}",
            fit("Rank", 4),
            fit("Name", 24),
            fit("Match %", 7),
            fit("Experience", 16),
            fit("Email", 28),
            fit("Phone", 16)
        );
        output.push_str(&self.colorize(&header, Color::Cyan));
        output.push('\n');
        output.push_str(&"─".repeat(header.chars().count()));
        output.push('\n');

        for row in rows {
            let score = fit(&format!("{}%", row.match_percentage), 7);
            output.push_str(&format!(
                "{} │ {} │ {} │ {} │ {} │ {}\n",
                fit(&rank_label(row.rank), 4),
                fit(&row.display_name, 24),
                self.colorize(&score, Self::score_color(row.match_percentage)),
                fit(&row.total_experience, 16),
                fit(&row.email, 28),
                fit(&row.phone, 16)
            ));
        }
        output
    }

    fn format_chart(&self, report: &RunResult) -> String {
        let points = report.chart_points();
        if points.is_empty() {
            return format!(
                "{}\n",
                self.colorize("No candidate scored above zero; nothing to plot.", Color::Yellow)
            );
        }

        let label_width = points
            .iter()
            .map(|(name, _)| name.graphemes(true).count())
            .max()
            .unwrap_or(0)
            .min(24);

        let mut output = String::new();
        for (name, score) in points {
            let bar = "█".repeat(scaled(score, CHART_WIDTH));
            output.push_str(&format!(
                "{} │{} {}%\n",
                fit(name, label_width),
                self.colorize(&bar, Self::score_color(score)),
                score
            ));
        }
        output
    }

    fn format_split(&self, row: &CandidateRow) -> String {
        let split = MatchSplit::from_score(row.match_percentage);
        let matched = scaled(split.matched, SPLIT_WIDTH);
        format!(
            "{}{} {}% match / {}% gap",
            self.colorize(&"█".repeat(matched), Color::Green),
            self.colorize(&"░".repeat(SPLIT_WIDTH - matched), Color::Red),
            split.matched,
            split.gap
        )
    }

    fn format_candidate(&self, row: &CandidateRow) -> String {
        let mut output = format!(
            "{} {}\n",
            self.colorize(&format!("{}.", rank_label(row.rank)), Color::BrightBlack),
            self.colorize(&row.display_name, Color::White)
        );
        output.push_str(&format!("   {}\n", self.format_split(row)));
        output.push_str(&format!("   Source: {}\n", row.source_file));

        if self.detailed {
            output.push_str(&format!(
                "   Contact: {} | {} | {}\n",
                row.email, row.phone, row.linkedin
            ));
            output.push_str(&format!("   Location: {}\n", row.location));
            output.push_str(&format!("   Date of Birth: {}\n", row.date_of_birth));
            if !row.certifications.is_empty() {
                output.push_str(&format!("   Certifications: {}\n", row.certifications_joined()));
            }
            for company in &row.companies {
                output.push_str(&format!(
                    "   • {} ({}) {}\n",
                    company.company,
                    company.duration,
                    if company.total_months.is_empty() {
                        "?".to_string()
                    } else {
                        format!("{} months", company.total_months)
                    }
                ));
            }
            for project in &row.projects {
                output.push_str(&format!("   ◦ {}: {}\n", project.title, project.description));
            }
            output.push_str(&format!("   Total Experience: {}\n", row.total_experience));
            output.push_str(&format!("   {}\n", self.colorize("Feedback:", Color::Cyan)));
            for line in row.jd_feedback.lines() {
                output.push_str(&format!("     {}\n", line));
            }
        } else {
            output.push_str(&format!(
                "   {} {}\n",
                self.colorize("Feedback:", Color::Cyan),
                preview(&row.jd_feedback, FEEDBACK_PREVIEW)
            ));
        }
        output.push('\n');
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Screened: {} | Ranked: {} | Skipped: {}\n",
            report.rows.len(),
            report.ranked_count(),
            report.skipped.len()
        ));

        if let Some(top) = report.top_candidate() {
            output.push_str(&format!(
                "Top candidate: {} ({}%)\n",
                self.colorize(&top.display_name, Color::Green),
                top.match_percentage
            ));
        }

        if !report.rows.is_empty() {
            output.push_str(&self.format_header("Candidates", 2));
            output.push_str(&self.format_table(&report.rows));
        }

        output.push_str(&self.format_header("Match % by Candidate", 2));
        output.push_str(&self.format_chart(report));

        if !report.rows.is_empty() {
            output.push_str(&self.format_header("Candidate Details", 2));
            for row in &report.rows {
                output.push_str(&self.format_candidate(row));
            }
        }

        if !report.skipped.is_empty() {
            output.push_str(&self.format_header("⚠️ Skipped Resumes", 3));
            for doc in &report.skipped {
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&doc.file_name, Color::Red),
                    self.colorize(&format!("({})", doc.reason), Color::BrightBlack)
                ));
            }
        }

        output.push_str(&format!(
            "\n{} Generated by Resume Screener v{} | Experience: {:?} | Minimum score: {}%\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.screener_version,
            report.metadata.experience_mode,
            report.metadata.min_match_score
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn header(companies: usize, projects: usize) -> Vec<String> {
        let mut header: Vec<String> = ["Full Name", "Phone", "Email", "LinkedIn", "Location", "Certifications"]
            .iter()
            .map(|name| name.to_string())
            .collect();

        for j in 1..=companies {
            header.push(format!("Company {}", j));
            header.push(format!("Company {} Duration", j));
            header.push(format!("Company {} total months", j));
        }
        for j in 1..=projects {
            header.push(format!("Project {}", j));
            header.push(format!("Project {} Description", j));
        }

        header.extend(
            ["Total Experience", "Date of Birth", "JD Feedback", "Match %", "Rank"]
                .iter()
                .map(|name| name.to_string()),
        );
        header
    }

    fn record(row: &CandidateRow, companies: usize, projects: usize) -> Vec<String> {
        let mut fields = vec![
            row.full_name.clone(),
            row.phone.clone(),
            row.email.clone(),
            row.linkedin.clone(),
            row.location.clone(),
            row.certifications_joined(),
        ];

        for j in 0..companies {
            match row.companies.get(j) {
                Some(company) => {
                    fields.push(company.company.clone());
                    fields.push(company.duration.clone());
                    fields.push(company.total_months.clone());
                }
                None => fields.extend([String::new(), String::new(), String::new()]),
            }
        }
        for j in 0..projects {
            match row.projects.get(j) {
                Some(project) => {
                    fields.push(project.title.clone());
                    fields.push(project.description.clone());
                }
                None => fields.extend([String::new(), String::new()]),
            }
        }

        fields.push(row.total_experience.clone());
        fields.push(row.date_of_birth.clone());
        fields.push(row.jd_feedback.clone());
        fields.push(row.match_percentage.to_string());
        fields.push(row.rank.to_string());
        fields
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String> {
        let (companies, projects) = column_counts(&report.rows);
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());

        writer.write_record(Self::header(companies, projects))?;
        for row in &report.rows {
            writer.write_record(Self::record(row, companies, projects))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::OutputFormatting(format!("Failed to finish CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ScreenerError::OutputFormatting(format!("CSV is not valid UTF-8: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RunResult) -> HtmlTemplate {
        let rows = report
            .rows
            .iter()
            .map(|row| HtmlRow {
                rank_label: rank_label(row.rank),
                display_name: row.display_name.clone(),
                match_percentage: row.match_percentage,
                gap: MatchSplit::from_score(row.match_percentage).gap,
                total_experience: row.total_experience.clone(),
                email: row.email.clone(),
                phone: row.phone.clone(),
                location: row.location.clone(),
                certifications: row.certifications_joined(),
                feedback: row.jd_feedback.clone(),
            })
            .collect();

        let chart: Vec<HtmlBar> = report
            .chart_points()
            .into_iter()
            .map(|(label, score)| HtmlBar {
                label: label.to_string(),
                score,
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            rows,
            has_chart: !chart.is_empty(),
            chart,
            skipped: report.skipped.clone(),
            has_skipped: !report.skipped.is_empty(),
            experience_mode: format!("{:?}", report.metadata.experience_mode),
            min_match_score: report.metadata.min_match_score,
            version: report.metadata.screener_version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ScreenerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RunResult) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Resume Screening Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
        }

        output.push_str("## Candidates\n\n");
        if report.rows.is_empty() {
            output.push_str("_No resume produced a row._\n\n");
        } else {
            output.push_str("| Rank | Name | Match % | Total Experience | Email | Phone | Location |\n");
            output.push_str("|------|------|---------|------------------|-------|-------|----------|\n");
            for row in &report.rows {
                output.push_str(&format!(
                    "| {} | {} | {}% | {} | {} | {} | {} |\n",
                    rank_label(row.rank),
                    Self::cell(&row.display_name),
                    row.match_percentage,
                    Self::cell(&row.total_experience),
                    Self::cell(&row.email),
                    Self::cell(&row.phone),
                    Self::cell(&row.location)
                ));
            }
            output.push('\n');
        }

        output.push_str("## Match % by Candidate\n\n");
        let points = report.chart_points();
        if points.is_empty() {
            output.push_str("No candidate scored above zero; nothing to plot.\n\n");
        } else {
            output.push_str("```\n");
            for (name, score) in points {
                output.push_str(&format!("{} {} {}%\n", fit(name, 24), "█".repeat(scaled(score, CHART_WIDTH)), score));
            }
            output.push_str("```\n\n");
        }

        if !report.rows.is_empty() {
            output.push_str("## Feedback\n\n");
            for row in &report.rows {
                let split = MatchSplit::from_score(row.match_percentage);
                output.push_str(&format!(
                    "### {} ({}% match / {}% gap)\n\n",
                    row.display_name, split.matched, split.gap
                ));
                if !row.companies.is_empty() {
                    for company in &row.companies {
                        output.push_str(&format!(
                            "- **{}**: {} ({} months)\n",
                            company.company, company.duration, company.total_months
                        ));
                    }
                    output.push('\n');
                }
                for line in row.jd_feedback.lines() {
                    output.push_str(&format!("> {}\n", line));
                }
                output.push('\n');
            }
        }

        if !report.skipped.is_empty() {
            output.push_str("## ⚠️ Skipped Resumes\n\n");
            for doc in &report.skipped {
                output.push_str(&format!("- `{}`: {}\n", doc.file_name, doc.reason));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by Resume Screener v{} | Experience: {:?} | Minimum score: {}%*\n",
                report.metadata.screener_version,
                report.metadata.experience_mode,
                report.metadata.min_match_score
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            csv_formatter: CsvFormatter::new(),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            csv_formatter: CsvFormatter::new(),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &RunResult, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Csv if !timestamp => DEFAULT_CSV_FILENAME.to_string(),
        OutputFormat::Csv => format!("resume_analysis_with_jd{}.csv", timestamp_suffix),
        OutputFormat::Console => format!("resume_analysis{}.txt", timestamp_suffix),
        OutputFormat::Json => format!("resume_analysis{}.json", timestamp_suffix),
        OutputFormat::Markdown => format!("resume_analysis{}.md", timestamp_suffix),
        OutputFormat::Html => format!("resume_analysis{}.html", timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperienceMode;
    use crate::output::report::RunMetadata;
    use crate::processing::rows::{CompanyColumn, ProjectColumn};
    use chrono::{NaiveDate, Utc};

    fn sample_report() -> RunResult {
        let jane = CandidateRow {
            source_file: "jane.pdf".into(),
            full_name: "Jane \"JD\" Doe".into(),
            email: "jane@example.com".into(),
            certifications: vec!["CKA".into(), "PMP".into()],
            companies: vec![
                CompanyColumn { company: "Acme".into(), duration: "Jan 2020 - Present".into(), total_months: "48".into() },
                CompanyColumn { company: "Initech".into(), duration: "2018 - 2019".into(), total_months: "12".into() },
            ],
            projects: vec![ProjectColumn { title: "Ledger".into(), description: "Event store".into() }],
            total_experience: "5y 0m".into(),
            date_of_birth: "not mentioned".into(),
            jd_feedback: "Strong Rust.\nMatch Percentage: 82%".into(),
            match_percentage: 82,
            rank: 1,
            display_name: "Jane \"JD\" Doe".into(),
            ..Default::default()
        };
        let bob = CandidateRow {
            source_file: "bob.docx".into(),
            full_name: "Bob | Smith".into(),
            jd_feedback: "<script>alert(1)</script> Weak match: 10%".into(),
            match_percentage: 0,
            rank: 0,
            display_name: "Bob | Smith".into(),
            ..Default::default()
        };

        RunResult {
            rows: vec![jane, bob],
            notices: Vec::new(),
            skipped: vec![SkippedDocument { file_name: "blank.pdf".into(), reason: "Empty / unreadable document: blank.pdf".into() }],
            metadata: RunMetadata {
                generated_at: Utc::now(),
                processing_time_ms: 42,
                reference_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                experience_mode: ExperienceMode::Local,
                min_match_score: 30,
                screener_version: "0.1.0".into(),
            },
        }
    }

    #[test]
    fn test_csv_columns_and_quoting() {
        let csv = CsvFormatter::new().format_report(&sample_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"Full Name\",\"Phone\",\"Email\",\"LinkedIn\",\"Location\",\"Certifications\",\
             \"Company 1\",\"Company 1 Duration\",\"Company 1 total months\",\
             \"Company 2\",\"Company 2 Duration\",\"Company 2 total months\",\
             \"Project 1\",\"Project 1 Description\",\
             \"Total Experience\",\"Date of Birth\",\"JD Feedback\",\"Match %\",\"Rank\""
        );
        assert!(lines[1].starts_with("\"Jane \"\"JD\"\" Doe\",\"\",\"jane@example.com\",\"\",\"\",\"CKA; PMP\",\"Acme\""));
        assert!(!csv.contains("Display Name"));
        // multi-line feedback stays inside one quoted field
        assert!(csv.contains("\"Strong Rust.\nMatch Percentage: 82%\",\"82\",\"1\"\n"));
    }

    #[test]
    fn test_csv_records_parse_back_with_embedded_newlines() {
        let csv = CsvFormatter::new().format_report(&sample_report()).unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), headers.len());
        assert_eq!(&records[0][0], "Jane \"JD\" Doe");
        assert_eq!(&records[0][headers.len() - 3], "Strong Rust.\nMatch Percentage: 82%");
    }

    #[test]
    fn test_csv_pads_missing_groups() {
        let csv = CsvFormatter::new().format_report(&sample_report()).unwrap();
        assert!(csv.contains("\"Bob | Smith\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\""));
    }

    #[test]
    fn test_console_plain_output() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format_report(&sample_report()).unwrap();

        assert!(output.contains("RESUME SCREENING RESULTS"));
        assert!(output.contains("Screened: 2 | Ranked: 1 | Skipped: 1"));
        assert!(output.contains("Top candidate: Jane \"JD\" Doe (82%)"));
        assert!(output.contains("82% match / 18% gap"));
        assert!(output.contains("blank.pdf"));
        // only nonzero rows are charted
        let chart_lines = output.lines().filter(|line| line.contains(" │█")).count();
        assert_eq!(chart_lines, 1);
    }

    #[test]
    fn test_console_nothing_to_plot() {
        let mut report = sample_report();
        report.rows.retain(|row| row.match_percentage == 0);
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();
        assert!(output.contains("nothing to plot"));
        assert!(output.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_markdown_escapes_cells() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();
        assert!(output.contains("| - | Bob \\| Smith | 0% |"));
        assert!(output.contains("> Match Percentage: 82%"));
        assert!(output.contains("- **Acme**: Jan 2020 - Present (48 months)"));
    }

    #[test]
    fn test_html_escapes_and_charts() {
        let output = HtmlFormatter::new(true).format_report(&sample_report()).unwrap();
        assert!(output.contains("<!DOCTYPE html>"));
        assert!(output.contains("width: 82%"));
        assert!(!output.contains("<script>alert(1)</script>"));
        assert!(output.contains("blank.pdf"));
    }

    #[test]
    fn test_fit_and_preview() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(preview("one\ntwo   three", 50), "one two three");
        assert_eq!(preview("abcdef", 3), "abc...");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Csv, false), "resume_analysis_with_jd.csv");
        assert_eq!(suggest_filename(&OutputFormat::Json, false), "resume_analysis.json");
        let stamped = suggest_filename(&OutputFormat::Csv, true);
        assert!(stamped.starts_with("resume_analysis_with_jd_"));
        assert!(stamped.ends_with(".csv"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, false, true, false);
        let json = generator.generate_report(&sample_report(), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][0]["match_percentage"], 82);
        assert_eq!(value["skipped"][0]["file_name"], "blank.pdf");
    }
}
