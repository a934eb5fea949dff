//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "AI-powered resume screening against a job description")]
#[command(long_about = "Extract candidate profiles from PDF/DOCX resumes with a remote language model, \
score each resume against a job description and export a ranked table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze resumes against a job description
    Analyze {
        /// Resume files (PDF, DOCX)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Path to job description file (TXT, MD)
        #[arg(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, csv, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include full feedback text in console output
        #[arg(short, long)]
        detailed: bool,

        /// How total experience is computed: local, model
        #[arg(short, long)]
        experience: Option<String>,

        /// Override the retry budget for remote calls
        #[arg(long, conflicts_with = "unbounded")]
        max_attempts: Option<u32>,

        /// Retry remote calls until they succeed
        #[arg(long)]
        unbounded: bool,
    },

    /// Send a trivial prompt to check the remote service
    Ping,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "retry.max_attempts")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, csv, markdown, html",
            format
        )),
    }
}

/// Report format implied by a save path's extension, if it names one.
pub fn format_for_save_path(path: &Path) -> Option<crate::config::OutputFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "json" => Some(crate::config::OutputFormat::Json),
        "csv" => Some(crate::config::OutputFormat::Csv),
        "md" | "markdown" => Some(crate::config::OutputFormat::Markdown),
        "html" | "htm" => Some(crate::config::OutputFormat::Html),
        _ => None,
    }
}

/// Pick the report format from `--output`, the `--save` extension and the
/// configured default, in that order. An explicit format that contradicts
/// the save extension is rejected.
pub fn resolve_output_format(
    requested: Option<&str>,
    save: Option<&Path>,
    configured: crate::config::OutputFormat,
) -> Result<crate::config::OutputFormat, String> {
    let implied = save.and_then(format_for_save_path);
    match (requested.map(parse_output_format).transpose()?, implied) {
        (Some(format), Some(implied)) if format != implied => Err(format!(
            "--output {:?} does not match the save file extension ({:?})",
            format, implied
        )),
        (Some(format), _) => Ok(format),
        (None, Some(implied)) => Ok(implied),
        (None, None) => Ok(configured),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_output_format_follows_save_extension() {
        let csv = Path::new("out/shortlist.CSV");
        assert_eq!(resolve_output_format(None, Some(csv), OutputFormat::Console).unwrap(), OutputFormat::Csv);
        assert_eq!(resolve_output_format(Some("csv"), Some(csv), OutputFormat::Console).unwrap(), OutputFormat::Csv);
        assert!(resolve_output_format(Some("markdown"), Some(csv), OutputFormat::Console).is_err());

        let plain = Path::new("report.txt");
        assert_eq!(
            resolve_output_format(Some("markdown"), Some(plain), OutputFormat::Json).unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(resolve_output_format(None, Some(plain), OutputFormat::Json).unwrap(), OutputFormat::Json);
        assert_eq!(resolve_output_format(None, None, OutputFormat::Html).unwrap(), OutputFormat::Html);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.doc"), &["pdf", "docx"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "resume-screener",
            "analyze",
            "a.pdf",
            "b.docx",
            "--job",
            "jd.txt",
            "--max-attempts",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { resumes, job, max_attempts, unbounded, .. } => {
                assert_eq!(resumes.len(), 2);
                assert_eq!(job, Some(PathBuf::from("jd.txt")));
                assert_eq!(max_attempts, Some(3));
                assert!(!unbounded);
            }
            _ => panic!("expected analyze"),
        }

        assert!(Cli::try_parse_from([
            "resume-screener", "analyze", "a.pdf", "--max-attempts", "3", "--unbounded"
        ])
        .is_err());
    }
}
