//! Resume screener: rank PDF/DOCX resumes against a job description

use clap::Parser;
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::{parse_experience_mode, Config, OutputFormat};
use resume_screener::input::InputManager;
use resume_screener::llm::{GeminiClient, ResilientCaller};
use resume_screener::output::formatter::DEFAULT_CSV_FILENAME;
use resume_screener::output::progress::{ConsoleReporter, ProgressReporter};
use resume_screener::output::{save_report_to_file, ReportGenerator};
use resume_screener::processing::sanitize;
use resume_screener::processing::{PipelineSettings, ScreeningPipeline};
use resume_screener::{Result, ScreenerError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

const PING_PROMPT: &str = "Reply with the single word: pong";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resumes,
            job,
            job_text,
            output,
            save,
            detailed,
            experience,
            max_attempts,
            unbounded,
        } => {
            info!("Starting resume screening");

            if let Some(mode) = experience {
                config.pipeline.experience_mode =
                    parse_experience_mode(&mode).map_err(ScreenerError::InvalidInput)?;
            }
            if let Some(attempts) = max_attempts {
                config.retry.max_attempts = attempts;
                config.retry.unbounded = false;
            }
            if unbounded {
                config.retry.unbounded = true;
            }

            let output_format =
                cli::resolve_output_format(output.as_deref(), save.as_deref(), config.output.format)
                    .map_err(ScreenerError::InvalidInput)?;
            let detailed = detailed || config.output.detailed;

            for resume in &resumes {
                cli::validate_file_extension(resume, &["pdf", "docx"]).map_err(|e| {
                    ScreenerError::InvalidInput(format!("Resume file {}: {}", resume.display(), e))
                })?;
            }

            let mut input_manager = InputManager::new();
            let job_description = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["txt", "md", "pdf", "docx"])
                        .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
                    input_manager.extract_text(&path).await?
                }
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(ScreenerError::InvalidInput(
                        "Provide a job description with --job <file> or --job-text <text>".to_string(),
                    ))
                }
            };

            let documents = input_manager
                .load_resumes(&resumes, config.pipeline.max_files)
                .await?;

            println!("🚀 Resume screening");
            println!("📄 Resumes: {}", documents.len());
            println!("💼 Job description: {} characters", job_description.len());
            println!("🔧 Output format: {:?}", output_format);
            println!("🧮 Experience: {:?}", config.pipeline.experience_mode);
            if config.retry.unbounded {
                println!("⚠️  Unbounded retries: a service that stays down stalls the run");
            }
            println!();

            let client = GeminiClient::from_config(&config)?;
            let reporter = Arc::new(ConsoleReporter::new(documents.len(), config.output.color_output));
            let caller = ResilientCaller::new(client, config.retry_policy());
            let pipeline = ScreeningPipeline::new(caller, PipelineSettings::from(&config))
                .with_reporter(reporter);

            let result = pipeline.run(&job_description, documents).await?;

            let save_path = save.or_else(|| {
                (output_format == OutputFormat::Csv).then(|| PathBuf::from(DEFAULT_CSV_FILENAME))
            });

            match save_path {
                Some(path) => {
                    let generator = ReportGenerator::with_options(false, detailed, true, true, true);
                    let content = generator.generate_report(&result, &output_format)?;
                    save_report_to_file(&content, &path)?;
                    println!("💾 Report saved to: {}", path.display());

                    if output_format != OutputFormat::Console {
                        let console = ReportGenerator::with_options(
                            config.output.color_output,
                            detailed,
                            true,
                            true,
                            true,
                        );
                        println!("{}", console.generate_report(&result, &OutputFormat::Console)?);
                    }
                }
                None => {
                    let generator = ReportGenerator::with_options(
                        config.output.color_output,
                        detailed,
                        true,
                        true,
                        true,
                    );
                    println!("{}", generator.generate_report(&result, &output_format)?);
                }
            }
        }

        Commands::Ping => {
            let client = GeminiClient::from_config(&config)?;
            println!("📡 Pinging {}", client.endpoint());

            let reporter = Arc::new(ConsoleReporter::new(1, config.output.color_output));
            let caller =
                ResilientCaller::new(client, config.retry_policy()).with_reporter(reporter.clone());

            let start = Instant::now();
            let reply = caller.call(PING_PROMPT).await;
            reporter.run_finished();
            let reply = reply?;
            println!(
                "✅ Remote service answered in {}ms: {}",
                start.elapsed().as_millis(),
                sanitize::first_line(&reply)
            );
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let mut shown = config.clone();
                if shown.remote.api_key.is_some() {
                    shown.remote.api_key = Some("********".to_string());
                }
                let rendered = toml::to_string_pretty(&shown).map_err(|e| {
                    ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", rendered);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut stored = Config::read_from(config_path)?;
                stored.set_value(&key, &value)?;
                stored.save_to(config_path)?;
                if key == "remote.api_key" {
                    println!("✅ remote.api_key updated");
                } else {
                    println!("✅ {} = {}", key, value);
                }
            }
        },
    }

    Ok(())
}
