//! Intake CLI — validate a local file as if it had just been uploaded.
//!
//! Host upload limits come from INTAKE_UPLOAD_MAX_FILESIZE and
//! INTAKE_POST_MAX_SIZE (shorthand sizes such as 2M), also read from `.env`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use intake_cli::{init_tracing, load_config, upload_from_path, DEFAULT_CONTENT_TYPE};
use intake_core::{EnvLimits, ErrorFormat, UploadRequest};
use intake_processing::UploadValidator;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "intake", about = "Upload validation and safe filename derivation")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a file against a policy and print the outcome
    Check {
        /// Path to the file standing in for the temporary upload
        file: PathBuf,
        /// Filename declared by the client (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
        /// Content type declared by the client
        #[arg(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
        /// Form field the upload arrived in
        #[arg(long)]
        field: Option<String>,
        /// JSON policy file (camelCase keys, every key optional)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Client-declared maximum size in bytes
        #[arg(long)]
        max_file_size_hint: Option<String>,
        /// Print only the error report: html, escaped_text, json, js_array, text or raw
        #[arg(long)]
        format: Option<ErrorFormat>,
        /// Move the file into the upload directory when it passes
        #[arg(long = "move")]
        move_file: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Check {
            file,
            name,
            content_type,
            field,
            config,
            max_file_size_hint,
            format,
            move_file,
        } => {
            let mut config = load_config(config.as_deref())?;
            if move_file {
                config.move_file = true;
            }

            let field = field
                .or_else(|| config.field_name.clone())
                .unwrap_or_else(|| "file".to_string());
            let upload = upload_from_path(&file, name.as_deref(), &content_type, &field)
                .with_context(|| format!("Cannot read {}", file.display()))?;

            let mut request = UploadRequest::single(upload);
            if let Some(hint) = max_file_size_hint {
                request = request.with_max_file_size_hint(hint);
            }

            let limits = EnvLimits::from_env().context("Invalid host upload limits")?;
            let policy = config.into_policy().context("Invalid policy")?;
            let validator = UploadValidator::new(policy, limits);

            let result = validator
                .validate(&request)
                .with_context(|| format!("Validation of {} aborted", file.display()))?;

            tracing::info!(
                file = %file.display(),
                valid = result.is_valid(),
                errors = result.errors.len(),
                filename = %result.filename_full,
                "Upload checked"
            );

            match format {
                Some(format) => {
                    let report = result.errors.render(format);
                    if !report.is_empty() {
                        println!("{}", report.trim_end_matches('\n'));
                    }
                }
                None => print_json(&result)?,
            }

            if result.is_valid() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
