//! # range-dl CLI
//!
//! Command-line interface for the range-dl library.
//! Walks a remote resource chunk by chunk with byte-range requests and
//! writes the chunks to a file or stdout.

use clap::Parser;
use log::{error, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use range_dl::{Error, Result, Stepper, StepperConfig, DEFAULT_CHUNK_SIZE};

mod cli;

/// Command-line interface for range-dl
#[derive(Parser)]
#[command(name = "range-dl")]
#[command(about = "Resumable HTTP downloader built on sequential byte-range requests")]
#[command(long_about = "Downloads a resource one byte range at a time:
  range-dl http://host/file.bin                  # Download next to the current directory
  range-dl http://host/file.bin out.bin          # Download to an explicit path
  range-dl http://host/file.bin -                # Stream chunks to stdout
  range-dl http://host/file.bin --resume-from 2048   # Resume at a byte offset

File Overwrite Behavior:
  By default, you'll be prompted if the destination file exists
  --force                          # Overwrite without asking
  --no-clobber                     # Never overwrite, fail if file exists")]
#[command(version)]
struct Cli {
    /// URL of the resource to download
    url: String,

    /// Output file path, or "-" for stdout
    #[arg(default_value = "")]
    output: String,

    /// Bytes requested per range step
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Byte offset to resume the download from
    #[arg(long)]
    resume_from: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Force overwrite existing files without prompting
    #[arg(short, long)]
    force: bool,

    /// Never overwrite existing files (fail if destination exists)
    #[arg(long)]
    no_clobber: bool,
}

/// Output destination types
#[derive(Debug)]
enum OutputDestination {
    File(String),
    Stdout,
}

/// Overwrite behavior for existing destination files
#[derive(Debug, Clone, PartialEq)]
enum OverwriteBehavior {
    Prompt,
    Force,
    NeverOverwrite,
}

/// Resolve output destination from CLI arguments
fn resolve_output(url: &str, output: &str) -> OutputDestination {
    if output == "-" {
        OutputDestination::Stdout
    } else if output.is_empty() {
        // Auto-generate filename from the last URL path segment
        let trimmed = url.trim_end_matches('/');
        let name = trimmed
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && !segment.contains(':'))
            .unwrap_or("download.bin");
        OutputDestination::File(name.to_string())
    } else {
        OutputDestination::File(output.to_string())
    }
}

/// Check if the destination file exists and apply the overwrite behavior
fn check_overwrite_permission(file_path: &str, behavior: &OverwriteBehavior) -> Result<()> {
    if !std::path::Path::new(file_path).exists() {
        return Ok(());
    }

    match behavior {
        OverwriteBehavior::Force => {
            eprintln!("⚠️  Overwriting existing file: {file_path}");
            Ok(())
        }
        OverwriteBehavior::NeverOverwrite => Err(Error::IoError(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("File already exists: {file_path} (use --force to overwrite)"),
        ))),
        OverwriteBehavior::Prompt => {
            eprintln!("⚠️  File already exists: {file_path}");
            eprint!("Overwrite? [y/N]: ");

            use std::io::Write;
            std::io::stderr().flush().map_err(Error::IoError)?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input).map_err(Error::IoError)?;

            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => {
                    eprintln!("✅ Overwriting file");
                    Ok(())
                }
                _ => Err(Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "Download cancelled by user",
                ))),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e}");
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("📡 range-dl v{} starting...", env!("CARGO_PKG_VERSION"));
    }

    // Validate conflicting flags
    if cli.force && cli.no_clobber {
        eprintln!("❌ Error: --force and --no-clobber cannot be used together");
        std::process::exit(1);
    }

    let output = resolve_output(&cli.url, &cli.output);

    let config = StepperConfig {
        chunk_size: cli.chunk_size,
        ..Default::default()
    };
    let mut stepper = Stepper::with_config(&cli.url, config)?;

    if !stepper.server_supports_partial_requests().await? {
        return Err(Error::HttpError(
            "server does not accept byte-range requests".to_string(),
        ));
    }

    match output {
        OutputDestination::File(file_path) => {
            let overwrite = if cli.force {
                OverwriteBehavior::Force
            } else if cli.no_clobber {
                OverwriteBehavior::NeverOverwrite
            } else {
                OverwriteBehavior::Prompt
            };
            check_overwrite_permission(&file_path, &overwrite)?;

            eprintln!("📁 Saving to: {file_path}");

            let total = stepper.content_length().unwrap_or(0);
            let progress =
                cli::ProgressManager::new(total, &format!("🌐 Downloading {}", cli.url));

            let file = tokio::fs::File::create(&file_path).await?;
            let written =
                download_chunks(&mut stepper, Box::new(file), cli.resume_from, Some(&progress))
                    .await?;

            progress.finish();
            if cli.verbose {
                eprintln!("📦 Wrote {written} bytes to {file_path}");
            }
        }
        OutputDestination::Stdout => {
            if cli.verbose {
                eprintln!("📡 Streaming to stdout");
            }
            let stdout = tokio::io::stdout();
            download_chunks(&mut stepper, Box::new(stdout), cli.resume_from, None).await?;
        }
    }

    Ok(())
}

/// Drives the stepper sequentially, writing each chunk body in order.
///
/// With a known content length the loop stops at the last partial request.
/// With an unknown length it stops when the server hands back a short or
/// empty chunk, or a 416 for a window past the end.
async fn download_chunks(
    stepper: &mut Stepper,
    mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    resume_from: Option<u64>,
    progress: Option<&cli::ProgressManager>,
) -> Result<u64> {
    let chunk_size = stepper.chunk_size();

    match resume_from {
        Some(offset) => {
            let start = offset as i64;
            stepper.resume(start, start + chunk_size as i64 - 1).await?;
        }
        None => stepper.start().await?,
    }

    let mut written = 0u64;

    loop {
        let Some(chunk) = stepper.current() else {
            break;
        };

        if chunk.status == 416 {
            warn!("Requested range not satisfiable, treating as end of content");
            break;
        }

        writer.write_all(&chunk.body).await?;
        written += chunk.body.len() as u64;

        if let Some(progress) = progress {
            progress.chunk_received(chunk.body.len() as u64);
        }

        if stepper.is_last_partial_request() || (chunk.body.len() as u64) < chunk_size {
            break;
        }

        stepper.next().await?;
    }

    writer.flush().await?;
    Ok(written)
}
