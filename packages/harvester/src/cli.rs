//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{validate_date, DEFAULT_MAX_NODES, TRANSCRIPT_BASE_URL};
use crate::error::{HarvesterError, Result};
use crate::fetch::HttpFetcher;
use crate::harvester::{harvest, HarvestReport, HarvestRequest};
use crate::parser::{parse_document_with, ParseOptions};
use crate::store::{ItemStore, JsonStore};
use crate::taxonomy::Taxonomy;
use crate::types::{Chamber, ParsedDocument};

/// Hansard Harvester - Parse parliamentary transcripts into business items.
#[derive(Parser)]
#[command(name = "hansard-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a local transcript XML file.
    Parse {
        /// Transcript XML file
        file: PathBuf,

        /// Chamber the transcript belongs to (commons, lords, westminster-hall, standing-committee)
        #[arg(short, long)]
        chamber: Chamber,

        /// Store items as JSON under this directory instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replacement business taxonomy (YAML)
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Stop after visiting this many nodes
        #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
        max_nodes: usize,
    },

    /// Fetch, parse and store a day's transcript.
    Fetch {
        /// Sitting date in YYYY-MM-DD format
        #[arg(short, long)]
        date: String,

        /// Chamber to fetch
        #[arg(short, long)]
        chamber: Chamber,

        /// Document revision (default: latest)
        #[arg(short, long)]
        suffix: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = "hansard")]
        output: PathBuf,

        /// Transcript archive base URL
        #[arg(long, default_value = TRANSCRIPT_BASE_URL)]
        base_url: String,
    },
}

/// Run the CLI.
///
/// # Errors
/// Any failure of the selected command.
pub fn run() -> Result<()> {
    run_with(Cli::parse())
}

/// Run an already-parsed command line.
///
/// # Errors
/// Any failure of the selected command.
pub fn run_with(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse {
            file,
            chamber,
            output,
            taxonomy,
            max_nodes,
        } => parse_command(&file, chamber, output.as_deref(), taxonomy.as_deref(), max_nodes),
        Commands::Fetch {
            date,
            chamber,
            suffix,
            output,
            base_url,
        } => fetch_command(&date, chamber, suffix, &output, &base_url),
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}

fn parse_command(
    file: &Path,
    chamber: Chamber,
    output: Option<&Path>,
    taxonomy: Option<&Path>,
    max_nodes: usize,
) -> Result<()> {
    if let Some(output_dir) = output {
        ensure_directory(output_dir)?;
    }

    let xml = std::fs::read_to_string(file)?;
    let options = ParseOptions {
        max_nodes,
        taxonomy: taxonomy
            .map(|path| Taxonomy::from_file(path, chamber))
            .transpose()?,
    };
    let parsed = parse_document_with(&xml, chamber, options)?;

    match output {
        None => {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Some(output_dir) => {
            JsonStore::new(output_dir).store(chamber, &parsed.items)?;
            print_summary(&parsed);
            println!(
                "{} {}",
                style("Saved to:").green().bold(),
                output_dir.join(chamber.dir_name()).display()
            );
        }
    }
    Ok(())
}

fn print_summary(parsed: &ParsedDocument) {
    println!("  Items: {}", parsed.items.len());
    println!("  Speeches: {}", parsed.stats.speeches);
    println!("  Divisions: {}", parsed.stats.divisions);
    if !parsed.warnings.is_empty() {
        println!("  Warnings: {}", style(parsed.warnings.len()).yellow().bold());
    }
    if parsed.stats.truncated {
        println!("  {}", style("Traversal truncated").yellow().bold());
    }
}

fn fetch_command(
    date: &str,
    chamber: Chamber,
    suffix: Option<String>,
    output: &Path,
    base_url: &str,
) -> Result<()> {
    validate_date(date)?;
    ensure_directory(output)?;

    println!(
        "{} {} transcript for {}",
        style("Fetching").bold(),
        style(chamber.as_str()).cyan(),
        style(date).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Fetching and parsing transcript...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut request = HarvestRequest::new(date, chamber);
    request.suffix = suffix;

    let fetcher = HttpFetcher::with_base_url(base_url)?;
    let mut store = JsonStore::new(output);
    let report = harvest(&fetcher, &mut store, request);
    pb.finish_and_clear();

    match report? {
        HarvestReport::NotFound => {
            println!("{}", style("No transcript found").yellow().bold());
        }
        HarvestReport::Stored {
            suffix,
            items,
            warnings,
        } => {
            println!("  Revision: {}", style(&suffix).cyan());
            println!("  Items: {items}");
            if !warnings.is_empty() {
                println!("  Warnings: {}", style(warnings.len()).yellow().bold());
            }
            println!();
            println!(
                "{} {}",
                style("Saved to:").green().bold(),
                output.join(chamber.dir_name()).display()
            );
        }
    }
    Ok(())
}
