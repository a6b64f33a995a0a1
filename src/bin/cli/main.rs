use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use notion2vault_lib::notion::{convert_export, ConversionReport, EntryKind};
use notion2vault_lib::ConvertOptions;

#[derive(Parser)]
#[command(
    name = "notion2vault",
    about = "Convert a Notion export into an Obsidian vault",
    version
)]
struct Cli {
    /// Notion export: a .zip archive or an extracted export folder
    input: PathBuf,

    /// Write the vault here instead of next to the archive / in place
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// TOML file with conversion options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show what would be written without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Do not copy images and other attachments
    #[arg(long)]
    no_assets: bool,

    /// Output format
    #[arg(long, default_value = "plain")]
    format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

fn load_options(config: Option<&Path>) -> Result<ConvertOptions> {
    match config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load config {:?}", path)),
        None => Ok(ConvertOptions::default()),
    }
}

fn print_plain(report: &ConversionReport) {
    for entry in &report.entries {
        println!("{}", entry.output.display());
    }

    for source in &report.empty_databases {
        eprintln!("No rows in {}, skipped", source);
    }

    println!(
        "\n{}{} pages, {} boards, {} assets, {} links rewritten",
        if report.dry_run { "(dry run) " } else { "" },
        report.count(EntryKind::Page),
        report.count(EntryKind::Database),
        report.count(EntryKind::Asset),
        report.links_rewritten(),
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut options = load_options(cli.config.as_deref())?;
    if cli.no_assets {
        options.copy_assets = false;
    }

    let report = convert_export(&cli.input, cli.output.as_deref(), &options, cli.dry_run)
        .with_context(|| {
            format!(
                "Failed to convert {:?}\nUsage: notion2vault <notion_export.zip>|<notion_export_folder>",
                cli.input
            )
        })?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }

    Ok(())
}
