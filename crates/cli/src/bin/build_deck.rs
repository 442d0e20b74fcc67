//! Build one slide per student from a template layout and a spreadsheet.

use anyhow::{Context, Result};
use clap::Parser;
use deck_cli::build_deck;
use deck_core::BuildConfig;
use std::path::PathBuf;

/// Create a student slide deck from a PowerPoint template and an Excel sheet.
///
/// Run find-layouts first to learn the layout name and placeholder indices.
#[derive(Parser, Debug)]
#[command(name = "build-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template presentation (.pptx)
    #[arg(short, long, default_value = "template.pptx")]
    template: PathBuf,

    /// Spreadsheet with name, usn and photo_path columns (.xlsx)
    #[arg(short, long, default_value = "sponsored_scholarships.xlsx")]
    spreadsheet: PathBuf,

    /// Output presentation
    #[arg(short, long, default_value = "sponsored_scholarships_slides.pptx")]
    output: PathBuf,

    /// Name of the slide layout to create slides from
    #[arg(short, long, default_value = "StudentLayout")]
    layout: String,

    /// Placeholder index for the student's name
    #[arg(long, default_value = "11")]
    name_idx: u32,

    /// Placeholder index for the student's USN
    #[arg(long, default_value = "12")]
    usn_idx: u32,

    /// Placeholder index for the student's photo
    #[arg(long, default_value = "10")]
    photo_idx: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for BuildConfig {
    fn from(args: Args) -> Self {
        BuildConfig {
            template_path: args.template,
            spreadsheet_path: args.spreadsheet,
            output_path: args.output,
            layout_name: args.layout,
            name_idx: args.name_idx,
            usn_idx: args.usn_idx,
            photo_idx: args.photo_idx,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = BuildConfig::from(args);
    let summary = build_deck(&config)
        .with_context(|| format!("Failed to build '{}'", config.output_path.display()))?;

    if !summary.failures.is_empty() {
        eprintln!(
            "{} of {} rows could not be fully processed.",
            summary.failures.len(),
            summary.slides_created
        );
    }

    Ok(())
}
