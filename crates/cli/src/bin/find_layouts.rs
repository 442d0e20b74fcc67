//! List a template's slide layouts and the placeholder indices of each.

use anyhow::{Context, Result};
use clap::Parser;
use deck_cli::inspect_template;
use deck_core::ErrorKind;
use std::path::PathBuf;

/// Show the layouts of a PowerPoint template and their placeholders.
#[derive(Parser, Debug)]
#[command(name = "find-layouts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template presentation (.pptx)
    #[arg(default_value = "template.pptx")]
    template: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let report = match inspect_template(&args.template) {
        Ok(report) => report,
        Err(e) if e.kind() == ErrorKind::MissingFile => {
            anyhow::bail!(
                "'{}' not found.\nPlease create the template file first by following 'template_instructions.md'.",
                args.template.display()
            );
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }

    Ok(())
}
