//! Deck building: one slide per spreadsheet row.

use deck_core::{normalize_label, BuildConfig, Error, PlaceholderKind, Result};
use deck_pptx::{Picture, Presentation, Slide, SlideId, Slot};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A row that did not come out as a complete slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// Upper-cased student name.
    pub name: String,
    pub message: String,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub slides_created: usize,
    /// Rows whose photo was missing; their slides carry text only.
    pub warnings: Vec<RowIssue>,
    /// Rows that failed part-way; their slides are kept as far as they got.
    pub failures: Vec<RowIssue>,
}

enum PhotoOutcome {
    Inserted,
    Missing,
}

/// Build the student deck described by `config` and save it.
///
/// Missing inputs, a schema mismatch and any configuration mismatch
/// (including a placeholder index absent from the slide) abort before
/// anything is written. Other failures are confined to their row.
pub fn build_deck(config: &BuildConfig) -> Result<BuildSummary> {
    config.validate()?;

    log::info!("Loading data from '{}'...", config.spreadsheet_path.display());
    let rows = deck_xlsx::load_rows(&config.spreadsheet_path)?;

    let mut presentation = Presentation::open(&config.template_path)?;
    let layout_index = presentation.require_layout(&config.layout_name)?.index();
    log::info!("Found layout '{}'. Starting to add slides...", config.layout_name);

    let mut summary = BuildSummary {
        output: config.output_path.clone(),
        slides_created: 0,
        warnings: Vec::new(),
        failures: Vec::new(),
    };

    for row in &rows {
        let name = normalize_label(&row.name);
        let usn = normalize_label(&row.usn);
        log::info!("  -> Processing: {} ({})", name, usn);

        let id = presentation.add_slide(layout_index)?;
        summary.slides_created += 1;

        match populate_slide(&mut presentation, id, config, &name, &usn, &row.photo_path) {
            Ok(PhotoOutcome::Inserted) => {}
            Ok(PhotoOutcome::Missing) => {
                log::warn!(
                    "    Warning: Photo not found for {} at '{}'. Skipping image.",
                    name,
                    row.photo_path.display()
                );
                summary.warnings.push(RowIssue {
                    message: format!("photo not found at '{}'", row.photo_path.display()),
                    name,
                });
            }
            Err(e) if e.kind().is_run_fatal() => return Err(e),
            Err(e) => {
                log::error!("Error processing slide for {}: {}", name, e);
                summary.failures.push(RowIssue {
                    name,
                    message: e.to_string(),
                });
            }
        }
    }

    presentation.save(&config.output_path)?;

    log::info!("--- Done! ---");
    log::info!(
        "Successfully created '{}' with {} student slides.",
        config.output_path.display(),
        summary.slides_created
    );
    Ok(summary)
}

fn populate_slide(
    presentation: &mut Presentation,
    id: SlideId,
    config: &BuildConfig,
    name: &str,
    usn: &str,
    photo_path: &Path,
) -> Result<PhotoOutcome> {
    let slide = presentation
        .slide_mut(id)
        .ok_or_else(|| Error::CorruptedPackage(format!("slide {} disappeared after creation", id.0)))?;

    set_text(slide, config.name_idx, name)?;
    set_text(slide, config.usn_idx, usn)?;

    if !photo_path.exists() {
        return Ok(PhotoOutcome::Missing);
    }

    match slide.placeholder(config.photo_idx) {
        Slot::Image(slot) => {
            let picture = Picture::from_path(photo_path)?;
            slot.insert_picture(picture);
            Ok(PhotoOutcome::Inserted)
        }
        Slot::Text(slot) => Err(mismatch(config.photo_idx, slot.placeholder().kind(), "a picture")),
        Slot::NotFound => Err(Error::PlaceholderNotFound {
            idx: config.photo_idx,
        }),
    }
}

fn set_text(slide: &mut Slide, idx: u32, text: &str) -> Result<()> {
    match slide.placeholder(idx) {
        Slot::Text(slot) => {
            slot.set_text(text);
            Ok(())
        }
        Slot::Image(slot) => Err(mismatch(idx, slot.placeholder().kind(), "text")),
        Slot::NotFound => Err(Error::PlaceholderNotFound { idx }),
    }
}

fn mismatch(idx: u32, found: PlaceholderKind, wanted: &'static str) -> Error {
    Error::PlaceholderKindMismatch {
        idx,
        found: found.label(),
        wanted,
    }
}
