//! Layout inspection: which placeholders does each layout give a new slide?

use deck_core::{Error, Result};
use deck_pptx::{Presentation, SlideId};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const RULE: &str = "-----------------------------------------------------";

/// One placeholder on a slide created from a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderReport {
    pub idx: u32,
    pub name: String,
    /// Kind label such as `PICTURE` or `BODY`; `Unknown` when unrecognised.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Inspection result for one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    /// Position in the template's layout collection.
    pub index: usize,
    pub name: String,
    pub placeholders: Vec<PlaceholderReport>,
    /// Why the layout could not be inspected, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inspection result for a whole template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReport {
    pub template: PathBuf,
    pub layouts: Vec<LayoutReport>,
}

/// Inspect every layout of the template at `path`.
///
/// Each layout gets a temporary slide whose placeholders are reported and
/// which is removed again. A layout that cannot be inspected is reported
/// with its error and does not stop the others. Nothing is written to disk.
pub fn inspect_template(path: &Path) -> Result<TemplateReport> {
    let mut presentation = Presentation::open(path)?;
    log::info!(
        "Inspecting {} layouts in '{}'",
        presentation.layouts().len(),
        path.display()
    );

    let layouts: Vec<(usize, String)> = presentation
        .layouts()
        .iter()
        .map(|l| (l.index(), l.name().to_string()))
        .collect();

    let layouts = layouts
        .into_iter()
        .map(|(index, name)| match inspect_layout(&mut presentation, index) {
            Ok(placeholders) => LayoutReport {
                index,
                name,
                placeholders,
                error: None,
            },
            Err(e) => {
                log::warn!("Could not inspect layout '{}': {}", name, e);
                LayoutReport {
                    index,
                    name,
                    placeholders: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(TemplateReport {
        template: path.to_path_buf(),
        layouts,
    })
}

fn inspect_layout(presentation: &mut Presentation, index: usize) -> Result<Vec<PlaceholderReport>> {
    let id = presentation.add_slide(index)?;
    let placeholders = placeholders_of(presentation, id);

    // A slide missing from the slide list needs no cleanup.
    if !presentation.remove_slide(id) {
        log::debug!("Temporary slide {} already detached", id.0);
    }

    placeholders
}

fn placeholders_of(presentation: &mut Presentation, id: SlideId) -> Result<Vec<PlaceholderReport>> {
    let slide = presentation
        .slide_mut(id)
        .ok_or_else(|| Error::CorruptedPackage(format!("slide {} disappeared after creation", id.0)))?;

    Ok(slide
        .placeholders()
        .iter()
        .map(|ph| PlaceholderReport {
            idx: ph.idx(),
            name: ph.name().to_string(),
            kind: ph.kind().label().to_string(),
        })
        .collect())
}

impl fmt::Display for TemplateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Analyzing '{}' ---", self.template.display())?;
        writeln!(f, "Found {} slide layouts.", self.layouts.len())?;
        writeln!(f)?;

        for layout in &self.layouts {
            write!(f, "{}", layout)?;
            writeln!(f)?;
        }

        writeln!(f, "--- Analysis Complete ---")?;
        writeln!(
            f,
            "ACTION: Find your layout name (e.g., 'StudentLayout') in the list above."
        )?;
        writeln!(
            f,
            "Note down the 'Placeholder Index (idx)' for your Name, USN, and Photo placeholders."
        )?;
        writeln!(
            f,
            "Pass them to build-deck with --layout, --name-idx, --usn-idx and --photo-idx."
        )
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Layout Index: {}, Layout Name: '{}'", self.index, self.name)?;
        writeln!(f, "{}", RULE)?;

        if let Some(error) = &self.error {
            return writeln!(
                f,
                "    Could not add or inspect test slide for this layout. Error: {}",
                error
            );
        }

        if self.placeholders.is_empty() {
            return writeln!(f, "  This layout has no placeholders.");
        }

        writeln!(f, "  Placeholders found on this layout:")?;
        for ph in &self.placeholders {
            writeln!(f, "    -> Placeholder Index (idx): {}", ph.idx)?;
            writeln!(f, "       Name: '{}'", ph.name)?;
            writeln!(f, "       Type: {}", ph.kind)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
