//! Deck builder configuration.
//!
//! Placeholder indices are template-specific; run `find-layouts` against
//! the template to discover them whenever the template changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker left in a layout name that has not been filled in yet.
pub const LAYOUT_NAME_SENTINEL: &str = "YOUR_LAYOUT_NAME_HERE";

/// Everything the deck builder needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Presentation used as the source of layouts.
    pub template_path: PathBuf,

    /// Workbook with `name`, `usn` and `photo_path` columns.
    pub spreadsheet_path: PathBuf,

    /// Where the finished deck is written.
    pub output_path: PathBuf,

    /// Name of the slide layout each student slide is created from.
    pub layout_name: String,

    /// Placeholder index receiving the student's name.
    pub name_idx: u32,

    /// Placeholder index receiving the USN.
    pub usn_idx: u32,

    /// Placeholder index receiving the photo.
    pub photo_idx: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.pptx"),
            spreadsheet_path: PathBuf::from("sponsored_scholarships.xlsx"),
            output_path: PathBuf::from("sponsored_scholarships_slides.pptx"),
            layout_name: "StudentLayout".to_string(),
            name_idx: 11,
            usn_idx: 12,
            photo_idx: 10,
        }
    }
}

impl BuildConfig {
    /// Reject configurations that were never filled in.
    ///
    /// Touches no files.
    pub fn validate(&self) -> Result<()> {
        if self.layout_name.trim().is_empty() || self.layout_name.contains(LAYOUT_NAME_SENTINEL) {
            return Err(Error::Unconfigured(
                "please set the layout name and placeholder indices to the values reported by \
                 'find-layouts' before running"
                    .to_string(),
            ));
        }

        for (a, b, idx) in self.shared_indices() {
            log::warn!(
                "The {} and {} placeholders share index {}; the later value overwrites the earlier one",
                a,
                b,
                idx
            );
        }

        log::debug!("Configuration accepted: {:?}", self);
        Ok(())
    }

    /// Pairs of placeholder roles configured with the same index.
    pub fn shared_indices(&self) -> Vec<(&'static str, &'static str, u32)> {
        let indices = [
            ("name", self.name_idx),
            ("usn", self.usn_idx),
            ("photo", self.photo_idx),
        ];
        let mut shared = Vec::new();
        for (i, &(a, a_idx)) in indices.iter().enumerate() {
            for &(b, b_idx) in &indices[i + 1..] {
                if a_idx == b_idx {
                    shared.push((a, b, a_idx));
                }
            }
        }
        shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sentinel_layout_name_rejected() {
        let config = BuildConfig {
            layout_name: "YOUR_LAYOUT_NAME_HERE".to_string(),
            ..BuildConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Unconfigured(_))));
    }

    #[test]
    fn test_empty_layout_name_rejected() {
        let config = BuildConfig {
            layout_name: "  ".to_string(),
            ..BuildConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_indices_are_accepted() {
        let config = BuildConfig {
            usn_idx: 10,
            ..BuildConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.shared_indices(), vec![("usn", "photo", 10)]);
        assert!(BuildConfig::default().shared_indices().is_empty());
    }
}
