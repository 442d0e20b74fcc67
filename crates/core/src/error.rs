//! Error types for slide deck generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inspecting a template or building a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// An input file (template or spreadsheet) does not exist.
    #[error("{what} not found at '{}'", .path.display())]
    MissingFile { what: &'static str, path: PathBuf },

    /// Failed to read a file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The template could not be opened as a presentation.
    #[error("Could not open template '{}': {reason}", .path.display())]
    TemplateError { path: PathBuf, reason: String },

    /// The spreadsheet could not be read as a workbook.
    #[error("Error reading spreadsheet '{}': {reason}", .path.display())]
    SpreadsheetError { path: PathBuf, reason: String },

    /// Required columns are missing from the spreadsheet header.
    #[error(
        "Spreadsheet must contain columns: {}; missing: {}",
        quoted(.expected),
        quoted(.missing)
    )]
    SchemaError {
        expected: Vec<String>,
        missing: Vec<String>,
    },

    /// The configuration still carries placeholder values or is inconsistent.
    #[error("Configuration error: {0}")]
    Unconfigured(String),

    /// The configured layout name does not exist in the template.
    #[error(
        "Slide layout '{name}' not found in template. Available layouts:{}",
        listed(.available)
    )]
    LayoutNotFound { name: String, available: Vec<String> },

    /// A layout exists in the template but its part could not be read.
    #[error("Slide layout '{name}' could not be read: {reason}")]
    LayoutUnreadable { name: String, reason: String },

    /// A configured placeholder index is not present on the slide.
    #[error("Placeholder index {idx} not found on the slide; double-check the placeholder indices in the configuration")]
    PlaceholderNotFound { idx: u32 },

    /// A placeholder exists but cannot hold the requested content.
    #[error("Placeholder index {idx} is a {found} placeholder and cannot hold {wanted}")]
    PlaceholderKindMismatch {
        idx: u32,
        found: &'static str,
        wanted: &'static str,
    },

    /// A photo could not be decoded or is not a supported picture format.
    #[error("Unsupported image '{}': {reason}", .path.display())]
    ImageError { path: PathBuf, reason: String },

    /// The finished deck could not be written.
    #[error("Could not save the presentation to '{}' (make sure the file is not open elsewhere): {reason}", .path.display())]
    SaveError { path: PathBuf, reason: String },

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A part the document structure requires is absent or malformed.
    #[error("Invalid or corrupted package: {0}")]
    CorruptedPackage(String),
}

/// The error classes that decide how far a failure propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Template or spreadsheet is absent.
    MissingFile,
    /// Required spreadsheet columns are absent, or the spreadsheet is unreadable.
    Schema,
    /// Configuration does not match the template, or the template is unusable.
    Configuration,
    /// A failure confined to populating one slide.
    PerRow,
    /// The output document could not be written.
    Save,
}

impl ErrorKind {
    /// Whether this class of error aborts the whole run.
    pub fn is_run_fatal(self) -> bool {
        !matches!(self, ErrorKind::PerRow)
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFile { .. } => ErrorKind::MissingFile,
            Error::SchemaError { .. } | Error::SpreadsheetError { .. } => ErrorKind::Schema,
            Error::Unconfigured(_)
            | Error::LayoutNotFound { .. }
            | Error::LayoutUnreadable { .. }
            | Error::PlaceholderNotFound { .. }
            | Error::TemplateError { .. }
            | Error::CorruptedPackage(_) => ErrorKind::Configuration,
            Error::SaveError { .. } => ErrorKind::Save,
            Error::IoError(_)
            | Error::PlaceholderKindMismatch { .. }
            | Error::ImageError { .. }
            | Error::ZipError(_)
            | Error::XmlError(_) => ErrorKind::PerRow,
        }
    }
}

fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn listed(items: &[String]) -> String {
    items.iter().map(|s| format!("\n  - {}", s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_not_found_lists_every_layout_in_order() {
        let err = Error::LayoutNotFound {
            name: "StudentLayout".to_string(),
            available: vec!["Title Slide".to_string(), "Blank".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Slide layout 'StudentLayout' not found in template. Available layouts:\n  - Title Slide\n  - Blank"
        );
    }

    #[test]
    fn test_schema_error_message() {
        let err = Error::SchemaError {
            expected: vec!["name".into(), "usn".into(), "photo_path".into()],
            missing: vec!["photo_path".into()],
        };
        assert_eq!(
            err.to_string(),
            "Spreadsheet must contain columns: 'name', 'usn', 'photo_path'; missing: 'photo_path'"
        );
    }

    #[test]
    fn test_only_per_row_errors_are_recoverable() {
        assert!(!Error::PlaceholderKindMismatch {
            idx: 10,
            found: "text",
            wanted: "a picture"
        }
        .kind()
        .is_run_fatal());
        assert!(Error::PlaceholderNotFound { idx: 3 }.kind().is_run_fatal());
        assert!(Error::Unconfigured("x".into()).kind().is_run_fatal());
        assert_eq!(
            Error::LayoutUnreadable {
                name: "Broken".into(),
                reason: "bad xml".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::MissingFile {
                what: "Template",
                path: "t.pptx".into()
            }
            .kind(),
            ErrorKind::MissingFile
        );
        assert_eq!(
            Error::SaveError {
                path: "o.pptx".into(),
                reason: "locked".into()
            }
            .kind(),
            ErrorKind::Save
        );
    }
}
