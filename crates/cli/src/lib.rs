//! The two tools behind the command-line binaries.
//!
//! [`inspect_template`] lists a template's layouts and the placeholders a
//! slide created from each one actually gets; [`build_deck`] merges
//! spreadsheet rows into one slide per student.

pub mod build;
pub mod inspect;

pub use build::{build_deck, BuildSummary, RowIssue};
pub use inspect::{inspect_template, LayoutReport, PlaceholderReport, TemplateReport};
