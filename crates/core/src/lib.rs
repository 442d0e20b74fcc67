//! Core domain types, configuration, and error handling for building
//! student slide decks from spreadsheet data.

pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use config::{BuildConfig, LAYOUT_NAME_SENTINEL};
pub use error::{Error, ErrorKind, Result};
pub use normalize::normalize_label;
pub use types::{Extent, PlaceholderFormat, PlaceholderKind, StudentRow, REQUIRED_COLUMNS};
