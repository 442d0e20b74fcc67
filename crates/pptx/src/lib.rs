//! PPTX (Office Open XML) backend for building slide decks.
//!
//! Opens a template package, exposes its slide layouts, creates slides
//! from a layout with typed access to their placeholders, and writes the
//! result back out as a new `.pptx` file.

pub mod content_types;
pub mod layout;
pub mod picture;
pub mod presentation;
pub mod reader;
pub mod slide;

pub use deck_opc::{package, rels};
use deck_opc::xml;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use layout::{LayoutPlaceholder, SlideLayout};
pub use picture::{Crop, Picture, PictureFormat};
pub use presentation::Presentation;
pub use reader::{PlaceholderContent, SlideContent};
pub use slide::{ImageSlot, Placeholder, Slide, SlideId, Slot, TextSlot};
