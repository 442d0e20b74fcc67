//! Open Packaging Conventions plumbing shared by the presentation and
//! spreadsheet readers: the in-memory ZIP package, relationship parts and
//! quick-xml helpers.

pub mod package;
pub mod rels;
pub mod xml;

pub use package::Package;
pub use rels::{Relationship, Relationships};
