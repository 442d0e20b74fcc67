//! Relationship (`.rels`) parts.

use crate::package::{rels_path_for, Package};
use crate::xml::{attr, escape, part_text, xml_error, XML_DECLARATION};
use deck_core::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

pub const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const RT_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const RT_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const RT_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const RT_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const RT_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const RT_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A single relationship entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// The relationships owned by one part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` document.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut entries = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let (Some(id), Some(rel_type), Some(target)) =
                        (attr(e, "Id"), attr(e, "Type"), attr(e, "Target"))
                    else {
                        log::warn!("Skipping relationship without Id, Type or Target");
                        continue;
                    };
                    let external = attr(e, "TargetMode").as_deref() == Some("External");
                    entries.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("Error parsing relationships", e)),
                _ => {}
            }
        }

        Ok(Self { entries })
    }

    /// Relationships owned by `part_name`; empty when it has no `.rels` part.
    pub fn of_part(package: &Package, part_name: &str) -> Result<Self> {
        let rels_path = rels_path_for(part_name);
        match package.get(&rels_path) {
            Some(bytes) => Self::parse(part_text(&rels_path, bytes)?),
            None => Ok(Self::new()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Lowest `rIdN` not yet in use.
    pub fn next_id(&self) -> String {
        (1..)
            .map(|n| format!("rId{}", n))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| format!("rId{}", self.entries.len() + 1))
    }

    /// Add an internal relationship and return its id.
    pub fn add(&mut self, rel_type: &str, target: impl Into<String>) -> String {
        let id = self.next_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        });
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.entries.iter().position(|r| r.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(&format!("<Relationships xmlns=\"{}\">", NS_PACKAGE_RELS));
        for rel in &self.entries {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
                escape(&rel.id),
                escape(&rel.rel_type),
                escape(&rel.target),
                if rel.external { " TargetMode=\"External\"" } else { "" }
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}
