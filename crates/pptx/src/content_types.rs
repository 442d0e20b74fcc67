//! The `[Content_Types].xml` part.

use crate::xml::{attr, escape, xml_error, XML_DECLARATION};
use deck_core::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

pub(crate) const CT_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Default (by extension) and override (by part name) content types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut types = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) = (attr(e, "Extension"), attr(e, "ContentType")) {
                                types.defaults.push((ext.to_ascii_lowercase(), ct));
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) = (attr(e, "PartName"), attr(e, "ContentType")) {
                                types
                                    .overrides
                                    .push((part.trim_start_matches('/').to_string(), ct));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("Error parsing content types", e)),
                _ => {}
            }
        }

        Ok(types)
    }

    pub fn has_default(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.defaults.iter().any(|(ext, _)| *ext == extension)
    }

    /// Register a content type for an extension unless one exists.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if !self.has_default(extension) {
            self.defaults
                .push((extension.to_ascii_lowercase(), content_type.to_string()));
        }
    }

    /// Content type of a part, considering overrides before defaults.
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part_name) {
            return Some(ct);
        }
        let ext = part_name.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    pub fn set_override(&mut self, part_name: &str, content_type: &str) {
        self.remove_override(part_name);
        self.overrides
            .push((part_name.to_string(), content_type.to_string()));
    }

    pub fn remove_override(&mut self, part_name: &str) {
        self.overrides.retain(|(p, _)| p != part_name);
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(&format!("<Types xmlns=\"{}\">", NS_CONTENT_TYPES));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                escape(ext),
                escape(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
                escape(part),
                escape(ct)
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}
