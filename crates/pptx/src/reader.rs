//! Reading placeholder content back out of slide XML.

use crate::layout::placeholder_format;
use crate::slide::{Slide, SlideId};
use crate::xml::{attr, local_name, xml_error};
use deck_core::{PlaceholderKind, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// What one placeholder on a slide holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderContent {
    pub idx: u32,
    pub name: String,
    pub kind: PlaceholderKind,
    /// Paragraphs joined with `\n`; empty when the placeholder has no text.
    pub text: String,
    pub has_picture: bool,
}

/// Placeholder contents of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideContent {
    pub id: SlideId,
    /// Name of the layout the slide is based on, if it could be resolved.
    pub layout_name: Option<String>,
    pub placeholders: Vec<PlaceholderContent>,
}

impl SlideContent {
    /// The placeholder with the given index.
    pub fn placeholder(&self, idx: u32) -> Option<&PlaceholderContent> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }
}

/// Contents of a slide that has not been written yet.
pub(crate) fn contents_of(slide: &Slide) -> Vec<PlaceholderContent> {
    slide
        .placeholders()
        .iter()
        .map(|ph| PlaceholderContent {
            idx: ph.idx(),
            name: ph.name().to_string(),
            kind: ph.kind(),
            text: ph.text().unwrap_or_default().to_string(),
            has_picture: ph.picture().is_some(),
        })
        .collect()
}

/// Information about a shape extracted from XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    name: String,
    placeholder: Option<(u32, PlaceholderKind)>,
    text: String,
    has_picture: bool,
}

/// Extract placeholder shapes with their text and pictures from slide XML.
pub(crate) fn read_placeholders(xml_content: &str) -> Result<Vec<PlaceholderContent>> {
    let mut placeholders = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_text = false;
    let mut paragraphs = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing slide", e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = e.name();
                let is_start = matches!(event, Event::Start(_));

                match local_name(name.as_ref()) {
                    b"sp" | b"pic" if is_start => {
                        current_shape = Some(ShapeInfo::default());
                        paragraphs = 0;
                    }
                    b"cNvPr" => {
                        if let Some(ref mut shape) = current_shape {
                            if shape.name.is_empty() {
                                shape.name = attr(e, "name").unwrap_or_default();
                            }
                        }
                    }
                    b"ph" => {
                        if let Some(ref mut shape) = current_shape {
                            let format = placeholder_format(e);
                            shape.placeholder = Some((format.idx, format.kind));
                        }
                    }
                    b"blip" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.has_picture = true;
                        }
                    }
                    b"txBody" if is_start => {
                        in_text_body = true;
                    }
                    b"p" if in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            if paragraphs > 0 {
                                shape.text.push('\n');
                            }
                        }
                        paragraphs += 1;
                    }
                    b"t" if is_start && in_text_body => {
                        in_text = true;
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if in_text {
                    if let Some(ref mut shape) = current_shape {
                        let text = e.unescape().unwrap_or_default();
                        shape.text.push_str(&text);
                    }
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" | b"pic" => {
                        if let Some(shape) = current_shape.take() {
                            if let Some((idx, kind)) = shape.placeholder {
                                placeholders.push(PlaceholderContent {
                                    idx,
                                    name: shape.name,
                                    kind,
                                    text: shape.text,
                                    has_picture: shape.has_picture,
                                });
                            }
                        }
                        in_text_body = false;
                        in_text = false;
                    }
                    b"txBody" => {
                        in_text_body = false;
                    }
                    b"t" => {
                        in_text = false;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="a" xmlns:r="r" xmlns:p="p"><p:cSld><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:pic><p:nvPicPr><p:cNvPr id="2" name="Photo" descr="a.png"/><p:cNvPicPr/><p:nvPr><p:ph type="pic" idx="10"/></p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Name"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="11"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:bodyPr/><a:p><a:r><a:t>ANN </a:t></a:r><a:r><a:t>LEE &amp; CO</a:t></a:r></a:p><a:p/><a:p><a:r><a:t>2</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="4" name="Logo"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:txBody><a:p><a:r><a:t>ignored</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="5" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p/></p:txBody></p:sp>
</p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_read_placeholders() {
        let placeholders = read_placeholders(SLIDE).unwrap();
        assert_eq!(placeholders.len(), 3);

        assert_eq!(placeholders[0].idx, 10);
        assert_eq!(placeholders[0].kind, PlaceholderKind::Picture);
        assert!(placeholders[0].has_picture);
        assert_eq!(placeholders[0].name, "Photo");

        assert_eq!(placeholders[1].idx, 11);
        assert_eq!(placeholders[1].text, "ANN LEE & CO\n\n2");
        assert!(!placeholders[1].has_picture);

        assert_eq!(placeholders[2].idx, 0);
        assert_eq!(placeholders[2].kind, PlaceholderKind::Title);
        assert_eq!(placeholders[2].text, "");
    }
}
