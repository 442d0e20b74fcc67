//! Slides created from a layout, and typed access to their placeholders.

use crate::layout::SlideLayout;
use crate::picture::{Crop, Picture};
use crate::xml::{escape, NS_DRAWINGML, NS_OFFICE_RELS, NS_PRESENTATIONML, XML_DECLARATION};
use deck_core::{Extent, PlaceholderFormat, PlaceholderKind};
use serde::Serialize;
use std::fmt::Write as _;

/// Identifier of a slide within one presentation (`p:sldId/@id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlideId(pub u32);

/// What a slide placeholder currently holds.
#[derive(Debug, Clone, PartialEq)]
enum Content {
    Empty,
    Text(String),
    Picture { picture: Picture, crop: Crop },
}

/// A placeholder on a slide, cloned from its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    shape_id: u32,
    name: String,
    format: PlaceholderFormat,
    extent: Option<Extent>,
    content: Content,
}

impl Placeholder {
    pub fn idx(&self) -> u32 {
        self.format.idx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlaceholderKind {
        self.format.kind
    }

    pub fn format(&self) -> &PlaceholderFormat {
        &self.format
    }

    /// Text set on this placeholder, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Picture inserted into this placeholder, if any.
    pub fn picture(&self) -> Option<&Picture> {
        match &self.content {
            Content::Picture { picture, .. } => Some(picture),
            _ => None,
        }
    }
}

/// Result of looking up a placeholder by index.
#[derive(Debug)]
pub enum Slot<'a> {
    /// A placeholder that takes text.
    Text(TextSlot<'a>),
    /// A placeholder that takes a picture.
    Image(ImageSlot<'a>),
    /// No placeholder with that index on the slide.
    NotFound,
}

/// Write access to a text placeholder.
#[derive(Debug)]
pub struct TextSlot<'a> {
    placeholder: &'a mut Placeholder,
}

impl TextSlot<'_> {
    /// Replace the placeholder's text. Newlines start new paragraphs.
    pub fn set_text(self, text: &str) {
        self.placeholder.content = Content::Text(text.to_string());
    }

    pub fn placeholder(&self) -> &Placeholder {
        self.placeholder
    }
}

/// Write access to a picture placeholder.
#[derive(Debug)]
pub struct ImageSlot<'a> {
    placeholder: &'a mut Placeholder,
}

impl ImageSlot<'_> {
    /// Fill the placeholder with a picture, cropped to its frame.
    pub fn insert_picture(self, picture: Picture) {
        let crop = picture.crop_to_fill(self.placeholder.extent);
        self.placeholder.content = Content::Picture { picture, crop };
    }

    pub fn placeholder(&self) -> &Placeholder {
        self.placeholder
    }
}

/// A slide generated from a layout and not yet written to the package.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    layout_part: String,
    placeholders: Vec<Placeholder>,
}

impl Slide {
    /// Clone the layout's placeholders onto a new slide.
    ///
    /// Date, footer and slide-number placeholders stay on the layout.
    /// Shape ids are renumbered from 2; id 1 belongs to the shape tree.
    pub(crate) fn from_layout(layout: &SlideLayout) -> Self {
        let placeholders = layout
            .placeholders()
            .iter()
            .filter(|ph| !ph.format.kind.is_layout_only())
            .zip(2u32..)
            .map(|(ph, shape_id)| Placeholder {
                shape_id,
                name: ph.name.clone(),
                format: ph.format.clone(),
                extent: ph.extent,
                content: Content::Empty,
            })
            .collect();

        Self {
            layout_part: layout.part_name().to_string(),
            placeholders,
        }
    }

    /// Part name of the layout this slide was created from.
    pub fn layout_part(&self) -> &str {
        &self.layout_part
    }

    /// Placeholders in shape-tree order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Look up a placeholder by index.
    pub fn placeholder(&mut self, idx: u32) -> Slot<'_> {
        match self.placeholders.iter_mut().find(|ph| ph.format.idx == idx) {
            Some(placeholder) if placeholder.format.kind.holds_picture() => {
                Slot::Image(ImageSlot { placeholder })
            }
            Some(placeholder) => Slot::Text(TextSlot { placeholder }),
            None => Slot::NotFound,
        }
    }

    /// Pictures on this slide, in shape order, paired with their shape ids.
    pub(crate) fn pictures(&self) -> impl Iterator<Item = (u32, &Picture)> {
        self.placeholders
            .iter()
            .filter_map(|ph| ph.picture().map(|p| (ph.shape_id, p)))
    }

    /// Serialize as a `p:sld` part. `image_rel` maps a shape id to the
    /// relationship id of its picture.
    pub(crate) fn to_xml(&self, image_rel: impl Fn(u32) -> Option<String>) -> String {
        let mut xml = String::from(XML_DECLARATION);
        let _ = write!(
            xml,
            "<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">",
            NS_DRAWINGML, NS_OFFICE_RELS, NS_PRESENTATIONML
        );
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str("<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>");

        for ph in &self.placeholders {
            match &ph.content {
                Content::Picture { picture, crop } => match image_rel(ph.shape_id) {
                    Some(rel_id) => write_picture(&mut xml, ph, picture, crop, &rel_id),
                    None => write_shape(&mut xml, ph, None),
                },
                Content::Text(text) => write_shape(&mut xml, ph, Some(text)),
                Content::Empty => write_shape(&mut xml, ph, None),
            }
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        xml
    }
}

fn write_ph(xml: &mut String, format: &PlaceholderFormat) {
    xml.push_str("<p:ph");
    if let Some(ty) = format.kind.type_attr().or(format.raw_type.as_deref()) {
        let _ = write!(xml, " type=\"{}\"", escape(ty));
    }
    if let Some(orient) = &format.orient {
        let _ = write!(xml, " orient=\"{}\"", escape(orient));
    }
    if let Some(size) = &format.size {
        let _ = write!(xml, " sz=\"{}\"", escape(size));
    }
    if format.idx != 0 {
        let _ = write!(xml, " idx=\"{}\"", format.idx);
    }
    xml.push_str("/>");
}

fn write_shape(xml: &mut String, ph: &Placeholder, text: Option<&str>) {
    let _ = write!(
        xml,
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr>",
        ph.shape_id,
        escape(&ph.name)
    );
    write_ph(xml, &ph.format);
    xml.push_str("</p:nvPr></p:nvSpPr><p:spPr/>");

    match text {
        Some(text) => {
            xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
            for line in text.split('\n') {
                if line.is_empty() {
                    xml.push_str("<a:p/>");
                } else {
                    let _ = write!(
                        xml,
                        "<a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>{}</a:t></a:r></a:p>",
                        escape(line)
                    );
                }
            }
            xml.push_str("</p:txBody>");
        }
        None if ph.format.kind.has_text_frame() => {
            xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>");
        }
        None => {}
    }

    xml.push_str("</p:sp>");
}

/// Crop fraction in thousandths of a percent, as `a:srcRect` expects.
fn crop_attr(value: f64) -> i64 {
    (value * 100_000.0).round() as i64
}

fn write_picture(xml: &mut String, ph: &Placeholder, picture: &Picture, crop: &Crop, rel_id: &str) {
    let _ = write!(
        xml,
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{}\" name=\"{}\" descr=\"{}\"/><p:cNvPicPr><a:picLocks noGrp=\"1\" noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr>",
        ph.shape_id,
        escape(&ph.name),
        escape(picture.file_name())
    );
    write_ph(xml, &ph.format);
    let _ = write!(xml, "</p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed=\"{}\"/>", escape(rel_id));

    if !crop.is_none() {
        xml.push_str("<a:srcRect");
        for (name, value) in [("l", crop.left), ("t", crop.top), ("r", crop.right), ("b", crop.bottom)] {
            if value != 0.0 {
                let _ = write!(xml, " {}=\"{}\"", name, crop_attr(value));
            }
        }
        xml.push_str("/>");
    }

    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutPlaceholder;

    fn layout() -> SlideLayout {
        let ph = |shape_id, name: &str, idx, kind| LayoutPlaceholder {
            shape_id,
            name: name.to_string(),
            format: PlaceholderFormat::new(idx, kind),
            extent: Some(Extent { cx: 100, cy: 100 }),
        };
        SlideLayout {
            index: 1,
            part_name: "ppt/slideLayouts/slideLayout2.xml".to_string(),
            name: "StudentLayout".to_string(),
            error: None,
            placeholders: vec![
                ph(7, "Picture Placeholder 2", 10, PlaceholderKind::Picture),
                ph(8, "Date Placeholder 3", 13, PlaceholderKind::Date),
                ph(9, "Name & Title", 11, PlaceholderKind::Body),
                ph(10, "USN", 12, PlaceholderKind::Body),
            ],
        }
    }

    fn png(width: u32, height: u32) -> Picture {
        let img = image::RgbImage::new(width, height);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Picture::from_bytes(out.into_inner(), "a.png").unwrap()
    }

    #[test]
    fn test_from_layout_skips_layout_only_placeholders() {
        let slide = Slide::from_layout(&layout());
        let idxs: Vec<u32> = slide.placeholders().iter().map(|p| p.idx()).collect();
        assert_eq!(idxs, vec![10, 11, 12]);
        let ids: Vec<u32> = slide.placeholders().iter().map(|p| p.shape_id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_placeholder_lookup_is_typed() {
        let mut slide = Slide::from_layout(&layout());
        assert!(matches!(slide.placeholder(10), Slot::Image(_)));
        assert!(matches!(slide.placeholder(11), Slot::Text(_)));
        assert!(matches!(slide.placeholder(13), Slot::NotFound));
        assert!(matches!(slide.placeholder(99), Slot::NotFound));
    }

    #[test]
    fn test_set_text_and_serialize() {
        let mut slide = Slide::from_layout(&layout());
        match slide.placeholder(11) {
            Slot::Text(slot) => slot.set_text("ANN & LEE"),
            other => panic!("expected text slot, got {:?}", other),
        }
        assert_eq!(slide.placeholders()[1].text(), Some("ANN & LEE"));

        let xml = slide.to_xml(|_| None);
        assert!(xml.contains("<a:t>ANN &amp; LEE</a:t>"));
        assert!(xml.contains("name=\"Name &amp; Title\""));
        assert!(xml.contains("<p:ph type=\"pic\" idx=\"10\"/>"));
        assert!(!xml.contains("<p:pic>"));
    }

    #[test]
    fn test_multiline_text_becomes_paragraphs() {
        let mut slide = Slide::from_layout(&layout());
        if let Slot::Text(slot) = slide.placeholder(12) {
            slot.set_text("A\n\nB");
        }
        let xml = slide.to_xml(|_| None);
        assert!(xml.contains("<a:t>A</a:t></a:r></a:p><a:p/><a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>B</a:t>"));
    }

    #[test]
    fn test_insert_picture_writes_cropped_pic() {
        let mut slide = Slide::from_layout(&layout());
        match slide.placeholder(10) {
            Slot::Image(slot) => slot.insert_picture(png(200, 100)),
            other => panic!("expected image slot, got {:?}", other),
        }
        assert_eq!(slide.pictures().count(), 1);

        let xml = slide.to_xml(|id| (id == 2).then(|| "rId2".to_string()));
        assert!(xml.contains("<p:pic><p:nvPicPr><p:cNvPr id=\"2\" name=\"Picture Placeholder 2\" descr=\"a.png\"/>"));
        assert!(xml.contains("<a:blip r:embed=\"rId2\"/><a:srcRect l=\"25000\" r=\"25000\"/>"));
    }
}
