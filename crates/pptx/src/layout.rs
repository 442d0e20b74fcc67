//! Slide layouts and the placeholders they define.

use crate::xml::{attr, local_name, xml_error};
use deck_core::{Error, Extent, PlaceholderFormat, PlaceholderKind, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A placeholder as defined on a layout or master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlaceholder {
    /// `cNvPr/@id` on the layout.
    pub shape_id: u32,

    /// `cNvPr/@name`, e.g. "Picture Placeholder 2".
    pub name: String,

    /// The `<p:ph>` attributes.
    pub format: PlaceholderFormat,

    /// Size from the shape's own transform, or inherited from the master.
    pub extent: Option<Extent>,
}

/// A named slide layout from the template's first slide master.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    pub(crate) index: usize,
    pub(crate) part_name: String,
    pub(crate) name: String,
    pub(crate) placeholders: Vec<LayoutPlaceholder>,
    /// Set when the layout part could not be parsed.
    pub(crate) error: Option<String>,
}

impl SlideLayout {
    /// Position in the master's layout list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Layout name as shown in PowerPoint (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Part name inside the package, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// Placeholders declared directly on the layout, in document order.
    pub fn placeholders(&self) -> &[LayoutPlaceholder] {
        &self.placeholders
    }

    /// Why the layout part could not be read, if it could not.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fails with `LayoutUnreadable` for a layout whose part did not parse.
    pub fn ensure_readable(&self) -> Result<&Self> {
        match &self.error {
            Some(reason) => Err(Error::LayoutUnreadable {
                name: self.name.clone(),
                reason: reason.clone(),
            }),
            None => Ok(self),
        }
    }
}

/// Name and placeholders of a layout or master part.
#[derive(Debug, Default)]
pub(crate) struct ShapeTree {
    pub name: String,
    pub placeholders: Vec<LayoutPlaceholder>,
}

impl ShapeTree {
    /// Fill in missing extents from the master's placeholders.
    pub fn inherit_extents(&mut self, master: &ShapeTree) {
        for ph in self.placeholders.iter_mut().filter(|ph| ph.extent.is_none()) {
            let base = master_kind(ph.format.kind);
            ph.extent = master
                .placeholders
                .iter()
                .find(|m| master_kind(m.format.kind) == base)
                .and_then(|m| m.extent);
        }
    }
}

/// The master placeholder kind a layout placeholder inherits from.
fn master_kind(kind: PlaceholderKind) -> PlaceholderKind {
    match kind {
        PlaceholderKind::Title | PlaceholderKind::CenterTitle => PlaceholderKind::Title,
        PlaceholderKind::Date => PlaceholderKind::Date,
        PlaceholderKind::Footer => PlaceholderKind::Footer,
        PlaceholderKind::SlideNumber => PlaceholderKind::SlideNumber,
        _ => PlaceholderKind::Body,
    }
}

/// Builder for one shape while its XML is being read.
#[derive(Debug, Default)]
struct ShapeInfo {
    id: u32,
    name: String,
    format: Option<PlaceholderFormat>,
    extent: Option<Extent>,
}

fn is_shape(name: &[u8]) -> bool {
    matches!(name, b"sp" | b"pic" | b"graphicFrame" | b"cxnSp")
}

/// Read the `<p:ph>` element.
pub(crate) fn placeholder_format(e: &BytesStart<'_>) -> PlaceholderFormat {
    let raw_type = attr(e, "type");
    let kind = PlaceholderKind::from_type_attr(raw_type.as_deref());
    PlaceholderFormat {
        idx: attr(e, "idx").and_then(|v| v.parse().ok()).unwrap_or(0),
        kind,
        raw_type: raw_type.filter(|_| kind == PlaceholderKind::Unknown),
        orient: attr(e, "orient"),
        size: attr(e, "sz"),
    }
}

/// Parse the top-level placeholders of a layout or master part.
///
/// Only direct children of `spTree` are considered; shapes nested in
/// groups are not placeholders a slide can inherit.
pub(crate) fn parse_shape_tree(xml: &str) -> Result<ShapeTree> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut tree = ShapeTree::default();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<ShapeInfo> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing shape tree", e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                let parent = stack.last().map(Vec::as_slice);

                if local == b"cSld" {
                    tree.name = attr(e, "name").unwrap_or_default();
                } else if is_shape(local) && parent == Some(b"spTree".as_slice()) {
                    current = Some(ShapeInfo::default());
                } else if let Some(shape) = current.as_mut() {
                    match local {
                        b"cNvPr" if shape.id == 0 => {
                            shape.id = attr(e, "id").and_then(|v| v.parse().ok()).unwrap_or(0);
                            shape.name = attr(e, "name").unwrap_or_default();
                        }
                        b"ph" if shape.format.is_none() => {
                            shape.format = Some(placeholder_format(e));
                        }
                        b"ext" if parent == Some(b"xfrm".as_slice()) && shape.extent.is_none() => {
                            let cx = attr(e, "cx").and_then(|v| v.parse().ok());
                            let cy = attr(e, "cy").and_then(|v| v.parse().ok());
                            if let (Some(cx), Some(cy)) = (cx, cy) {
                                shape.extent = Some(Extent { cx, cy });
                            }
                        }
                        _ => {}
                    }
                }

                if matches!(event, Event::Start(_)) {
                    stack.push(local.to_vec());
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                stack.pop();
                if is_shape(local) && stack.last().map(Vec::as_slice) == Some(b"spTree".as_slice()) {
                    if let Some(shape) = current.take() {
                        if let Some(format) = shape.format {
                            tree.placeholders.push(LayoutPlaceholder {
                                shape_id: shape.id,
                                name: shape.name,
                                format,
                                extent: shape.extent,
                            });
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tree)
}

/// The `cSld` name of a part that may not parse as a whole.
pub(crate) fn layout_name(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"cSld" => {
                return attr(e, "name");
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Relationship ids listed in a master's `sldLayoutIdLst`, in order.
pub(crate) fn layout_rel_ids(master_xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(master_xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldLayoutId" =>
            {
                if let Some(rid) = crate::xml::prefixed_attr(e, "id") {
                    ids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing slide master", e)),
            _ => {}
        }
    }

    Ok(ids)
}
