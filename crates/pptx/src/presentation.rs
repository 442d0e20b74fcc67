//! An editable presentation opened from a template.

use crate::content_types::{ContentTypes, CT_SLIDE};
use crate::layout::{layout_name, layout_rel_ids, parse_shape_tree, SlideLayout};
use crate::package::{
    part_number, rels_path_for, relative_target, resolve_target, Package, CONTENT_TYPES_PART,
};
use crate::reader::{contents_of, read_placeholders, SlideContent};
use crate::rels::{
    Relationships, RT_IMAGE, RT_OFFICE_DOCUMENT, RT_SLIDE, RT_SLIDE_LAYOUT, RT_SLIDE_MASTER,
};
use crate::slide::{Slide, SlideId};
use crate::xml::{attr, local_name, part_text, prefixed_attr, xml_error};
use deck_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

const SLIDE_PART_PREFIX: &str = "ppt/slides/slide";
const MEDIA_PART_PREFIX: &str = "ppt/media/image";
const FIRST_SLIDE_ID: u32 = 256;

/// Slide bodies: either untouched template XML or a slide built in memory.
#[derive(Debug, Clone)]
enum SlideBody {
    Stored,
    Generated(Slide),
}

#[derive(Debug, Clone)]
struct SlideEntry {
    id: SlideId,
    rel_id: String,
    part_name: String,
    body: SlideBody,
}

/// A presentation document held entirely in memory.
#[derive(Debug, Clone)]
pub struct Presentation {
    package: Package,
    content_types: ContentTypes,
    main_part: String,
    rels: Relationships,
    layouts: Vec<SlideLayout>,
    slides: Vec<SlideEntry>,
}

impl Presentation {
    /// Open a `.pptx` file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingFile {
                what: "Template",
                path: path.to_path_buf(),
            });
        }

        let template_error = |e: Error| match e {
            Error::MissingFile { .. } | Error::TemplateError { .. } => e,
            other => Error::TemplateError {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        };

        let file = File::open(path).map_err(|e| template_error(e.into()))?;
        Self::from_reader(BufReader::new(file)).map_err(template_error)
    }

    /// Parse a presentation package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::from_reader(reader)?;

        let content_types = ContentTypes::parse(part_text(
            CONTENT_TYPES_PART,
            package.part(CONTENT_TYPES_PART)?,
        )?)?;

        let main_part = main_part_name(&package)?;
        let is_presentation = content_types
            .content_type_of(&main_part)
            .map(|ct| ct.contains("presentationml"))
            .unwrap_or(false);
        if !is_presentation {
            return Err(Error::CorruptedPackage(format!(
                "'{}' is not a presentation part",
                main_part
            )));
        }

        let rels = Relationships::of_part(&package, &main_part)?;
        let listing = read_presentation_lists(part_text(&main_part, package.part(&main_part)?)?)?;

        let layouts = match listing.master_rel_ids.first() {
            Some(rid) => {
                let rel = rels.get(rid).ok_or_else(|| {
                    Error::CorruptedPackage(format!("slide master relationship '{}' missing", rid))
                })?;
                load_layouts(&package, &resolve_target(&main_part, &rel.target))?
            }
            None => match rels.first_of_type(RT_SLIDE_MASTER) {
                Some(rel) => load_layouts(&package, &resolve_target(&main_part, &rel.target))?,
                None => Vec::new(),
            },
        };

        let mut slides = Vec::with_capacity(listing.slides.len());
        for (id, rel_id) in listing.slides {
            let rel = rels.get(&rel_id).ok_or_else(|| {
                Error::CorruptedPackage(format!("slide relationship '{}' missing", rel_id))
            })?;
            slides.push(SlideEntry {
                id: SlideId(id),
                rel_id,
                part_name: resolve_target(&main_part, &rel.target),
                body: SlideBody::Stored,
            });
        }

        log::debug!(
            "Opened presentation with {} layouts and {} slides",
            layouts.len(),
            slides.len()
        );

        Ok(Self {
            package,
            content_types,
            main_part,
            rels,
            layouts,
            slides,
        })
    }

    /// Layouts of the first slide master, in master order.
    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Layout names in collection order.
    pub fn layout_names(&self) -> Vec<String> {
        self.layouts.iter().map(|l| l.name().to_string()).collect()
    }

    /// Find a layout by exact name.
    pub fn layout_by_name(&self, name: &str) -> Option<&SlideLayout> {
        self.layouts.iter().find(|l| l.name() == name)
    }

    /// Like [`Presentation::layout_by_name`], but reports the available
    /// names when the layout does not exist and fails when its part could
    /// not be read.
    pub fn require_layout(&self, name: &str) -> Result<&SlideLayout> {
        self.layout_by_name(name)
            .ok_or_else(|| Error::LayoutNotFound {
                name: name.to_string(),
                available: self.layout_names(),
            })?
            .ensure_readable()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide ids in presentation order.
    pub fn slide_ids(&self) -> Vec<SlideId> {
        self.slides.iter().map(|s| s.id).collect()
    }

    /// Append a new slide created from the layout at `layout_index`.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<SlideId> {
        let layout = self
            .layouts
            .get(layout_index)
            .ok_or_else(|| {
                Error::CorruptedPackage(format!("no slide layout at index {}", layout_index))
            })?
            .ensure_readable()?;
        let slide = Slide::from_layout(layout);

        let id = SlideId(
            self.slides
                .iter()
                .map(|s| s.id.0 + 1)
                .max()
                .unwrap_or(FIRST_SLIDE_ID)
                .max(FIRST_SLIDE_ID),
        );
        let part_name = self.next_slide_part_name();
        let rel_id = self
            .rels
            .add(RT_SLIDE, relative_target(&self.main_part, &part_name));

        log::debug!("Added slide {} as '{}' ({})", id.0, part_name, rel_id);
        self.slides.push(SlideEntry {
            id,
            rel_id,
            part_name,
            body: SlideBody::Generated(slide),
        });
        Ok(id)
    }

    /// A slide created by [`Presentation::add_slide`], for editing.
    ///
    /// Slides that came with the template are not editable.
    pub fn slide_mut(&mut self, id: SlideId) -> Option<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| match &mut s.body {
                SlideBody::Generated(slide) => Some(slide),
                SlideBody::Stored => None,
            })
    }

    /// Remove a slide from the slide list and drop its parts.
    ///
    /// Returns `false` when the slide is not in the slide list.
    pub fn remove_slide(&mut self, id: SlideId) -> bool {
        let Some(pos) = self.slides.iter().position(|s| s.id == id) else {
            return false;
        };
        let entry = self.slides.remove(pos);
        self.rels.remove(&entry.rel_id);

        if let SlideBody::Stored = entry.body {
            self.package.remove_part(&entry.part_name);
            self.package.remove_part(&rels_path_for(&entry.part_name));
            self.content_types.remove_override(&entry.part_name);
        }
        log::debug!("Removed slide {}", id.0);
        true
    }

    /// Placeholder contents of every slide, in order.
    pub fn slide_contents(&self) -> Result<Vec<SlideContent>> {
        self.slides
            .iter()
            .map(|entry| match &entry.body {
                SlideBody::Generated(slide) => Ok(SlideContent {
                    id: entry.id,
                    layout_name: self.layout_name_for_part(slide.layout_part()),
                    placeholders: contents_of(slide),
                }),
                SlideBody::Stored => {
                    let xml = part_text(&entry.part_name, self.package.part(&entry.part_name)?)?;
                    let layout_name = Relationships::of_part(&self.package, &entry.part_name)?
                        .first_of_type(RT_SLIDE_LAYOUT)
                        .map(|rel| resolve_target(&entry.part_name, &rel.target))
                        .and_then(|part| self.layout_name_for_part(&part));
                    Ok(SlideContent {
                        id: entry.id,
                        layout_name,
                        placeholders: read_placeholders(xml)?,
                    })
                }
            })
            .collect()
    }

    /// Serialize the whole document as `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut package = self.package.clone();
        let mut content_types = self.content_types.clone();
        let mut next_media = next_part_number(&package, MEDIA_PART_PREFIX);

        for entry in &self.slides {
            let SlideBody::Generated(slide) = &entry.body else {
                continue;
            };

            let mut slide_rels = Relationships::new();
            slide_rels.add(
                RT_SLIDE_LAYOUT,
                relative_target(&entry.part_name, slide.layout_part()),
            );

            let mut picture_rels = Vec::new();
            for (shape_id, picture) in slide.pictures() {
                let ext = picture.format().extension();
                let media_part = format!("{}{}.{}", MEDIA_PART_PREFIX, next_media, ext);
                next_media += 1;

                package.set_part(media_part.clone(), picture.bytes().to_vec());
                content_types.ensure_default(ext, picture.format().content_type());
                let rel_id = slide_rels.add(RT_IMAGE, relative_target(&entry.part_name, &media_part));
                picture_rels.push((shape_id, rel_id));
            }

            let xml = slide.to_xml(|shape_id| {
                picture_rels
                    .iter()
                    .find(|(id, _)| *id == shape_id)
                    .map(|(_, rel)| rel.clone())
            });
            package.set_part(entry.part_name.clone(), xml.into_bytes());
            package.set_part(rels_path_for(&entry.part_name), slide_rels.to_xml().into_bytes());
            content_types.set_override(&entry.part_name, CT_SLIDE);
        }

        let slide_list: Vec<(u32, &str)> = self
            .slides
            .iter()
            .map(|s| (s.id.0, s.rel_id.as_str()))
            .collect();
        let main_xml = part_text(&self.main_part, self.package.part(&self.main_part)?)?;
        package.set_part(self.main_part.clone(), rewrite_slide_list(main_xml, &slide_list)?);
        package.set_part(rels_path_for(&self.main_part), self.rels.to_xml().into_bytes());
        package.set_part(CONTENT_TYPES_PART, content_types.to_xml().into_bytes());

        package.to_bytes()
    }

    /// Write the document to `path`, consuming it.
    ///
    /// The file is written beside the target and renamed into place, so a
    /// failed save leaves no partial output.
    pub fn save(self, path: &Path) -> Result<()> {
        let save_error = |reason: String| Error::SaveError {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = self.to_bytes().map_err(|e| save_error(e.to_string()))?;

        let temp_path = temp_path_for(path);
        if let Err(e) = fs::write(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(save_error(e.to_string()));
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(save_error(e.to_string()));
        }

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn layout_name_for_part(&self, part_name: &str) -> Option<String> {
        self.layouts
            .iter()
            .find(|l| l.part_name() == part_name)
            .map(|l| l.name().to_string())
    }

    fn next_slide_part_name(&self) -> String {
        let taken = |n: u32| {
            let name = format!("{}{}.xml", SLIDE_PART_PREFIX, n);
            self.package.contains(&name) || self.slides.iter().any(|s| s.part_name == name)
        };
        let n = (1..).find(|n| !taken(*n)).unwrap_or(1);
        format!("{}{}.xml", SLIDE_PART_PREFIX, n)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn next_part_number(package: &Package, prefix: &str) -> u32 {
    package
        .part_names()
        .filter_map(|name| part_number(name, prefix))
        .max()
        .map_or(1, |n| n + 1)
}

/// The package's main part, from the package-level relationships.
fn main_part_name(package: &Package) -> Result<String> {
    let rels = Relationships::of_part(package, "")?;
    let rel = rels.first_of_type(RT_OFFICE_DOCUMENT).ok_or_else(|| {
        Error::CorruptedPackage("package has no main document relationship".to_string())
    })?;
    Ok(resolve_target("", &rel.target))
}

/// Slide masters and slides listed in `presentation.xml`.
#[derive(Debug, Default)]
struct PresentationLists {
    master_rel_ids: Vec<String>,
    slides: Vec<(u32, String)>,
}

fn read_presentation_lists(xml: &str) -> Result<PresentationLists> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut lists = PresentationLists::default();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sldMasterId" => {
                    if let Some(rid) = prefixed_attr(e, "id") {
                        lists.master_rel_ids.push(rid);
                    }
                }
                b"sldId" => {
                    let id = attr(e, "id").and_then(|v| v.parse().ok());
                    if let (Some(id), Some(rid)) = (id, prefixed_attr(e, "id")) {
                        lists.slides.push((id, rid));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing presentation", e)),
            _ => {}
        }
    }

    Ok(lists)
}

/// Layouts of the first master, in list order. A layout whose part is
/// missing or does not parse is kept with its error so that the others stay
/// usable.
fn load_layouts(package: &Package, master_part: &str) -> Result<Vec<SlideLayout>> {
    let master_xml = part_text(master_part, package.part(master_part)?)?;
    let master = parse_shape_tree(master_xml)?;
    let master_rels = Relationships::of_part(package, master_part)?;

    let mut layouts = Vec::new();
    for rid in layout_rel_ids(master_xml)? {
        let Some(rel) = master_rels.get(&rid) else {
            log::warn!("Slide master references missing layout relationship '{}'", rid);
            continue;
        };
        let part_name = resolve_target(master_part, &rel.target);
        let index = layouts.len();

        let tree = package
            .part(&part_name)
            .and_then(|bytes| part_text(&part_name, bytes))
            .and_then(parse_shape_tree);
        let layout = match tree {
            Ok(mut tree) => {
                tree.inherit_extents(&master);
                SlideLayout {
                    index,
                    part_name,
                    name: tree.name,
                    placeholders: tree.placeholders,
                    error: None,
                }
            }
            Err(e) => {
                let name = package
                    .get(&part_name)
                    .and_then(|bytes| std::str::from_utf8(bytes).ok())
                    .and_then(layout_name)
                    .unwrap_or_default();
                log::warn!("Slide layout '{}' ({}) could not be read: {}", name, part_name, e);
                SlideLayout {
                    index,
                    part_name,
                    name,
                    placeholders: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        layouts.push(layout);
    }

    Ok(layouts)
}

/// Replace the `sldIdLst` of `presentation.xml`, inserting it in schema
/// position when the template has none.
fn rewrite_slide_list(xml: &str, slides: &[(u32, &str)]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let write_err = |e: quick_xml::Error| xml_error("Error writing presentation", e);

    let mut prefix = String::from("p");
    let mut depth = 0usize;
    let mut skipping = false;
    let mut written = false;

    let write_list = |writer: &mut Writer<Cursor<Vec<u8>>>, prefix: &str| -> Result<()> {
        if slides.is_empty() {
            return Ok(());
        }
        let list = format!("{}:sldIdLst", prefix);
        let item = format!("{}:sldId", prefix);
        writer
            .write_event(Event::Start(BytesStart::new(list.as_str())))
            .map_err(write_err)?;
        for (id, rel_id) in slides {
            let id = id.to_string();
            let elem = BytesStart::new(item.as_str())
                .with_attributes([("id", id.as_str()), ("r:id", *rel_id)]);
            writer.write_event(Event::Empty(elem)).map_err(write_err)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(list.as_str())))
            .map_err(write_err)?;
        Ok(())
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing presentation", e))?;
        match event {
            Event::Eof => break,
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                let qname = e.name();
                let local = local_name(qname.as_ref());

                if skipping {
                    if is_start {
                        depth += 1;
                    }
                    continue;
                }

                if depth == 0 {
                    if let Some(p) = qname.prefix() {
                        prefix = String::from_utf8_lossy(p.as_ref()).into_owned();
                    }
                } else if depth == 1 && !written {
                    if local == b"sldIdLst" {
                        write_list(&mut writer, &prefix)?;
                        written = true;
                        if is_start {
                            skipping = true;
                            depth += 1;
                        }
                        continue;
                    }
                    if !matches!(
                        local,
                        b"sldMasterIdLst" | b"notesMasterIdLst" | b"handoutMasterIdLst"
                    ) {
                        write_list(&mut writer, &prefix)?;
                        written = true;
                    }
                }

                if is_start {
                    depth += 1;
                }
                writer.write_event(event.borrow()).map_err(write_err)?;
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if skipping {
                    if depth == 1 && local_name(e.name().as_ref()) == b"sldIdLst" {
                        skipping = false;
                    }
                    continue;
                }
                if depth == 0 && !written {
                    write_list(&mut writer, &prefix)?;
                    written = true;
                }
                writer.write_event(event.borrow()).map_err(write_err)?;
            }
            other => {
                if !skipping {
                    writer.write_event(other).map_err(write_err)?;
                }
            }
        }
    }

    Ok(writer.into_inner().into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{LayoutSpec, TemplateBuilder};
    use crate::slide::Slot;
    use crate::picture::Picture;
    use deck_core::PlaceholderKind;

    fn student_template() -> Vec<u8> {
        TemplateBuilder::new()
            .layout(LayoutSpec::new("Title Slide").title().body(1, "Subtitle 2"))
            .layout(
                LayoutSpec::new("StudentLayout")
                    .picture(10, "Picture Placeholder 1", 3_000_000, 4_000_000)
                    .body(11, "Text Placeholder 2")
                    .body(12, "Text Placeholder 3")
                    .footer(13),
            )
            .build()
    }

    fn png(width: u32, height: u32) -> Picture {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Picture::from_bytes(out.into_inner(), "photo.png").unwrap()
    }

    #[test]
    fn test_layouts_in_master_order() {
        let pres = Presentation::from_reader(Cursor::new(student_template())).unwrap();
        assert_eq!(pres.layout_names(), vec!["Title Slide", "StudentLayout"]);
        assert_eq!(pres.layouts()[1].index(), 1);
        assert_eq!(pres.slide_count(), 0);

        let student = pres.require_layout("StudentLayout").unwrap();
        let idxs: Vec<u32> = student.placeholders().iter().map(|p| p.format.idx).collect();
        assert_eq!(idxs, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_require_layout_lists_names() {
        let pres = Presentation::from_reader(Cursor::new(student_template())).unwrap();
        match pres.require_layout("Nope") {
            Err(Error::LayoutNotFound { name, available }) => {
                assert_eq!(name, "Nope");
                assert_eq!(available, vec!["Title Slide", "StudentLayout"]);
            }
            other => panic!("unexpected {:?}", other.map(|l| l.name().to_string())),
        }
    }

    #[test]
    fn test_unparsable_layout_is_kept_with_its_error() {
        let mut package = Package::from_reader(Cursor::new(student_template())).unwrap();
        package.set_part(
            "ppt/slideLayouts/slideLayout1.xml",
            br#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="Title Slide"><p:spTree><p:sp></p:cSld></p:sldLayout>"#.to_vec(),
        );
        let mut pres = Presentation::from_reader(Cursor::new(package.to_bytes().unwrap())).unwrap();

        assert_eq!(pres.layout_names(), vec!["Title Slide", "StudentLayout"]);
        assert!(pres.layouts()[0].error().is_some());
        assert!(pres.layouts()[1].error().is_none());

        assert!(matches!(pres.add_slide(0), Err(Error::LayoutUnreadable { .. })));
        assert!(matches!(
            pres.require_layout("Title Slide"),
            Err(Error::LayoutUnreadable { .. })
        ));
        assert_eq!(pres.slide_count(), 0);
        assert!(pres.add_slide(1).is_ok());
    }

    #[test]
    fn test_add_populate_save_and_reopen() {
        let mut pres = Presentation::from_reader(Cursor::new(student_template())).unwrap();
        let first = pres.add_slide(1).unwrap();
        let second = pres.add_slide(1).unwrap();
        assert_eq!(first, SlideId(256));
        assert_eq!(second, SlideId(257));

        let slide = pres.slide_mut(first).unwrap();
        if let Slot::Text(slot) = slide.placeholder(11) {
            slot.set_text("ANN LEE");
        }
        if let Slot::Image(slot) = slide.placeholder(10) {
            slot.insert_picture(png(8, 8));
        }
        let slide = pres.slide_mut(second).unwrap();
        if let Slot::Text(slot) = slide.placeholder(12) {
            slot.set_text("1RV20CS002");
        }

        let bytes = pres.to_bytes().unwrap();
        let reopened = Presentation::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reopened.slide_ids(), vec![SlideId(256), SlideId(257)]);
        assert!(reopened.package.contains("ppt/media/image1.png"));
        assert_eq!(
            reopened.content_types.content_type_of("ppt/media/image1.png"),
            Some("image/png")
        );

        let contents = reopened.slide_contents().unwrap();
        assert_eq!(contents[0].layout_name.as_deref(), Some("StudentLayout"));
        assert_eq!(contents[0].placeholder(11).unwrap().text, "ANN LEE");
        assert!(contents[0].placeholder(10).unwrap().has_picture);
        assert!(contents[0].placeholder(13).is_none());
        assert!(!contents[1].placeholder(10).unwrap().has_picture);
        assert_eq!(contents[1].placeholder(12).unwrap().text, "1RV20CS002");
        assert_eq!(contents[1].placeholder(10).unwrap().kind, PlaceholderKind::Picture);
    }

    #[test]
    fn test_remove_slide() {
        let mut pres = Presentation::from_reader(Cursor::new(student_template())).unwrap();
        let id = pres.add_slide(0).unwrap();
        assert_eq!(pres.slide_count(), 1);
        assert!(pres.remove_slide(id));
        assert_eq!(pres.slide_count(), 0);
        assert!(!pres.remove_slide(id));

        // The removed slide's relationship id is free again.
        let again = pres.add_slide(0).unwrap();
        assert_eq!(again, SlideId(256));
        let reopened = Presentation::from_reader(Cursor::new(pres.to_bytes().unwrap())).unwrap();
        assert_eq!(reopened.slide_count(), 1);
    }

    #[test]
    fn test_template_slides_survive_and_new_ids_follow() {
        let template = TemplateBuilder::new()
            .layout(LayoutSpec::new("Title Slide").title())
            .existing_slide(0, "Welcome")
            .build();
        let mut pres = Presentation::from_reader(Cursor::new(template)).unwrap();
        assert_eq!(pres.slide_count(), 1);
        assert!(pres.slide_mut(SlideId(256)).is_none());

        let id = pres.add_slide(0).unwrap();
        assert_eq!(id, SlideId(257));
        assert!(pres.next_slide_part_name().ends_with("slide3.xml"));

        let reopened = Presentation::from_reader(Cursor::new(pres.to_bytes().unwrap())).unwrap();
        let contents = reopened.slide_contents().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].placeholder(0).unwrap().text, "Welcome");
        assert_eq!(contents[1].layout_name.as_deref(), Some("Title Slide"));
    }

    #[test]
    fn test_rewrite_inserts_missing_list_before_slide_size() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="p" xmlns:r="r"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldSz cx="1" cy="2"/></p:presentation>"#;
        let out = String::from_utf8(rewrite_slide_list(xml, &[(256, "rId3")]).unwrap()).unwrap();
        assert!(out.contains(
            r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId3"/></p:sldIdLst><p:sldSz cx="1" cy="2"/>"#
        ));
    }

    #[test]
    fn test_rewrite_replaces_existing_list() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="1" cy="2"/></p:presentation>"#;
        let out = String::from_utf8(rewrite_slide_list(xml, &[]).unwrap()).unwrap();
        assert_eq!(
            out,
            r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldSz cx="1" cy="2"/></p:presentation>"#
        );
    }

    #[test]
    fn test_open_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("template.pptx");
        assert!(matches!(
            Presentation::open(&missing),
            Err(Error::MissingFile { .. })
        ));

        fs::write(&missing, b"not a zip").unwrap();
        assert!(matches!(
            Presentation::open(&missing),
            Err(Error::TemplateError { .. })
        ));
    }

    #[test]
    fn test_save_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let pres = Presentation::from_reader(Cursor::new(student_template())).unwrap();
        let target = dir.path().join("no_such_dir").join("out.pptx");
        assert!(matches!(pres.save(&target), Err(Error::SaveError { .. })));
        assert!(!target.exists());
        assert!(!temp_path_for(&target).exists());
    }
}
