//! In-code template builder for tests.
//!
//! Produces the smallest package this crate can open: presentation, one
//! slide master, its layouts and optional pre-existing slides. No theme
//! part is written, so PowerPoint itself may refuse these files.

use crate::package::{Package, CONTENT_TYPES_PART};
use crate::xml::escape;
use std::fmt::Write as _;
use std::path::Path;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

#[derive(Debug, Clone)]
struct PlaceholderSpec {
    type_token: Option<&'static str>,
    idx: u32,
    name: String,
    extent: Option<(i64, i64)>,
}

/// One layout to put in the template.
#[derive(Debug, Clone)]
pub struct LayoutSpec {
    name: String,
    placeholders: Vec<PlaceholderSpec>,
}

impl LayoutSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            placeholders: Vec::new(),
        }
    }

    /// Add a placeholder with an explicit `type` token (`None` for `obj`).
    pub fn placeholder(
        mut self,
        type_token: Option<&'static str>,
        idx: u32,
        name: &str,
        extent: Option<(i64, i64)>,
    ) -> Self {
        self.placeholders.push(PlaceholderSpec {
            type_token,
            idx,
            name: name.to_string(),
            extent,
        });
        self
    }

    /// A title placeholder (idx 0) that inherits its size from the master.
    pub fn title(self) -> Self {
        self.placeholder(Some("title"), 0, "Title 1", None)
    }

    pub fn body(self, idx: u32, name: &str) -> Self {
        self.placeholder(Some("body"), idx, name, None)
    }

    pub fn picture(self, idx: u32, name: &str, cx: i64, cy: i64) -> Self {
        self.placeholder(Some("pic"), idx, name, Some((cx, cy)))
    }

    pub fn footer(self, idx: u32) -> Self {
        self.placeholder(Some("ftr"), idx, "Footer Placeholder", None)
    }
}

/// Builder for a minimal `.pptx` template.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    layouts: Vec<LayoutSpec>,
    slides: Vec<(usize, String)>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: LayoutSpec) -> Self {
        self.layouts.push(layout);
        self
    }

    /// A slide already present in the template, with `title` in its title
    /// placeholder.
    pub fn existing_slide(mut self, layout_index: usize, title: &str) -> Self {
        self.slides.push((layout_index, title.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut package = Package::default();

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        let mut override_part = |part: &str, ct: &str| {
            let _ = write!(
                types,
                r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.presentationml.{}+xml"/>"#,
                part, ct
            );
        };
        override_part("ppt/presentation.xml", "presentation.main");
        override_part("ppt/slideMasters/slideMaster1.xml", "slideMaster");
        for i in 1..=self.layouts.len() {
            override_part(&format!("ppt/slideLayouts/slideLayout{}.xml", i), "slideLayout");
        }
        for i in 1..=self.slides.len() {
            override_part(&format!("ppt/slides/slide{}.xml", i), "slide");
        }
        types.push_str("</Types>");
        package.set_part(CONTENT_TYPES_PART, types.into_bytes());

        package.set_part(
            "_rels/.rels",
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml".to_string())]).into_bytes(),
        );

        // Presentation: rId1 is the master, slides follow.
        let mut pres_rels = vec![("rId1", "slideMaster", "slideMasters/slideMaster1.xml".to_string())];
        let slide_rel_ids: Vec<String> = (0..self.slides.len()).map(|i| format!("rId{}", i + 2)).collect();
        let mut sld_ids = String::new();
        for (i, rid) in slide_rel_ids.iter().enumerate() {
            pres_rels.push((rid.as_str(), "slide", format!("slides/slide{}.xml", i + 1)));
            let _ = write!(sld_ids, r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, rid);
        }
        let sld_id_lst = if sld_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{}</p:sldIdLst>", sld_ids)
        };
        package.set_part(
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{}<p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
                NS, sld_id_lst
            )
            .into_bytes(),
        );
        package.set_part("ppt/_rels/presentation.xml.rels", rels(&pres_rels).into_bytes());

        // Master with sized title and body placeholders to inherit from.
        let master_tree = shape_tree(&[
            PlaceholderSpec {
                type_token: Some("title"),
                idx: 0,
                name: "Title Placeholder 1".into(),
                extent: Some((10_515_600, 1_325_563)),
            },
            PlaceholderSpec {
                type_token: Some("body"),
                idx: 1,
                name: "Text Placeholder 2".into(),
                extent: Some((10_515_600, 4_351_338)),
            },
        ], None);
        let layout_rel_ids: Vec<String> = (1..=self.layouts.len()).map(|i| format!("rId{}", i)).collect();
        let mut layout_ids = String::new();
        for (i, rid) in layout_rel_ids.iter().enumerate() {
            let _ = write!(layout_ids, r#"<p:sldLayoutId id="{}" r:id="{}"/>"#, 2_147_483_649u32 + i as u32, rid);
        }
        package.set_part(
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
                NS, master_tree, layout_ids
            )
            .into_bytes(),
        );
        let master_rels: Vec<(&str, &str, String)> = layout_rel_ids
            .iter()
            .enumerate()
            .map(|(i, rid)| (rid.as_str(), "slideLayout", format!("../slideLayouts/slideLayout{}.xml", i + 1)))
            .collect();
        package.set_part("ppt/slideMasters/_rels/slideMaster1.xml.rels", rels(&master_rels).into_bytes());

        for (i, layout) in self.layouts.iter().enumerate() {
            let part = format!("ppt/slideLayouts/slideLayout{}.xml", i + 1);
            package.set_part(
                part,
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {} preserve="1"><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
                    NS,
                    escape(&layout.name),
                    shape_tree(&layout.placeholders, None)
                )
                .into_bytes(),
            );
            package.set_part(
                format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml".to_string())]).into_bytes(),
            );
        }

        for (i, (layout_index, title)) in self.slides.iter().enumerate() {
            let title_ph = PlaceholderSpec {
                type_token: Some("title"),
                idx: 0,
                name: "Title 1".into(),
                extent: None,
            };
            package.set_part(
                format!("ppt/slides/slide{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld>{}</p:cSld></p:sld>"#,
                    NS,
                    shape_tree(std::slice::from_ref(&title_ph), Some(title))
                )
                .into_bytes(),
            );
            package.set_part(
                format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                rels(&[("rId1", "slideLayout", format!("../slideLayouts/slideLayout{}.xml", layout_index + 1))])
                    .into_bytes(),
            );
        }

        match package.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => panic!("fixture template failed to serialize: {}", e),
        }
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

fn rels(entries: &[(&str, &str, String)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_NS, kind, target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn shape_tree(placeholders: &[PlaceholderSpec], text: Option<&str>) -> String {
    let mut xml = String::from(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    );
    for (i, ph) in placeholders.iter().enumerate() {
        let mut ph_elem = String::from("<p:ph");
        if let Some(token) = ph.type_token {
            let _ = write!(ph_elem, r#" type="{}""#, token);
        }
        if ph.idx != 0 {
            let _ = write!(ph_elem, r#" idx="{}""#, ph.idx);
        }
        ph_elem.push_str("/>");

        let sp_pr = match ph.extent {
            Some((cx, cy)) => format!(
                r#"<p:spPr><a:xfrm><a:off x="838200" y="365125"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
                cx, cy
            ),
            None => "<p:spPr/>".to_string(),
        };
        let body = match text {
            Some(text) => format!(
                "<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody>",
                escape(text)
            ),
            None => String::new(),
        };
        let _ = write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr>{}{}</p:sp>"#,
            i + 2,
            escape(&ph.name),
            ph_elem,
            sp_pr,
            body
        );
    }
    xml.push_str("</p:spTree>");
    xml
}
