//! In-code workbook builder for tests.

use deck_opc::package::CONTENT_TYPES_PART;
use deck_opc::rels::{RT_OFFICE_DOCUMENT, RT_SHARED_STRINGS, RT_WORKSHEET};
use deck_opc::xml::{escape, NS_OFFICE_RELS, XML_DECLARATION};
use deck_opc::{Package, Relationships};
use std::fmt::Write as _;
use std::path::Path;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

#[derive(Debug, Clone)]
enum Row {
    Shared(Vec<String>),
    Inline(Vec<String>),
}

/// Builder for a single-sheet `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct WorkbookBuilder {
    rows: Vec<Row>,
}

impl WorkbookBuilder {
    /// Start a workbook whose first row holds `headers`.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            rows: vec![Row::Shared(to_strings(headers))],
        }
    }

    /// A row stored through the shared string table.
    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(Row::Shared(to_strings(cells)));
        self
    }

    /// A row stored as inline strings.
    pub fn inline_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(Row::Inline(to_strings(cells)));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let mut sheet_data = String::new();

        for (r, row) in self.rows.iter().enumerate() {
            let _ = write!(sheet_data, r#"<row r="{}">"#, r + 1);
            let (cells, inline) = match row {
                Row::Shared(cells) => (cells, false),
                Row::Inline(cells) => (cells, true),
            };
            for (c, text) in cells.iter().enumerate() {
                // Empty cells are left out, as spreadsheet apps do.
                if text.is_empty() {
                    continue;
                }
                let reference = format!("{}{}", column_letters(c), r + 1);
                if inline {
                    let _ = write!(
                        sheet_data,
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        reference,
                        escape(text)
                    );
                } else {
                    let index = match shared.iter().position(|s| s == text) {
                        Some(i) => i,
                        None => {
                            shared.push(text.clone());
                            shared.len() - 1
                        }
                    };
                    let _ = write!(sheet_data, r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index);
                }
            }
            sheet_data.push_str("</row>");
        }

        let mut sst = format!(
            r#"{0}<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{1}" uniqueCount="{1}">"#,
            XML_DECLARATION,
            shared.len()
        );
        for s in &shared {
            let _ = write!(sst, "<si><t>{}</t></si>", escape(s));
        }
        sst.push_str("</sst>");

        let mut root_rels = Relationships::new();
        root_rels.add(RT_OFFICE_DOCUMENT, "xl/workbook.xml");
        let mut workbook_rels = Relationships::new();
        let sheet_rid = workbook_rels.add(RT_WORKSHEET, "worksheets/sheet1.xml");
        workbook_rels.add(RT_SHARED_STRINGS, "sharedStrings.xml");

        let mut package = Package::default();
        package.set_part(CONTENT_TYPES_PART, format!("{}{}", XML_DECLARATION, CONTENT_TYPES).into_bytes());
        package.set_part("_rels/.rels", root_rels.to_xml().into_bytes());
        package.set_part(
            "xl/workbook.xml",
            format!(
                r#"{}<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}"><sheets><sheet name="Students" sheetId="1" r:id="{}"/></sheets></workbook>"#,
                XML_DECLARATION, NS_OFFICE_RELS, sheet_rid
            )
            .into_bytes(),
        );
        package.set_part("xl/_rels/workbook.xml.rels", workbook_rels.to_xml().into_bytes());
        package.set_part(
            "xl/worksheets/sheet1.xml",
            format!(
                r#"{}<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                XML_DECLARATION, sheet_data
            )
            .into_bytes(),
        );
        package.set_part("xl/sharedStrings.xml", sst.into_bytes());

        match package.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => panic!("fixture workbook failed to serialize: {}", e),
        }
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

fn to_strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}
