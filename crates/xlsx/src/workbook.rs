//! Reading cell text from the first worksheet of an `.xlsx` workbook.

use deck_core::{Error, Result};
use deck_opc::package::resolve_target;
use deck_opc::rels::{RT_OFFICE_DOCUMENT, RT_SHARED_STRINGS, RT_WORKSHEET};
use deck_opc::xml::{attr, part_text, prefixed_attr, xml_error};
use deck_opc::{Package, Relationships};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Read, Seek};
use std::sync::LazyLock;

/// Regex splitting a cell reference like `AB12` into column letters and row number.
static CELL_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$").unwrap());

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// A worksheet as rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// Sheet name from the workbook.
    pub name: String,

    /// Rows in sheet order; each row is padded to its last populated cell.
    /// Rows absent from the file are not represented.
    pub rows: Vec<Vec<String>>,
}

/// Read the first worksheet of a workbook.
pub fn read_first_sheet<R: Read + Seek>(reader: R) -> Result<Sheet> {
    let package = Package::from_reader(reader)?;

    let workbook_path = Relationships::of_part(&package, "")?
        .first_of_type(RT_OFFICE_DOCUMENT)
        .map_or_else(|| DEFAULT_WORKBOOK_PART.to_string(), |rel| resolve_target("", &rel.target));

    let (sheet_name, sheet_rid) = first_sheet(part_text(&workbook_path, package.part(&workbook_path)?)?)?;
    let workbook_rels = Relationships::of_part(&package, &workbook_path)?;

    let sheet_path = workbook_rels
        .get(&sheet_rid)
        .filter(|rel| rel.rel_type == RT_WORKSHEET)
        .map(|rel| resolve_target(&workbook_path, &rel.target))
        .ok_or_else(|| Error::CorruptedPackage(format!("worksheet '{}' has no part", sheet_name)))?;

    let shared_strings = match workbook_rels.first_of_type(RT_SHARED_STRINGS) {
        Some(rel) => {
            let path = resolve_target(&workbook_path, &rel.target);
            parse_shared_strings(part_text(&path, package.part(&path)?)?)?
        }
        None => Vec::new(),
    };

    let rows = parse_sheet(part_text(&sheet_path, package.part(&sheet_path)?)?, &shared_strings)?;
    log::debug!("Read {} rows from sheet '{}'", rows.len(), sheet_name);

    Ok(Sheet {
        name: sheet_name,
        rows,
    })
}

/// Name and relationship id of the first `<sheet>` in `workbook.xml`.
fn first_sheet(workbook_xml: &str) -> Result<(String, String)> {
    let mut reader = Reader::from_str(workbook_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sheet" =>
            {
                if let Some(rid) = prefixed_attr(e, "id") {
                    return Ok((attr(e, "name").unwrap_or_default(), rid));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing workbook", e)),
            _ => {}
        }
    }

    Err(Error::CorruptedPackage("workbook has no worksheets".to_string()))
}

/// Parse `sharedStrings.xml`; rich-text runs are concatenated and
/// phonetic runs dropped.
pub(crate) fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(ref e)) if in_text => {
                if let Some(ref mut s) = current {
                    s.push_str(&e.unescape().map_err(|e| xml_error("Bad shared string", e))?);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    if let Some(s) = current.take() {
                        strings.push(s);
                    }
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("Error parsing shared strings", e)),
            _ => {}
        }
    }

    Ok(strings)
}

/// Zero-based (column, row) of a cell reference.
pub(crate) fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let caps = CELL_REF_REGEX.captures(reference)?;
    let column = caps[1]
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize);
    let row: usize = caps[2].parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column - 1, row - 1))
}

/// Render a numeric cell the way a spreadsheet displays a general number.
fn format_number(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Ok(n) => n.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// A cell while its XML is being read.
#[derive(Debug, Default)]
struct CellInfo {
    column: usize,
    cell_type: Option<String>,
    value: String,
}

/// Parse worksheet XML into rows of cell text.
pub(crate) fn parse_sheet(xml: &str, shared_strings: &[String]) -> Result<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Option<Vec<String>> = None;
    let mut current_cell: Option<CellInfo> = None;
    let mut in_value = false;
    let mut in_phonetic = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error("Error parsing worksheet", e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Some(Vec::new());
                        if !is_start {
                            rows.push(Vec::new());
                            current_row = None;
                        }
                    }
                    b"c" => {
                        let next_column = current_row.as_ref().map_or(0, Vec::len);
                        let column = attr(e, "r")
                            .and_then(|r| parse_cell_ref(&r))
                            .map_or(next_column, |(col, _)| col);
                        let cell = CellInfo {
                            column,
                            cell_type: attr(e, "t"),
                            value: String::new(),
                        };
                        if is_start {
                            current_cell = Some(cell);
                        } else if let Some(ref mut row) = current_row {
                            place(row, cell.column, String::new());
                        }
                    }
                    b"rPh" if is_start => in_phonetic = true,
                    b"v" | b"t" if is_start && !in_phonetic => in_value = current_cell.is_some(),
                    _ => {}
                }
            }
            Event::Text(ref e) if in_value => {
                if let Some(ref mut cell) = current_cell {
                    cell.value
                        .push_str(&e.unescape().map_err(|e| xml_error("Bad cell text", e))?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(cell) = current_cell.take() {
                        let text = cell_text(&cell, shared_strings)?;
                        if let Some(ref mut row) = current_row {
                            place(row, cell.column, text);
                        }
                    }
                }
                b"row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

fn place(row: &mut Vec<String>, column: usize, text: String) {
    if row.len() <= column {
        row.resize(column + 1, String::new());
    }
    row[column] = text;
}

fn cell_text(cell: &CellInfo, shared_strings: &[String]) -> Result<String> {
    let text = match cell.cell_type.as_deref() {
        Some("s") => {
            let index: usize = cell.value.trim().parse().map_err(|_| {
                Error::CorruptedPackage(format!("bad shared string index '{}'", cell.value))
            })?;
            shared_strings.get(index).cloned().ok_or_else(|| {
                Error::CorruptedPackage(format!("shared string {} out of range", index))
            })?
        }
        Some("b") => {
            if cell.value.trim() == "1" {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Some("inlineStr") | Some("str") | Some("e") | Some("d") => cell.value.clone(),
        _ if cell.value.is_empty() => String::new(),
        _ => format_number(&cell.value),
    };
    Ok(text)
}
