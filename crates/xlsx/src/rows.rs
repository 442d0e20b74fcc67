//! Student rows from a spreadsheet with `name`, `usn` and `photo_path` columns.

use crate::workbook::{read_first_sheet, Sheet};
use deck_core::{Error, Result, StudentRow, REQUIRED_COLUMNS};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

/// Load every student row from the first sheet of the workbook at `path`.
///
/// The first non-blank row is the header. Column names are matched
/// exactly and extra columns are ignored. Blank rows are skipped and
/// absent cells read as empty strings.
pub fn load_rows(path: &Path) -> Result<Vec<StudentRow>> {
    if !path.exists() {
        return Err(Error::MissingFile {
            what: "Spreadsheet",
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| Error::SpreadsheetError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rows = read_rows(BufReader::new(file)).map_err(|e| match e {
        Error::SchemaError { .. } => e,
        other => Error::SpreadsheetError {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    log::info!("Loaded {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}

/// Load student rows from workbook bytes.
pub fn read_rows<R: Read + Seek>(reader: R) -> Result<Vec<StudentRow>> {
    let sheet = read_first_sheet(reader)?;
    rows_from_sheet(&sheet)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn cell(row: &[String], col: usize) -> String {
    row.get(col).cloned().unwrap_or_default()
}

pub(crate) fn rows_from_sheet(sheet: &Sheet) -> Result<Vec<StudentRow>> {
    let mut rows = sheet.rows.iter().filter(|row| !is_blank(row));
    let header: &[String] = rows.next().map(Vec::as_slice).unwrap_or(&[]);

    let position = |column: &str| header.iter().position(|h| h == column);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&c| position(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::SchemaError {
            expected: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            missing,
        });
    }

    let [name_col, usn_col, photo_col] = REQUIRED_COLUMNS.map(|c| position(c).unwrap_or_default());

    Ok(rows
        .map(|row| StudentRow::new(cell(row, name_col), cell(row, usn_col), PathBuf::from(cell(row, photo_col))))
        .collect())
}
