use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{Columns, Result, WorkItem, WorklistError};
use crate::config::is_safe_file_name;
use crate::status::StatusMapping;

pub const FILE_NAME_HEADER: &str = "File Name";
pub const STATUS_HEADER: &str = "Pdf Download Status";

/// Read the first sheet of a workbook (xlsx, xls, xlsb, ods) into work items.
///
/// Rows keep their sheet order. Rows without an identifier, or whose
/// identifier could not be used as a file name, are skipped with a warning.
pub fn read_worklist(path: &Path, columns: &Columns) -> Result<Vec<WorkItem>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| WorklistError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| WorklistError::NoSheets(path.to_path_buf()))?
        .map_err(|source| WorklistError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).unwrap_or_default()).collect())
        .unwrap_or_default();
    let position = |name: &str| header.iter().position(|h| h == name);

    let mut missing: Vec<String> = columns
        .required()
        .into_iter()
        .filter(|name| position(*name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(WorklistError::MissingColumns(missing));
    }

    let [id_idx, primary_idx, fallback_idx] = columns
        .required()
        .map(|name| position(name).unwrap_or(0));

    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for (offset, row) in rows.enumerate() {
        // 1-based sheet row, counting the header
        let line = offset + 2;
        let cell = |idx: usize| {
            row.get(idx)
                .and_then(cell_text)
                .filter(|value| !columns.is_na(value))
        };

        let Some(identifier) = cell(id_idx) else {
            if row.iter().any(|c| !matches!(c, Data::Empty)) {
                warn!(row = line, "Skipping row without identifier");
            }
            continue;
        };

        if !is_safe_file_name(&identifier) {
            warn!(
                row = line,
                identifier = %identifier,
                "Skipping row: identifier is not usable as a file name"
            );
            continue;
        }

        if !seen.insert(identifier.clone()) {
            warn!(row = line, identifier = %identifier, "Duplicate identifier in worklist");
        }

        items.push(WorkItem {
            identifier,
            primary: cell(primary_idx),
            fallback: cell(fallback_idx),
        });
    }

    info!(path = %path.display(), rows = items.len(), "Loaded worklist");
    Ok(items)
}

/// Write the worklist back with the resolved file name and status per row
pub fn write_annotated(
    path: &Path,
    items: &[WorkItem],
    mapping: &StatusMapping,
    columns: &Columns,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        columns.id.as_str(),
        columns.primary.as_str(),
        columns.fallback.as_str(),
        FILE_NAME_HEADER,
        STATUS_HEADER,
    ];
    for (col, header) in headers.into_iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (idx, item) in items.iter().enumerate() {
        let row = idx as u32 + 1;

        worksheet.write_string(row, 0, &item.identifier)?;
        if let Some(url) = &item.primary {
            worksheet.write_string(row, 1, url)?;
        }
        if let Some(url) = &item.fallback {
            worksheet.write_string(row, 2, url)?;
        }
        if let Some(file_name) = mapping.lookup_filename(&item.identifier) {
            worksheet.write_string(row, 3, &file_name)?;
        }
        worksheet.write_string(row, 4, mapping.lookup_status(&item.identifier).as_str())?;
    }

    workbook.save(path)?;
    debug!(path = %path.display(), rows = items.len(), "Annotated worklist written");
    Ok(())
}

/// Cell as trimmed text; whole floats lose their `.0` so numeric ids stay `123`
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };

    (!text.is_empty()).then_some(text)
}
