//! Merge utility: fold a directory of `.xlsx` artifacts into one.
//!
//! Every readable workbook in the input directory contributes its first
//! sheet; columns are unioned across workbooks and rows are stacked in
//! file-name order. Unreadable files are logged and skipped.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::app::{LugnutError, Result};
use crate::config::ExportSettings;
use crate::export;
use crate::table::Table;

/// Merge all `.xlsx` files under `input_dir` into a workbook at `output`.
///
/// An empty directory, or one where nothing is readable, is not an error:
/// the merge logs and returns without writing anything.
pub fn merge_dir(input_dir: &Path, output: &Path, settings: &ExportSettings) -> Result<()> {
    let files = xlsx_files(input_dir)?;
    if files.is_empty() {
        tracing::warn!(dir = %input_dir.display(), "No .xlsx files to merge");
        return Ok(());
    }

    let mut tables = Vec::new();
    for file in &files {
        match read_table(file) {
            Ok(Some(table)) => {
                tracing::info!(
                    file = %file.display(),
                    rows = table.rows.len(),
                    "Read workbook"
                );
                tables.push(table);
            }
            Ok(None) => {
                tracing::warn!(file = %file.display(), "Workbook has no data, skipping");
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), "Unreadable workbook, skipping: {}", e);
            }
        }
    }

    if tables.is_empty() {
        tracing::warn!(dir = %input_dir.display(), "Nothing readable to merge");
        return Ok(());
    }

    let mut merged = Table::concat(&tables);
    merged.drop_empty_rows();

    export::write_xlsx(&merged, output, settings)?;
    tracing::info!(
        output = %output.display(),
        files = tables.len(),
        rows = merged.rows.len(),
        "Merged artifact written"
    );

    Ok(())
}

/// The `.xlsx` files in a directory, sorted by name. Spreadsheet lock
/// files (`~$` prefix) are ignored.
fn xlsx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with("~$") {
            continue;
        }
        if name.to_ascii_lowercase().ends_with(".xlsx") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read the first sheet of a workbook as a table; header row first.
fn read_table(path: &Path) -> Result<Option<Table>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| LugnutError::Xlsx(format!("{}: {}", path.display(), e)))?;

    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(None);
    };
    let range = range.map_err(|e| LugnutError::Xlsx(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(None);
    };

    let columns: Vec<String> = header.iter().map(cell_text).collect();
    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Some(Table { columns, rows }))
}

/// Render a cell as text. Whole floats print without the trailing `.0`
/// so numeric part segments survive a round trip.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(dir: &Path, name: &str, table: &Table) {
        export::write_xlsx(table, &dir.join(name), &ExportSettings::default()).unwrap();
    }

    #[test]
    fn test_merge_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        write_table(
            dir.path(),
            "a.xlsx",
            &Table {
                columns: vec!["Part Number".into(), "Year".into()],
                rows: vec![vec!["17402-09".into(), "2015".into()]],
            },
        );
        write_table(
            dir.path(),
            "b.xlsx",
            &Table {
                columns: vec!["Part Number".into(), "Make".into()],
                rows: vec![vec!["17402-10".into(), "Jeep".into()]],
            },
        );

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("merged.xlsx");
        merge_dir(dir.path(), &output, &ExportSettings::default()).unwrap();

        let merged = read_table(&output).unwrap().unwrap();
        assert_eq!(merged.columns, vec!["Part Number", "Year", "Make"]);
        assert_eq!(merged.rows[0], vec!["17402-09", "2015", ""]);
        assert_eq!(merged.rows[1], vec!["17402-10", "", "Jeep"]);
    }

    #[test]
    fn test_merge_empty_dir_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("merged.xlsx");

        merge_dir(dir.path(), &output, &ExportSettings::default()).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_xlsx_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.XLSX", "notes.txt", "~$a.xlsx"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = xlsx_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.XLSX", "b.xlsx"]);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.xlsx"), b"not a workbook").unwrap();
        write_table(
            dir.path(),
            "good.xlsx",
            &Table {
                columns: vec!["A".into()],
                rows: vec![vec!["1".into()]],
            },
        );

        let output = dir.path().join("merged-out.xlsx");
        merge_dir(dir.path(), &output, &ExportSettings::default()).unwrap();

        let merged = read_table(&output).unwrap().unwrap();
        assert_eq!(merged.rows.len(), 1);
    }

    #[test]
    fn test_cell_text_whole_float() {
        assert_eq!(cell_text(&Data::Float(2015.0)), "2015");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
