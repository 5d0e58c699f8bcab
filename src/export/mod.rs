//! Spreadsheet artifacts.
//!
//! Tables are written as single-sheet `.xlsx` workbooks with a bold grey
//! header row, a frozen top row, and column widths sized to the content
//! within a configured clamp.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::app::{LugnutError, Result};
use crate::config::ExportSettings;
use crate::table::Table;

const HEADER_GREY: Color = Color::RGB(0xC8C8C8);

/// Artifact file name: `<Brand>_<Kind>_<YYYY-MM-DD>.xlsx`.
pub fn artifact_name(brand: &str, kind: &str, date: NaiveDate) -> String {
    format!("{}_{}_{}.xlsx", brand, kind, date.format("%Y-%m-%d"))
}

/// Resolve today's artifact path under the output directory.
pub fn artifact_path(output_dir: &Path, brand: &str, kind: &str) -> PathBuf {
    output_dir.join(artifact_name(brand, kind, chrono::Local::now().date_naive()))
}

/// Write the table to an `.xlsx` workbook at `path`.
pub fn write_xlsx(table: &Table, path: &Path, settings: &ExportSettings) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold().set_background_color(HEADER_GREY);

    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name.as_str(), &header_format)
            .map_err(|e| LugnutError::Xlsx(e.to_string()))?;
    }

    for (row, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            worksheet
                .write_string((row + 1) as u32, col as u16, cell.as_str())
                .map_err(|e| LugnutError::Xlsx(e.to_string()))?;
        }
    }

    for (col, width) in column_widths(table, settings).into_iter().enumerate() {
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| LugnutError::Xlsx(e.to_string()))?;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| LugnutError::Xlsx(e.to_string()))?;

    workbook
        .save(path)
        .map_err(|e| LugnutError::Xlsx(format!("Failed to save {}: {}", path.display(), e)))?;

    Ok(())
}

/// Per-column width: the longest line in the header or any cell, clamped
/// to the configured bounds. Multi-line cells count their widest line.
fn column_widths(table: &Table, settings: &ExportSettings) -> Vec<f64> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let mut widest = widest_line(header);
            for row in &table.rows {
                if let Some(cell) = row.get(i) {
                    widest = widest.max(widest_line(cell));
                }
            }
            (widest as f64).clamp(settings.min_col_width, settings.max_col_width)
        })
        .collect()
}

fn widest_line(text: &str) -> usize {
    text.lines().map(|l| l.chars().count()).max().unwrap_or(0)
}
