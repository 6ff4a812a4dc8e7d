//! Spreadsheet Export


use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::tools::clean::clean_cell;
use crate::types::ScrapedRow;

/// Columns that always lead the sheet, in this order.
pub const PREFERRED_COLUMNS: [&str; 14] = [
    "shot_id",
    "grid_title_raw",
    "titleyear",
    "title_year_raw",
    "shot_status",
    "title_content_status",
    "thumb_src",
    "data_filename",
    "image_url",
    "image_path",
    "image_width",
    "image_height",
    "image_aspect_ratio_fraction",
    "image_aspect_ratio_cinema",
];

/// Output format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }
}

/// Preferred columns followed by every other field seen in `rows`, sorted.
pub fn column_order(rows: &[ScrapedRow]) -> Vec<String> {
    let dynamic: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.field_names())
        .filter(|name| !PREFERRED_COLUMNS.iter().any(|p| p == name))
        .collect();

    let mut columns: Vec<String> = PREFERRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(dynamic.into_iter().map(str::to_string));
    columns
}

/// Cell values of `row` for `columns`; missing fields are empty, all cleaned.
pub fn row_values(row: &ScrapedRow, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| clean_cell(row.get(c).unwrap_or("")))
        .collect()
}

/// Write `rows` to `path` with the given column order, overwriting it.
pub fn write(rows: &[ScrapedRow], columns: &[String], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match ExportFormat::for_path(path) {
        ExportFormat::Xlsx => write_xlsx(rows, columns, path),
        ExportFormat::Csv => write_csv(rows, columns, path),
    }
}

/// Persist everything accumulated so far. Returns `false` when there was
/// nothing to write.
pub fn save_progress(rows: &[ScrapedRow], path: &Path) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    let columns = column_order(rows);
    write(rows, &columns, path)?;
    info!(rows = rows.len(), columns = columns.len(), path = %path.display(), "progress saved");
    Ok(true)
}

fn write_xlsx(rows: &[ScrapedRow], columns: &[String], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, column_index(col)?, name, &header)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r + 1)
            .map_err(|_| ScrapeError::Export("too many rows for a worksheet".into()))?;
        for (col, value) in row_values(row, columns).iter().enumerate() {
            sheet.write_string(r, column_index(col)?, value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ScrapeError::Export("too many columns for a worksheet".into()))
}

fn write_csv(rows: &[ScrapedRow], columns: &[String], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row_values(row, columns))?;
    }
    writer.flush()?;
    Ok(())
}

/// Persistence seam used by the scrape engine for checkpoints.
pub trait RowSink: Send + Sync {
    fn save(&self, rows: &[ScrapedRow], path: &Path) -> Result<bool>;
}

/// Writes checkpoints as spreadsheets on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetSink;

impl RowSink for SpreadsheetSink {
    fn save(&self, rows: &[ScrapedRow], path: &Path) -> Result<bool> {
        save_progress(rows, path)
    }
}
