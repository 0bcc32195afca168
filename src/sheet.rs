use std::fs;
use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::debug;

use crate::models::record::{COLUMNS, Cell, IssueRecord};

/// Excel worksheet maximum row count, header included.
const EXCEL_MAX_ROWS: usize = 1_048_576;
const EXCEL_MAX_SHEET_NAME_LEN: usize = 31;
const EXCEL_ILLEGAL_SHEET_CHARS: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("could not prepare output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("{0} rows do not fit in one worksheet")]
    TooManyRows(usize),
}

pub trait SheetWriter {
    fn write(
        &self,
        records: &[IssueRecord],
        path: &Path,
        sheet_name: &str,
    ) -> Result<(), SheetError>;
}

/// Writes one worksheet per file: bold header row, one row per record.
pub struct XlsxSheetWriter {
    header: Format,
}

impl Default for XlsxSheetWriter {
    fn default() -> Self {
        Self {
            header: Format::new().set_bold(),
        }
    }
}

impl SheetWriter for XlsxSheetWriter {
    fn write(
        &self,
        records: &[IssueRecord],
        path: &Path,
        sheet_name: &str,
    ) -> Result<(), SheetError> {
        if records.len() >= EXCEL_MAX_ROWS {
            return Err(SheetError::TooManyRows(records.len()));
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sanitize_sheet_name(sheet_name))?;

        for (col, title) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, *title, &self.header)?;
        }
        for (idx, record) in records.iter().enumerate() {
            write_row(worksheet, (idx + 1) as RowNum, record)?;
        }
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();

        workbook.save(path)?;
        debug!(path = %path.display(), rows = records.len(), "saved workbook");
        Ok(())
    }
}

fn write_row(worksheet: &mut Worksheet, row: RowNum, record: &IssueRecord) -> Result<(), XlsxError> {
    for (col, cell) in record.cells().into_iter().enumerate() {
        let col = col as ColNum;
        match cell {
            Cell::Text(text) => {
                worksheet.write_string(row, col, text)?;
            }
            Cell::Number(value) => {
                worksheet.write_number(row, col, value)?;
            }
            Cell::Blank => {}
        }
    }
    Ok(())
}

/// Replaces characters Excel rejects and clamps to the 31-char limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if EXCEL_ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return "Sheet".to_string();
    }
    cleaned.chars().take(EXCEL_MAX_SHEET_NAME_LEN).collect()
}
