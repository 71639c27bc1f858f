/*!
 * Export of review results to spreadsheet formats.
 *
 * Both formats share one row layout: sequence number, page, location,
 * current content, suggested fix and category, with emphasis markers
 * stripped. CSV is written with a UTF-8 byte order mark so spreadsheet
 * applications detect the encoding. XLSX goes through `rust_xlsxwriter` as a
 * single named worksheet.
 */

use chrono::NaiveDate;
use csv::WriterBuilder;
use log::debug;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ExportError;
use crate::review::normalize::strip_emphasis;
use crate::review::record::ErrorRecord;

/// Column headers, in output order
pub const HEADERS: [&str; 6] = ["번호", "페이지", "위치", "현재 내용", "수정 제안", "오류 유형"];

/// Column widths of the worksheet, in character units
pub const COLUMN_WIDTHS: [u32; 6] = [5, 8, 15, 40, 40, 15];

/// Name of the single worksheet
pub const SHEET_NAME: &str = "교정 결과";

/// Prefix of generated file names
pub const FILE_NAME_PREFIX: &str = "문서교정결과";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// One output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub number: usize,
    pub page: u32,
    pub location: String,
    pub current_content: String,
    pub suggested_fix: String,
    pub error_type: String,
}

impl ExportRow {
    fn cells(&self) -> [String; 6] {
        [
            self.number.to_string(),
            self.page.to_string(),
            self.location.clone(),
            self.current_content.clone(),
            self.suggested_fix.clone(),
            self.error_type.clone(),
        ]
    }
}

/// Build output rows, numbered from 1 in record order
pub fn rows(records: &[ErrorRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| ExportRow {
            number: i + 1,
            page: record.page,
            location: record.location.clone(),
            current_content: strip_emphasis(&record.current_content),
            suggested_fix: strip_emphasis(&record.suggested_fix),
            error_type: record.error_type.label().to_string(),
        })
        .collect()
}

/// Base file name for results exported on `date`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("{}_{}", FILE_NAME_PREFIX, date.format("%Y-%m-%d"))
}

/// File name with the extension of `format`
pub fn file_name(base: &str, format: ExportFormat) -> String {
    format!("{}.{}", base, format.extension())
}

/// Serialize records in the requested format
pub fn export(records: &[ErrorRecord], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let rows = rows(records);
    let bytes = match format {
        ExportFormat::Csv => to_csv(&rows)?,
        ExportFormat::Xlsx => to_xlsx(&rows)?,
    };
    debug!("Exported {} rows as {} ({} bytes)", rows.len(), format, bytes.len());
    Ok(bytes)
}

/// CSV with a UTF-8 BOM and a header line
pub fn to_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);
        writer.write_record(HEADERS)?;
        for row in rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Single-sheet XLSX workbook with a bold header row
pub fn to_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_number(r, 0, row.number as f64)?;
        sheet.write_number(r, 1, row.page)?;
        sheet.write_string(r, 2, xml_safe(&row.location))?;
        sheet.write_string(r, 3, xml_safe(&row.current_content))?;
        sheet.write_string(r, 4, xml_safe(&row.suggested_fix))?;
        sheet.write_string(r, 5, xml_safe(&row.error_type))?;
    }

    Ok(workbook.save_to_buffer()?)
}

// The writer escapes C0 controls itself; the two noncharacters have no XML 1.0 form.
fn xml_safe(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\u{FFFE}' | '\u{FFFF}')).collect()
}
