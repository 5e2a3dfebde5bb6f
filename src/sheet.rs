use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, XlsxError};
use thiserror::Error;

use crate::bucket::Boundaries;
use crate::parser::extract::OutlineRecord;

pub const SHEET_NAME: &str = "Course Outline";
pub const DURATION_HEADER: &str = "Duration";
pub const HEADERS: [&str; 5] = ["Order", "Course Title", "Section Title", "Item Title", DURATION_HEADER];
const BOUNDARY_FILL: u32 = 0xFF8C00;
const EXTENSION: &str = "xlsx";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("no \"{0}\" column found in the sheet header")]
    MissingColumn(String),
    #[error("boundary row {index} is outside the sheet ({rows} data rows)")]
    RowOutOfRange { index: usize, rows: usize },
    #[error("failed to write workbook: {0}")]
    Write(#[from] XlsxError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowStyle {
    #[default]
    Plain,
    Boundary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub style: RowStyle,
}

/// In-memory worksheet: one header row, then data rows in record order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn from_records(records: &[OutlineRecord]) -> Self {
        let rows = records
            .iter()
            .map(|r| Row {
                cells: vec![
                    Cell::Number(r.order as f64),
                    Cell::Text(r.course_title.clone()),
                    Cell::Text(r.section_title.clone()),
                    Cell::Text(r.item_title.clone()),
                    Cell::Text(r.duration_text.clone()),
                ],
                style: RowStyle::Plain,
            })
            .collect();
        Sheet {
            header: HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn duration_column(&self) -> Result<usize, SheetError> {
        self.header
            .iter()
            .position(|h| h == DURATION_HEADER)
            .ok_or_else(|| SheetError::MissingColumn(DURATION_HEADER.to_string()))
    }

    /// Mark the rows at the given boundaries. Nothing is changed on error.
    pub fn mark_boundary_rows(&mut self, boundaries: &Boundaries) -> Result<usize, SheetError> {
        self.duration_column()?;
        let indices = boundaries.indices();
        if let Some(&index) = indices.iter().find(|&&i| i >= self.rows.len()) {
            return Err(SheetError::RowOutOfRange {
                index,
                rows: self.rows.len(),
            });
        }
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.style = if indices.contains(&idx) {
                RowStyle::Boundary
            } else {
                RowStyle::Plain
            };
        }
        Ok(indices.len())
    }

    pub fn styled_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.style == RowStyle::Boundary)
            .count()
    }
}

/// `"Intro to Rust"` → `"Intro-to-Rust.xlsx"`.
pub fn output_file_name(course_title: &str, separator: &str) -> String {
    format!("{}.{}", course_title.replace(' ', separator), EXTENSION)
}

pub fn write_xlsx(sheet: &Sheet, path: &Path) -> Result<(), SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_fmt = Format::new().set_bold();
    let boundary_fmt = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(BOUNDARY_FILL));

    for (col, title) in sheet.header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header_fmt)?;
    }

    for (idx, row) in sheet.rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            let c = col as u16;
            match (cell, row.style) {
                (Cell::Number(n), RowStyle::Plain) => {
                    worksheet.write_number(r, c, *n)?;
                }
                (Cell::Number(n), RowStyle::Boundary) => {
                    worksheet.write_number_with_format(r, c, *n, &boundary_fmt)?;
                }
                (Cell::Text(t), RowStyle::Plain) => {
                    worksheet.write_string(r, c, t)?;
                }
                (Cell::Text(t), RowStyle::Boundary) => {
                    worksheet.write_string_with_format(r, c, t, &boundary_fmt)?;
                }
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
