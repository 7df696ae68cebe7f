use super::sheet_layout::{CellStyle, SheetLayout, COLUMN_HEADER_ROW, SHEET_NAME};
use crate::application::read_models::AuditReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::error::AuditError;
use crate::shared::Result;
use rust_xlsxwriter::{Color, Format, Note, Table, TableColumn, Workbook, Worksheet, XlsxError};

const WARNING_COLOR: u32 = 0xEC8F1C;
const ERROR_COLOR: u32 = 0xEC1C1C;
const OK_COLOR: u32 = 0x3FA91E;

const NOTE_AUTHOR: &str = "Audit";

/// XlsxFormatter adapter for spreadsheet reports
///
/// Lays out the report with [`SheetLayout`] and writes it to `Sheet1`
/// with `rust_xlsxwriter`. A cell that cannot be written is logged and
/// left empty; only failing to assemble the workbook aborts the report.
pub struct XlsxFormatter {
    warning: Format,
    error: Format,
    ok: Format,
    wrapped: Format,
}

impl XlsxFormatter {
    pub fn new() -> Self {
        let colored = |rgb: u32| Format::new().set_font_color(Color::RGB(rgb)).set_text_wrap();
        Self {
            warning: colored(WARNING_COLOR),
            error: colored(ERROR_COLOR),
            ok: colored(OK_COLOR),
            wrapped: Format::new().set_text_wrap(),
        }
    }

    fn format_for(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Plain => &self.wrapped,
            CellStyle::Warning => &self.warning,
            CellStyle::Error => &self.error,
            CellStyle::Ok => &self.ok,
        }
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, layout: &SheetLayout) -> Result<()> {
        worksheet.set_name(SHEET_NAME).map_err(render_error)?;

        log_cell_error("title", worksheet.write_string(0, 0, &layout.title));
        for (offset, (label, value)) in layout.header_block.iter().enumerate() {
            let row = offset as u32 + 1;
            log_cell_error(label, worksheet.write_string(row, 0, label));
            log_cell_error(label, worksheet.write_string(row, 1, value));
        }

        for (index, cells) in layout.rows.iter().enumerate() {
            let row = COLUMN_HEADER_ROW + 1 + index as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                let header = layout
                    .column_headers
                    .get(col as usize)
                    .map(String::as_str)
                    .unwrap_or_default();

                log_cell_error(
                    header,
                    worksheet.write_string_with_format(
                        row,
                        col,
                        &cell.value,
                        self.format_for(cell.style),
                    ),
                );

                if let Some(text) = &cell.note {
                    let note = Note::new(text).set_author(NOTE_AUTHOR);
                    log_cell_error(header, worksheet.insert_note(row, col, &note));
                }
            }
        }

        let columns: Vec<TableColumn> = layout
            .column_headers
            .iter()
            .map(|h| TableColumn::new().set_header(h))
            .collect();
        let table = Table::new().set_columns(&columns);
        // a table needs at least one body row, even an empty one
        let last_row = COLUMN_HEADER_ROW + (layout.rows.len() as u32).max(1);
        worksheet
            .add_table(COLUMN_HEADER_ROW, 0, last_row, layout.last_column(), &table)
            .map_err(render_error)?;

        for col in 0..=layout.last_column() {
            log_cell_error("column width", worksheet.set_column_width(col, 24));
        }
        for &col in &layout.hidden_columns {
            log_cell_error("hidden column", worksheet.set_column_hidden(col));
        }

        Ok(())
    }
}

impl Default for XlsxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for XlsxFormatter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, report: &AuditReport) -> Result<Vec<u8>> {
        let layout = SheetLayout::from_report(report);
        let mut workbook = Workbook::new();
        self.write_sheet(workbook.add_worksheet(), &layout)?;
        Ok(workbook.save_to_buffer().map_err(render_error)?)
    }
}

fn render_error(e: XlsxError) -> AuditError {
    AuditError::ReportRender {
        format: "xlsx".to_string(),
        details: e.to_string(),
    }
}

fn log_cell_error<T>(what: &str, result: std::result::Result<T, XlsxError>) {
    if let Err(e) = result {
        tracing::error!(cell = what, "unable to write cell: {}", e);
    }
}
