/// Formatter adapters for the report output formats
mod html_index_formatter;
mod json_formatter;
pub mod sheet_layout;
mod xlsx_formatter;

pub use html_index_formatter::HtmlIndexFormatter;
pub use json_formatter::JsonFormatter;
pub use sheet_layout::{Cell, CellStyle, SheetLayout};
pub use xlsx_formatter::XlsxFormatter;
