use crate::adapters::outbound::formatters::{JsonFormatter, XlsxFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// This factory encapsulates the selection of formatter implementations.
/// It belongs in the application layer as it orchestrates the selection of
/// infrastructure adapters based on the requested output format.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates one formatter per concrete format of `format`
    ///
    /// # Arguments
    /// * `format` - The requested output format; `All` yields JSON then XLSX
    ///
    /// # Returns
    /// Boxed ReportFormatter trait objects, in writing order
    ///
    /// # Examples
    /// ```
    /// use operator_audit::application::dto::OutputFormat;
    /// use operator_audit::application::factories::FormatterFactory;
    ///
    /// let formatters = FormatterFactory::create(OutputFormat::All);
    /// assert_eq!(formatters.len(), 2);
    /// ```
    pub fn create(format: OutputFormat) -> Vec<Box<dyn ReportFormatter>> {
        format
            .targets()
            .into_iter()
            .map(|target| -> Box<dyn ReportFormatter> {
                match target {
                    OutputFormat::Xlsx => Box::new(XlsxFormatter::new()),
                    _ => Box::new(JsonFormatter::new()),
                }
            })
            .collect()
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use operator_audit::application::dto::OutputFormat;
    /// use operator_audit::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Xlsx);
    /// assert_eq!(message, "📝 Generating XLSX reports...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON reports...",
            OutputFormat::Xlsx => "📝 Generating XLSX reports...",
            OutputFormat::All => "📝 Generating JSON and XLSX reports...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_single_formatter() {
        let formatters = FormatterFactory::create(OutputFormat::Json);
        assert_eq!(formatters.len(), 1);
        assert_eq!(formatters[0].extension(), "json");
    }

    #[test]
    fn test_create_all_formatters() {
        let extensions: Vec<&str> = FormatterFactory::create(OutputFormat::All)
            .iter()
            .map(|f| f.extension())
            .collect();
        assert_eq!(extensions, vec!["json", "xlsx"]);
    }

    #[test]
    fn test_progress_message_all() {
        let message = FormatterFactory::progress_message(OutputFormat::All);
        assert_eq!(message, "📝 Generating JSON and XLSX reports...");
    }
}
