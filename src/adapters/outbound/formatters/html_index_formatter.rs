use crate::application::read_models::IndexPage;
use std::fmt::Write;

const PAGE_TITLE: &str = "Operator Catalog Audit Reports";

/// HtmlIndexFormatter adapter for the static report index page
///
/// One section per dashboard, one link per spreadsheet. All text coming
/// from file names and image references is escaped.
pub struct HtmlIndexFormatter;

impl HtmlIndexFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, page: &IndexPage) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "  <title>{}</title>", PAGE_TITLE);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "  <h1>{}</h1>", PAGE_TITLE);

        if page.dashboards.is_empty() {
            html.push_str("  <p>No reports found.</p>\n");
        }

        for dashboard in &page.dashboards {
            html.push_str("  <section class=\"dashboard\">\n");
            let _ = writeln!(html, "    <h2>{}</h2>", escape(&dashboard.name));
            html.push_str("    <ul>\n");
            for report in &dashboard.reports {
                let _ = writeln!(
                    html,
                    "      <li class=\"{}\"><a href=\"{}\">{}</a></li>",
                    escape(&report.kind.to_lowercase()),
                    escape(&report.path),
                    escape(&report.name)
                );
            }
            html.push_str("    </ul>\n  </section>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

impl Default for HtmlIndexFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
