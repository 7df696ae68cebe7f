use serde::Serialize;

/// A link to one spreadsheet report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLink {
    /// Path relative to the page
    pub path: String,
    /// Display name, `[<kind>] - Tag: <tag>`
    pub name: String,
    pub kind: String,
}

/// The reports found for one catalog image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub name: String,
    pub reports: Vec<ReportLink>,
}

/// Model of the static index page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexPage {
    pub dashboards: Vec<Dashboard>,
}
