use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`BundleIssue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// The image could not be fetched or unpacked
    Environment,
    /// The image was unpacked but its content is malformed or incomplete
    Data,
    /// An external check suite could not produce a result
    Check,
}

/// A typed, non-fatal problem found while auditing one bundle.
///
/// Issues accumulate on the bundle and end up in the "Issues" column of
/// every report the bundle contributes to.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BundleIssue {
    #[error("bundle image path not found in the index catalog")]
    MissingImagePath,

    #[error("unable to download container image ({image}): {details}")]
    Download { image: String, details: String },

    #[error("unable to create the working dir for the bundle: {details}")]
    WorkDir { details: String },

    #[error("unable to save the bundle image: {details}")]
    Save { details: String },

    #[error("unable to untar the bundle image: {details}")]
    Untar { details: String },

    #[error("unable to read the image layer manifest: {details}")]
    LayerManifest { details: String },

    #[error("unable to untar layer {layer}: {details}")]
    LayerUntar { layer: String, details: String },

    #[error("unable to inspect image ({image}): {details}")]
    Inspect { image: String, details: String },

    #[error("unable to get the bundle: {details}")]
    BundleRead { details: String },

    #[error("unable to run the validators: {details}")]
    Validator { details: String },

    #[error("unable to run scorecard: {details}")]
    Scorecard { details: String },
}

impl BundleIssue {
    pub fn category(&self) -> IssueCategory {
        match self {
            BundleIssue::MissingImagePath
            | BundleIssue::Download { .. }
            | BundleIssue::WorkDir { .. }
            | BundleIssue::Save { .. }
            | BundleIssue::Untar { .. }
            | BundleIssue::LayerUntar { .. }
            | BundleIssue::Inspect { .. } => IssueCategory::Environment,
            BundleIssue::LayerManifest { .. } | BundleIssue::BundleRead { .. } => {
                IssueCategory::Data
            }
            BundleIssue::Validator { .. } | BundleIssue::Scorecard { .. } => IssueCategory::Check,
        }
    }
}
