use crate::application::dto::{AuditRequest, AuditResponse, AuditedPackage};
use crate::application::services::{BundleExtractor, Extraction};
use crate::audit::domain::{
    AuditBundle, BundleIssue, Catalog, CatalogBundle, CatalogPackage, ImageInspection,
};
use crate::audit::services::PackageSelector;
use crate::ports::outbound::{
    ArchiveExtractor, BundleReader, BundleValidator, CatalogReader, ContainerRuntime,
    ProgressReporter, ScorecardRunner,
};
use crate::shared::error::AuditError;
use crate::shared::Result;
use std::path::{Component, Path, PathBuf};


/// Working directory name used for the index image
const INDEX_WORK_NAME: &str = "index";

/// AuditIndexUseCase - Core use case for auditing an index image
///
/// Extracts the index image, reads its file-based catalog, then pulls,
/// unpacks and checks every selected bundle in turn. Problems with a single
/// bundle are recorded on that bundle; only failing to extract the index or
/// to read its catalog aborts the run.
///
/// # Type Parameters
/// * `CR` - ContainerRuntime implementation
/// * `AE` - ArchiveExtractor implementation
/// * `CAT` - CatalogReader implementation
/// * `BR` - BundleReader implementation
/// * `BV` - BundleValidator implementation
/// * `SR` - ScorecardRunner implementation
/// * `PR` - ProgressReporter implementation
pub struct AuditIndexUseCase<CR, AE, CAT, BR, BV, SR, PR> {
    extractor: BundleExtractor<CR, AE>,
    catalog_reader: CAT,
    bundle_reader: BR,
    validator: BV,
    scorecard: SR,
    progress_reporter: PR,
}

impl<CR, AE, CAT, BR, BV, SR, PR> AuditIndexUseCase<CR, AE, CAT, BR, BV, SR, PR>
where
    CR: ContainerRuntime,
    AE: ArchiveExtractor,
    CAT: CatalogReader,
    BR: BundleReader,
    BV: BundleValidator,
    SR: ScorecardRunner,
    PR: ProgressReporter,
{
    /// Creates a new AuditIndexUseCase with injected dependencies
    pub fn new(
        extractor: BundleExtractor<CR, AE>,
        catalog_reader: CAT,
        bundle_reader: BR,
        validator: BV,
        scorecard: SR,
        progress_reporter: PR,
    ) -> Self {
        Self {
            extractor,
            catalog_reader,
            bundle_reader,
            validator,
            scorecard,
            progress_reporter,
        }
    }

    /// Executes the audit
    ///
    /// # Arguments
    /// * `request` - Index image and audit options
    ///
    /// # Returns
    /// AuditResponse with one entry per selected package, in catalog order
    ///
    /// # Errors
    /// - The index image cannot be pulled, unpacked or inspected
    /// - Its catalog cannot be read
    /// - The filter patterns are invalid
    pub fn execute(&self, request: AuditRequest) -> Result<AuditResponse> {
        let selector = PackageSelector::new(request.filter_patterns.clone(), request.limit)?;

        // Step 1: Extract the index image and read its catalog
        let (inspection, catalog) = self.load_index(&request.index_image)?;

        // Step 2: Select packages and bundles
        let selected = self.select(&catalog, &selector, &request);
        let total: usize = selected.iter().map(|(_, bundles)| bundles.len()).sum();
        self.progress_reporter.report(&format!(
            "🔍 Auditing {} bundle(s) from {} package(s)",
            total,
            selected.len()
        ));

        // Step 3: Audit each bundle
        let mut processed = 0;
        let mut packages = Vec::with_capacity(selected.len());
        for (package, bundles) in selected {
            let mut audited = Vec::with_capacity(bundles.len());
            for bundle in bundles {
                processed += 1;
                self.progress_reporter
                    .report_progress(processed, total, Some(&bundle.name));
                audited.push(self.audit_bundle(package, bundle, &request));
            }

            packages.push(AuditedPackage {
                name: package.name.clone(),
                default_channel: package.default_channel.clone(),
                channels: package.channels.iter().map(|c| c.name.clone()).collect(),
                bundles: audited,
            });
        }

        let response = AuditResponse::new(inspection, packages);
        self.progress_reporter.report_completion(&format!(
            "✅ Audited {} bundle(s), {} with issues",
            response.bundle_count(),
            response.bundles_with_issues()
        ));
        Ok(response)
    }

    /// Pulls and unpacks the index image, returning its inspection and catalog
    fn load_index(&self, image: &str) -> Result<(ImageInspection, Catalog)> {
        self.progress_reporter
            .report(&format!("📦 Extracting index image: {}", image));

        let extraction = self.extractor.extract(image, INDEX_WORK_NAME);
        let pulled = extraction.pulled();
        let loaded = self.read_index(image, extraction);
        if pulled {
            self.extractor.release(image);
        }
        let (inspection, catalog) = loaded?;

        self.progress_reporter.report(&format!(
            "✅ Found {} package(s) and {} bundle(s) in the catalog",
            catalog.packages.len(),
            catalog.bundle_count()
        ));
        Ok((inspection, catalog))
    }

    /// Inspects the unpacked index and reads its catalog
    fn read_index(
        &self,
        image: &str,
        extraction: Extraction,
    ) -> Result<(ImageInspection, Catalog)> {
        let Extraction { image: extracted, issues } = extraction;
        let Some(extracted) = extracted else {
            return Err(AuditError::IndexExtraction {
                image: image.to_string(),
                details: join_issues(&issues),
            }
            .into());
        };
        for issue in &issues {
            tracing::warn!(image, "{}", issue);
        }

        let inspection = self.extractor.runtime().inspect(image).map_err(|e| {
            AuditError::IndexExtraction {
                image: image.to_string(),
                details: format!("unable to inspect the image: {}", e),
            }
        })?;

        let catalog = catalog_dir(extracted.content_dir(), inspection.configs_path())
            .and_then(|dir| {
                tracing::debug!(path = %dir.display(), "reading index catalog");
                self.catalog_reader.read_catalog(&dir)
            })
            .map_err(|e| AuditError::CatalogRead {
                image: image.to_string(),
                details: e.to_string(),
            })?;

        Ok((inspection, catalog))
    }

    fn select<'a>(
        &self,
        catalog: &'a Catalog,
        selector: &PackageSelector,
        request: &AuditRequest,
    ) -> Vec<(&'a CatalogPackage, Vec<&'a CatalogBundle>)> {
        for pattern in selector.unmatched_patterns(&catalog.packages) {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Filter pattern '{}' did not match any package.",
                pattern
            ));
        }

        selector
            .select(&catalog.packages)
            .into_iter()
            .map(|package| {
                let bundles = package
                    .bundles
                    .iter()
                    .filter(|b| !request.head_only || package.is_head(&b.name))
                    .collect();
                (package, bundles)
            })
            .collect()
    }

    fn audit_bundle(
        &self,
        package: &CatalogPackage,
        bundle: &CatalogBundle,
        request: &AuditRequest,
    ) -> AuditBundle {
        let mut audit = AuditBundle::from_catalog(package, bundle);

        let extraction = self
            .extractor
            .extract(&audit.image_path, &audit.bundle_name);
        let pulled = extraction.pulled();
        for issue in extraction.issues {
            audit.record(issue);
        }

        if let Some(extracted) = extraction.image {
            self.inspect_bundle(&mut audit, request);

            match self.bundle_reader.read_bundle(extracted.content_dir()) {
                Ok(manifest) => audit.bundle = Some(manifest),
                Err(e) => audit.record(BundleIssue::BundleRead {
                    details: e.to_string(),
                }),
            }

            if audit.bundle.is_some() {
                self.run_checks(&mut audit, extracted.content_dir(), request);
            }
        }

        if pulled {
            self.extractor.release(&audit.image_path);
        }
        audit
    }

    fn inspect_bundle(&self, audit: &mut AuditBundle, request: &AuditRequest) {
        match self.extractor.runtime().inspect(&audit.image_path) {
            Ok(inspection) => {
                audit.build_at = inspection.build_at();
                audit.ocp_label = inspection.ocp_versions().map(str::to_string);
                audit.found_label = request
                    .label
                    .as_ref()
                    .is_some_and(|(label, value)| inspection.has_label_value(label, value));
            }
            Err(e) => {
                let image = audit.image_path.clone();
                audit.record(BundleIssue::Inspect {
                    image,
                    details: e.to_string(),
                });
            }
        }
    }

    fn run_checks(&self, audit: &mut AuditBundle, bundle_dir: &Path, request: &AuditRequest) {
        if !request.disable_validators {
            match self.validator.validate(bundle_dir) {
                Ok(report) => audit.validator = Some(report),
                Err(e) => audit.record(BundleIssue::Validator {
                    details: e.to_string(),
                }),
            }
        }

        if !request.disable_scorecard {
            match self.scorecard.run(bundle_dir) {
                Ok(report) => audit.scorecard = Some(report),
                Err(e) => audit.record(BundleIssue::Scorecard {
                    details: e.to_string(),
                }),
            }
        }
    }
}

/// Catalog location inside the unpacked image; `configs_path` is absolute in the image
fn catalog_dir(content_dir: &Path, configs_path: &str) -> Result<PathBuf> {
    let relative = Path::new(configs_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        anyhow::bail!("configs path '{}' points outside the image", configs_path);
    }
    Ok(content_dir.join(relative))
}

fn join_issues(issues: &[BundleIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
