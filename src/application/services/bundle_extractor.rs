use crate::audit::domain::BundleIssue;
use crate::ports::outbound::{ArchiveExtractor, ContainerRuntime};
use crate::shared::security::{read_untrusted_file, sanitize_path_component};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Directory under the working dir that receives the merged layers
pub const CONTENT_DIR: &str = "bundle";

const LAYER_MANIFEST: &str = "manifest.json";
const SINGLE_LAYER: &str = "layer.tar";
const WHITEOUT_PREFIX: &str = ".wh.";
const ROOT_OWNED_DIR: &str = "root";

/// One entry of the `manifest.json` written by `<engine> save`
#[derive(Debug, Deserialize)]
struct LayerManifestEntry {
    #[serde(rename = "Config", default)]
    #[allow(dead_code)]
    config: String,
    #[serde(rename = "Layers", default)]
    layers: Vec<String>,
}

/// The unpacked filesystem of an image
///
/// Dropping it removes the whole working directory.
#[derive(Debug)]
pub struct ExtractedImage {
    work_dir: TempDir,
    content_dir: PathBuf,
}

impl ExtractedImage {
    /// Merged layer contents
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }
}

/// Outcome of extracting one image
///
/// `image` is `None` when nothing could be unpacked at all; `issues` lists
/// every problem met on the way, fatal or not.
#[derive(Debug, Default)]
pub struct Extraction {
    pub image: Option<ExtractedImage>,
    pub issues: Vec<BundleIssue>,
}

impl Extraction {
    /// Whether the image reached the local store, so it has to be released
    pub fn pulled(&self) -> bool {
        !self.issues.iter().any(|issue| {
            matches!(
                issue,
                BundleIssue::Download { .. } | BundleIssue::MissingImagePath
            )
        })
    }
}

/// BundleExtractor - rebuilds the filesystem of an image from its layers
///
/// Pulls the image, saves it as a tarball in a fresh working directory and
/// unpacks every layer, in order, into `<work>/bundle`, so later layers win
/// over earlier ones. Whiteout markers and the root-owned `root/` subtree
/// are removed afterwards.
pub struct BundleExtractor<R, A> {
    runtime: R,
    archive: A,
    work_root: PathBuf,
    server_mode: bool,
}

impl<R: ContainerRuntime, A: ArchiveExtractor> BundleExtractor<R, A> {
    pub fn new(runtime: R, archive: A, work_root: PathBuf, server_mode: bool) -> Self {
        Self {
            runtime,
            archive,
            work_root,
            server_mode,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Pulls and unpacks `image`, using `name` for the working directory and tarball
    pub fn extract(&self, image: &str, name: &str) -> Extraction {
        let mut extraction = Extraction::default();

        if image.trim().is_empty() {
            extraction.issues.push(BundleIssue::MissingImagePath);
            return extraction;
        }

        if let Err(e) = self.runtime.pull(image) {
            extraction.issues.push(BundleIssue::Download {
                image: image.to_string(),
                details: e.to_string(),
            });
            return extraction;
        }

        let work_dir = match self.create_work_dir(name) {
            Ok(dir) => dir,
            Err(details) => {
                extraction.issues.push(BundleIssue::WorkDir { details });
                return extraction;
            }
        };

        let work = work_dir.path().to_path_buf();
        let content_dir = work.join(CONTENT_DIR);
        let archive_path = work.join(format!("{}.tar", sanitize_path_component(name)));

        if let Err(e) = self.runtime.save(strip_digest(image), &archive_path) {
            extraction.issues.push(BundleIssue::Save {
                details: e.to_string(),
            });
        }

        if let Err(e) = self.archive.extract(&archive_path, &work) {
            extraction.issues.push(BundleIssue::Untar {
                details: e.to_string(),
            });
        }

        if let Err(e) = fs::create_dir_all(&content_dir) {
            extraction.issues.push(BundleIssue::WorkDir {
                details: format!("unable to create {}: {}", content_dir.display(), e),
            });
            extraction.image = Some(ExtractedImage {
                work_dir,
                content_dir,
            });
            return extraction;
        }

        self.extract_layers(&work, &content_dir, &mut extraction.issues);
        remove_whiteouts(&content_dir);
        remove_root_owned(&content_dir);

        extraction.image = Some(ExtractedImage {
            work_dir,
            content_dir,
        });
        extraction
    }

    /// Removes the local copy of `image` unless running in server mode
    pub fn release(&self, image: &str) {
        if self.server_mode || image.trim().is_empty() {
            return;
        }
        if let Err(e) = self.runtime.remove(image) {
            tracing::debug!(image, "unable to remove image: {}", e);
        }
    }

    fn create_work_dir(&self, name: &str) -> Result<TempDir, String> {
        fs::create_dir_all(&self.work_root)
            .map_err(|e| format!("unable to create {}: {}", self.work_root.display(), e))?;
        tempfile::Builder::new()
            .prefix(&format!("{}-", sanitize_path_component(name)))
            .tempdir_in(&self.work_root)
            .map_err(|e| e.to_string())
    }

    fn extract_layers(&self, work: &Path, content_dir: &Path, issues: &mut Vec<BundleIssue>) {
        let manifest_path = work.join(LAYER_MANIFEST);
        if fs::symlink_metadata(&manifest_path).is_err() {
            // single-layer archives have no manifest
            self.extract_layer(work, SINGLE_LAYER, content_dir, issues);
            return;
        }

        let entries = match read_untrusted_file(&manifest_path)
            .and_then(|content| Ok(serde_json::from_str::<Vec<LayerManifestEntry>>(&content)?))
        {
            Ok(entries) => entries,
            Err(e) => {
                issues.push(BundleIssue::LayerManifest {
                    details: e.to_string(),
                });
                return;
            }
        };

        if entries.is_empty() {
            issues.push(BundleIssue::LayerManifest {
                details: format!("{} lists no images", LAYER_MANIFEST),
            });
            return;
        }

        for entry in &entries {
            for layer in &entry.layers {
                self.extract_layer(work, layer, content_dir, issues);
            }
        }
    }

    fn extract_layer(
        &self,
        work: &Path,
        layer: &str,
        content_dir: &Path,
        issues: &mut Vec<BundleIssue>,
    ) {
        if !is_contained(layer) {
            issues.push(BundleIssue::LayerUntar {
                layer: layer.to_string(),
                details: "layer path escapes the working directory".to_string(),
            });
            return;
        }

        if let Err(e) = self.archive.extract(&work.join(layer), content_dir) {
            issues.push(BundleIssue::LayerUntar {
                layer: layer.to_string(),
                details: e.to_string(),
            });
        }
    }
}

/// `repo@sha256:...` cannot be saved by digest; the repository is enough
pub fn strip_digest(image: &str) -> &str {
    image.split('@').next().unwrap_or(image)
}

fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    !relative.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Deletes `.wh.<name>` and `.wh..wh..opq` markers anywhere under `dir`
fn remove_whiteouts(dir: &Path) {
    let markers: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(WHITEOUT_PREFIX)
        })
        .map(|entry| entry.into_path())
        .collect();

    for marker in markers {
        let removed = match fs::symlink_metadata(&marker) {
            Ok(m) if m.is_dir() => fs::remove_dir_all(&marker),
            Ok(_) => fs::remove_file(&marker),
            Err(e) => Err(e),
        };
        if let Err(e) = removed {
            tracing::debug!(path = %marker.display(), "unable to remove whiteout: {}", e);
        }
    }
}

fn remove_root_owned(content_dir: &Path) {
    let root = content_dir.join(ROOT_OWNED_DIR);
    if fs::symlink_metadata(&root).is_ok() {
        if let Err(e) = fs::remove_dir_all(&root) {
            tracing::debug!(path = %root.display(), "unable to remove root-owned dir: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::ImageInspection;
    use crate::shared::Result;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Runtime that always succeeds and writes nothing
    #[derive(Default)]
    struct FakeRuntime {
        fail_pull: bool,
        removed: RefCell<Vec<String>>,
    }

    impl ContainerRuntime for FakeRuntime {
        fn pull(&self, _image: &str) -> Result<()> {
            if self.fail_pull {
                anyhow::bail!("manifest unknown");
            }
            Ok(())
        }

        fn save(&self, _image: &str, archive: &Path) -> Result<()> {
            fs::write(archive, "")?;
            Ok(())
        }

        fn inspect(&self, _image: &str) -> Result<ImageInspection> {
            Ok(ImageInspection::default())
        }

        fn remove(&self, image: &str) -> Result<()> {
            self.removed.borrow_mut().push(image.to_string());
            Ok(())
        }
    }

    /// Extractor that "unpacks" archives by writing a fixed file set
    #[derive(Default)]
    struct FakeArchive {
        contents: HashMap<String, Vec<(&'static str, &'static str)>>,
        extracted: RefCell<Vec<String>>,
    }

    impl FakeArchive {
        fn with(mut self, archive: &str, files: Vec<(&'static str, &'static str)>) -> Self {
            self.contents.insert(archive.to_string(), files);
            self
        }
    }

    impl ArchiveExtractor for FakeArchive {
        fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
            let name = archive.file_name().unwrap().to_string_lossy().to_string();
            self.extracted.borrow_mut().push(name.clone());
            let files = self
                .contents
                .get(&name)
                .ok_or_else(|| anyhow::anyhow!("{}: Cannot open: No such file", name))?;
            for (path, content) in files {
                let target = destination.join(path);
                fs::create_dir_all(target.parent().unwrap())?;
                fs::write(target, content)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_layers_are_merged_in_order() {
        let work_root = TempDir::new().unwrap();
        let archive = FakeArchive::default()
            .with(
                "etcd.v1.tar",
                vec![(
                    "manifest.json",
                    r#"[{"Config":"c.json","Layers":["l1/layer.tar","l2/layer.tar"]}]"#,
                )],
            )
            .with(
                "layer.tar",
                vec![
                    ("manifests/csv.yaml", "first"),
                    ("manifests/.wh..wh..opq", ""),
                    ("metadata/.wh.old.yaml", ""),
                    ("root/.bashrc", ""),
                ],
            );
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            archive,
            work_root.path().to_path_buf(),
            false,
        );

        let extraction = extractor.extract("quay.io/etcd/bundle@sha256:abc", "etcd.v1");
        assert!(extraction.issues.is_empty(), "{:?}", extraction.issues);

        let image = extraction.image.unwrap();
        let content = image.content_dir();
        assert_eq!(
            fs::read_to_string(content.join("manifests/csv.yaml")).unwrap(),
            "first"
        );
        assert!(!content.join("manifests/.wh..wh..opq").exists());
        assert!(!content.join("metadata/.wh.old.yaml").exists());
        assert!(!content.join("root").exists());
        assert_eq!(
            *extractor.archive.extracted.borrow(),
            vec!["etcd.v1.tar", "layer.tar", "layer.tar"]
        );

        let work = image.work_dir().to_path_buf();
        drop(image);
        assert!(!work.exists());
    }

    #[test]
    fn test_single_layer_without_manifest() {
        let work_root = TempDir::new().unwrap();
        let archive = FakeArchive::default()
            .with("bundle.tar", vec![])
            .with("layer.tar", vec![("manifests/csv.yaml", "only")]);
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            archive,
            work_root.path().to_path_buf(),
            false,
        );

        let extraction = extractor.extract("quay.io/example/bundle:v1", "bundle");
        assert!(extraction.issues.is_empty());
        assert!(extraction
            .image
            .unwrap()
            .content_dir()
            .join("manifests/csv.yaml")
            .exists());
    }

    #[test]
    fn test_failed_pull_stops_extraction() {
        let work_root = TempDir::new().unwrap();
        let extractor = BundleExtractor::new(
            FakeRuntime {
                fail_pull: true,
                ..Default::default()
            },
            FakeArchive::default(),
            work_root.path().to_path_buf(),
            false,
        );

        let extraction = extractor.extract("quay.io/example/missing:v1", "missing");
        assert!(extraction.image.is_none());
        assert_eq!(extraction.issues.len(), 1);
        assert!(matches!(extraction.issues[0], BundleIssue::Download { .. }));
        assert!(!extraction.pulled());
        assert!(extractor.archive.extracted.borrow().is_empty());
    }

    #[test]
    fn test_work_dir_failure_after_pull() {
        let dir = TempDir::new().unwrap();
        let work_root = dir.path().join("work");
        fs::write(&work_root, "").unwrap();
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            FakeArchive::default(),
            work_root,
            false,
        );

        let extraction = extractor.extract("quay.io/example/bundle:v1", "bundle");
        assert!(extraction.image.is_none());
        assert!(matches!(extraction.issues[0], BundleIssue::WorkDir { .. }));
        assert!(extraction.pulled());
    }

    #[test]
    fn test_missing_image_path() {
        let work_root = TempDir::new().unwrap();
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            FakeArchive::default(),
            work_root.path().to_path_buf(),
            false,
        );
        let extraction = extractor.extract("", "orphan");
        assert_eq!(extraction.issues, vec![BundleIssue::MissingImagePath]);
        assert!(!extraction.pulled());
    }

    #[test]
    fn test_untar_failures_are_recorded_and_processing_continues() {
        let work_root = TempDir::new().unwrap();
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            FakeArchive::default(),
            work_root.path().to_path_buf(),
            false,
        );

        let extraction = extractor.extract("quay.io/example/bundle:v1", "bundle");
        assert!(extraction.image.is_some());
        assert!(matches!(extraction.issues[0], BundleIssue::Untar { .. }));
        assert!(matches!(
            extraction.issues[1],
            BundleIssue::LayerUntar { ref layer, .. } if layer == "layer.tar"
        ));
    }

    #[test]
    fn test_escaping_layer_path_is_rejected() {
        let work_root = TempDir::new().unwrap();
        let archive = FakeArchive::default().with(
            "evil.tar",
            vec![("manifest.json", r#"[{"Config":"c","Layers":["../../outside.tar"]}]"#)],
        );
        let extractor = BundleExtractor::new(
            FakeRuntime::default(),
            archive,
            work_root.path().to_path_buf(),
            false,
        );

        let extraction = extractor.extract("quay.io/example/evil:v1", "evil");
        assert!(matches!(
            extraction.issues[0],
            BundleIssue::LayerUntar { ref details, .. } if details.contains("escapes")
        ));
    }

    #[test]
    fn test_release_respects_server_mode() {
        let work_root = TempDir::new().unwrap();
        let local = BundleExtractor::new(
            FakeRuntime::default(),
            FakeArchive::default(),
            work_root.path().to_path_buf(),
            false,
        );
        local.release("quay.io/example/bundle:v1");
        assert_eq!(*local.runtime().removed.borrow(), vec!["quay.io/example/bundle:v1"]);

        let server = BundleExtractor::new(
            FakeRuntime::default(),
            FakeArchive::default(),
            work_root.path().to_path_buf(),
            true,
        );
        server.release("quay.io/example/bundle:v1");
        assert!(server.runtime().removed.borrow().is_empty());
    }

    #[test]
    fn test_strip_digest() {
        assert_eq!(strip_digest("quay.io/a/b@sha256:123"), "quay.io/a/b");
        assert_eq!(strip_digest("quay.io/a/b:v1"), "quay.io/a/b:v1");
    }
}
