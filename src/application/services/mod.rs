/// Application services shared by the use cases
mod bundle_extractor;

pub use bundle_extractor::{strip_digest, BundleExtractor, ExtractedImage, Extraction, CONTENT_DIR};
