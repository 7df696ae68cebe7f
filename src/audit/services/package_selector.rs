use crate::audit::domain::CatalogPackage;
use crate::shared::error::AuditError;
use crate::shared::Result;

/// Maximum number of --filter patterns
const MAX_FILTER_PATTERNS: usize = 64;

/// Maximum length of a single pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// PackageSelector - picks the catalog packages an audit run covers
///
/// Patterns support '*' matching zero or more characters. With no patterns
/// every package is selected. `limit` caps the number of selected packages
/// after filtering, in catalog order.
#[derive(Debug, Default)]
pub struct PackageSelector {
    patterns: Vec<PackagePattern>,
    limit: Option<usize>,
}

impl PackageSelector {
    /// # Errors
    /// - Too many patterns (> MAX_FILTER_PATTERNS)
    /// - Empty, overlong, or `*`-only patterns, or patterns with characters
    ///   that cannot appear in a package name
    pub fn new(patterns: Vec<String>, limit: Option<usize>) -> Result<Self> {
        if patterns.len() > MAX_FILTER_PATTERNS {
            return Err(AuditError::Validation {
                message: format!(
                    "Too many filter patterns: {} (maximum: {})",
                    patterns.len(),
                    MAX_FILTER_PATTERNS
                ),
            }
            .into());
        }

        let patterns = patterns
            .into_iter()
            .map(PackagePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns, limit })
    }

    pub fn matches(&self, package_name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(package_name))
    }

    pub fn select<'a>(&self, packages: &'a [CatalogPackage]) -> Vec<&'a CatalogPackage> {
        let selected = packages.iter().filter(|p| self.matches(&p.name));
        match self.limit {
            Some(limit) => selected.take(limit).collect(),
            None => selected.collect(),
        }
    }

    /// Patterns that match none of `packages`
    pub fn unmatched_patterns(&self, packages: &[CatalogPackage]) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !packages.iter().any(|pkg| p.matches(&pkg.name)))
            .map(|p| p.original.clone())
            .collect()
    }
}

#[derive(Debug)]
struct PackagePattern {
    original: String,
    /// Literal fragments between '*' wildcards
    parts: Vec<String>,
    anchored_start: bool,
    anchored_end: bool,
}

impl PackagePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;

        Ok(Self {
            parts: pattern
                .split('*')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            anchored_start: !pattern.starts_with('*'),
            anchored_end: !pattern.ends_with('*'),
            original: pattern,
        })
    }

    fn matches(&self, name: &str) -> bool {
        if self.parts.len() == 1 && self.anchored_start && self.anchored_end {
            return name == self.parts[0];
        }

        let mut rest = name;
        for (i, part) in self.parts.iter().enumerate() {
            let is_first = i == 0;
            let is_last = i == self.parts.len() - 1;

            if is_first && self.anchored_start {
                match rest.strip_prefix(part.as_str()) {
                    Some(r) => rest = r,
                    None => return false,
                }
            } else if is_last && self.anchored_end {
                return rest.ends_with(part.as_str());
            } else {
                match rest.find(part.as_str()) {
                    Some(pos) => rest = &rest[pos + part.len()..],
                    None => return false,
                }
            }
        }

        !self.anchored_end || rest.is_empty()
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    let invalid = |message: String| -> anyhow::Error { AuditError::Validation { message }.into() };

    if pattern.is_empty() {
        return Err(invalid("Filter pattern cannot be empty".to_string()));
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(invalid(format!(
            "Filter pattern is too long ({} characters, maximum: {})",
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }

    if pattern.chars().all(|c| c == '*') {
        return Err(invalid(format!(
            "Filter pattern '{}' contains only wildcards",
            pattern
        )));
    }

    if let Some(c) = pattern
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '*')))
    {
        return Err(invalid(format!(
            "Filter pattern '{}' contains invalid character '{}'",
            pattern, c
        )));
    }

    Ok(())
}
