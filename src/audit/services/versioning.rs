use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

static CHANNEL_NAME_CONVENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(alpha|beta|candidate|fast|stable|preview|eus)(-v?\d+(\.\d+)*)?$")
        .expect("channel naming regex is valid")
});

const COMPARATOR_OPERATORS: [&str; 11] =
    ["", "=", "==", "!=", "!", ">", ">=", "=>", "<", "<=", "=<"];

/// Versioning rules OLM applies to bundles and channels
pub struct VersioningRules;

impl VersioningRules {
    /// Whether `version` is a strict semantic version (`spec.version` of a CSV)
    pub fn is_valid_version(version: Option<&str>) -> bool {
        version.is_some_and(|v| Version::parse(v).is_ok())
    }

    /// Whether `range` is a valid blang-style range as used by `olm.skipRange`
    ///
    /// Comparators within an alternative are separated by spaces and
    /// alternatives by `||`, e.g. `>=4.1.0 <4.2.0 || >=5.0.0 <5.1.0`. A space
    /// after an operator does not split it from its version. Versions must be
    /// complete, except that `x` may stand for the minor or patch part.
    pub fn is_valid_skip_range(range: &str) -> bool {
        let tokens = split_comparators(range);
        if tokens.is_empty() {
            return false;
        }
        tokens.split(|token| token == "||").all(|alternative| {
            !alternative.is_empty() && alternative.iter().all(|c| is_valid_comparator(c))
        })
    }

    /// Whether a channel name follows the recommended naming convention
    pub fn follows_channel_naming(channel: &str) -> bool {
        CHANNEL_NAME_CONVENTION.is_match(channel)
    }
}

/// Splits a range on spaces, keeping an operator attached to the version after it
fn split_comparators(range: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut last = None;
    for c in range.chars() {
        if c != ' ' {
            current.push(c);
            last = Some(c);
        } else if !matches!(last, Some('>' | '<' | '=')) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_valid_comparator(comparator: &str) -> bool {
    let Some(start) = comparator.find(|c: char| c.is_ascii_digit()) else {
        return false;
    };
    let (operator, version) = comparator.split_at(start);
    COMPARATOR_OPERATORS.contains(&operator) && Version::parse(&fill_wildcards(version)).is_ok()
}

/// `1.x` and `1.x.x` become `1.0.0`, `1.2.x` becomes `1.2.0`
fn fill_wildcards(version: &str) -> String {
    if !version.contains('x') {
        return version.to_string();
    }
    let filled = version.replacen(".x.x", ".x", 1).replacen(".x", ".0", 1);
    if filled.split('.').count() == 2 {
        format!("{}.0", filled)
    } else {
        filled
    }
}
