//! Package version ranges as declared on package references

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version range '{input}': {reason}")]
pub struct VersionRangeParseError {
    pub input: String,
    pub reason: String,
}

/// A version range such as `1.2.3`, `[1.0, 2.0)` or `(, 3.0]`
///
/// A bare version means "this version or higher". Versions are kept in
/// normalized form (at least three numeric components).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    min_version: Option<String>,
    is_min_inclusive: bool,
    max_version: Option<String>,
    is_max_inclusive: bool,
}

impl VersionRange {
    /// `[version, )`
    pub fn at_least(version: &str) -> Result<Self, VersionRangeParseError> {
        Ok(Self {
            min_version: Some(normalize_version(version)?),
            is_min_inclusive: true,
            max_version: None,
            is_max_inclusive: false,
        })
    }

    pub fn min_version(&self) -> Option<&str> {
        self.min_version.as_deref()
    }

    pub fn max_version(&self) -> Option<&str> {
        self.max_version.as_deref()
    }

    pub fn is_min_inclusive(&self) -> bool {
        self.is_min_inclusive
    }

    pub fn is_max_inclusive(&self) -> bool {
        self.is_max_inclusive
    }

    /// Normalized range text, e.g. `[1.0.0, )`
    pub fn to_normalized_string(&self) -> String {
        self.to_string()
    }
}

/// Normalize a version string: `1.0` => `1.0.0`, `2.1.0.0` => `2.1.0`, prerelease labels kept.
pub fn normalize_version(input: &str) -> Result<String, VersionRangeParseError> {
    let err = |reason: &str| VersionRangeParseError {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let (numbers, label) = match trimmed.split_once('-') {
        Some((numbers, label)) => (numbers, Some(label)),
        None => (trimmed, None),
    };
    // Build metadata does not participate in normalized versions
    let numbers = numbers.split('+').next().unwrap_or_default();

    let mut parts = numbers
        .split('.')
        .map(|p| p.parse::<u64>().map_err(|_| err("non-numeric version component")))
        .collect::<Result<Vec<_>, _>>()?;

    if parts.is_empty() || parts.len() > 4 {
        return Err(err("expected between one and four version components"));
    }
    while parts.len() < 3 {
        parts.push(0);
    }
    if parts.len() == 4 && parts[3] == 0 {
        parts.pop();
    }

    let mut normalized = parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(".");
    if let Some(label) = label.map(|l| l.split('+').next().unwrap_or_default()) {
        if label.is_empty() {
            return Err(err("empty prerelease label"));
        }
        normalized.push('-');
        normalized.push_str(label);
    }
    Ok(normalized)
}

impl FromStr for VersionRange {
    type Err = VersionRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = |reason: &str| VersionRangeParseError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(err("empty range"));
        }

        let first = trimmed.chars().next().unwrap_or_default();
        if first != '[' && first != '(' {
            return Self::at_least(trimmed);
        }

        let last = trimmed.chars().last().unwrap_or_default();
        if last != ']' && last != ')' {
            return Err(err("missing closing bracket"));
        }

        let is_min_inclusive = first == '[';
        let is_max_inclusive = last == ']';
        let inner = &trimmed[1..trimmed.len() - 1];

        let bound = |text: &str| -> Result<Option<String>, VersionRangeParseError> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                normalize_version(text).map(Some)
            }
        };

        match inner.split_once(',') {
            Some((min, max)) => {
                let min_version = bound(min)?;
                let max_version = bound(max)?;
                if min_version.is_none() && max_version.is_none() {
                    return Err(err("a range needs at least one bound"));
                }
                Ok(Self {
                    min_version,
                    is_min_inclusive: is_min_inclusive && !min.trim().is_empty(),
                    max_version,
                    is_max_inclusive: is_max_inclusive && !max.trim().is_empty(),
                })
            }
            // [1.0] is an exact match
            None => {
                if !(is_min_inclusive && is_max_inclusive) {
                    return Err(err("an exact version must use square brackets"));
                }
                let exact = bound(inner)?.ok_or_else(|| err("empty exact version"))?;
                Ok(Self {
                    min_version: Some(exact.clone()),
                    is_min_inclusive: true,
                    max_version: Some(exact),
                    is_max_inclusive: true,
                })
            }
        }
    }
}

impl TryFrom<String> for VersionRange {
    type Error = VersionRangeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min_version.is_some() && self.min_version == self.max_version {
            return write!(f, "[{}]", self.min_version.as_deref().unwrap_or_default());
        }
        write!(
            f,
            "{}{}, {}{}",
            if self.is_min_inclusive { '[' } else { '(' },
            self.min_version.as_deref().unwrap_or_default(),
            self.max_version.as_deref().unwrap_or_default(),
            if self.is_max_inclusive { ']' } else { ')' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_version_is_minimum() {
        let range: VersionRange = "1.2".parse().unwrap();
        assert_eq!(range.min_version(), Some("1.2.0"));
        assert!(range.is_min_inclusive());
        assert_eq!(range.max_version(), None);
        assert_eq!(range.to_normalized_string(), "[1.2.0, )");
    }

    #[test]
    fn test_bracketed_range() {
        let range: VersionRange = "[1.0, 2.0)".parse().unwrap();
        assert_eq!(range.min_version(), Some("1.0.0"));
        assert_eq!(range.max_version(), Some("2.0.0"));
        assert!(!range.is_max_inclusive());
    }

    #[test]
    fn test_exact_version() {
        let range: VersionRange = "[3.1.4]".parse().unwrap();
        assert_eq!(range.min_version(), Some("3.1.4"));
        assert_eq!(range.to_string(), "[3.1.4]");
    }

    #[test]
    fn test_upper_bound_only() {
        let range: VersionRange = "(, 5.0]".parse().unwrap();
        assert_eq!(range.min_version(), None);
        assert!(!range.is_min_inclusive());
        assert!(range.is_max_inclusive());
    }

    #[test]
    fn test_prerelease_is_kept() {
        assert_eq!(normalize_version("2.0-beta.1").unwrap(), "2.0.0-beta.1");
        assert_eq!(normalize_version("1.2.3.0").unwrap(), "1.2.3");
    }

    #[test]
    fn test_invalid_ranges() {
        assert!("".parse::<VersionRange>().is_err());
        assert!("[1.0".parse::<VersionRange>().is_err());
        assert!("(1.0)".parse::<VersionRange>().is_err());
        assert!("abc".parse::<VersionRange>().is_err());
        assert!("[,]".parse::<VersionRange>().is_err());
    }
}
