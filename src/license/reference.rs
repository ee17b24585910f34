//! Recognition of scanner-generated `LicenseRef-` identifiers.
//!
//! Scanners report licenses they cannot map to SPDX as synthetic references
//! such as `LicenseRef-scancode-public-domain`, optionally namespaced by the
//! tool that produced them. This module decides whether such a reference
//! denotes a given license name.

use serde::Deserialize;

use super::catalog::{self, License};

/// Namespaces of the scanners whose references are recognized by default.
pub const DEFAULT_NAMESPACES: &[&str] = &["ORT", "Askalono", "BoyterLc", "Licensee", "scancode"];

const PREFIX: &str = "LicenseRef-";

/// Return whether `candidate` is a `LicenseRef-` to `name`.
///
/// Accepted shapes are `LicenseRef-<name>` and `LicenseRef-<namespace>-<name>`
/// where `<namespace>` is one of `namespaces` (compared case-insensitively).
/// `ignore_case` applies to the `<name>` part.
pub fn is_license_ref_to<S: AsRef<str>>(
    candidate: &str,
    name: &str,
    ignore_case: bool,
    namespaces: &[S],
) -> bool {
    if name.trim().is_empty() || name.starts_with('-') || name.ends_with('-') {
        return false;
    }

    let Some(without_prefix) = candidate.strip_prefix(PREFIX) else {
        return false;
    };

    let Some(infix) = strip_suffix(without_prefix, name, ignore_case) else {
        return false;
    };
    if infix.is_empty() {
        return true;
    }

    let Some(namespace) = infix.strip_suffix('-') else {
        return false;
    };

    namespaces
        .iter()
        .any(|ns| eq_ignore_case(ns.as_ref(), namespace))
}

/// Remove `suffix` from the end of `s`, comparing char by char.
fn strip_suffix<'a>(s: &'a str, suffix: &str, ignore_case: bool) -> Option<&'a str> {
    if !ignore_case {
        return s.strip_suffix(suffix);
    }

    let mut head = s;
    let mut chars = s.char_indices().rev();
    for expected in suffix.chars().rev() {
        let (index, actual) = chars.next()?;
        if !char_eq_ignore_case(actual, expected) {
            return None;
        }
        head = &s[..index];
    }
    Some(head)
}

fn char_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| char_eq_ignore_case(x, y))
}

/// [`is_license_ref_to`] with a fixed configuration, loadable from the
/// `[matcher]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReferenceMatcher {
    /// Compare the license name part case-insensitively.
    pub ignore_case: bool,
    /// Scanner namespaces accepted between the prefix and the name.
    pub namespaces: Vec<String>,
}

impl Default for ReferenceMatcher {
    fn default() -> Self {
        Self {
            ignore_case: true,
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
        }
    }
}

impl ReferenceMatcher {
    pub fn matches(&self, candidate: &str, name: &str) -> bool {
        is_license_ref_to(candidate, name, self.ignore_case, &self.namespaces)
    }

    /// Find the catalog license that `candidate` refers to.
    ///
    /// When several ids match (`MIT-0` and a hypothetical `0`), the longest
    /// one wins.
    pub fn resolve(&self, candidate: &str) -> Option<&'static License> {
        catalog::licenses()
            .filter(|license| self.matches(candidate, license.id))
            .max_by(|a, b| a.id.len().cmp(&b.id.len()).then_with(|| b.id.cmp(a.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(candidate: &str, name: &str) -> bool {
        is_license_ref_to(candidate, name, true, DEFAULT_NAMESPACES)
    }

    #[test]
    fn test_namespaced_reference() {
        assert!(matches("LicenseRef-scancode-public-domain", "public-domain"));
        assert!(matches("LicenseRef-ScanCode-public-domain", "public-domain"));
        assert!(matches("LicenseRef-ort-public-domain", "public-domain"));
    }

    #[test]
    fn test_plain_reference() {
        assert!(matches("LicenseRef-public-domain", "public-domain"));
        assert!(matches("LicenseRef-Public-Domain", "public-domain"));
    }

    #[test]
    fn test_unknown_namespace() {
        assert!(!matches("LicenseRef-unknown-tool-public-domain", "public-domain"));
    }

    #[test]
    fn test_missing_prefix() {
        assert!(!matches("Public-domain", "public-domain"));
        assert!(!matches("licenseref-public-domain", "public-domain"));
    }

    #[test]
    fn test_invalid_name() {
        assert!(!matches("LicenseRef-public-domain", ""));
        assert!(!matches("LicenseRef-public-domain", "   "));
        assert!(!matches("LicenseRef-public-domain", "-domain"));
        assert!(!matches("LicenseRef-public-domain", "public-"));
    }

    #[test]
    fn test_missing_separator() {
        assert!(!matches("LicenseRef-scancodepublic-domain", "public-domain"));
        assert!(!matches("LicenseRef-xmit", "mit"));
    }

    #[test]
    fn test_case_sensitive_name() {
        assert!(!is_license_ref_to(
            "LicenseRef-scancode-Public-Domain",
            "public-domain",
            false,
            DEFAULT_NAMESPACES
        ));
        assert!(is_license_ref_to(
            "LicenseRef-scancode-public-domain",
            "public-domain",
            false,
            DEFAULT_NAMESPACES
        ));
    }

    #[test]
    fn test_custom_namespaces() {
        let namespaces = vec!["fossology".to_string()];
        assert!(is_license_ref_to(
            "LicenseRef-FOSSology-mit",
            "mit",
            true,
            &namespaces
        ));
        assert!(!is_license_ref_to(
            "LicenseRef-scancode-mit",
            "mit",
            true,
            &namespaces
        ));
    }

    #[test]
    fn test_matcher_resolve() {
        let matcher = ReferenceMatcher::default();
        assert_eq!(matcher.resolve("LicenseRef-scancode-mit").map(|l| l.id), Some("MIT"));
        assert_eq!(matcher.resolve("LicenseRef-scancode-mit-0").map(|l| l.id), Some("MIT-0"));
        assert_eq!(
            matcher.resolve("LicenseRef-apache-2.0").map(|l| l.id),
            Some("Apache-2.0")
        );
        assert!(matcher.resolve("LicenseRef-scancode-public-domain").is_none());
        assert!(matcher.resolve("MIT").is_none());
    }
}
