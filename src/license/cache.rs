//! Memoized parsing for callers that see the same expressions repeatedly,
//! such as a dependency scan where most packages declare `MIT` or
//! `MIT OR Apache-2.0`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;

use super::error::ParseError;
use super::expression::Expression;
use super::parser::{parse, parse_lenient};
use super::reference::ReferenceMatcher;

type Slot = Arc<OnceCell<Result<Expression, ParseError>>>;

/// A thread-safe cache of parse results keyed by the input string.
///
/// Each distinct input is parsed at most once, even when several threads ask
/// for it at the same time; latecomers block on the first parse.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: RwLock<HashMap<String, Slot>>,
    /// Set for caches that parse with [`parse_lenient`].
    lenient: Option<ReferenceMatcher>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose misses go through [`parse_lenient`] with `matcher`.
    pub fn lenient(matcher: ReferenceMatcher) -> Self {
        Self {
            entries: RwLock::default(),
            lenient: Some(matcher),
        }
    }

    /// Parse `input`, reusing an earlier result for the same string.
    pub fn parse(&self, input: &str) -> Result<Expression, ParseError> {
        self.slot(input)
            .get_or_init(|| match &self.lenient {
                Some(matcher) => parse_lenient(input, matcher),
                None => parse(input),
            })
            .clone()
    }

    /// Number of distinct inputs seen so far.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, input: &str) -> Slot {
        if let Some(slot) = self.read_entries().get(input) {
            return Arc::clone(slot);
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(entries.entry(input.to_string()).or_default())
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Slot>> {
        // Slots are only ever inserted, so a poisoned map is still consistent.
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cached_result_matches_parse() {
        let cache = ParseCache::new();
        let first = cache.parse("MIT OR Apache-2.0").unwrap();
        let second = cache.parse("MIT OR Apache-2.0").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, parse("MIT OR Apache-2.0").unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_cached() {
        let cache = ParseCache::new();
        assert_eq!(cache.parse(""), Err(ParseError::Empty));
        assert_eq!(cache.parse(""), Err(ParseError::Empty));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lenient_cache() {
        let cache = ParseCache::lenient(ReferenceMatcher::default());
        let first = cache.parse("MIT/Apache-2.0").unwrap();
        assert_eq!(first.to_string(), "MIT OR Apache-2.0");
        assert_eq!(cache.parse("MIT/Apache-2.0"), Ok(first));
        assert_eq!(cache.len(), 1);

        // A strict cache keeps rejecting the same input.
        assert!(ParseCache::new().parse("MIT/Apache-2.0").is_err());
    }

    #[test]
    fn test_concurrent_access_computes_once() {
        let cache = ParseCache::new();
        let inits = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let slot = cache.slot("GPL-2.0-only WITH Classpath-exception-2.0");
                    slot.get_or_init(|| {
                        inits.fetch_add(1, Ordering::SeqCst);
                        parse("GPL-2.0-only WITH Classpath-exception-2.0")
                    });
                });
            }
        });

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.parse("GPL-2.0-only WITH Classpath-exception-2.0").is_ok());
    }
}
