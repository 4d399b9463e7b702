use crate::rules::matcher::PatternMatcher;
use std::collections::HashMap;

/// Memo of compiled exact-code matchers, keyed by normalized (trimmed,
/// upper-cased) code. Append-only; a code registered under several rules
/// is compiled once.
#[derive(Debug, Default, Clone)]
pub struct PatternCache {
    compiled: HashMap<String, PatternMatcher>,
    hits: usize,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Compiled matcher for `code`, or `None` when the code is blank.
    pub fn exact_code(&mut self, code: &str) -> Option<Result<PatternMatcher, regex::Error>> {
        let key = Self::normalize(code);
        if key.is_empty() {
            return None;
        }

        if let Some(matcher) = self.compiled.get(&key) {
            self.hits += 1;
            return Some(Ok(matcher.clone()));
        }

        Some(PatternMatcher::exact_code(&key).map(|matcher| {
            self.compiled.insert(key, matcher.clone());
            matcher
        }))
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Number of lookups served without compiling.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::matcher::Matcher;

    #[test]
    fn test_cache_reuses_normalized_codes() {
        let mut cache = PatternCache::new();
        let first = cache.exact_code("pol").unwrap().unwrap();
        let second = cache.exact_code(" POL ").unwrap().unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(first.source(), second.source());
        assert!(second.matches("POL"));
    }

    #[test]
    fn test_cache_skips_blank_codes() {
        let mut cache = PatternCache::new();
        assert!(cache.exact_code("   ").is_none());
        assert!(cache.is_empty());
    }
}
