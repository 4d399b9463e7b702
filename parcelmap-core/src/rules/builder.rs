use crate::cache::PatternCache;
use crate::error::RuleError;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::matcher::PatternMatcher;
use super::rule::{ClassificationRule, RuleDescriptor, RuleKind};

/// Immutable, ordered rule table. Pattern rules come first, exact-code rules
/// after, each family in registration order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<ClassificationRule>,
}

impl RuleTable {
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// SHA-256 over every rule's matchers and descriptor, in table order.
    /// Changes whenever a rule is added, removed, reordered or edited.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for rule in &self.rules {
            hasher.update(rule.label.as_bytes());
            hasher.update([rule.kind as u8]);
            for source in rule.sources() {
                hasher.update(source.as_bytes());
                hasher.update([0u8]);
            }
            // Descriptors hold only strings, bools and JSON values in ordered
            // maps, so serializing them cannot fail.
            let descriptor = serde_json::to_string(&rule.descriptor).unwrap_or_default();
            hasher.update(descriptor.as_bytes());
            hasher.update([0xffu8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Assembles a [`RuleTable`]. Registration happens once at startup; the
/// built table is then shared read-only by the classifier.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    pattern_rules: Vec<ClassificationRule>,
    exact_code_rules: Vec<ClassificationRule>,
    cache: PatternCache,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand-written rule matching any of `patterns` (case-insensitive) against
    /// the code or the description. A bad pattern is a configuration error.
    pub fn pattern_rule(
        &mut self,
        label: &str,
        patterns: &[&str],
        descriptor: RuleDescriptor,
    ) -> Result<&mut Self, RuleError> {
        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let matcher =
                PatternMatcher::new(pattern).map_err(|source| RuleError::InvalidPattern {
                    label: label.to_string(),
                    pattern: pattern.to_string(),
                    source,
                })?;
            matchers.push(matcher);
        }

        if matchers.is_empty() {
            return Err(RuleError::EmptyRule {
                label: label.to_string(),
            });
        }

        self.pattern_rules.push(ClassificationRule {
            label: label.to_string(),
            kind: RuleKind::Pattern,
            matchers,
            descriptor,
        });
        Ok(self)
    }

    /// One rule shared by every code in `codes`, each compiled to `^CODE$`.
    /// Blank codes and codes that fail to compile are skipped; if nothing is
    /// left the rule is not added.
    pub fn exact_code_rule<S: AsRef<str>>(
        &mut self,
        codes: &[S],
        descriptor: RuleDescriptor,
    ) -> &mut Self {
        let mut matchers = Vec::with_capacity(codes.len());
        let mut normalized = Vec::with_capacity(codes.len());

        for code in codes {
            let code: &str = code.as_ref();
            match self.cache.exact_code(code) {
                Some(Ok(matcher)) => {
                    matchers.push(matcher);
                    normalized.push(PatternCache::normalize(code));
                }
                Some(Err(e)) => {
                    warn!(code = code, error = %e, "skipping exact code that failed to compile");
                }
                None => {}
            }
        }

        if matchers.is_empty() {
            warn!("exact-code rule has no usable codes, not registered");
            return self;
        }

        let label = format!("codes:{}", normalized.join(","));
        debug!(rule = %label, "registered exact-code rule");
        self.exact_code_rules.push(ClassificationRule {
            label,
            kind: RuleKind::ExactCode,
            matchers,
            descriptor,
        });
        self
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    pub fn build(self) -> RuleTable {
        let mut rules = self.pattern_rules;
        rules.extend(self.exact_code_rules);
        debug!(
            rules = rules.len(),
            cached_codes = self.cache.len(),
            "rule table built"
        );
        RuleTable { rules }
    }
}
