use regex::{Regex, RegexBuilder};

/// Anything that can decide whether a normalized feature string matches.
pub trait Matcher {
    fn matches(&self, text: &str) -> bool;
    fn source(&self) -> &str;
}

/// Case-insensitive compiled regex. Cloning shares the compiled program.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// `^CODE$` with the code escaped, so codes like `A/C` or `1.5` are literal.
    pub fn exact_code(code: &str) -> Result<Self, regex::Error> {
        Self::new(&format!("^{}$", regex::escape(code)))
    }
}

impl Matcher for PatternMatcher {
    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn source(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_case_insensitive() {
        let matcher = PatternMatcher::new("^POL").unwrap();
        assert!(matcher.matches("POL1"));
        assert!(matcher.matches("pol2"));
        assert!(!matcher.matches("SPOOL"));
    }

    #[test]
    fn test_exact_code_is_anchored_and_escaped() {
        let matcher = PatternMatcher::exact_code("A/C").unwrap();
        assert!(matcher.matches("A/C"));
        assert!(matcher.matches("a/c"));
        assert!(!matcher.matches("A/C2"));

        let dotted = PatternMatcher::exact_code("1.5").unwrap();
        assert!(dotted.matches("1.5"));
        assert!(!dotted.matches("105"));
        assert_eq!(dotted.source(), r"^1\.5$");
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(PatternMatcher::new("(POOL").is_err());
    }
}
