use thiserror::Error;

/// Configuration-time failures while assembling a rule table.
/// Classification itself never fails.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern `{pattern}` in rule {label}: {source}")]
    InvalidPattern {
        label: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule {label} has no usable matchers")]
    EmptyRule { label: String },
}
