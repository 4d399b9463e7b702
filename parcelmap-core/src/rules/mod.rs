// Classification rules for county extra-feature records.
// - matcher.rs: case-insensitive regex matchers
// - rule.rs: rule descriptors and compiled rules
// - builder.rs: RuleTableBuilder and the ordered RuleTable
// - builtin.rs: the compiled-in county table

pub mod builder;
pub mod builtin;
pub mod matcher;
pub mod rule;

pub use builder::{RuleTable, RuleTableBuilder};
pub use builtin::{county_rule_table, register_builtin_rules};
pub use matcher::{Matcher, PatternMatcher};
pub use rule::{ClassificationRule, RuleDescriptor, RuleKind};
