use crate::error::RuleError;
use crate::rules::builder::{RuleTable, RuleTableBuilder};
use crate::rules::builtin::register_builtin_rules;
use crate::rules::rule::RuleDescriptor;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_building_space_type() -> String {
    "Building".to_string()
}

fn default_building_number() -> u32 {
    1
}

fn default_space_type_priorities() -> Vec<String> {
    [
        "Primary Bedroom",
        "Bedroom",
        "Primary Bathroom",
        "Full Bathroom",
        "Half Bathroom / Powder Room",
        "Living Area",
        "Kitchen",
        "Living Room",
        "Dining Room",
        "Family Room",
        "Laundry Room",
        "Basement",
        "Attic",
        "Attached Garage",
        "Detached Garage",
        "Carport",
        "Sunroom",
        "Screened Porch",
        "Enclosed Porch",
        "Porch",
        "Patio",
        "Deck",
        "Balcony",
        "Outdoor Pool",
        "Hot Tub / Spa Area",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Start from the compiled-in county table
    #[serde(default = "default_true")]
    pub include_builtin: bool,
    /// Extra pattern rules, appended after the built-in pattern rules
    #[serde(default)]
    pub pattern_rules: Vec<PatternRuleConfig>,
    /// Extra exact-code rules, appended after the built-in exact-code rules
    #[serde(default)]
    pub exact_code_rules: Vec<ExactCodeRuleConfig>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            pattern_rules: Vec::new(),
            exact_code_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRuleConfig {
    #[serde(default)]
    pub label: Option<String>,
    pub patterns: Vec<String>,
    #[serde(flatten)]
    pub descriptor: RuleDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactCodeRuleConfig {
    pub codes: Vec<String>,
    #[serde(flatten)]
    pub descriptor: RuleDescriptor,
}

impl RulesConfig {
    /// Built-in rules (if enabled) plus configured rules, pattern family first.
    pub fn build_table(&self) -> Result<RuleTable, RuleError> {
        let mut builder = RuleTableBuilder::new();
        if self.include_builtin {
            register_builtin_rules(&mut builder)?;
        }

        for (position, rule) in self.pattern_rules.iter().enumerate() {
            let label = rule
                .label
                .clone()
                .unwrap_or_else(|| format!("configured_{}", position + 1));
            let patterns: Vec<&str> = rule.patterns.iter().map(String::as_str).collect();
            builder.pattern_rule(&label, &patterns, rule.descriptor.clone())?;
        }

        for rule in &self.exact_code_rules {
            builder.exact_code_rule(rule.codes.as_slice(), rule.descriptor.clone());
        }

        Ok(builder.build())
    }
}

/// How a child's segment is numbered within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingMode {
    /// 1-based rank inside the child's same-space-type sibling group
    #[default]
    PerSpaceType,
    /// 1-based rank across all siblings, in group priority order
    SiblingRank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Root nodes with this space type are numbered before all other roots
    #[serde(default = "default_building_space_type")]
    pub building_space_type: String,
    /// Sibling group order; space types not listed sort after all listed ones
    #[serde(default = "default_space_type_priorities")]
    pub space_type_priorities: Vec<String>,
    #[serde(default)]
    pub numbering: NumberingMode,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            building_space_type: default_building_space_type(),
            space_type_priorities: default_space_type_priorities(),
            numbering: NumberingMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Building that features without a usable building number attach to
    #[serde(default = "default_building_number")]
    pub default_building_number: u32,
    /// Emit a layout node for every classified layout fragment
    #[serde(default = "default_true")]
    pub emit_feature_layouts: bool,
    /// Label the first bedroom of each building as the primary bedroom
    #[serde(default = "default_true")]
    pub first_bedroom_is_primary: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_building_number: default_building_number(),
            emit_feature_layouts: true,
            first_bedroom_is_primary: true,
        }
    }
}

impl MapperConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: MapperConfig =
            serde_yaml::from_str(&content).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!(path = p, error = %e, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::RuleKind;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: MapperConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.rules.include_builtin);
        assert_eq!(config.indexing.building_space_type, "Building");
        assert_eq!(config.indexing.numbering, NumberingMode::PerSpaceType);
        assert_eq!(config.indexing.space_type_priorities[0], "Primary Bedroom");
        assert_eq!(config.layout.default_building_number, 1);
    }

    #[test]
    fn test_configured_rules_extend_table() {
        let yaml = r#"
rules:
  include_builtin: false
  pattern_rules:
    - label: dock
      patterns: ["^DK", "DOCK"]
      accessory:
        type: Boat Dock
  exact_code_rules:
    - codes: ["xq1", "XQ2"]
      utility_smart_feature: Elevator
indexing:
  numbering: sibling_rank
  space_type_priorities: [Kitchen, Bedroom]
"#;
        let config: MapperConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.indexing.numbering, NumberingMode::SiblingRank);
        assert_eq!(config.indexing.space_type_priorities, vec!["Kitchen", "Bedroom"]);

        let table = config.rules.build_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].label, "dock");
        assert_eq!(table.rules()[1].kind, RuleKind::ExactCode);
        assert_eq!(
            table.rules()[1].descriptor.utility_smart_feature.as_deref(),
            Some("Elevator")
        );
    }

    #[test]
    fn test_configured_rules_follow_builtin_families() {
        let yaml = r#"
rules:
  pattern_rules:
    - patterns: ["^ZZP"]
      accessory:
        type: Kiosk
"#;
        let config: MapperConfig = serde_yaml::from_str(yaml).unwrap();
        let table = config.rules.build_table().unwrap();
        let position = table
            .rules()
            .iter()
            .position(|r| r.label == "configured_1")
            .unwrap();
        assert_eq!(table.rules()[position + 1].kind, RuleKind::ExactCode);
        assert!(table.rules()[..position]
            .iter()
            .all(|r| r.kind == RuleKind::Pattern));
    }

    #[test]
    fn test_bad_configured_pattern_is_an_error() {
        let config: MapperConfig = serde_yaml::from_str(
            "rules:\n  pattern_rules:\n    - patterns: [\"(OPEN\"]\n      \
             accessory:\n        type: Shed\n",
        )
        .unwrap();
        assert!(config.rules.build_table().is_err());
    }

    #[test]
    fn test_missing_config_file_falls_back() {
        let config = MapperConfig::load_with_fallback(Some("/nonexistent/parcelmap.yaml"));
        assert!(config.rules.include_builtin);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("parcelmap_config_test.yaml");
        std::fs::write(&path, "layout:\n  default_building_number: 3\n").unwrap();

        let config = MapperConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.layout.default_building_number, 3);
        assert!(config.layout.emit_feature_layouts);

        std::fs::remove_file(path).ok();
    }
}
