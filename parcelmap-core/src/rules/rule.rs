use crate::types::{AccessoryDescriptor, AdjustmentMap, LayoutDescriptor};
use serde::{Deserialize, Serialize};

use super::matcher::{Matcher, PatternMatcher};

/// Output fragments a rule contributes when it matches. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    #[serde(default)]
    pub layout: Option<LayoutDescriptor>,
    #[serde(default)]
    pub accessory: Option<AccessoryDescriptor>,
    #[serde(default)]
    pub utility_smart_feature: Option<String>,
    #[serde(default)]
    pub utility_adjustments: Option<AdjustmentMap>,
    #[serde(default)]
    pub structure_adjustments: Option<AdjustmentMap>,
}

impl RuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: LayoutDescriptor) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn accessory(mut self, accessory_type: &str) -> Self {
        self.accessory = Some(AccessoryDescriptor::new(accessory_type));
        self
    }

    pub fn smart_feature(mut self, feature: &str) -> Self {
        self.utility_smart_feature = Some(feature.to_string());
        self
    }

    pub fn utility(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.utility_adjustments
            .get_or_insert_with(AdjustmentMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn structure(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.structure_adjustments
            .get_or_insert_with(AdjustmentMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_none()
            && self.accessory.is_none()
            && self.utility_smart_feature.is_none()
            && self.utility_adjustments.as_ref().map_or(true, |m| m.is_empty())
            && self.structure_adjustments.as_ref().map_or(true, |m| m.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Pattern,
    ExactCode,
}

/// One entry of the ordered rule table.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub label: String,
    pub kind: RuleKind,
    pub matchers: Vec<PatternMatcher>,
    pub descriptor: RuleDescriptor,
}

impl ClassificationRule {
    /// True if any matcher hits the code or the description. Empty inputs are
    /// never tested, so a pattern like `^$` can't match a blank field.
    pub fn matches(&self, code: &str, description: &str) -> bool {
        self.matchers.iter().any(|matcher| {
            (!code.is_empty() && matcher.matches(code))
                || (!description.is_empty() && matcher.matches(description))
        })
    }

    pub fn sources(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.source()).collect()
    }
}
