use crate::rules::builder::RuleTable;
use crate::types::*;
use tracing::{debug, info};

/// A feature record together with everything the rule table said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFeature {
    pub record: FeatureRecord,
    pub result: ClassificationResult,
}

/// Parcel-level view over a batch of features. Smart features are unioned in
/// first-seen order; adjustment maps are merged with later features winning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRollup {
    pub classified: Vec<ClassifiedFeature>,
    pub unmatched: Vec<UnmatchedFeature>,
    pub blank: usize,
    pub utility_smart_features: Vec<String>,
    pub utility_adjustments: AdjustmentMap,
    pub structure_adjustments: AdjustmentMap,
}

pub struct FeatureClassifier {
    table: RuleTable,
}

impl FeatureClassifier {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Union of every matching rule's fragments, or `None` when the record is
    /// blank or nothing matched.
    pub fn classify(&self, record: &FeatureRecord) -> Option<ClassificationResult> {
        let code = record.normalized_code();
        let description = record.normalized_description();
        if code.is_empty() && description.is_empty() {
            return None;
        }

        let mut result = ClassificationResult::default();
        for rule in self.table.rules() {
            if !rule.matches(&code, &description) {
                continue;
            }
            debug!(rule = %rule.label, code = %code, description = %description, "rule matched");

            let descriptor = &rule.descriptor;
            if let Some(layout) = &descriptor.layout {
                result.layout.push(layout.clone());
            }
            if let Some(accessory) = &descriptor.accessory {
                result.accessory_structures.push(accessory.clone());
            }
            if let Some(feature) = &descriptor.utility_smart_feature {
                push_unique(&mut result.utility_smart_features, feature);
            }
            if let Some(adjustments) = &descriptor.utility_adjustments {
                merge_adjustments(&mut result.utility_adjustments, adjustments);
            }
            if let Some(adjustments) = &descriptor.structure_adjustments {
                merge_adjustments(&mut result.structure_adjustments, adjustments);
            }
        }

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn classify_all(&self, records: &[FeatureRecord]) -> FeatureRollup {
        let mut rollup = FeatureRollup::default();

        for record in records {
            if record.normalized_code().is_empty() && record.normalized_description().is_empty() {
                rollup.blank += 1;
                continue;
            }

            match self.classify(record) {
                Some(result) => {
                    for feature in &result.utility_smart_features {
                        push_unique(&mut rollup.utility_smart_features, feature);
                    }
                    merge_adjustments(&mut rollup.utility_adjustments, &result.utility_adjustments);
                    merge_adjustments(
                        &mut rollup.structure_adjustments,
                        &result.structure_adjustments,
                    );
                    rollup.classified.push(ClassifiedFeature {
                        record: record.clone(),
                        result,
                    });
                }
                None => rollup.unmatched.push(UnmatchedFeature::from(record)),
            }
        }

        info!(
            total = records.len(),
            classified = rollup.classified.len(),
            unmatched = rollup.unmatched.len(),
            blank = rollup.blank,
            "classified extra features"
        );
        rollup
    }
}

fn push_unique(target: &mut Vec<String>, value: &str) {
    if !target.iter().any(|existing| existing == value) {
        target.push(value.to_string());
    }
}

fn merge_adjustments(target: &mut AdjustmentMap, source: &AdjustmentMap) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}
