use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute overrides produced by rules (utility or structure fields).
/// Ordered so serialized output is stable across runs.
pub type AdjustmentMap = BTreeMap<String, serde_json::Value>;

/// The schema version stamped on every parcel layout output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

// ===== INPUT TYPES =====

/// One row from a county "extra features" table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub building_number: Option<u32>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub total_units: Option<f64>,
}

impl FeatureRecord {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_building(mut self, building_number: u32) -> Self {
        self.building_number = Some(building_number);
        self
    }

    pub fn with_dimensions(mut self, length: f64, width: f64) -> Self {
        self.length = Some(length);
        self.width = Some(width);
        self
    }

    pub fn with_units(mut self, total_units: f64) -> Self {
        self.total_units = Some(total_units);
        self
    }

    /// Trimmed, upper-cased code.
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_uppercase()
    }

    /// Trimmed, upper-cased description.
    pub fn normalized_description(&self) -> String {
        self.description.trim().to_uppercase()
    }

    /// Area in square feet: length x width when both are positive,
    /// otherwise the unit count when it is positive.
    pub fn derived_area(&self) -> Option<f64> {
        match (self.length, self.width) {
            (Some(l), Some(w)) if l > 0.0 && w > 0.0 => Some(l * w),
            _ => self.total_units.filter(|units| *units > 0.0),
        }
    }
}

/// Per-building counts and areas supplied by the building-attribute reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingSummary {
    pub building_number: u32,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub full_bathrooms: u32,
    #[serde(default)]
    pub half_bathrooms: u32,
    #[serde(default)]
    pub livable_area_sq_ft: Option<f64>,
    #[serde(default)]
    pub total_area_sq_ft: Option<f64>,
    #[serde(default)]
    pub built_year: Option<u32>,
    #[serde(default)]
    pub stories: Option<f64>,
}

// ===== RULE FRAGMENTS =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub space_type: String,
    #[serde(default)]
    pub is_exterior: bool,
    #[serde(default)]
    pub is_finished: bool,
}

impl LayoutDescriptor {
    pub fn interior(space_type: &str) -> Self {
        Self {
            space_type: space_type.to_string(),
            is_exterior: false,
            is_finished: true,
        }
    }

    pub fn exterior(space_type: &str, is_finished: bool) -> Self {
        Self {
            space_type: space_type.to_string(),
            is_exterior: true,
            is_finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDescriptor {
    #[serde(rename = "type")]
    pub accessory_type: String,
}

impl AccessoryDescriptor {
    pub fn new(accessory_type: &str) -> Self {
        Self {
            accessory_type: accessory_type.to_string(),
        }
    }
}

/// Union of every matching rule's output for one feature record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub layout: Vec<LayoutDescriptor>,
    pub accessory_structures: Vec<AccessoryDescriptor>,
    pub utility_smart_features: Vec<String>,
    pub utility_adjustments: AdjustmentMap,
    pub structure_adjustments: AdjustmentMap,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
            && self.accessory_structures.is_empty()
            && self.utility_smart_features.is_empty()
            && self.utility_adjustments.is_empty()
            && self.structure_adjustments.is_empty()
    }
}

// ===== LAYOUT FOREST =====

/// Output layout object. Only `space_type_index` is owned by the indexer;
/// everything else is filled in by layout construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub space_type: Option<String>,
    pub space_type_index: Option<String>,
    pub building_number: Option<u32>,
    pub size_square_feet: Option<f64>,
    pub livable_area_sq_ft: Option<f64>,
    pub total_area_sq_ft: Option<f64>,
    pub area_under_air_sq_ft: Option<f64>,
    pub heated_area_sq_ft: Option<f64>,
    pub built_year: Option<u32>,
    pub floor_level: Option<String>,
    pub is_exterior: bool,
    pub is_finished: bool,
    pub flooring_material_type: Option<String>,
    pub has_windows: Option<bool>,
    pub window_design_type: Option<String>,
    pub window_material_type: Option<String>,
    pub window_treatment_type: Option<String>,
    pub design_style: Option<String>,
    pub condition_issues: Option<String>,
    pub countertop_material: Option<String>,
    pub cabinet_style: Option<String>,
    pub fireplace_type: Option<String>,
    pub pool_type: Option<String>,
    pub pool_equipment: Option<String>,
    pub pool_surface_type: Option<String>,
    pub pool_water_quality: Option<String>,
    pub spa_type: Option<String>,
    pub safety_features: Option<String>,
    pub view_type: Option<String>,
    pub lighting_features: Option<String>,
    pub decor_elements: Option<String>,
    pub furnished: Option<String>,
    pub paint_condition: Option<String>,
    pub flooring_wear: Option<String>,
    pub clutter_level: Option<String>,
    pub visible_damage: Option<String>,
    pub installation_date: Option<String>,
    pub source_feature_code: Option<String>,
    pub source_feature_description: Option<String>,
}

impl LayoutRecord {
    pub fn new(space_type: &str) -> Self {
        Self {
            space_type: Some(space_type.to_string()),
            ..Self::default()
        }
    }

    pub fn space_type(&self) -> &str {
        self.space_type.as_deref().unwrap_or("")
    }
}

/// One node of the per-parcel layout forest. `parent_local_id` is a weak
/// reference; unresolved parents make the node a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub local_id: String,
    pub parent_local_id: Option<String>,
    pub record: LayoutRecord,
}

impl LayoutNode {
    pub fn new(local_id: &str, parent_local_id: Option<&str>, record: LayoutRecord) -> Self {
        Self {
            local_id: local_id.to_string(),
            parent_local_id: parent_local_id.map(str::to_string),
            record,
        }
    }

    pub fn space_type(&self) -> &str {
        self.record.space_type()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryStructure {
    #[serde(rename = "type")]
    pub accessory_type: String,
    pub building_number: Option<u32>,
    pub size_square_feet: Option<f64>,
    pub source_feature_code: Option<String>,
    pub source_feature_description: Option<String>,
}

/// A feature that no rule recognised; kept so coverage gaps are visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedFeature {
    pub code: String,
    pub description: String,
}

impl From<&FeatureRecord> for UnmatchedFeature {
    fn from(record: &FeatureRecord) -> Self {
        Self {
            code: record.code.trim().to_string(),
            description: record.description.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilityFacts {
    pub smart_features: Vec<String>,
    pub adjustments: AdjustmentMap,
}

/// The serialization-ready output for one parcel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelLayoutDocument {
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    pub rules_fingerprint: String,
    pub layouts: Vec<LayoutNode>,
    pub accessory_structures: Vec<AccessoryStructure>,
    pub utility: UtilityFacts,
    pub structure: AdjustmentMap,
    pub unmatched_features: Vec<UnmatchedFeature>,
}
