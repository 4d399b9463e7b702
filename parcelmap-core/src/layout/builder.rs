use crate::classifier::ClassifiedFeature;
use crate::config::LayoutConfig;
use crate::types::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Layout nodes (unindexed) plus the accessory structures found on the parcel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutForest {
    pub nodes: Vec<LayoutNode>,
    pub accessory_structures: Vec<AccessoryStructure>,
}

/// Builds the per-parcel layout forest: one `Building` root per building,
/// rooms from the building counts, and one node per classified layout
/// fragment parented to the feature's building.
pub struct LayoutBuilder {
    config: LayoutConfig,
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutBuilder {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        buildings: &[BuildingSummary],
        features: &[ClassifiedFeature],
    ) -> LayoutForest {
        let mut forest = LayoutForest::default();

        let mut by_number: BTreeMap<u32, &BuildingSummary> = BTreeMap::new();
        for building in buildings {
            if by_number.insert(building.building_number, building).is_some() {
                warn!(
                    building = building.building_number,
                    "duplicate building summary, keeping the last one"
                );
            }
        }

        for building in by_number.values() {
            self.push_building(&mut forest.nodes, building);
        }

        for (position, feature) in features.iter().enumerate() {
            let building_number = self.resolve_building(&by_number, feature.record.building_number);
            let parent_id = building_number.map(building_id);

            if self.config.emit_feature_layouts {
                for (fragment, layout) in feature.result.layout.iter().enumerate() {
                    let local_id = format!("feature_{}_{}", position + 1, fragment + 1);
                    let record = LayoutRecord {
                        building_number,
                        size_square_feet: feature.record.derived_area(),
                        is_exterior: layout.is_exterior,
                        is_finished: layout.is_finished,
                        source_feature_code: non_empty(&feature.record.code),
                        source_feature_description: non_empty(&feature.record.description),
                        ..LayoutRecord::new(&layout.space_type)
                    };
                    forest
                        .nodes
                        .push(LayoutNode::new(&local_id, parent_id.as_deref(), record));
                }
            }

            for accessory in &feature.result.accessory_structures {
                forest.accessory_structures.push(AccessoryStructure {
                    accessory_type: accessory.accessory_type.clone(),
                    building_number,
                    size_square_feet: feature.record.derived_area(),
                    source_feature_code: non_empty(&feature.record.code),
                    source_feature_description: non_empty(&feature.record.description),
                });
            }
        }

        info!(
            buildings = by_number.len(),
            nodes = forest.nodes.len(),
            accessory_structures = forest.accessory_structures.len(),
            "layout forest built"
        );
        forest
    }

    fn push_building(&self, nodes: &mut Vec<LayoutNode>, building: &BuildingSummary) {
        let number = building.building_number;
        let id = building_id(number);

        let record = LayoutRecord {
            building_number: Some(number),
            livable_area_sq_ft: building.livable_area_sq_ft,
            total_area_sq_ft: building.total_area_sq_ft,
            built_year: building.built_year,
            is_finished: true,
            ..LayoutRecord::new("Building")
        };
        nodes.push(LayoutNode::new(&id, None, record));

        let room = |space_type: &str| LayoutRecord {
            building_number: Some(number),
            built_year: building.built_year,
            is_finished: true,
            ..LayoutRecord::new(space_type)
        };

        for i in 1..=building.bedrooms {
            let space_type = if i == 1 && self.config.first_bedroom_is_primary {
                "Primary Bedroom"
            } else {
                "Bedroom"
            };
            nodes.push(LayoutNode::new(
                &format!("{id}_bedroom_{i}"),
                Some(id.as_str()),
                room(space_type),
            ));
        }
        for i in 1..=building.full_bathrooms {
            nodes.push(LayoutNode::new(
                &format!("{id}_full_bath_{i}"),
                Some(id.as_str()),
                room("Full Bathroom"),
            ));
        }
        for i in 1..=building.half_bathrooms {
            nodes.push(LayoutNode::new(
                &format!("{id}_half_bath_{i}"),
                Some(id.as_str()),
                room("Half Bathroom / Powder Room"),
            ));
        }

        if let Some(area) = building.livable_area_sq_ft.filter(|a| *a > 0.0) {
            let record = LayoutRecord {
                size_square_feet: Some(area),
                livable_area_sq_ft: Some(area),
                ..room("Living Area")
            };
            nodes.push(LayoutNode::new(&format!("{id}_living_area"), Some(id.as_str()), record));
        }
    }

    /// Feature's own building if known, else the configured default building,
    /// else the lowest-numbered building. `None` when the parcel has none.
    fn resolve_building(
        &self,
        buildings: &BTreeMap<u32, &BuildingSummary>,
        requested: Option<u32>,
    ) -> Option<u32> {
        requested
            .filter(|n| buildings.contains_key(n))
            .or_else(|| {
                let default = self.config.default_building_number;
                buildings.contains_key(&default).then_some(default)
            })
            .or_else(|| buildings.keys().next().copied())
    }
}

pub fn building_id(building_number: u32) -> String {
    format!("building_{building_number}")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
