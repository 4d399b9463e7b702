// Parcelmap Core Library
//
// Classifies county extra-feature records into layout, accessory, utility and
// structure facts, then builds an indexed layout forest per parcel.

pub mod types;
pub mod error;
pub mod cache;
pub mod config;
pub mod rules;
pub mod classifier;
pub mod layout;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::RuleError;
pub use classifier::{ClassifiedFeature, FeatureClassifier, FeatureRollup};
pub use config::MapperConfig;
pub use layout::{assign_indices, IndexSummary, LayoutBuilder, SpaceIndexAssigner};
pub use processor::{ParcelProcessor, StepProfiler};
pub use rules::{county_rule_table, RuleDescriptor, RuleTable, RuleTableBuilder};
