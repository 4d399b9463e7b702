use crate::classifier::{FeatureClassifier, FeatureRollup};
use crate::config::MapperConfig;
use crate::layout::{IndexSummary, LayoutBuilder, LayoutForest, SpaceIndexAssigner};
use crate::types::*;
use anyhow::{Context, Result};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::info;

/// Intermediate outputs of each pipeline stage, for tests and diagnostics.
#[derive(Debug, Clone)]
pub struct PipelineStages {
    pub rollup: FeatureRollup,
    pub forest: LayoutForest,
    pub index_summary: IndexSummary,
    pub document: ParcelLayoutDocument,
}

/// Collects wall-clock timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.3}ms", step_name, elapsed.as_secs_f64() * 1000.0);

        result
    }

    pub fn steps(&self) -> Vec<&str> {
        self.timings.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        let total_secs = total.as_secs_f64().max(f64::EPSILON);

        for (step, duration) in &self.timings {
            let percentage = (duration.as_secs_f64() / total_secs) * 100.0;
            println!(
                "   {:.<35} {:.3}ms ({:.1}%)",
                step,
                duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        println!("   {:.<35} {:.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

/// Features + building summaries → indexed layout document for one parcel.
pub struct ParcelProcessor {
    classifier: FeatureClassifier,
    layout_builder: LayoutBuilder,
    assigner: SpaceIndexAssigner,
}

impl ParcelProcessor {
    pub fn new(config: &MapperConfig) -> Result<Self> {
        let table = config
            .rules
            .build_table()
            .context("building classification rule table")?;
        info!(rules = table.len(), fingerprint = %table.fingerprint(), "rule table ready");

        Ok(Self::new_with_dependencies(
            FeatureClassifier::new(table),
            LayoutBuilder::new(config.layout.clone()),
            SpaceIndexAssigner::new(&config.indexing),
        ))
    }

    pub fn new_with_dependencies(
        classifier: FeatureClassifier,
        layout_builder: LayoutBuilder,
        assigner: SpaceIndexAssigner,
    ) -> Self {
        Self {
            classifier,
            layout_builder,
            assigner,
        }
    }

    pub fn classifier(&self) -> &FeatureClassifier {
        &self.classifier
    }

    pub fn process(
        &self,
        features: &[FeatureRecord],
        buildings: &[BuildingSummary],
    ) -> ParcelLayoutDocument {
        self.process_with_stages(features, buildings, &mut StepProfiler::new(false))
            .document
    }

    pub fn process_with_profiling(
        &self,
        features: &[FeatureRecord],
        buildings: &[BuildingSummary],
        enable_profiling: bool,
    ) -> ParcelLayoutDocument {
        let mut profiler = StepProfiler::new(enable_profiling);
        let stages = self.process_with_stages(features, buildings, &mut profiler);
        profiler.print_summary();
        stages.document
    }

    pub fn process_with_stages(
        &self,
        features: &[FeatureRecord],
        buildings: &[BuildingSummary],
        profiler: &mut StepProfiler,
    ) -> PipelineStages {
        let rollup = profiler.time_step("1. Classification", || {
            self.classifier.classify_all(features)
        });

        let mut forest = profiler.time_step("2. Layout Construction", || {
            self.layout_builder.build(buildings, &rollup.classified)
        });

        let index_summary = profiler.time_step("3. Space Indexing", || {
            self.assigner.assign(&mut forest.nodes)
        });

        let document = profiler.time_step("4. Document Assembly", || ParcelLayoutDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            rules_fingerprint: self.classifier.table().fingerprint(),
            layouts: forest.nodes.clone(),
            accessory_structures: forest.accessory_structures.clone(),
            utility: UtilityFacts {
                smart_features: rollup.utility_smart_features.clone(),
                adjustments: rollup.utility_adjustments.clone(),
            },
            structure: rollup.structure_adjustments.clone(),
            unmatched_features: rollup.unmatched.clone(),
        });

        info!(
            layouts = document.layouts.len(),
            accessory_structures = document.accessory_structures.len(),
            unmatched = document.unmatched_features.len(),
            "parcel processed"
        );

        PipelineStages {
            rollup,
            forest,
            index_summary,
            document,
        }
    }
}
