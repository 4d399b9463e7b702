use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use parcelmap_core::{BuildingSummary, FeatureRecord, MapperConfig, ParcelProcessor};

#[derive(Parser)]
#[command(name = "parcelmap")]
#[command(about = "Classify county extra features and build indexed parcel layouts")]
struct Args {
    /// JSON array of extra-feature records
    #[arg(short, long)]
    features: Option<String>,

    /// JSON array of building summaries
    #[arg(short, long)]
    buildings: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output file path (if not specified, auto-generated from the features file)
    #[arg(short, long)]
    output: Option<String>,

    /// Write single-line JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// List the loaded classification rules and exit
    #[arg(long)]
    show_rules: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🦀 Parcelmap Layout Builder");

    let (config, source) = load_config(args.config.as_deref());
    match &source {
        ConfigSource::File(path) => println!("📋 Loaded config from: {}", path),
        ConfigSource::Defaults => println!("📋 Using default config"),
    }

    let processor = ParcelProcessor::new(&config)?;

    if args.show_rules {
        show_rules(&processor);
        return Ok(());
    }

    let Some(features_path) = args.features.as_deref() else {
        println!("⚠️  No features file given. Pass --features <path> or --show-rules.");
        return Ok(());
    };
    if !Path::new(features_path).exists() {
        println!("⚠️  Features file not found at: {}", features_path);
        println!("   Please check the file path.");
        return Ok(());
    }

    let features: Vec<FeatureRecord> = read_json(features_path)?;
    let buildings: Vec<BuildingSummary> = match args.buildings.as_deref() {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    println!(
        "📄 Processing: {} ({} features, {} buildings)",
        features_path,
        features.len(),
        buildings.len()
    );

    let document = processor.process_with_profiling(&features, &buildings, args.profile);

    println!("✅ Successfully built parcel layout");
    println!("📊 Layout metrics:");
    println!("   - Layout nodes: {}", document.layouts.len());
    println!("   - Accessory structures: {}", document.accessory_structures.len());
    println!("   - Smart features: {}", document.utility.smart_features.len());
    println!("   - Unmatched features: {}", document.unmatched_features.len());
    for unmatched in &document.unmatched_features {
        println!("     ❓ {} {}", unmatched.code, unmatched.description);
    }
    if !document.unmatched_features.is_empty() {
        warn!(count = document.unmatched_features.len(), "features matched no rule");
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        let input_name = Path::new(features_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        format!("{input_name}_parcelmap.json")
    });

    document.save_to_json(&output_path, !args.compact)?;
    println!("💾 Parcel layout saved to: {}", output_path);

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ConfigSource {
    File(String),
    Defaults,
}

/// Config from `path` when it loads, otherwise the defaults.
fn load_config(path: Option<&str>) -> (MapperConfig, ConfigSource) {
    let Some(path) = path else {
        return (MapperConfig::default(), ConfigSource::Defaults);
    };
    match MapperConfig::load_from_file(path) {
        Ok(config) => (config, ConfigSource::File(path.to_string())),
        Err(e) => {
            warn!(path = path, error = %e, "failed to load config, using defaults");
            println!("⚠️  Could not load config: {}", path);
            (MapperConfig::default(), ConfigSource::Defaults)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {path}"))
}

fn show_rules(processor: &ParcelProcessor) {
    let table = processor.classifier().table();
    println!("\n📋 Classification rules ({}):", table.len());
    println!("   fingerprint: {}", table.fingerprint());
    for (position, rule) in table.rules().iter().enumerate() {
        println!(
            "  {:>3}. [{:?}] {:.<40} {}",
            position + 1,
            rule.kind,
            rule.label,
            rule.sources().join(" | ")
        );
    }

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -f features.json");
    println!("  cargo run -- -f features.json -b buildings.json -o layout.json");
    println!("  cargo run -- -f features.json -c parcelmap.yaml --profile");
}
