use clap::{Parser, ValueEnum};
use flowform::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A CLI-specific enum for clap to parse entity kinds.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindCli {
    Variable,
    Connector,
    Flow,
    Application,
    Policy,
}

impl From<KindCli> for EntityKind {
    fn from(kind: KindCli) -> Self {
        match kind {
            KindCli::Variable => EntityKind::Variable,
            KindCli::Connector => EntityKind::ConnectorInstance,
            KindCli::Flow => EntityKind::Flow,
            KindCli::Application => EntityKind::Application,
            KindCli::Policy => EntityKind::Policy,
        }
    }
}

/// Converts a DaVinci export into Terraform HCL
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the export JSON file
    export_path: String,

    /// Write the generated HCL here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Optional TOML file with conversion options
    #[arg(short, long)]
    config: Option<String>,

    /// Inline raw values instead of cross-resource references
    #[arg(long)]
    skip_dependencies: bool,

    /// Parameterize every eligible attribute, not only secrets
    #[arg(long)]
    extract_all: bool,

    /// Leave a kind of entity out of the output (repeatable)
    #[arg(long, value_enum)]
    exclude: Vec<KindCli>,

    /// Keep converting other entities when one of them fails
    #[arg(long)]
    continue_on_error: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    run(cli);
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Options ---
    let mut options = match &cli.config {
        Some(path) => load_options(path),
        None => ConvertOptions::default(),
    };
    if cli.skip_dependencies {
        options.resolution = ResolutionMode::Inlined;
    }
    if cli.extract_all {
        options.extraction = ExtractionMode::All;
    }
    if cli.continue_on_error {
        options.continue_on_error = true;
    }

    // --- 2. Loading and Parsing ---
    let export_json = fs::read_to_string(&cli.export_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read export file '{}': {}",
            &cli.export_path, e
        ))
    });
    let bundle = ExportBundle::from_json(&export_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse export: {}", e)));
    info!(entities = bundle.len(), path = %cli.export_path, "export loaded");

    // --- 3. Conversion ---
    let convert_start = Instant::now();
    let converter = cli
        .exclude
        .iter()
        .fold(Converter::builder(bundle).with_options(options), |builder, kind| {
            builder.exclude((*kind).into())
        })
        .build();
    let conversion = converter
        .convert()
        .unwrap_or_else(|e| exit_with_error(&format!("Conversion failed: {}", e)));
    let convert_duration = convert_start.elapsed();

    // --- 4. Output ---
    match &cli.output {
        Some(path) => fs::write(path, &conversion.output).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write output file '{}': {}", path, e))
        }),
        None => print!("{}", conversion.output),
    }

    // --- 5. Summary ---
    eprintln!("\n--- Conversion Summary ---");
    eprintln!("Blocks:               {}", conversion.blocks.len());
    eprintln!("Unresolved refs:      {}", conversion.unresolved.len());
    for gap in &conversion.unresolved {
        eprintln!(
            "  -> {} '{}': {}",
            gap.request.target_kind, gap.request.target_source_id, gap.reason
        );
    }
    eprintln!("Failed entities:      {}", conversion.failures.len());
    for failure in &conversion.failures {
        eprintln!("  -> {}", failure);
    }
    eprintln!("Conversion:           {:?}", convert_duration);
    eprintln!("Total Execution:      {:?}", total_start.elapsed());
}

fn load_options(path: &str) -> ConvertOptions {
    let contents = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
    });
    toml::from_str(&contents)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid config file '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
