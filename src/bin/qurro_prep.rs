//! qurro-prep - table reconciliation CLI
//!
//! Loads a count table, feature rankings and metadata from TSV files,
//! reconciles them and writes the rendering inputs as JSON.

use clap::{Parser, Subcommand};
use qurro_prep::data::{CountTable, DenseCountTable, FeatureRanks, Metadata, SparseCountTable};
use qurro_prep::error::Result;
use qurro_prep::pipeline::{ReconcileConfig, Reconciler};
use qurro_prep::report::StderrSink;
use std::path::{Path, PathBuf};

/// Reconcile tables for rank-ratio visualization
#[derive(Parser)]
#[command(name = "qurro-prep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the input tables and write the result as JSON
    Run {
        /// Path to count table TSV (features × samples)
        #[arg(short, long)]
        table: PathBuf,

        /// Path to feature rankings TSV
        #[arg(short, long)]
        ranks: PathBuf,

        /// Path to sample metadata TSV
        #[arg(short, long)]
        sample_metadata: PathBuf,

        /// Path to feature metadata TSV
        #[arg(short, long)]
        feature_metadata: Option<PathBuf>,

        /// Path to a YAML configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path for the JSON result
        #[arg(short, long)]
        output: PathBuf,

        /// Load the count table densely instead of sparsely
        #[arg(long)]
        dense: bool,

        /// Also print debug progress messages
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the default configuration as YAML
    ExampleConfig {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "qurro-prep.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            table,
            ranks,
            sample_metadata,
            feature_metadata,
            config,
            output,
            dense,
            verbose,
        } => {
            let inputs = Inputs {
                ranks: &ranks,
                sample_metadata: &sample_metadata,
                feature_metadata: feature_metadata.as_deref(),
                config: config.as_deref(),
                output: &output,
                verbose,
            };
            if dense {
                DenseCountTable::from_tsv(&table).and_then(|t| cmd_run(t, &inputs))
            } else {
                SparseCountTable::from_tsv(&table).and_then(|t| cmd_run(t, &inputs))
            }
        }
        Commands::ExampleConfig { output } => cmd_example_config(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct Inputs<'a> {
    ranks: &'a Path,
    sample_metadata: &'a Path,
    feature_metadata: Option<&'a Path>,
    config: Option<&'a Path>,
    output: &'a Path,
    verbose: bool,
}

/// Reconcile an already-loaded count table with the other inputs
fn cmd_run<T: CountTable>(table: T, inputs: &Inputs<'_>) -> Result<()> {
    let config = match inputs.config {
        Some(path) => {
            eprintln!("Loading configuration from {:?}...", path);
            ReconcileConfig::from_yaml(&std::fs::read_to_string(path)?)?
        }
        None => ReconcileConfig::default(),
    };

    eprintln!("Loading data...");
    let ranks = FeatureRanks::from_tsv(inputs.ranks)?;
    let sample_metadata = Metadata::from_tsv(inputs.sample_metadata)?;
    let feature_metadata = inputs.feature_metadata.map(Metadata::from_tsv).transpose()?;

    eprintln!(
        "Loaded {} features x {} samples ({} non-zero)",
        table.feature_ids().len(),
        table.sample_ids().len(),
        table.nnz()
    );

    let mut sink = StderrSink {
        verbose: inputs.verbose,
    };
    let reconciled = Reconciler::from_config(&config).run(
        table,
        ranks,
        sample_metadata,
        feature_metadata,
        &mut sink,
    )?;

    eprintln!("Writing results to {:?}...", inputs.output);
    std::fs::write(inputs.output, reconciled.to_json()?)?;

    eprintln!(
        "Done! {} features x {} samples",
        reconciled.table.feature_ids().len(),
        reconciled.table.sample_ids().len()
    );
    Ok(())
}

/// Write the default configuration
fn cmd_example_config(output: &Path) -> Result<()> {
    let yaml = ReconcileConfig::default().to_yaml()?;
    std::fs::write(output, yaml)?;
    eprintln!("Wrote default configuration to {:?}", output);
    Ok(())
}
