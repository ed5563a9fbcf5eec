use anyhow::{Context, Result};
use catalogprep::{
    config::Config,
    logging::init_logging,
    process::{self, chunk::prepare_output_dir, CsvDirSink, RecordProcessor},
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "catalogprep")]
#[command(about = "Normalize product records and write them out in CSV chunks")]
struct Args {
    /// YAML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input records (.csv or .json), relative to the data directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output chunk directory name
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base directory for input and output
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Maximum records per output file
    #[arg(long)]
    rows_per_chunk: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging(args.verbose);

    // ─── 2) configuration ────────────────────────────────────────────
    let mut config = Config::load(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(rows) = args.rows_per_chunk {
        config.rows_per_chunk = rows;
    }
    config.validate().context("validating configuration")?;

    // ─── 3) read records ─────────────────────────────────────────────
    let start = Instant::now();
    let input = config.input_path();
    let records = process::csv_io::read_records(&input)
        .with_context(|| format!("reading records from {}", input.display()))?;
    info!(input = %input.display(), records = records.len(), "loaded records");

    // ─── 4) run the configured steps ─────────────────────────────────
    let processor = RecordProcessor::from_config(&config).context("building record processor")?;
    let pipeline = config.pipeline();
    let (records, report) = pipeline
        .run(&processor, records)
        .context("processing records")?;

    // ─── 5) write chunks ─────────────────────────────────────────────
    let root = config.output_root();
    let output_name = config.output.to_string_lossy().to_string();
    let out_dir = prepare_output_dir(&root, &output_name)
        .with_context(|| format!("creating output directory {}", output_name))?;
    let mut sink = CsvDirSink::new(&root);
    let units = process::write_chunks(&mut sink, &output_name, &records, config.rows_per_chunk)
        .with_context(|| format!("writing chunks to {}", out_dir.display()))?;

    // ─── 6) summary ──────────────────────────────────────────────────
    let ran: Vec<&str> = report.steps_run.iter().map(|s| s.name()).collect();
    info!(
        records = report.records,
        steps = ?ran,
        units,
        elapsed = ?start.elapsed(),
        "all done"
    );
    if !report.warnings.is_empty() {
        warn!(
            warnings = report.warnings.len(),
            missing_msrp = report.missing_marker_count(),
            "finished with warnings"
        );
    }
    Ok(())
}
