// src/bin/reconcile.rs
use anyhow::{Context, Result};
use catalogprep::{
    inventory::{filter_sample_orders, reconcile, COL_ITEM_NAME, SAMPLE_PREFIX},
    logging::init_logging,
    process::csv_io::{read_records, write_csv_file},
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Put ordered quantities back onto inventory stock.
#[derive(Parser, Debug)]
#[command(name = "reconcile")]
struct Args {
    /// Inventory export (.csv or .json) with SKU and Stock columns
    #[arg(long)]
    inventory: PathBuf,

    /// Orders export with SKU, Quantity and Order Number columns
    #[arg(long)]
    orders: PathBuf,

    /// Where to write the updated inventory rows
    #[arg(long, default_value = "output.csv")]
    out: PathBuf,

    /// Only count orders whose item name starts with "Sample"
    #[arg(long)]
    samples_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let inventory = read_records(&args.inventory)
        .with_context(|| format!("reading inventory {}", args.inventory.display()))?;
    let mut orders = read_records(&args.orders)
        .with_context(|| format!("reading orders {}", args.orders.display()))?;
    if args.samples_only {
        let total = orders.len();
        orders = filter_sample_orders(orders, COL_ITEM_NAME, SAMPLE_PREFIX);
        info!(kept = orders.len(), total, "filtered sample orders");
    }

    let result = reconcile(&inventory, &orders).context("reconciling inventory")?;
    write_csv_file(&args.out, &result.updated)
        .with_context(|| format!("writing {}", args.out.display()))?;

    info!(
        out = %args.out.display(),
        rows = result.updated.len(),
        duplicate_skus = result.duplicate_skus.len(),
        "done"
    );
    Ok(())
}
