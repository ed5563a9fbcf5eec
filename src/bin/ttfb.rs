// src/bin/ttfb.rs
use anyhow::{Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use catalogprep::logging::init_logging;

/// Average time-to-first-byte of a storefront page.
#[derive(Parser, Debug)]
#[command(name = "ttfb")]
struct Args {
    url: String,

    /// Number of requests to average over
    #[arg(short, long, default_value_t = 5)]
    num: u32,

    #[arg(short, long)]
    verbose: bool,
}

/// Time until the response headers arrive, averaged over `num` requests.
fn measure_ttfb(client: &Client, url: &str, num: u32) -> Result<Duration> {
    let mut total = Duration::ZERO;
    for i in 0..num {
        let start = Instant::now();
        let response = client
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        let elapsed = start.elapsed();
        debug!(attempt = i, status = %response.status(), elapsed = ?elapsed, "response");
        total += elapsed;
    }
    Ok(total / num.max(1))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let client = Client::new();
    let average = measure_ttfb(&client, &args.url, args.num)?;
    info!(url = %args.url, tests = args.num, average = ?average, "measured");
    println!(
        "The average TTFB for {} over {} tests is {:.3} seconds.",
        args.url,
        args.num,
        average.as_secs_f64()
    );
    Ok(())
}
