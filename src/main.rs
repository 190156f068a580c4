use std::{io, time::Duration};

use cbr_rates::{
    analysis::WindowAggregator,
    loader::{CbrFetcher, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT},
    prompt::ask_day_count,
};
use clap::Parser;
use tracing::Level;

/// Highest, lowest and average central bank exchange rates over the last days.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of days to analyse. Asked interactively when omitted.
    #[arg(long)]
    days: Option<String>,

    /// Daily rates endpoint, queried with `?date_req=dd/mm/yyyy`.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let days = match args.days {
        Some(days) => days,
        None => ask_day_count(io::stdin().lock(), io::stdout())?,
    };

    let fetcher = CbrFetcher::new(args.endpoint, Duration::from_secs(args.timeout))?;
    tracing::info!(endpoint = fetcher.endpoint(), "fetching daily snapshots");

    let report = WindowAggregator::new(fetcher).analyze_input(&days)?;

    print!("{report}");

    Ok(())
}
