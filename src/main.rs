//! # Tweetsampler
//!
//! A command-line tool that samples tweets from daily tweet-ID datasets. The
//! identifier list of a day (downloaded hour bucket by hour bucket) or of a
//! local TSV export is shuffled, hydrated against the Twitter/X API v2,
//! filtered by keyword/language/media criteria and exported to a CSV file up
//! to a configured sample size.
//!
//! ## Usage
//!
//! ```bash
//! # Sample the tweets published for a day
//! tweetsampler --date 2020-03-22 --output sample.csv
//!
//! # Sample from a local TSV export instead
//! tweetsampler --input-file full2020-03-22.tsv --output sample.csv
//!
//! # Use another configuration file and debug logging
//! RUST_LOG=debug tweetsampler --date 2020-03-22 --output sample.csv --config-file prod.yaml
//! ```
//!
//! ## Environment Variables
//!
//! - `xapi_bearer_token`: Twitter API Bearer Token, used when the
//!   configuration file carries none
//! - `RUST_LOG`: log level filter (defaults to `info`)

use chrono::NaiveDate;
use clap::{ArgGroup, Parser};
use log::error;
use std::path::PathBuf;

use tweetsampler::{run, RunOptions};

/// Sample tweets of a day and export the matches to CSV.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true)))]
struct Args {
    /// Extraction date (YYYY-MM-DD); the day's identifier list is downloaded
    #[arg(long, group = "source")]
    date: Option<NaiveDate>,

    /// Extraction file: a local TSV export with the date embedded in its name
    #[arg(long, group = "source")]
    input_file: Option<PathBuf>,

    /// Output file name
    #[arg(long)]
    output: PathBuf,

    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    config_file: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize the logging system; the pipeline reports progress at info
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let options = RunOptions {
        date: args.date,
        input_file: args.input_file,
        output: args.output,
        config_file: args.config_file,
    };

    if let Err(e) = run(options).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
