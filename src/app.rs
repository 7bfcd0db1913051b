//! The sampling pipeline.
//!
//! This module wires the identifier sources, the hydration client, the
//! sampling criteria and the CSV exporter into the single linear pipeline the
//! tool runs: obtain identifiers, shuffle, hydrate and filter with an
//! early-stop cap, export.

use chrono::NaiveDate;
use log::info;
use rand::seq::SliceRandom;
use reqwest::Client;
use std::path::PathBuf;

use crate::config::Config;
use crate::export::CsvExporter;
use crate::filter::SamplingCriteria;
use crate::ids::{date_from_file_name, fetch_ids_for_date, read_ids_from_tsv};
use crate::twitter::{hydrate_batch, LOOKUP_BATCH_SIZE};

/// Options of a single pipeline run, resolved from the command line.
#[derive(Debug)]
pub struct RunOptions {
    /// Day whose published identifier list should be sampled
    pub date: Option<NaiveDate>,
    /// Local TSV file to read identifiers from instead of downloading them
    pub input_file: Option<PathBuf>,
    /// Path of the CSV file to write
    pub output: PathBuf,
    /// Path of the YAML configuration file
    pub config_file: PathBuf,
}

/// Runs the whole sampling pipeline.
///
/// Steps:
/// 1. load the configuration and resolve the Bearer Token,
/// 2. obtain the identifier list (local file or day-bucket downloads),
/// 3. shuffle it, so the capped export is a random sample of the day,
/// 4. hydrate the identifiers in API-sized batches, filter each hydrated
///    tweet against the sampling criteria and export the matches, stopping as
///    soon as the configured sample size is reached,
/// 5. report the number of exported tweets.
///
/// # Returns
///
/// - `Ok(usize)`: the number of tweets exported
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if configuration
///   loading, identifier retrieval, an API call or the export fails
pub async fn run(
    options: RunOptions,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::load(&options.config_file)?;
    let bearer_token = config.bearer_token()?;
    let client = Client::new();

    let (date, mut tweet_ids) = match (&options.input_file, options.date) {
        (Some(input_file), _) => {
            // The extraction date is embedded in the export's file name
            let date = date_from_file_name(input_file)?;
            (date, read_ids_from_tsv(input_file)?)
        }
        (None, Some(date)) => (
            date,
            fetch_ids_for_date(&client, &config.base_url, date).await?,
        ),
        (None, None) => {
            return Err("Either --input-file or --date must be specified".into());
        }
    };

    if tweet_ids.is_empty() {
        info!("No tweets were found.");
        return Ok(0);
    }

    info!("Shuffling tweets.");
    tweet_ids.shuffle(&mut rand::thread_rng());

    let criteria = SamplingCriteria::new(&config.sampling);
    let sample_size = config.sampling.size;
    let mut exporter = CsvExporter::create(&options.output, date)?;

    info!("Reading tweets from Twitter");
    let total = tweet_ids.len();
    let mut hydrated: usize = 0;
    'batches: for batch in tweet_ids.chunks(LOOKUP_BATCH_SIZE) {
        let tweets = hydrate_batch(&client, &bearer_token, batch).await?;
        hydrated += batch.len();

        for tweet in &tweets {
            if criteria.matches(tweet) {
                exporter.write_tweet(tweet)?;
                if exporter.written() == sample_size {
                    break 'batches;
                }
            }
        }

        info!(
            "Progress: {}/{} tweets hydrated, {}/{} matched",
            hydrated,
            total,
            exporter.written(),
            sample_size
        );
    }

    exporter.flush()?;

    let count = exporter.written();
    if count == 0 {
        info!("No tweets matching the provided keywords were found.");
    } else {
        info!("{} tweets exported to {}", count, options.output.display());
    }
    Ok(count)
}
