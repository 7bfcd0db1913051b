//! Tweet identifier sources.
//!
//! This module retrieves the raw tweet identifier lists that feed the
//! hydration pipeline, either from the day-bucketed dataset published over
//! HTTP or from a local TSV export.

use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use std::path::Path;

/// Downloads the tweet identifiers published for a calendar day.
///
/// The dataset publishes one text file per hour of the day, named
/// `{base}/{YYYY}-{MM}/coronavirus-tweet-id-{YYYY}-{MM}-{DD}-{HH}.txt` with
/// one tweet identifier per line. Hour buckets are fetched in order; a 404
/// means the remaining hours of the day have not been published yet and ends
/// the retrieval, while any other error status aborts it.
///
/// # Parameters
///
/// - `client`: the HTTP client used for the downloads
/// - `base_url`: base URL of the dataset repository
/// - `date`: the day whose identifiers are wanted
///
/// # Returns
///
/// - `Ok(Vec<String>)`: the identifiers of all published hour buckets (may be
///   empty when nothing has been published for the day)
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if a download fails with
///   a status other than 404
pub async fn fetch_ids_for_date(
    client: &Client,
    base_url: &str,
    date: NaiveDate,
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    info!("Reading tweet list for {}", date.format("%Y/%m/%d"));

    let mut ids: Vec<String> = Vec::new();
    for hour in 0..24 {
        let url = format!(
            "{}/{}/coronavirus-tweet-id-{}-{:02}.txt",
            base_url,
            date.format("%Y-%m"),
            date.format("%Y-%m-%d"),
            hour
        );

        let response = client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // The dataset publishes hour buckets as the day progresses; a
            // missing bucket means the rest of the day is not available yet.
            info!("Hour bucket {:02} not published (404), stopping", hour);
            break;
        }
        if !status.is_success() {
            warn!("Download of {} failed with status {}", url, status);
            return Err(format!("Unable to download tweet list: {} ({})", url, status).into());
        }

        let body = response.text().await?;
        let lines: Vec<String> = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        info!("Read {} lines from {}", lines.len(), url);
        ids.extend(lines);
    }

    info!("Total: {} tweets", ids.len());
    Ok(ids)
}

/// Reads tweet identifiers from a local TSV export.
///
/// The first line is a header and is skipped; of every following line only the
/// first tab-separated column (the tweet identifier) is kept.
///
/// # Parameters
///
/// - `path`: path of the TSV file
///
/// # Returns
///
/// - `Ok(Vec<String>)`: the identifiers found in the file
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if the file cannot be read
pub fn read_ids_from_tsv<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let path = path.as_ref();
    info!("Reading tweets from {}", path.display());

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Unable to read input file {}: {}", path.display(), e))?;

    let ids: Vec<String> = contents
        .lines()
        .skip(1)
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    info!("Total: {} tweets", ids.len());
    Ok(ids)
}

/// Recovers the extraction date embedded in a TSV export file name.
///
/// The exports are named with the date at character positions 4 to 13 of the
/// base name, e.g. `full2020-03-22.tsv` holds the tweets of 2020-03-22.
///
/// # Parameters
///
/// - `path`: path of the TSV file
///
/// # Returns
///
/// - `Ok(NaiveDate)`: the embedded date
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if the file name is too
///   short or the embedded characters are not a `%Y-%m-%d` date
pub fn date_from_file_name<P: AsRef<Path>>(
    path: P,
) -> Result<NaiveDate, Box<dyn std::error::Error + Send + Sync>> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid input file name: {}", path.display()))?;

    let date_part = name.get(4..14).ok_or_else(|| {
        format!(
            "Input file name {} is too short to contain a date at positions 4..14",
            name
        )
    })?;

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| format!("Unable to parse date '{}' from file name {}: {}", date_part, name, e))?;
    Ok(date)
}
