//! CSV export of the sampled tweets.

use chrono::NaiveDate;
use log::info;
use std::io::Write;
use std::path::Path;

use crate::twitter::Tweet;

/// Characters stripped from tweet texts before export. Newlines would break
/// downstream line-oriented consumers of the file, quotes are stripped for the
/// same reason.
const CHARACTERS_TO_REMOVE: [char; 2] = ['\n', '"'];

/// Fixed columns of the export file; media URLs are appended as extra columns.
const HEADER: [&str; 8] = [
    "day",
    "user",
    "likes",
    "retweets",
    "lang",
    "country code",
    "url",
    "text",
];

/// Writes sampled tweets to a CSV file, one row per tweet.
///
/// Rows share eight fixed columns but grow by one trailing column per attached
/// media URL, so the underlying writer is configured as flexible.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    date: NaiveDate,
    written: usize,
}

impl CsvExporter<std::fs::File> {
    /// Creates an exporter writing to the given path and writes the header row.
    ///
    /// # Parameters
    ///
    /// - `path`: path of the CSV file to create (truncated when it exists)
    /// - `date`: the extraction date, exported in the `day` column of every row
    pub fn create<P: AsRef<Path>>(
        path: P,
        date: NaiveDate,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let path = path.as_ref();
        info!("Exporting tweets to {}", path.display());
        let file = std::fs::File::create(path)
            .map_err(|e| format!("Unable to create output file {}: {}", path.display(), e))?;
        Self::from_writer(file, date)
    }
}

impl<W: Write> CsvExporter<W> {
    /// Creates an exporter on an arbitrary writer and writes the header row.
    pub fn from_writer(
        writer: W,
        date: NaiveDate,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        writer.write_record(HEADER)?;
        Ok(CsvExporter {
            writer,
            date,
            written: 0,
        })
    }

    /// Appends one tweet as a CSV row.
    pub fn write_tweet(
        &mut self,
        tweet: &Tweet,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut record: Vec<String> = vec![
            self.date.format("%Y/%m/%d").to_string(),
            remove_characters(&tweet.author_username),
            tweet.like_count.to_string(),
            tweet.retweet_count.to_string(),
            tweet.lang.clone().unwrap_or_default(),
            tweet.country_code.clone().unwrap_or_default(),
            tweet.web_url(),
            remove_characters(&tweet.text),
        ];
        record.extend(tweet.media_urls.iter().cloned());

        self.writer.write_record(&record)?;
        self.written += 1;
        Ok(())
    }

    /// Number of rows written so far, excluding the header.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Strips the characters in [`CHARACTERS_TO_REMOVE`] from a string.
pub(crate) fn remove_characters(string: &str) -> String {
    string
        .chars()
        .filter(|c| !CHARACTERS_TO_REMOVE.contains(c))
        .collect()
}
