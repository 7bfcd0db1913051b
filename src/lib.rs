//! # Tweetsampler Library
//!
//! A library behind the `tweetsampler` command-line tool. It samples tweets
//! from daily tweet-ID datasets: the identifier list of a day (or of a local
//! TSV export) is shuffled, hydrated against the Twitter/X API v2 and filtered
//! by keyword/language/media criteria, and the matches are exported to a CSV
//! file up to a configured sample size.
//!
//! ## Features
//!
//! - Day-bucketed identifier retrieval over HTTP (stops at the first
//!   unpublished hour bucket)
//! - Batched tweet hydration with automatic rate-limit waits
//! - Keyword / language / media filtering with an early-stop cap
//! - CSV export with trailing media-URL columns
//! - Structured logging
//!
//! ## Configuration
//!
//! A YAML file (default `config.yaml`) provides the dataset base URL, the
//! Twitter Bearer Token and the sampling criteria; the Bearer Token may also
//! come from the `xapi_bearer_token` environment variable.

pub mod app;
pub mod config;
pub mod export;
pub mod filter;
pub mod ids;
pub mod twitter;

// Re-export commonly used types and functions
pub use app::{run, RunOptions};
pub use config::{Config, SamplingConfig};
pub use export::CsvExporter;
pub use filter::SamplingCriteria;
pub use twitter::{hydrate_batch, Tweet};
