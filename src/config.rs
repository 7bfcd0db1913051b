//! Configuration module for the tweetsampler tool.
//!
//! This module contains the structures deserialized from the YAML configuration
//! file and the environment variable handling for the Twitter/X API credentials.

use log::{debug, error, info, warn};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Top-level configuration, deserialized from a YAML file.
///
/// # Example
///
/// ```yaml
/// base-url: https://raw.githubusercontent.com/echen102/COVID-19-TweetIDs/master
/// twitter:
///   bearer_token: "AAAA..."
/// sampling:
///   size: 500
///   keywords:
///     - covid
///     - vaccine
///   languages:
///     - en
///   only_media: false
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the day-bucketed tweet-ID dataset
    #[serde(rename = "base-url")]
    pub base_url: String,
    /// Twitter/X API credentials
    #[serde(default)]
    pub twitter: TwitterConfig,
    /// Sampling criteria applied during hydration
    pub sampling: SamplingConfig,
}

/// Credentials for the Twitter/X API v2 endpoints.
///
/// Only an App-only Bearer Token is needed: the tweet lookup endpoint used for
/// hydration performs no user-specific operation.
#[derive(Debug, Default, Deserialize)]
pub struct TwitterConfig {
    /// The Bearer Token for OAuth 2.0 App-only authentication.
    /// When absent in the file, the `xapi_bearer_token` environment variable
    /// is consulted instead.
    pub bearer_token: Option<String>,
}

/// The `sampling` section of the configuration file.
#[derive(Debug, Deserialize)]
pub struct SamplingConfig {
    /// Maximum number of matching tweets to export
    pub size: usize,
    /// Keywords of which at least one must appear in the tweet text
    pub keywords: Vec<String>,
    /// Accepted tweet languages (BCP 47 codes); empty accepts any language
    #[serde(default)]
    pub languages: Vec<String>,
    /// When true, only tweets carrying at least one media attachment match
    #[serde(default)]
    pub only_media: bool,
}

impl Config {
    /// Loads and validates the configuration from a YAML file.
    ///
    /// The `.yaml` extension is appended when the given path carries no
    /// extension, so `--config-file config` and `--config-file config.yaml`
    /// name the same file.
    ///
    /// # Parameters
    ///
    /// - `path`: path of the configuration file
    ///
    /// # Returns
    ///
    /// - `Ok(Config)`: the parsed and validated configuration
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if the file cannot be
    ///   read, is not valid YAML, or fails validation
    pub fn load<P: AsRef<Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut path: PathBuf = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension("yaml");
        }

        info!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| format!("Unable to read configuration file {}: {}", path.display(), e))?;

        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Invalid configuration file {}: {}", path.display(), e))?;
        config.validate()?;

        info!(
            "Configuration loaded: base-url {}, sample size {}, {} keyword(s), {} language(s), only_media {}",
            config.base_url,
            config.sampling.size,
            config.sampling.keywords.len(),
            config.sampling.languages.len(),
            config.sampling.only_media
        );
        Ok(config)
    }

    /// Checks the invariants the pipeline relies on.
    fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.base_url.is_empty() {
            error!("base-url is empty");
            return Err("base-url cannot be empty".into());
        }
        if self.sampling.size == 0 {
            error!("sampling.size is zero");
            return Err("sampling.size must be greater than zero".into());
        }
        if self.sampling.keywords.is_empty() {
            error!("sampling.keywords is empty");
            return Err("sampling.keywords must contain at least one keyword".into());
        }
        Ok(())
    }

    /// Resolves the Bearer Token used for hydration calls.
    ///
    /// Resolution order:
    /// 1. `twitter.bearer_token` in the configuration file
    /// 2. the `xapi_bearer_token` environment variable
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: the Bearer Token
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if neither source
    ///   provides a non-empty token
    pub fn bearer_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(token) = &self.twitter.bearer_token {
            if !token.is_empty() {
                info!("Using Bearer Token from configuration file");
                debug!("Bearer Token (masked): {}", mask_token(token));
                return Ok(token.clone());
            }
            warn!("twitter.bearer_token in the configuration file is empty");
        }

        match env::var("xapi_bearer_token") {
            Ok(token) if !token.is_empty() => {
                info!(
                    "Using Bearer Token from xapi_bearer_token environment variable (length: {})",
                    token.len()
                );
                debug!("Bearer Token (masked): {}", mask_token(&token));
                Ok(token)
            }
            Ok(_) => {
                error!("xapi_bearer_token environment variable is set but empty");
                Err("Bearer Token cannot be empty".into())
            }
            Err(_) => {
                error!("No Bearer Token found in configuration file or environment");
                error!("Set twitter.bearer_token in the configuration file or the xapi_bearer_token environment variable");
                Err("Missing Twitter Bearer Token".into())
            }
        }
    }
}

/// Masks token material so it can be logged safely.
///
/// Keeps at most the first and last 8 characters of the token. Counts
/// characters rather than bytes, so multibyte tokens cannot panic the helper.
pub(crate) fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    let prefix: String = token.chars().take(8).collect();
    if len > 16 {
        let suffix: String = token.chars().skip(len - 8).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}
