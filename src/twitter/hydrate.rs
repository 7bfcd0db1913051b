//! Tweet hydration via the Twitter API v2 lookup endpoint.
//!
//! This module turns batches of raw tweet identifiers into full [`Tweet`]
//! records by calling the `GET /2/tweets` lookup endpoint and joining the
//! `includes` arrays (users, media, places, referenced tweets) back onto the
//! tweets they belong to.

use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashMap;

use super::api::{build_bearer_header, execute_api_request};

/// Maximum number of identifiers accepted per lookup call by the API.
pub const LOOKUP_BATCH_SIZE: usize = 100;

const LOOKUP_URL: &str = "https://api.x.com/2/tweets";

/// A hydrated tweet, flattened from the API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    /// The tweet identifier
    pub id: String,
    /// The tweet text; for retweets, the full text of the retweeted tweet
    pub text: String,
    /// Screen name of the author
    pub author_username: String,
    /// Number of likes
    pub like_count: u64,
    /// Number of retweets
    pub retweet_count: u64,
    /// BCP 47 language tag, when the API detected one
    pub lang: Option<String>,
    /// Country code of the tagged place, when the tweet is geo-tagged
    pub country_code: Option<String>,
    /// URLs of the attached media
    pub media_urls: Vec<String>,
}

impl Tweet {
    /// Returns true when the tweet carries at least one media attachment.
    pub fn has_media(&self) -> bool {
        !self.media_urls.is_empty()
    }

    /// Returns the canonical web URL of the tweet.
    pub fn web_url(&self) -> String {
        format!("https://twitter.com/i/web/status/{}", self.id)
    }
}

/// Hydrates a batch of tweet identifiers.
///
/// Looks up at most [`LOOKUP_BATCH_SIZE`] identifiers in a single API call.
/// Identifiers the API reports under `errors` (deleted, protected or otherwise
/// unavailable tweets) are skipped; everything else is returned as flattened
/// [`Tweet`] records in response order.
///
/// # Parameters
///
/// - `client`: the HTTP client used for the API call
/// - `bearer_token`: the App-only Bearer Token
/// - `ids`: the identifiers to look up (at most [`LOOKUP_BATCH_SIZE`])
///
/// # Returns
///
/// - `Ok(Vec<Tweet>)`: the tweets that could be hydrated
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: if the API call fails or
///   returns an unparseable body
pub async fn hydrate_batch(
    client: &Client,
    bearer_token: &str,
    ids: &[String],
) -> Result<Vec<Tweet>, Box<dyn std::error::Error + Send + Sync>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    if ids.len() > LOOKUP_BATCH_SIZE {
        return Err(format!(
            "Lookup batch of {} identifiers exceeds the API maximum of {}",
            ids.len(),
            LOOKUP_BATCH_SIZE
        )
        .into());
    }

    debug!("Hydrating batch of {} tweet ids", ids.len());

    let request_builder = client
        .get(LOOKUP_URL)
        .header("Authorization", build_bearer_header(bearer_token))
        .query(&[
            ("ids", ids.join(",").as_str()),
            (
                "tweet.fields",
                "id,text,author_id,lang,public_metrics,geo,attachments,referenced_tweets",
            ),
            (
                "expansions",
                "author_id,attachments.media_keys,geo.place_id,referenced_tweets.id",
            ),
            ("media.fields", "media_key,url,preview_image_url"),
            ("place.fields", "id,country_code"),
            ("user.fields", "id,username"),
        ]);

    let response_text = execute_api_request(request_builder, "hydrate_tweets").await?;
    let json_response: serde_json::Value = serde_json::from_str(&response_text)?;

    Ok(parse_lookup_response(&json_response))
}

/// Flattens a tweet lookup response into [`Tweet`] records.
///
/// Builds lookup maps from the `includes` arrays first, then walks the `data`
/// array and resolves author usernames, media URLs, place country codes and
/// retweeted texts against them. Tweets listed under `errors` never appear in
/// `data` and are therefore skipped implicitly; the skip count is logged.
pub(crate) fn parse_lookup_response(json_response: &serde_json::Value) -> Vec<Tweet> {
    // Create maps of the expanded objects for quick lookup
    let mut users_username_map: HashMap<String, String> = HashMap::new();
    let mut media_url_map: HashMap<String, String> = HashMap::new();
    let mut places_country_map: HashMap<String, String> = HashMap::new();
    let mut referenced_text_map: HashMap<String, String> = HashMap::new();

    if let Some(includes) = json_response.get("includes") {
        if let Some(users) = includes.get("users").and_then(|v| v.as_array()) {
            for user in users {
                if let (Some(id), Some(username)) = (
                    user.get("id").and_then(|v| v.as_str()),
                    user.get("username").and_then(|v| v.as_str()),
                ) {
                    users_username_map.insert(id.to_string(), username.to_string());
                }
            }
        }

        if let Some(media) = includes.get("media").and_then(|v| v.as_array()) {
            for entry in media {
                // Photos carry `url`; videos and animated GIFs only carry
                // `preview_image_url`.
                let url = entry
                    .get("url")
                    .or_else(|| entry.get("preview_image_url"))
                    .and_then(|v| v.as_str());
                if let (Some(key), Some(url)) =
                    (entry.get("media_key").and_then(|v| v.as_str()), url)
                {
                    media_url_map.insert(key.to_string(), url.to_string());
                }
            }
        }

        if let Some(places) = includes.get("places").and_then(|v| v.as_array()) {
            for place in places {
                if let (Some(id), Some(country_code)) = (
                    place.get("id").and_then(|v| v.as_str()),
                    place.get("country_code").and_then(|v| v.as_str()),
                ) {
                    places_country_map.insert(id.to_string(), country_code.to_string());
                }
            }
        }

        if let Some(tweets) = includes.get("tweets").and_then(|v| v.as_array()) {
            for tweet in tweets {
                if let (Some(id), Some(text)) = (
                    tweet.get("id").and_then(|v| v.as_str()),
                    tweet.get("text").and_then(|v| v.as_str()),
                ) {
                    referenced_text_map.insert(id.to_string(), text.to_string());
                }
            }
        }
    }

    if let Some(errors) = json_response.get("errors").and_then(|v| v.as_array()) {
        if !errors.is_empty() {
            info!(
                "{} tweet(s) in this batch are unavailable and were skipped",
                errors.len()
            );
            for error in errors {
                debug!(
                    "Unavailable tweet {}: {}",
                    error
                        .get("resource_id")
                        .or_else(|| error.get("value"))
                        .and_then(|v| v.as_str())
                        .unwrap_or("<unknown>"),
                    error
                        .get("detail")
                        .and_then(|v| v.as_str())
                        .unwrap_or("no detail")
                );
            }
        }
    }

    let mut tweets: Vec<Tweet> = Vec::new();
    if let Some(data) = json_response.get("data").and_then(|v| v.as_array()) {
        for tweet in data {
            let id = match tweet.get("id").and_then(|v| v.as_str()) {
                Some(id) => id.to_string(),
                None => {
                    warn!("Tweet without an id field in lookup response, skipping");
                    continue;
                }
            };

            let author_username = tweet
                .get("author_id")
                .and_then(|v| v.as_str())
                .and_then(|author_id| users_username_map.get(author_id))
                .cloned()
                .unwrap_or_default();
            if author_username.is_empty() {
                warn!("Tweet {} has no resolvable author username", id);
            }

            // Prefer the full text of the retweeted tweet: the wrapper text of
            // a retweet is truncated by the API.
            let own_text = tweet
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let text = retweeted_id(tweet)
                .and_then(|ref_id| referenced_text_map.get(ref_id))
                .map(|s| s.as_str())
                .unwrap_or(own_text)
                .to_string();

            let like_count = public_metric(tweet, "like_count");
            let retweet_count = public_metric(tweet, "retweet_count");

            let lang = tweet
                .get("lang")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let country_code = tweet
                .get("geo")
                .and_then(|geo| geo.get("place_id"))
                .and_then(|v| v.as_str())
                .and_then(|place_id| places_country_map.get(place_id))
                .cloned();

            let media_urls: Vec<String> = tweet
                .get("attachments")
                .and_then(|a| a.get("media_keys"))
                .and_then(|v| v.as_array())
                .map(|keys| {
                    keys.iter()
                        .filter_map(|key| key.as_str())
                        .filter_map(|key| media_url_map.get(key))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            tweets.push(Tweet {
                id,
                text,
                author_username,
                like_count,
                retweet_count,
                lang,
                country_code,
                media_urls,
            });
        }
    }

    debug!("Hydrated {} tweet(s) from lookup response", tweets.len());
    tweets
}

/// Extracts the identifier of the retweeted tweet, when the given tweet is a
/// plain retweet.
fn retweeted_id(tweet: &serde_json::Value) -> Option<&str> {
    tweet
        .get("referenced_tweets")
        .and_then(|v| v.as_array())?
        .iter()
        .find(|r| r.get("type").and_then(|v| v.as_str()) == Some("retweeted"))?
        .get("id")
        .and_then(|v| v.as_str())
}

/// Reads a counter from the tweet's `public_metrics` object, defaulting to 0.
fn public_metric(tweet: &serde_json::Value, name: &str) -> u64 {
    tweet
        .get("public_metrics")
        .and_then(|pm| pm.get(name))
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
}
