//! Sampling criteria applied to hydrated tweets.

use crate::config::SamplingConfig;
use crate::twitter::Tweet;

/// The criteria a hydrated tweet must satisfy to be exported.
///
/// Built once from the `sampling` section of the configuration; keywords and
/// languages are lowercased at construction so each tweet only pays for one
/// lowercase conversion of its text.
#[derive(Debug, Clone)]
pub struct SamplingCriteria {
    keywords: Vec<String>,
    languages: Vec<String>,
    only_media: bool,
}

impl SamplingCriteria {
    /// Builds the criteria from the sampling configuration.
    pub fn new(sampling: &SamplingConfig) -> Self {
        SamplingCriteria {
            keywords: sampling
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            languages: sampling
                .languages
                .iter()
                .map(|l| l.to_lowercase())
                .collect(),
            only_media: sampling.only_media,
        }
    }

    /// Decides whether a hydrated tweet satisfies the criteria.
    ///
    /// A tweet matches when:
    /// - at least one keyword appears in its text (case-insensitive), and
    /// - it carries media, when `only_media` is set, and
    /// - its language is listed, when any languages are configured. A tweet
    ///   without a detected language never matches a non-empty language list.
    pub fn matches(&self, tweet: &Tweet) -> bool {
        let text = tweet.text.to_lowercase();
        if !self.keywords.iter().any(|keyword| text.contains(keyword)) {
            return false;
        }

        if self.only_media && !tweet.has_media() {
            return false;
        }

        if !self.languages.is_empty() {
            match &tweet.lang {
                Some(lang) => {
                    if !self.languages.contains(&lang.to_lowercase()) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}
