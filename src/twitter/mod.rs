//! Twitter/X API integration module.
//!
//! This module contains the client-side pieces of the hydration pipeline:
//! batched tweet lookup against the Twitter/X API v2 and the low-level
//! request plumbing (authentication header, rate-limit waits).

mod api;
mod hydrate;

// Re-export public API
pub use hydrate::{hydrate_batch, Tweet, LOOKUP_BATCH_SIZE};

// Crate-internal re-exports for the test module
#[cfg(test)]
pub(crate) use api::{execute_api_request, rate_limit_wait, sanitize_for_logging};
#[cfg(test)]
pub(crate) use hydrate::parse_lookup_response;
