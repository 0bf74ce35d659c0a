//! In-process cache for signed object URLs.
//!
//! Entries live for the signed URL's lifetime minus a safety margin, so a
//! cached URL is never handed out after it stopped being valid.

use moka::future::Cache;
use std::time::Duration;

use crate::config::{SIGNED_URL_CACHE_CAPACITY, SIGNED_URL_CACHE_MARGIN_SECONDS};

/// Signed URL cache keyed by `bucket/blob`.
#[derive(Clone)]
pub struct SignedUrlCache {
    entries: Cache<String, String>,
}

impl SignedUrlCache {
    /// Cache sized for URLs signed with `expiration_seconds` of validity.
    pub fn new(expiration_seconds: u64) -> Self {
        Self::with_ttl(cache_ttl(expiration_seconds))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(SIGNED_URL_CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    pub async fn get(&self, bucket: &str, blob_name: &str) -> Option<String> {
        self.entries.get(&key(bucket, blob_name)).await
    }

    pub async fn insert(&self, bucket: &str, blob_name: &str, signed_url: String) {
        self.entries.insert(key(bucket, blob_name), signed_url).await;
    }

    pub async fn invalidate(&self, bucket: &str, blob_name: &str) {
        self.entries.invalidate(&key(bucket, blob_name)).await;
    }
}

fn key(bucket: &str, blob_name: &str) -> String {
    format!("{bucket}/{blob_name}")
}

/// Expiration minus the margin; very short expirations fall back to half.
fn cache_ttl(expiration_seconds: u64) -> Duration {
    let seconds = if expiration_seconds > SIGNED_URL_CACHE_MARGIN_SECONDS * 2 {
        expiration_seconds - SIGNED_URL_CACHE_MARGIN_SECONDS
    } else {
        (expiration_seconds / 2).max(1)
    };
    Duration::from_secs(seconds)
}
