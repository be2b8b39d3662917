//! Image source contract and the CATAAS HTTP implementation

use crate::domain::{Item, ItemMetadata};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://cataas.com";
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Failures of the image source. `Display` is what the user sees.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to fetch cats (Status: {status}). The API might be down or rate limiting. Please try again later.")]
    Status { status: u16 },

    #[error("An unexpected error occurred while fetching cats.")]
    Request(#[from] reqwest::Error),

    #[error("Received an unexpected response from the cat API.")]
    UnexpectedShape,

    #[error("Could not read the cat picture: {0}")]
    Decode(String),
}

/// Supplies batches of items and the picture bytes behind them
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Item>, SourceError>;

    async fn fetch_image(&self, item: &Item) -> Result<Vec<u8>, SourceError>;
}

/// One element of `/api/cats`. Older deployments use `_id`.
#[derive(Debug, Deserialize)]
struct RawCat {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    mimetype: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
}

impl RawCat {
    fn into_item(self, base_url: &str, fetched_at: DateTime<Utc>) -> Option<Item> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .or(self.legacy_id.filter(|id| !id.is_empty()))?;

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(fetched_at);

        let metadata = ItemMetadata {
            mimetype: self.mimetype.unwrap_or_else(|| "image/jpeg".to_string()),
            tags: self.tags.unwrap_or_default(),
            created_at,
        };

        Some(Item::new(id.clone(), cat_image_url(base_url, &id)).with_metadata(metadata))
    }
}

pub fn cat_image_url(base_url: &str, id: &str) -> String {
    format!("{}/cat/{}", base_url.trim_end_matches('/'), id)
}

/// Turns an `/api/cats` body into deck items.
///
/// Entries that are not objects or carry no identifier are dropped, and so
/// is any entry whose identifier already appeared earlier in the batch. The
/// result holds at most `limit` items.
pub fn parse_cats(
    body: serde_json::Value,
    base_url: &str,
    limit: usize,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Item>, SourceError> {
    let entries = match body {
        serde_json::Value::Array(entries) => entries,
        other => {
            error!(kind = %json_kind(&other), "Expected an array of cats");
            return Err(SourceError::UnexpectedShape);
        }
    };

    let returned = entries.len();
    let mut seen = HashSet::new();
    let mut repeated = 0usize;
    let items: Vec<Item> = entries
        .into_iter()
        .take(limit)
        .filter_map(|entry| serde_json::from_value::<RawCat>(entry).ok())
        .filter_map(|raw| raw.into_item(base_url, fetched_at))
        .filter(|item| {
            let fresh = seen.insert(item.id.clone());
            if !fresh {
                repeated += 1;
            }
            fresh
        })
        .collect();

    if repeated > 0 {
        warn!(repeated, kept = items.len(), "API returned repeated cat ids");
    }

    if items.len() < limit && returned < limit {
        warn!(
            returned = items.len(),
            requested = limit,
            "API returned fewer cats than requested"
        );
    }

    Ok(items)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Cat-as-a-service client
#[derive(Debug, Clone)]
pub struct CataasSource {
    base_url: String,
    client: reqwest::Client,
}

impl CataasSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("catswp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn batch_url(&self, limit: usize) -> String {
        format!(
            "{}/api/cats?limit={}&skip=0&timestamp={}",
            self.base_url,
            limit,
            Utc::now().timestamp_millis()
        )
    }
}

#[async_trait]
impl ImageSource for CataasSource {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Item>, SourceError> {
        let url = self.batch_url(limit);
        debug!(%url, "Fetching cat batch");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "Cat batch request failed");
            SourceError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "Cat batch request rejected");
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse cats response");
            if e.is_decode() {
                SourceError::UnexpectedShape
            } else {
                SourceError::Request(e)
            }
        })?;

        parse_cats(body, &self.base_url, limit, Utc::now())
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn fetch_image(&self, item: &Item) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(&item.image_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Cat picture request rejected");
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Cat picture downloaded");
        Ok(bytes.to_vec())
    }
}
