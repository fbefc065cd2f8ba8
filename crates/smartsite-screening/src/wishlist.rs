//! Wishlist forwarding.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::WishlistError;

/// Rough shape of a wishlist request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// New UI
    Screen,
    /// New functionality
    Feature,
    /// Process improvement
    Automation,
    Unknown,
}

impl RequestKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Feature => "feature",
            Self::Automation => "automation",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a backend reply; anything unexpected is `Unknown`
    pub fn from_reply(reply: &str) -> Self {
        match reply.trim().trim_matches(|c| c == '"' || c == '.').to_lowercase().as_str() {
            "screen" => Self::Screen,
            "feature" => Self::Feature,
            "automation" => Self::Automation,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload posted to the wishlist collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub business_id: String,
    pub description: String,
    pub category: RequestKind,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait WishlistSink: Send + Sync {
    async fn submit(&self, item: &WishlistItem) -> Result<(), WishlistError>;
}

/// Posts wishlist items as JSON to a fixed URL
pub struct HttpWishlistSink {
    client: Client,
    url: String,
}

impl HttpWishlistSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WishlistError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl WishlistSink for HttpWishlistSink {
    async fn submit(&self, item: &WishlistItem) -> Result<(), WishlistError> {
        let response = self.client.post(&self.url).json(item).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WishlistError::Status(status.as_u16()));
        }

        info!(
            business_id = %item.business_id,
            category = %item.category,
            "Wishlist item submitted"
        );
        Ok(())
    }
}
