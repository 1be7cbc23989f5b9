//! # Client configuration — `admin.toml`
//!
//! Defines the TOML configuration the admin client is built with
//! (filename: [`AdminConfig::filename`] = `"admin.toml"`). The web binary embeds
//! the file at compile time; tests construct configs directly.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"   # REST resource server root
//!
//! [session]
//! storage_key = "token"                # localStorage key holding the credential
//!
//! [collection]
//! page_size = 10                       # records requested per page
//!
//! [notifications]
//! ttl_secs = 5                         # auto-clear delay for the toast
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`AdminConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`ApiConfig`] | Remote server location. |
//! | [`SessionConfig`] | Durable storage key for the credential. |
//! | [`CollectionConfig`] | Page size for list requests. |
//! | [`NotificationConfig`] | Toast lifetime. |
//!
//! Every section derives `Default`, so a missing or empty file is equivalent to
//! the default configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `admin.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Remote resource server settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL; endpoint paths such as `/api/users` are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Session persistence settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Durable storage key holding the raw credential.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// Collection paging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Notification toast settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Seconds before a notification clears itself.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_storage_key() -> String {
    "token".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_ttl_secs() -> u64 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl AdminConfig {
    /// Create a default config pointing at the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Builder method to set the server root URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Builder method to set the page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.collection.page_size = page_size.max(1);
        self
    }

    /// Builder method to set the notification lifetime.
    pub fn with_notification_ttl(mut self, secs: u64) -> Self {
        self.notifications.ttl_secs = secs;
        self
    }

    /// Notification lifetime as a [`Duration`].
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notifications.ttl_secs)
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "admin.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
