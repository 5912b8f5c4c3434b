//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Administrative interface mount.
    pub admin: AdminConfig,

    /// The delegated application: its mount point and its routes.
    pub app: AppConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Administrative interface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin sub-router.
    pub enabled: bool,

    /// Path prefix the admin sub-router is mounted under.
    pub prefix: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "admin/".to_string(),
        }
    }
}

/// The application sub-router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Path prefix the application is mounted under. Empty mounts it at the
    /// root, after the admin interface.
    pub prefix: String,

    /// Optional namespace for reverse lookup (`namespace:name`).
    pub namespace: Option<String>,

    /// Ordered route declarations; the first match wins.
    pub routes: Vec<RouteConfig>,
}

/// One application route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, e.g. `items/{id:int}/`.
    pub pattern: String,

    /// Route name for reverse lookup.
    #[serde(default)]
    pub name: Option<String>,

    /// What the endpoint answers.
    pub respond: ResponseConfig,
}

/// Endpoint behaviour for an application route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseConfig {
    /// Plain text body.
    Text {
        body: String,
        #[serde(default = "default_status")]
        status: u16,
    },
    /// JSON body taken verbatim from the config value.
    Json {
        body: serde_json::Value,
        #[serde(default = "default_status")]
        status: u16,
    },
    /// Report what the router resolved.
    Echo,
    /// Redirect to another named route, reusing this request's parameters.
    Redirect { route: String },
}

fn default_status() -> u16 {
    200
}
