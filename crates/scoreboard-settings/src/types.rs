//! Settings types. Every struct has a full `Default` so a partial settings
//! file only needs the keys it changes.

use scoreboard_core::{AdminToken, Role};
use serde::{Deserialize, Serialize};

/// Top-level settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreboardSettings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// Server listen and fan-out settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Shared secret for mutating endpoints. Unset disables the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    /// Seconds between keep-alive comments on each event stream.
    pub keep_alive_secs: u64,
    /// Per-subscriber queue length before snapshots are dropped.
    pub subscriber_queue: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            admin_token: None,
            keep_alive_secs: 30,
            subscriber_queue: 64,
        }
    }
}

impl ServerSettings {
    pub fn admin_token(&self) -> Option<AdminToken> {
        AdminToken::from_config(self.admin_token.as_deref())
    }
}

/// Client connection and display settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL of the score board server.
    pub server_url: String,
    /// Admin clients get the editing board and may mutate.
    pub role: Role,
    /// Sent as `x-admin-token` on mutating requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    /// Delay before reopening a dropped event stream.
    pub reconnect_delay_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            role: Role::User,
            admin_token: None,
            reconnect_delay_secs: 3,
        }
    }
}

impl ClientSettings {
    pub fn admin_token(&self) -> Option<AdminToken> {
        AdminToken::from_config(self.admin_token.as_deref())
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level name (`trace` .. `error`).
    pub level: String,
    /// Emit JSON lines.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
