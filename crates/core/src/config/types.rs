use serde::{Deserialize, Serialize};

/// Well-known bus name of the thumbnailer service.
pub const THUMBNAILER_SERVICE: &str = "org.freedesktop.thumbnails.Thumbnailer1";
/// Object path of the thumbnailer service.
pub const THUMBNAILER_PATH: &str = "/org/freedesktop/thumbnails/Thumbnailer1";
/// Interface name of the thumbnailer service.
pub const THUMBNAILER_INTERFACE: &str = "org.freedesktop.thumbnails.Thumbnailer1";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Which message bus the thumbnailer lives on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusKind {
    #[default]
    Session,
    System,
}

/// Bus endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusConfig {
    #[serde(default)]
    pub bus: BusKind,
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus: BusKind::default(),
            service: default_service(),
            path: default_path(),
            interface: default_interface(),
        }
    }
}

fn default_service() -> String {
    THUMBNAILER_SERVICE.to_string()
}

fn default_path() -> String {
    THUMBNAILER_PATH.to_string()
}

fn default_interface() -> String {
    THUMBNAILER_INTERFACE.to_string()
}

/// Arguments passed along with every `Queue` call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestConfig {
    /// Thumbnail flavor requested from the service ("normal", "large", ...)
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Scheduler the service should use for the request
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Handle of an earlier request to unqueue, 0 for none
    #[serde(default)]
    pub flags: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            backend: default_backend(),
            flags: 0,
        }
    }
}

fn default_priority() -> String {
    "normal".to_string()
}

fn default_backend() -> String {
    "default".to_string()
}

/// How sessions map onto bus connections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// One private connection per session.
    #[default]
    Isolated,
    /// All sessions multiplex notifications over one connection.
    Shared,
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Upper bound for submit + wait of a single session, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub topology: Topology,
    /// Maximum sessions running at once (0 = unbounded)
    #[serde(default)]
    pub max_concurrent_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            topology: Topology::default(),
            max_concurrent_sessions: 0,
        }
    }
}

fn default_timeout() -> u64 {
    120
}
