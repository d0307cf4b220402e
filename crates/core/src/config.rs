//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size for JSON endpoints, in bytes.
    ///
    /// Import payloads carry a whole deck; 10 MiB covers tens of thousands
    /// of flashcards at a few hundred bytes each.
    #[serde(default = "default_max_json_body_bytes")]
    pub max_json_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_max_json_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_json_body_bytes: default_max_json_body_bytes(),
        }
    }
}

/// Media store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for uploaded image files.
        path: PathBuf,
    },
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/uploads"),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/cardbox.db"),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl AppConfig {
    /// Create a test configuration.
    ///
    /// **For testing only.** Store paths point at the current directory;
    /// tests construct their stores from temp dirs and pass them in directly.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
                ..ServerConfig::default()
            },
            ..Self::default()
        }
    }
}
