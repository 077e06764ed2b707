//! Dashboard configuration that downstream crates can serialize/deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Where the record collection lives: `memory://`, `file://<root>` or a bare path.
    pub store_uri: String,

    /// Database (namespace) holding the collection.
    pub database: String,

    /// Collection name.
    pub collection: String,

    /// How long `connect` keeps probing the backend before giving up.
    pub server_selection_timeout_ms: u64,

    /// How long a single store operation may wait for the collection.
    pub socket_timeout_ms: u64,

    /// Table rows per page.
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_uri: "file://./shelter-data".to_string(),
            database: "AAC".to_string(),
            collection: "animals".to_string(),
            server_selection_timeout_ms: 3_000,
            socket_timeout_ms: 30_000,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub uri: String,
    /// Filesystem root for `file` URIs (the URI itself otherwise).
    pub root: String,
    pub database: String,
    pub collection: String,
    pub server_selection_timeout_ms: u64,
    pub socket_timeout_ms: u64,
}

impl StoreConfig {
    pub fn scheme(&self) -> Option<&str> {
        self.uri
            .split_once("://")
            .map(|(scheme, _)| scheme.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

impl DashboardConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SHELTERDASH_STORE_URI`: collection location
    /// - `SHELTERDASH_DATABASE`: database name
    /// - `SHELTERDASH_COLLECTION`: collection name
    /// - `SHELTERDASH_SERVER_SELECTION_TIMEOUT_MS`: connect probe timeout
    /// - `SHELTERDASH_SOCKET_TIMEOUT_MS`: per-operation timeout
    /// - `SHELTERDASH_PAGE_SIZE`: table rows per page
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading through `lookup` (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("SHELTERDASH_STORE_URI") {
            cfg.store_uri = s;
        }

        if let Some(s) = lookup("SHELTERDASH_DATABASE") {
            cfg.database = s;
        }

        if let Some(s) = lookup("SHELTERDASH_COLLECTION") {
            cfg.collection = s;
        }

        if let Some(s) = lookup("SHELTERDASH_SERVER_SELECTION_TIMEOUT_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.server_selection_timeout_ms = v;
            }
        }

        if let Some(s) = lookup("SHELTERDASH_SOCKET_TIMEOUT_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.socket_timeout_ms = v;
            }
        }

        if let Some(s) = lookup("SHELTERDASH_PAGE_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                if v > 0 {
                    cfg.page_size = v;
                }
            }
        }

        cfg
    }

    /// Produce a store configuration snapshot used by the IO layer.
    pub fn store_config(&self) -> StoreConfig {
        let root = match self.store_uri.split_once("://") {
            Some(("file", _)) => {
                file_uri_to_path(&self.store_uri).unwrap_or_else(|| self.store_uri.clone())
            }
            Some(_) => self.store_uri.trim_end_matches('/').to_string(),
            None => self.store_uri.clone(),
        };

        StoreConfig {
            uri: self.store_uri.clone(),
            root,
            database: self.database.clone(),
            collection: self.collection.clone(),
            server_selection_timeout_ms: self.server_selection_timeout_ms,
            socket_timeout_ms: self.socket_timeout_ms,
        }
    }
}

/// `file:///abs` → `/abs`, `file://./rel` → `./rel`.
fn file_uri_to_path(uri: &str) -> Option<String> {
    let stripped = uri.strip_prefix("file://")?;
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_shelter_collection() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.database, "AAC");
        assert_eq!(cfg.collection, "animals");
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.store_config().socket_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SHELTERDASH_STORE_URI", "memory://"),
            ("SHELTERDASH_SOCKET_TIMEOUT_MS", "250"),
            ("SHELTERDASH_PAGE_SIZE", "zero"),
        ]);
        let cfg = DashboardConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.store_uri, "memory://");
        assert_eq!(cfg.socket_timeout_ms, 250);
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.store_config().scheme(), Some("memory"));
    }

    #[test]
    fn file_uris_resolve_to_paths() {
        let cfg = DashboardConfig {
            store_uri: "file:///var/lib/shelter".into(),
            ..Default::default()
        };
        assert_eq!(cfg.store_config().root, "/var/lib/shelter");

        let bare = DashboardConfig {
            store_uri: "./data".into(),
            ..Default::default()
        };
        let sc = bare.store_config();
        assert_eq!(sc.scheme(), None);
        assert_eq!(sc.root, "./data");
    }
}
