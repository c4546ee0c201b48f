use std::{env, path::PathBuf, sync::Arc};

use crate::store::{FileStore, MemoryStore, SharedStore};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Profile file; `None` keeps everything in memory.
    pub store_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = env::var("STORE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            store_path,
            host,
        })
    }

    pub fn open_store(&self) -> anyhow::Result<SharedStore> {
        let store: SharedStore = match &self.store_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
