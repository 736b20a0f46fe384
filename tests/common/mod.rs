//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use entity_console::client::RestClient;
use entity_console::config::{ApiConfig, Config};
use entity_console::store::Dispatcher;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use mock_backend::MockBackend;

/// REST client pointed at a running mock backend.
pub fn client_for(backend: &MockBackend) -> RestClient {
    RestClient::new(&ApiConfig {
        base_url: backend.base_url(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        token: Some("test-token".to_string()),
    })
    .expect("Failed to build client")
}

/// Config whose `api.base_url` targets the mock backend.
pub fn config_for(backend: &MockBackend) -> Config {
    let mut config = Config::default();
    config.api.base_url = backend.base_url();
    config
}

/// Write `content` to a `config.toml` inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Dispatcher that records every intent in order.
pub struct Recorder<I> {
    intents: Arc<Mutex<Vec<I>>>,
}

impl<I> Clone for Recorder<I> {
    fn clone(&self) -> Self {
        Self {
            intents: Arc::clone(&self.intents),
        }
    }
}

impl<I> Default for Recorder<I> {
    fn default() -> Self {
        Self {
            intents: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<I: Clone> Recorder<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> Vec<I> {
        self.intents.lock().clone()
    }
}

impl<I: Send> Dispatcher<I> for Recorder<I> {
    fn dispatch(&self, intent: I) {
        self.intents.lock().push(intent);
    }
}
