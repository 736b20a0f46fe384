//! Console configuration: API endpoint, list defaults, per-resource routes.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, ListDefaults, ResourceConfig};
