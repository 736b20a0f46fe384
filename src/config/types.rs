use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::SortOrder;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListDefaults,
    /// Overrides keyed by resource name (e.g. "dictionaries", "food").
    /// Resources without an entry use their built-in route.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

/// REST backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL every relative resource path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
}

/// Defaults for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDefaults {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Route of one REST resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Collection path, relative to `api.base_url` or absolute.
    pub path: String,
    /// Field of each record that holds its identifier.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Lookup tables loaded alongside the resource, key -> URL.
    #[serde(default)]
    pub references: BTreeMap<String, String>,
}

impl ResourceConfig {
    pub fn new(path: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id_field: id_field.into(),
            references: BTreeMap::new(),
        }
    }

    pub fn with_reference(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.references.insert(key.into(), url.into());
        self
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_page_size() -> u64 {
    20
}

fn default_sort_field() -> String {
    "id".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            token: None,
        }
    }
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_field: default_sort_field(),
            sort_order: SortOrder::default(),
        }
    }
}
