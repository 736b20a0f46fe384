//! List query parameters and the paged list payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

/// Server-side paging, filtering and sorting for a list request.
///
/// Serializes to `skip`, `limit`, `filter` (omitted when absent),
/// `sortField`, `sortOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub skip: u64,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

impl ListQuery {
    /// A page of `limit` rows starting at `skip`, sorted by `id` ascending.
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit,
            filter: None,
            sort_field: "id".to_string(),
            sort_order: SortOrder::Asc,
        }
    }

    /// Empty or whitespace-only filters are treated as no filter.
    pub fn filter(mut self, filter: Option<impl Into<String>>) -> Self {
        self.filter = filter
            .map(Into::into)
            .filter(|f: &String| !f.trim().is_empty());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = field.into();
        self.sort_order = order;
        self
    }

    /// `limit` must be positive; `skip` is unsigned so it cannot be negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("limit must be greater than zero".to_string());
        }
        if self.sort_field.trim().is_empty() {
            return Err("sort field must not be empty".to_string());
        }
        Ok(())
    }
}

/// One page of a list response: `{ "rows": [...], "totalCount": n }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
}
