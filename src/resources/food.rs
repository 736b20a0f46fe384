//! Food catalog items.
//!
//! Items reference several lookup tables (age groups, tastes, categories)
//! which are loaded through the context's reference fan-out and read back
//! with [`References::items`](crate::entity::References::items).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::EntityContext;
use crate::entity::Record;

pub const AGES: &str = "ages";
pub const TASTE: &str = "taste";
pub const CATEGORIES: &str = "categories";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taste_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for FoodItem {}

pub type FoodContext = EntityContext<FoodItem>;
