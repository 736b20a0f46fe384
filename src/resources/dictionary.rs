use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::EntityContext;
use crate::entity::Record;

/// Entry of an editable dictionary (lookup table).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dictionary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Fields this console does not model, preserved on update.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Dictionary {}

pub type DictionaryContext = EntityContext<Dictionary>;
