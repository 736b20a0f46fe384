use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::EntityContext;
use crate::entity::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSpecialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for ClinicSpecialization {}

pub type ClinicSpecializationContext = EntityContext<ClinicSpecialization>;
