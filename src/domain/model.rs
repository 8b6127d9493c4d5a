use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted shape of a support tech, as stored in the document database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechEntity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub added_on: DateTime<Utc>,
    pub added_by: Option<String>,
}

/// Persisted shape of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub added_on: DateTime<Utc>,
}
