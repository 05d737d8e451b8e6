use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// System notice shown to students. At most one notice is active at a time;
/// `last_activated_at` lets clients detect a re-activation and re-show it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub last_activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new notice
#[derive(Debug, Deserialize)]
pub struct CreateNotice {
    pub title: String,
    pub body: String,
    /// When true, the new notice becomes the single active one
    #[serde(default)]
    pub activate: bool,
}

/// DTO for updating a notice
#[derive(Debug, Deserialize)]
pub struct UpdateNotice {
    pub title: Option<String>,
    pub body: Option<String>,
    /// `Some(true)` routes through exclusive activation
    pub active: Option<bool>,
}
