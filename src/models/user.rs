use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered student account. Credentials and profile data live in the
/// upstream identity provider; this table only anchors user ids.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for the registration endpoint
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
}
