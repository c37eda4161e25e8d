use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A login allowed through the Basic auth gate
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
