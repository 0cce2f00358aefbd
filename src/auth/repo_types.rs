use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String, // Argon2 PHC string, never sent to clients
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
