use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as persisted by a [`UserStore`](super::repo::UserStore).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,             // unique, compared exactly
    pub password_hash: String,     // Argon2 PHC string, never the plaintext
    pub picture_path: String,
    pub friends: Vec<Uuid>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub viewed_profile: i32,
    pub impressions: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Everything needed to insert a user; the store fills in id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub picture_path: String,
    pub friends: Vec<Uuid>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub viewed_profile: i32,
    pub impressions: i32,
}
