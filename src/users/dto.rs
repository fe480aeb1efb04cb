use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::User;

/// Public part of the user returned to the client. Built field by field from a
/// [`User`], so the password hash has no way into a response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture_path: String,
    pub friends: Vec<Uuid>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub viewed_profile: i32,
    pub impressions: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            picture_path: u.picture_path.clone(),
            friends: u.friends.clone(),
            location: u.location.clone(),
            occupation: u.occupation.clone(),
            viewed_profile: u.viewed_profile,
            impressions: u.impressions,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Compact entry of a friends list.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub picture_path: String,
}

impl From<User> for FriendSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            occupation: u.occupation,
            location: u.location,
            picture_path: u.picture_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_password_hash() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password_hash: "$argon2id$v=19$secret-hash".into(),
            picture_path: "grace.png".into(),
            friends: vec![],
            location: Some("Arlington".into()),
            occupation: None,
            viewed_profile: 42,
            impressions: 7,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["firstName"], "Grace");
        assert_eq!(json["viewedProfile"], 42);
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }
}
