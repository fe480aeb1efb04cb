use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: the user id plus standard timing claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,     // user ID
    pub iat: usize,   // issued at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // only present when a TTL is configured
}
