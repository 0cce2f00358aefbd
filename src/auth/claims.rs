use serde::{Deserialize, Serialize};

/// JWT payload asserting a user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64, // numeric user ID
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
}
