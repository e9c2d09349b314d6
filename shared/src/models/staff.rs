//! Staff Account Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Restaurant owner: full management capability
    Owner,
    /// Waiter/operator: order and table operations
    Staff,
}

impl StaffRole {
    /// Role name as carried in JWT claims
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Staff => "staff",
        }
    }

    /// Permission strings granted to the role, consumed by the
    /// `require_permission` middleware (wildcards allowed).
    pub fn permissions(&self) -> Vec<String> {
        match self {
            StaffRole::Owner => vec!["all".to_string()],
            StaffRole::Staff => vec![
                "catalog:read".to_string(),
                "tables:read".to_string(),
                "tables:status".to_string(),
                "orders:*".to_string(),
                "invoices:read".to_string(),
            ],
        }
    }
}

/// Stored staff account (includes the password hash; never serialized
/// into API responses, handlers return [`StaffProfile`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub role: StaffRole,
    /// Owning restaurant account (for the owner, their own id)
    pub owner_id: u64,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create staff payload (plaintext password, hashed server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: StaffRole,
}

/// Staff response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub role: StaffRole,
    pub owner_id: u64,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the bearer token and the account it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub profile: StaffProfile,
}

impl From<&StaffAccount> for StaffProfile {
    fn from(account: &StaffAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            owner_id: account.owner_id,
        }
    }
}
