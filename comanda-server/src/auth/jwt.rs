//! JWT token service
//!
//! Token generation, validation and the authenticated-user context.
//! Claims carry the staff member's tenant (`owner_id`) so every handler
//! can scope storage access without a user lookup per request.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(key) => String::from_utf8(key).unwrap_or_else(|_| {
                tracing::error!("JWT secret contains invalid UTF-8 characters");
                generate_printable_jwt_secret()
            }),
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using a temporary key", e);
                    generate_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "comanda-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "comanda-clients".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff account id (subject)
    pub sub: String,
    pub username: String,
    /// Name shown on tickets and invoices
    pub display_name: String,
    /// Role name ("owner" or "staff")
    pub role: String,
    /// Owning restaurant account, scopes all storage access
    pub owner_id: u64,
    /// Comma-separated permission list
    pub permissions: String,
    pub token_type: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable random key (development fallback)
pub fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "ComandaServerDevelopmentFallbackKey2026!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// Load the signing secret from the environment
///
/// Missing or short secrets are fatal in release builds; debug builds
/// fall back to a generated key so a dev checkout runs without setup.
fn load_jwt_secret() -> Result<Vec<u8>, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret.into_bytes())
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                Ok(generate_printable_jwt_secret().into_bytes())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token for a staff account
    pub fn generate_token(
        &self,
        user_id: u64,
        username: &str,
        display_name: &str,
        role: &str,
        owner_id: u64,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            role: role.to_string(),
            owner_id,
            permissions: permissions.join(","),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Lifetime in seconds that freshly issued tokens carry
    pub fn get_expiration_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated user context, parsed from validated claims
///
/// Created by the auth middleware (or the extractor) and injected into
/// request extensions; handlers take it as an argument.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Staff account id
    pub id: u64,
    pub username: String,
    /// Name shown on tickets and invoices
    pub display_name: String,
    /// Role name ("owner" or "staff")
    pub role: String,
    /// Tenant scope for all storage access
    pub owner_id: u64,
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Non-numeric subject: {}", claims.sub)))?;

        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Ok(Self {
            id,
            username: claims.username,
            display_name: claims.display_name,
            role: claims.role,
            owner_id: claims.owner_id,
            permissions,
        })
    }
}

impl CurrentUser {
    /// The restaurant owner role holds every permission
    pub fn is_owner(&self) -> bool {
        self.role == "owner"
    }

    /// Whether this user may manage resources belonging to `owner_id`
    ///
    /// Owner role on the matching tenant, or the `"all"` wildcard.
    pub fn can_manage(&self, owner_id: u64) -> bool {
        (self.is_owner() && self.owner_id == owner_id)
            || self.permissions.iter().any(|p| p == "all")
    }

    /// Check a permission, with wildcard support
    ///
    /// - `"orders:*"` matches `"orders:close"`, `"orders:read"`, etc.
    /// - `"all"` matches everything
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_owner() {
            return true;
        }

        if self.permissions.iter().any(|p| p == "all") {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == permission {
                return true;
            }
            if let Some(prefix) = p.strip_suffix(":*") {
                permission.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-key-of-sufficient-length".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
            audience: "comanda-clients".to_string(),
        })
    }

    #[test]
    fn test_token_round_trip() {
        let service = test_service();
        let permissions = vec!["orders:*".to_string(), "tables:read".to_string()];

        let token = service
            .generate_token(7, "maria", "Maria Lopez", "staff", 1, &permissions)
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "maria");
        assert_eq!(claims.display_name, "Maria Lopez");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.owner_id, 1);
        assert_eq!(claims.permissions, "orders:*,tables:read");

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.owner_id, 1);
        assert_eq!(user.permissions.len(), 2);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token(7, "maria", "Maria Lopez", "staff", 1, &[])
            .expect("Failed to generate test token");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());

        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-signing-secret-key".to_string(),
            ..service.config.clone()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_permission_wildcards() {
        let user = CurrentUser {
            id: 7,
            username: "maria".to_string(),
            display_name: "Maria Lopez".to_string(),
            role: "staff".to_string(),
            owner_id: 1,
            permissions: vec!["orders:*".to_string(), "tables:read".to_string()],
        };

        assert!(user.has_permission("orders:close"));
        assert!(user.has_permission("orders:read"));
        assert!(user.has_permission("tables:read"));
        assert!(!user.has_permission("tables:manage"));
        assert!(!user.has_permission("settings:manage"));
    }

    #[test]
    fn test_owner_has_all_permissions() {
        let owner = CurrentUser {
            id: 1,
            username: "dueno".to_string(),
            display_name: "El Dueno".to_string(),
            role: "owner".to_string(),
            owner_id: 1,
            permissions: vec![],
        };

        assert!(owner.is_owner());
        assert!(owner.has_permission("settings:manage"));
        assert!(owner.has_permission("staff:manage"));
    }

    #[test]
    fn test_can_manage_requires_matching_tenant() {
        let owner = CurrentUser {
            id: 1,
            username: "dueno".to_string(),
            display_name: "El Dueno".to_string(),
            role: "owner".to_string(),
            owner_id: 1,
            permissions: vec![],
        };
        assert!(owner.can_manage(1));
        assert!(!owner.can_manage(2));

        let staff = CurrentUser {
            id: 7,
            username: "maria".to_string(),
            display_name: "Maria Lopez".to_string(),
            role: "staff".to_string(),
            owner_id: 1,
            permissions: vec!["orders:*".to_string()],
        };
        assert!(!staff.can_manage(1));

        let admin = CurrentUser {
            id: 9,
            username: "root".to_string(),
            display_name: "Root".to_string(),
            role: "staff".to_string(),
            owner_id: 2,
            permissions: vec!["all".to_string()],
        };
        assert!(admin.can_manage(1));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            username: "x".to_string(),
            display_name: "x".to_string(),
            role: "staff".to_string(),
            owner_id: 1,
            permissions: String::new(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
            iss: "i".to_string(),
            aud: "a".to_string(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_generated_keys_differ() {
        let key1 = generate_printable_jwt_secret();
        let key2 = generate_printable_jwt_secret();
        assert_ne!(key1, key2);
        assert_eq!(key1.len(), 64);
        assert!(key1.chars().all(|c| c.is_ascii() && !c.is_ascii_control()));
    }
}
