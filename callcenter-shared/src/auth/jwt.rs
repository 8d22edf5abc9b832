/// Session token generation and validation
///
/// Login and password updates hand out an HS256-signed JWT whose payload is a
/// copy of the staff account ([`SessionUser`]). Tokens are never stored on the
/// server: logout only clears the client cookie, and a token stays valid until
/// its `exp`.
///
/// # Payload
///
/// - Identifier and audit references (`id`, `created_by`, `updated_by`) are
///   rendered as strings so clients decoding the payload as JavaScript numbers
///   don't lose precision on large ids.
/// - The password hash is never part of the payload.
///
/// # Example
///
/// ```
/// use callcenter_shared::auth::jwt::{create_token, validate_token, Claims, SessionUser};
/// use chrono::Utc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = SessionUser {
///     id: "1".to_string(),
///     username: "operator".to_string(),
///     name: "Operator".to_string(),
///     is_admin: false,
///     is_team_lead: false,
///     is_first_login: true,
///     status: "1".to_string(),
///     team_id: Some(3),
///     created_by: None,
///     updated_by: None,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
///
/// let secret = "a-signing-secret-that-is-32-bytes-long";
/// let token = create_token(&Claims::new(user), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.user.username, "operator");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Issuer claim written into and required from every token
pub const ISSUER: &str = "callcenter";

/// Session token lifetime
pub fn session_ttl() -> Duration {
    Duration::hours(24)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Account snapshot embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    pub is_team_lead: bool,
    pub is_first_login: bool,
    pub status: String,
    pub team_id: Option<i64>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            is_team_lead: user.is_team_lead,
            is_first_login: user.is_first_login,
            status: user.status.clone(),
            team_id: user.team_id,
            created_by: user.created_by.map(|id| id.to_string()),
            updated_by: user.updated_by.map(|id| id.to_string()),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// JWT claims: the session user plus the registered claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: SessionUser,

    /// Issuer - always [`ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring after [`session_ttl`]
    pub fn new(user: SessionUser) -> Self {
        Self::with_expiration(user, session_ttl())
    }

    /// Creates claims with a custom lifetime
    pub fn with_expiration(user: SessionUser, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            user,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates signature, expiry and issuer, returning the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Builds and signs a fresh 24h session token for `user`
pub fn issue_session_token(user: &User, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(SessionUser::from(user)), secret)
}
