/// Password hashing module using bcrypt
///
/// Staff passwords are stored as bcrypt hashes. Every hash carries its own
/// salt and cost factor in the modular crypt string, so verification works for
/// any hash regardless of the cost it was created with.
///
/// # Security
///
/// - **Algorithm**: bcrypt (`$2b$`)
/// - **Cost**: 10 for new hashes ([`HASH_COST`])
/// - **Salt**: 16 random bytes per hash
///
/// # Example
///
/// ```
/// use callcenter_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use std::sync::OnceLock;

/// Cost factor used when creating new hashes
pub const HASH_COST: u32 = 10;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with bcrypt at [`HASH_COST`]
///
/// Two calls with the same password produce different strings because each
/// call draws a fresh salt.
///
/// # Example
///
/// ```
/// use callcenter_shared::auth::password::hash_password;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("my_password")?;
/// assert!(hash.starts_with("$2b$10$"));
/// # Ok(())
/// # }
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, HASH_COST).map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored bcrypt hash
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash is
/// not a bcrypt string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
}

/// Burns one bcrypt verification against a fixed hash
///
/// Used on login when the username does not exist, so that an unknown user
/// costs the same time as a wrong password.
pub fn dummy_verify(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let hash = DUMMY_HASH.get_or_init(|| hash_password("callcenter-dummy-password").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
}
