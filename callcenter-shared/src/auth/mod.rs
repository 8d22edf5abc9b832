/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: bcrypt password hashing and verification
/// - [`jwt`]: session token issuing and validation
///
/// # Security Features
///
/// - **Password Hashing**: bcrypt, cost 10 for new hashes, cost read from the
///   hash on verification
/// - **Session Tokens**: HS256, 24 hour expiry, password hash never embedded
/// - **Stateless Sessions**: no server-side token list, logout is client-side

pub mod jwt;
pub mod password;
