use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,
    #[error("Invalid basic header. No credentials provided.")]
    EmptyBasicHeader,
    #[error("Invalid basic header. Credentials not correctly base64 encoded.")]
    MalformedBasicHeader,
    #[error("Invalid username/password.")]
    InvalidCredentials,
    #[error("User inactive or deleted.")]
    InactiveAccount,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Username and password carried by an `Authorization: Basic` header
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Parse the raw `Authorization` header value.
    ///
    /// Any scheme other than `Basic` counts as no credentials at all.
    pub fn from_authorization(header: &str) -> Result<Self, AuthError> {
        let mut parts = header.split_whitespace();
        let scheme = parts.next().ok_or(AuthError::MissingCredentials)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::MissingCredentials);
        }

        let token = parts.next().ok_or(AuthError::EmptyBasicHeader)?;
        if parts.next().is_some() {
            return Err(AuthError::MalformedBasicHeader);
        }

        let decoded = STANDARD
            .decode(token)
            .map_err(|_| AuthError::MalformedBasicHeader)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedBasicHeader)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedBasicHeader)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Header value for these credentials; used by the CLI and tests
    pub fn to_header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
