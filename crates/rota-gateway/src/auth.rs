//! HTTP Basic credential check for the mutating endpoints.
//!
//! The username is compared in constant time and the password is verified
//! against a pre-hashed argon2 PHC string from configuration. Both checks
//! always run before the outcome is combined, so a rejected request does
//! not reveal which half was wrong.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use subtle::ConstantTimeEq;
use tracing::warn;

use rota_core::config::AuthConfig;

/// Returns true when the request carries valid Basic credentials.
pub fn verify_basic(auth: &AuthConfig, headers: &HeaderMap) -> bool {
    let Some((username, password)) = extract_credentials(headers) else {
        return false;
    };

    let correct_username: bool = username
        .as_bytes()
        .ct_eq(auth.username.as_bytes())
        .into();

    let correct_password = match PasswordHash::new(&auth.password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            // Operator error: the configured hash is not a valid PHC string.
            warn!(error = %e, "configured password_hash is not parseable");
            false
        }
    };

    correct_username && correct_password
}

/// Pull `(username, password)` out of an `Authorization: Basic <b64>` header.
fn extract_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get("authorization")?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
