use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Produces the value stored on a new or edited user row. Plaintext storage
/// exists only for parity with pre-hashing deployments.
pub fn encode_password(plain: &str, legacy_plaintext: bool) -> anyhow::Result<String> {
    if legacy_plaintext {
        Ok(plain.to_string())
    } else {
        hash_password(plain)
    }
}

/// Checks a submitted password against whatever is stored on the user row.
/// PHC-formatted values are argon2 hashes; anything else is a legacy
/// plaintext credential and is compared directly.
pub fn verify_credential(plain: &str, stored: &str) -> bool {
    if PasswordHash::new(stored).is_ok() {
        verify_password(plain, stored).unwrap_or(false)
    } else {
        plain == stored
    }
}
