use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Argon2id hash of `password` as a PHC string; the salt is embedded.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| anyhow!("failed to hash password: {error}"))
}

/// Constant-time check of `password` against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|error| anyhow!("stored password hash is malformed: {error}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phc_hash_round_trips() {
        let stored = hash_password("secret").expect("hash");
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("secret", &stored).expect("verify"));
        assert!(!verify_password("Secret", &stored).expect("verify"));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let first = hash_password("secret").expect("hash");
        let second = hash_password("secret").expect("hash");
        assert_ne!(first, second);
        assert!(verify_password("secret", &second).expect("verify"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("secret", "not-a-phc-string").is_err());
    }
}
