use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash,
    #[error("stored hash is not a valid PHC string")]
    InvalidHash,
    #[error("password does not match")]
    Mismatch,
}

/// Hashes a plaintext password with Argon2id and a fresh random salt.
///
/// Returns a PHC string (`$argon2id$v=19$m=19456,t=2,p=1$...`) that carries
/// its own salt and parameters, so verification needs nothing but the hash.
/// The default parameters are the current OWASP-recommended baseline; bump
/// them by constructing a non-default `Argon2` here if that changes.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// The comparison happens inside the argon2 crate and does not shortcut on
/// length or prefix, so timing reveals nothing about how wrong a guess was.
/// Callers that must not leak *why* verification failed should treat both
/// error cases identically, which is what the login path does.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrips() {
        let hash = hash_password("pw123456").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw123456", &hash).is_ok());
        assert!(verify_password("pw123457", &hash).is_err());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("pw123456").unwrap();
        let second = hash_password("pw123456").unwrap();

        // Fresh salt per call; equal hashes would mean the salt is broken.
        assert_ne!(first, second);
        assert!(verify_password("pw123456", &first).is_ok());
        assert!(verify_password("pw123456", &second).is_ok());
    }

    #[test]
    fn malformed_hash_is_its_own_error() {
        let result = verify_password("pw123456", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn unicode_passwords_work() {
        let hash = hash_password("contraseña-más-larga").unwrap();
        assert!(verify_password("contraseña-más-larga", &hash).is_ok());
    }
}
