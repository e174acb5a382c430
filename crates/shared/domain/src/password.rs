//! Password value object and the argon2id credential format.
//!
//! Stored credentials look like `$argon2id$v=19$<salt>$<hash>`, where salt and
//! hash use unpadded standard base64. Cost parameters are fixed and therefore
//! not part of the encoding.

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        Error as EncodingError, Output, Salt, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DomainError, DomainResult};

/// Iterations
const TIME_COST: u32 = 1;
/// Memory in KiB (64 MiB)
const MEMORY_COST: u32 = 64 * 1024;
const PARALLELISM: u32 = 4;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;
/// Shortest salt argon2 accepts
const MIN_SALT_LENGTH: usize = 8;

const ALGORITHM_TAG: &str = "argon2id";
const VERSION_TAG: &str = "v=19";

/// Well-formed credential that matches no password. Verified against when a
/// login names an unknown account so both paths cost the same.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashed password value object.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// `InvalidInput` for an empty password, `Hashing` if the primitive fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.is_empty() {
            return Err(DomainError::invalid("password is required"));
        }
        Ok(Self {
            hash: hash_password(plain_text)?,
        })
    }

    /// Wrap a stored credential.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plaintext password against this credential.
    ///
    /// # Errors
    /// `CredentialFormat` when the stored credential cannot be parsed.
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        verify_password(plain_text, &self.hash)
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

/// Hash `plain_text` into the stored credential format.
pub fn hash_password(plain_text: &str) -> DomainResult<String> {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    let key = derive(plain_text, &salt)?;

    let salt = SaltString::encode_b64(&salt).map_err(|e| DomainError::hashing(e.to_string()))?;
    let key = Output::new(&key).map_err(|e| DomainError::hashing(e.to_string()))?;

    Ok(format!("${ALGORITHM_TAG}${VERSION_TAG}${}${}", salt.as_str(), key))
}

/// Verify `plain_text` against a stored credential.
///
/// A stored hash whose length differs from the derived key is a mismatch,
/// not a format error.
pub fn verify_password(plain_text: &str, encoded: &str) -> DomainResult<bool> {
    let parts: Vec<&str> = encoded.split('$').collect();
    if parts.len() != 5 || !parts[0].is_empty() {
        return Err(DomainError::credential_format("expected 5 '$'-separated fields"));
    }
    if parts[1] != ALGORITHM_TAG || parts[2] != VERSION_TAG {
        return Err(DomainError::credential_format("unsupported algorithm or version"));
    }

    let mut salt_buf = [0u8; Salt::MAX_LENGTH];
    let salt = Salt::from_b64(parts[3])
        .and_then(|s| s.decode_b64(&mut salt_buf))
        .map_err(|e| DomainError::credential_format(format!("salt: {e}")))?;
    if salt.len() < MIN_SALT_LENGTH {
        return Err(DomainError::credential_format("salt is too short"));
    }

    let stored = match Output::b64_decode(parts[4]) {
        Ok(output) => output,
        Err(EncodingError::OutputSize { .. }) => return Ok(false),
        Err(e) => return Err(DomainError::credential_format(format!("hash: {e}"))),
    };
    let stored = stored.as_bytes();
    if stored.len() != KEY_LENGTH {
        return Ok(false);
    }

    let derived = derive(plain_text, salt)?;
    Ok(constant_time_eq(&derived, stored))
}

fn derive(plain_text: &str, salt: &[u8]) -> DomainResult<[u8; KEY_LENGTH]> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(KEY_LENGTH))
        .map_err(|e| DomainError::hashing(e.to_string()))?;
    let mut key = [0u8; KEY_LENGTH];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(plain_text.as_bytes(), salt, &mut key)
        .map_err(|e| DomainError::hashing(e.to_string()))?;
    Ok(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain).unwrap());
        assert!(!password.verify("WrongPassword123").unwrap());
    }

    #[test]
    fn test_encoded_format() {
        let hash = hash_password("secret").unwrap();
        let parts: Vec<&str> = hash.split('$').collect();

        assert_eq!(parts.len(), 5);
        assert_eq!(parts[1], "argon2id");
        assert_eq!(parts[2], "v=19");
        // 16-byte salt and 32-byte key, unpadded base64
        assert_eq!(parts[3].len(), 22);
        assert_eq!(parts[4].len(), 43);
        assert!(!hash.contains('='));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain).unwrap());
        assert!(pass2.verify(plain).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(Password::new(""), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_dummy_hash_never_matches() {
        assert_eq!(verify_password("", DUMMY_HASH), Ok(false));
        assert_eq!(verify_password("anything", DUMMY_HASH), Ok(false));
    }

    #[test]
    fn test_malformed_credentials() {
        for bad in [
            "",
            "plaintext",
            "$argon2id$v=19$c29tZXNhbHRzb21lc2FsdA",
            "$argon2i$v=19$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "$argon2id$v=16$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "$argon2id$v=19$!!!$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "$argon2id$v=19$c29tZXNhbHRzb21lc2FsdA$***",
            // 4-byte salt
            "$argon2id$v=19$AAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        ] {
            assert!(
                matches!(verify_password("x", bad), Err(DomainError::CredentialFormat(_))),
                "expected {bad:?} to be malformed"
            );
        }
    }

    #[test]
    fn test_hash_length_mismatch_is_false() {
        // 16-byte hash instead of 32
        let short = "$argon2id$v=19$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAA";
        assert_eq!(verify_password("x", short), Ok(false));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::from_hash(DUMMY_HASH);
        assert!(!format!("{password:?}").contains("argon2id"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
