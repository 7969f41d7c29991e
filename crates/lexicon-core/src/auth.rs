//! Moderator authentication.
//!
//! Password verification is a one-way hash comparison capability behind a
//! trait, so tests can swap in a deterministic verifier and the hash
//! scheme can change without touching the authentication flow.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier as _};
use lexicon_state::{ModeratorRecord, ModeratorStore, StorageError};
use tracing::warn;

use crate::error::{LexiconError, Result};

/// One-way password hash comparison capability.
pub trait CredentialVerifier: Send + Sync {
    /// Whether `password` matches `hash`. A malformed hash is a mismatch,
    /// not an error the caller can distinguish.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id-backed verifier.
#[derive(Debug, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    /// Hash a password for storage. Used by account bootstrap, never by
    /// the authentication path.
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| LexiconError::Validation(format!("could not hash password: {e}")))
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            warn!("stored password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Moderator authentication service.
pub struct ModeratorAuth {
    store: Arc<dyn ModeratorStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl ModeratorAuth {
    pub fn new(store: Arc<dyn ModeratorStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        ModeratorAuth { store, verifier }
    }

    /// Authenticate a moderator by username and password.
    ///
    /// Unknown username and wrong password both come back as
    /// `Unauthorized`; the caller cannot probe which usernames exist.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<ModeratorRecord> {
        let moderator = match self.store.find_moderator(username).await {
            Ok(m) => m,
            Err(StorageError::ModeratorNotFound { .. }) => return Err(LexiconError::Unauthorized),
            Err(e) => return Err(e.into()),
        };

        if self.verifier.verify(password, &moderator.password_hash) {
            Ok(moderator)
        } else {
            Err(LexiconError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_round_trip() {
        let hash = Argon2Verifier::hash_password("admin123").unwrap();
        let verifier = Argon2Verifier;

        assert!(verifier.verify("admin123", &hash));
        assert!(!verifier.verify("admin124", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        let verifier = Argon2Verifier;
        assert!(!verifier.verify("whatever", "not-a-phc-string"));
    }
}
