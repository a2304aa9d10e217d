//! # Credential hashing
//!
//! One-way, salted password hashing with bcrypt. The work factor is fixed
//! when the [`PasswordHasher`] is built and shared read-only afterwards.
//!
//! Both operations are CPU-bound on purpose. Async callers should run them
//! on the blocking pool (`tokio::task::spawn_blocking`).

use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Hashes and verifies passwords with a fixed bcrypt cost.
///
/// ```
/// use postboard::auth::password::PasswordHasher;
///
/// let hasher = PasswordHasher::new(4);
/// let hash = hasher.hash("password1").unwrap();
///
/// assert!(hasher.verify(&hash, "password1"));
/// assert!(!hasher.verify(&hash, "password2"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces a freshly salted hash; equal inputs give different outputs.
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(secret, self.cost)?)
    }

    /// Returns `true` only if `secret` matches `hash`.
    ///
    /// A hash that cannot be parsed is treated as a mismatch.
    pub fn verify(&self, hash: &str, secret: &str) -> bool {
        bcrypt::verify(secret, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn same_secret_hashes_differently_and_both_verify() {
        let hasher = PasswordHasher::new(COST);
        let a = hasher.hash("password1").unwrap();
        let b = hasher.hash("password1").unwrap();

        assert_ne!(a, b, "hashes must be salted");
        assert!(hasher.verify(&a, "password1"));
        assert!(hasher.verify(&b, "password1"));
        assert!(!hasher.verify(&a, "password2"));
        assert!(!hasher.verify(&b, "password2"));
    }

    #[test]
    fn hash_does_not_contain_plaintext() {
        let hasher = PasswordHasher::new(COST);
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(!hash.contains("correct horse"));
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn malformed_hash_is_a_mismatch_not_an_error() {
        let hasher = PasswordHasher::new(COST);

        assert!(!hasher.verify("", "password1"));
        assert!(!hasher.verify("not-a-bcrypt-hash", "password1"));
        assert!(!hasher.verify("$2b$04$tooshort", "password1"));
    }

    #[test]
    fn verify_works_across_costs() {
        let hash = PasswordHasher::new(5).hash("password1").unwrap();
        assert!(PasswordHasher::new(COST).verify(&hash, "password1"));
    }
}
