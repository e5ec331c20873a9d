//! Password hashing interface
//!
//! The coordinator only needs to hash and verify; the algorithm is pluggable.

use std::fmt::Debug;

use tracing::warn;

use crate::error::HashError;

/// Hashes passwords and checks them against stored hashes.
pub trait PasswordVerifier: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Salted bcrypt hashes.
#[derive(Debug, Clone, Copy)]
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    /// Uses `cost` rounds; `bcrypt::MIN_COST` keeps tests fast.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordVerifier for BcryptVerifier {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(err) => {
                warn!(error = %err, "stored password hash is malformed");
                false
            }
        }
    }
}
