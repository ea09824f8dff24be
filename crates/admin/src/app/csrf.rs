//! Stateless CSRF tokens.
//!
//! A token is `hex(SHA-256(secret || intention))`, so every form intention
//! gets its own token and nothing has to be kept per session.

use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Form field the token travels in.
pub const TOKEN_FIELD: &str = "_token";

pub const INVALID_TOKEN_MESSAGE: &str = "The CSRF token is invalid. Please try to resubmit the form.";

#[derive(Clone)]
pub struct CsrfTokens {
    secret: Arc<str>,
}

impl CsrfTokens {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    pub fn token(&self, intention: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(intention.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_valid(&self, intention: &str, candidate: &str) -> bool {
        constant_time_eq(self.token(intention).as_bytes(), candidate.as_bytes())
    }
}

impl core::fmt::Debug for CsrfTokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CsrfTokens").finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
