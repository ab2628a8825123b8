//! # pb-auth-simple
//!
//! Shared-secret implementation of `AdminGate`. Token issuance lives in an
//! external identity collaborator; this plugin only answers "does this
//! bearer token grant admin rights". Comparison goes through SHA-256
//! digests so the secret itself never sits next to request data and the
//! comparison cost does not depend on where the strings diverge.

use async_trait::async_trait;
use pb_core::traits::AdminGate;
use sha2::{Digest, Sha256};

pub struct TokenAdminGate {
    /// Hex digest of the admin secret, computed once at construction.
    secret_digest: String,
}

impl TokenAdminGate {
    /// Accepts the admin secret (e.g., from an environment variable).
    pub fn new(secret: &str) -> Self {
        Self {
            secret_digest: digest(secret),
        }
    }
}

fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AdminGate for TokenAdminGate {
    async fn verify_admin_token(&self, token: &str) -> bool {
        // An unset secret must not make the empty token valid.
        !token.is_empty() && digest(token) == self.secret_digest
    }
}
