use std::collections::HashMap;

use async_trait::async_trait;

/// Verified caller identity boundary. Token mechanics (issuer, signature,
/// expiry) live entirely behind this trait; the core only ever sees the
/// verified subject id, or nothing.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Option<String>;
}

/// Extract the opaque bearer credential from an Authorization header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Fixed credential-to-subject table for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    subjects: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(
        mut self,
        credential: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        self.subjects.insert(credential.into(), subject.into());
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, credential: &str) -> Option<String> {
        self.subjects.get(credential).cloned()
    }
}
