// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential lookup and checking.
//!
//! Stores never hold plaintext secrets: they hand out a SHA-256 digest and
//! [`check`] compares digests in constant time. Every mismatch collapses to
//! [`AuthError::InvalidCredentials`] so callers cannot learn which field was
//! wrong.

use sha2::{Digest, Sha256};

use super::AuthError;

/// SHA-256 digest of a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDigest([u8; 32]);

impl SecretDigest {
    /// Digest a plaintext secret.
    pub fn of(secret: &str) -> Self {
        Self(Sha256::digest(secret.as_bytes()).into())
    }

    fn ct_eq(&self, other: &SecretDigest) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretDigest(..)")
    }
}

/// Source of known identifiers and their secret digests.
pub trait CredentialStore: Send + Sync {
    /// Digest of the secret registered for `identifier`, if any.
    fn lookup(&self, identifier: &str) -> Option<SecretDigest>;
}

/// In-memory store holding exactly one identifier/secret pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    identifier: String,
    digest: SecretDigest,
}

impl StaticCredentials {
    pub fn new(identifier: impl Into<String>, secret: &str) -> Self {
        Self {
            identifier: identifier.into(),
            digest: SecretDigest::of(secret),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn lookup(&self, identifier: &str) -> Option<SecretDigest> {
        (identifier == self.identifier).then(|| self.digest.clone())
    }
}

/// Check a submitted pair against `store`.
///
/// Returns the subject to issue a token for. The submitted secret is
/// digested even when the identifier is unknown.
pub fn check(
    store: &dyn CredentialStore,
    identifier: &str,
    secret: &str,
) -> Result<String, AuthError> {
    let submitted = SecretDigest::of(secret);

    match store.lookup(identifier) {
        Some(expected) if expected.ct_eq(&submitted) => Ok(identifier.to_string()),
        _ => Err(AuthError::InvalidCredentials),
    }
}
