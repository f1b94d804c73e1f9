// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs keyed by a process-wide secret. Verification is
//! stateless: signature, issuer and expiry are checked against the same key
//! and configuration that issued the token.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{claims::TokenClaims, AuthError};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signing algorithm for every token this service issues.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies bearer tokens.
///
/// The auth gate and the login/SSO flows only see this trait, so tests can
/// substitute a verifier that faults.
pub trait TokenService: Send + Sync {
    /// Sign a token embedding `subject`.
    fn issue(&self, subject: &str) -> Result<String, AuthError>;

    /// Verify `token` and return the subject it was issued to.
    ///
    /// Returns [`AuthError::InvalidToken`] for anything the caller sent wrong
    /// and [`AuthError::Internal`] for faults on our side.
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// HS256 JWT codec.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtCodec {
    /// Create a codec from a shared secret.
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Internal("signing secret is empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        })
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation
    }

    pub(crate) fn encode_claims(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }
}

impl TokenService for JwtCodec {
    fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
        };
        self.encode_claims(&claims)
    }

    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::ExpiredSignature
                | ErrorKind::ImmatureSignature
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidSubject
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::InvalidClaimFormat(_)
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::InvalidToken(format!("{e:?}")),
                _ => AuthError::Internal(format!("token verification fault: {e}")),
            })?;

        Ok(token_data.claims.sub)
    }
}
