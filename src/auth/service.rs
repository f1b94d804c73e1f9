// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and SSO orchestration.

use std::sync::Arc;

use url::Url;

use super::{
    credentials::{self, CredentialStore},
    sso::SsoFlow,
    token::TokenService,
    AuthError,
};
use crate::models::LoginRequest;

/// Entry point for every token-producing flow.
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenService>,
    sso: SsoFlow,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenService>,
        sso: SsoFlow,
    ) -> Self {
        Self {
            credentials,
            tokens,
            sso,
        }
    }

    /// Token codec shared with the request gate.
    pub fn tokens(&self) -> &dyn TokenService {
        self.tokens.as_ref()
    }

    /// Validate the submission, check credentials and issue a token.
    pub fn login(&self, request: &LoginRequest) -> Result<String, AuthError> {
        request.validate()?;

        let subject = credentials::check(self.credentials.as_ref(), &request.email, &request.password)
            .inspect_err(|_| tracing::info!("Login rejected"))?;

        let token = self.tokens.issue(&subject)?;
        tracing::info!(subject = %subject, "Login succeeded");
        Ok(token)
    }

    /// Redirect target for a new SSO attempt.
    pub async fn sso_start(&self) -> Url {
        self.sso.start().await
    }

    /// Accept an SSO callback code and issue a token for the SSO subject.
    pub async fn sso_callback(&self, code: &str) -> Result<String, AuthError> {
        let subject = self
            .sso
            .callback(code)
            .await
            .inspect_err(|_| tracing::info!("SSO callback rejected"))?;

        let token = self.tokens.issue(&subject)?;
        tracing::info!(subject = %subject, "SSO login succeeded");
        Ok(token)
    }

    /// Verify a bearer token.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{credentials::StaticCredentials, sso::SsoMode, token::JwtCodec};
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-sec";

    pub(crate) fn test_service() -> AuthService {
        let codec = JwtCodec::new(TEST_SECRET, "auth-backend", Duration::hours(1)).unwrap();
        AuthService::new(
            Arc::new(StaticCredentials::new("test@demo.com", "123456")),
            Arc::new(codec),
            SsoFlow::new(
                Url::parse("http://localhost:4200/sso/callback").unwrap(),
                "sso@demo.com",
                SsoMode::default(),
            ),
        )
    }

    /// Counts issue calls so tests can assert the codec was never reached.
    struct CountingTokens {
        inner: JwtCodec,
        issued: AtomicUsize,
    }

    impl TokenService for CountingTokens {
        fn issue(&self, subject: &str) -> Result<String, AuthError> {
            self.issued.fetch_add(1, Ordering::SeqCst);
            self.inner.issue(subject)
        }

        fn verify(&self, token: &str) -> Result<String, AuthError> {
            self.inner.verify(token)
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_with_valid_credentials_issues_token_for_email() {
        let service = test_service();
        let token = service.login(&login_request("test@demo.com", "123456")).unwrap();
        assert!(!token.is_empty());
        assert_eq!(service.verify(&token).unwrap(), "test@demo.com");
    }

    #[test]
    fn login_rejects_any_mismatch_identically() {
        let service = test_service();
        for (email, password) in [
            ("otro@correo.com", "123456"),
            ("test@demo.com", "wrongpass"),
            ("otro@correo.com", "wrongpass"),
        ] {
            let err = service.login(&login_request(email, password)).unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn empty_fields_fail_validation_before_credentials() {
        let tokens = Arc::new(CountingTokens {
            inner: JwtCodec::new(TEST_SECRET, "auth-backend", Duration::hours(1)).unwrap(),
            issued: AtomicUsize::new(0),
        });
        let service = AuthService::new(
            Arc::new(StaticCredentials::new("", "")),
            tokens.clone(),
            SsoFlow::new(
                Url::parse("http://localhost:4200/sso/callback").unwrap(),
                "sso@demo.com",
                SsoMode::default(),
            ),
        );

        // The store would accept the empty pair; validation must stop it first.
        let err = service.login(&login_request("", "")).unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(tokens.issued.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sso_callback_issues_token_for_sso_subject() {
        let service = test_service();
        let token = service.sso_callback("simulated-code").await.unwrap();
        assert_eq!(service.verify(&token).unwrap(), "sso@demo.com");
    }

    #[tokio::test]
    async fn sso_callback_rejects_other_codes() {
        let service = test_service();
        let err = service.sso_callback("otro-codigo").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidSsoCode));
    }

    #[tokio::test]
    async fn sso_start_is_fixed_target() {
        let service = test_service();
        assert_eq!(
            service.sso_start().await.as_str(),
            "http://localhost:4200/sso/callback?code=simulated-code"
        );
    }
}
