// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{credentials::StaticCredentials, sso::SsoFlow, AuthError, AuthService, JwtCodec},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    /// Wire the auth components described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let codec = JwtCodec::new(
            config.jwt.secret.as_bytes(),
            config.jwt.issuer.clone(),
            config.jwt.ttl,
        )?;
        let credentials =
            StaticCredentials::new(config.credentials.email.clone(), &config.credentials.password);
        let sso = SsoFlow::new(
            config.sso.callback_url.clone(),
            config.sso.subject.clone(),
            config.sso.mode.clone(),
        );

        Ok(Self::new(AuthService::new(
            Arc::new(credentials),
            Arc::new(codec),
            sso,
        )))
    }
}

#[cfg(test)]
impl AppState {
    /// Demo configuration with a fixed test secret.
    pub(crate) fn for_tests() -> Self {
        Self::new(crate::auth::service::tests::test_service())
    }

    /// Demo configuration with a substitute token service.
    pub(crate) fn test_with_tokens(tokens: Arc<dyn crate::auth::TokenService>) -> Self {
        use crate::auth::sso::SsoMode;

        Self::new(AuthService::new(
            Arc::new(StaticCredentials::new("test@demo.com", "123456")),
            tokens,
            SsoFlow::new(
                url::Url::parse("http://localhost:4200/sso/callback").unwrap(),
                "sso@demo.com",
                SsoMode::default(),
            ),
        ))
    }
}
