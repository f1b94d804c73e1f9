// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`AppConfig`] loaded from
//! them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC signing key (at least 32 bytes) | Random per process |
//! | `JWT_ISSUER` | `iss` claim of issued tokens | `auth-backend` |
//! | `JWT_TTL_SECS` | Token lifetime in seconds | `3600` |
//! | `AUTH_EMAIL` | Accepted login email | `test@demo.com` |
//! | `AUTH_PASSWORD` | Accepted login password | `123456` |
//! | `SSO_CALLBACK_URL` | SSO redirect target | `http://localhost:4200/sso/callback` |
//! | `SSO_SUBJECT` | Subject of SSO-issued tokens | `sso@demo.com` |
//! | `SSO_MODE` | `static` or `one-time` | `static` |
//! | `SSO_CODE_TTL_SECS` | Lifetime of one-time SSO codes | `300` |
//! | `SSO_MAX_PENDING_CODES` | Outstanding one-time SSO codes kept | `1024` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroUsize,
};

use chrono::Duration;
use url::Url;
use uuid::Uuid;

use crate::auth::sso::{SsoMode, DEFAULT_MAX_PENDING_CODES, DEFAULT_STATIC_CODE};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
pub const AUTH_EMAIL_ENV: &str = "AUTH_EMAIL";
pub const AUTH_PASSWORD_ENV: &str = "AUTH_PASSWORD";
pub const SSO_CALLBACK_URL_ENV: &str = "SSO_CALLBACK_URL";
pub const SSO_SUBJECT_ENV: &str = "SSO_SUBJECT";
pub const SSO_MODE_ENV: &str = "SSO_MODE";
pub const SSO_CODE_TTL_SECS_ENV: &str = "SSO_CODE_TTL_SECS";
pub const SSO_MAX_PENDING_CODES_ENV: &str = "SSO_MAX_PENDING_CODES";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_JWT_ISSUER: &str = "auth-backend";
pub const DEFAULT_JWT_TTL_SECS: i64 = 3600;
pub const DEFAULT_AUTH_EMAIL: &str = "test@demo.com";
pub const DEFAULT_AUTH_PASSWORD: &str = "123456";
pub const DEFAULT_SSO_CALLBACK_URL: &str = "http://localhost:4200/sso/callback";
pub const DEFAULT_SSO_SUBJECT: &str = "sso@demo.com";
pub const DEFAULT_SSO_CODE_TTL_SECS: i64 = 300;

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Shortest signing secret accepted, in bytes (HS256 key size).
pub const MIN_SECRET_LEN: usize = 32;

/// Longest lifetime accepted for tokens and SSO codes (one year).
pub const MAX_LIFETIME_SECS: i64 = 365 * 24 * 3600;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("JWT_SECRET must be at least 32 bytes")]
    SecretTooShort,
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the signing secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    /// Generated at startup; tokens do not survive a restart
    Generated,
}

/// Token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub secret_source: SecretSource,
    pub issuer: String,
    pub ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("secret_source", &self.secret_source)
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// The accepted login pair.
#[derive(Clone)]
pub struct CredentialConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// SSO simulation settings.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub callback_url: Url,
    pub subject: String,
    pub mode: SsoMode,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
    pub jwt: JwtConfig,
    pub credentials: CredentialConfig,
    pub sso: SsoConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| -> String {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host_raw = var(HOST_ENV, DEFAULT_HOST);
        let host = host_raw
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::invalid(HOST_ENV, &host_raw, e))?;

        let port_raw = var(PORT_ENV, &DEFAULT_PORT.to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid(PORT_ENV, &port_raw, e))?;

        let log_format = match var(LOG_FORMAT_ENV, "pretty").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" | "text" => LogFormat::Pretty,
            other => return Err(ConfigError::invalid(LOG_FORMAT_ENV, other, "expected json or pretty")),
        };

        let (secret, secret_source) = match lookup(JWT_SECRET_ENV).filter(|v| !v.is_empty()) {
            Some(secret) if secret.len() < MIN_SECRET_LEN => return Err(ConfigError::SecretTooShort),
            Some(secret) => (secret, SecretSource::Environment),
            None => (generate_secret(), SecretSource::Generated),
        };

        let jwt = JwtConfig {
            secret,
            secret_source,
            issuer: var(JWT_ISSUER_ENV, DEFAULT_JWT_ISSUER),
            ttl: Duration::seconds(positive_secs(
                JWT_TTL_SECS_ENV,
                &var(JWT_TTL_SECS_ENV, &DEFAULT_JWT_TTL_SECS.to_string()),
            )?),
        };

        let credentials = CredentialConfig {
            email: var(AUTH_EMAIL_ENV, DEFAULT_AUTH_EMAIL),
            password: var(AUTH_PASSWORD_ENV, DEFAULT_AUTH_PASSWORD),
        };

        let callback_raw = var(SSO_CALLBACK_URL_ENV, DEFAULT_SSO_CALLBACK_URL);
        let callback_url = Url::parse(&callback_raw)
            .map_err(|e| ConfigError::invalid(SSO_CALLBACK_URL_ENV, &callback_raw, e))?;

        let mode = match var(SSO_MODE_ENV, "static").to_lowercase().as_str() {
            "static" => SsoMode::Static(DEFAULT_STATIC_CODE.to_string()),
            "one-time" | "one_time" | "onetime" => SsoMode::OneTime {
                ttl: Duration::seconds(positive_secs(
                    SSO_CODE_TTL_SECS_ENV,
                    &var(SSO_CODE_TTL_SECS_ENV, &DEFAULT_SSO_CODE_TTL_SECS.to_string()),
                )?),
                max_pending: {
                    let raw = var(SSO_MAX_PENDING_CODES_ENV, &DEFAULT_MAX_PENDING_CODES.to_string());
                    raw.parse::<NonZeroUsize>()
                        .map_err(|e| ConfigError::invalid(SSO_MAX_PENDING_CODES_ENV, &raw, e))?
                },
            },
            other => {
                return Err(ConfigError::invalid(SSO_MODE_ENV, other, "expected static or one-time"))
            }
        };

        Ok(Self {
            host,
            port,
            log_format,
            jwt,
            credentials,
            sso: SsoConfig {
                callback_url,
                subject: var(SSO_SUBJECT_ENV, DEFAULT_SSO_SUBJECT),
                mode,
            },
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn positive_secs(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    match raw.parse::<i64>() {
        Ok(secs) if secs > 0 && secs <= MAX_LIFETIME_SECS => Ok(secs),
        Ok(_) => Err(ConfigError::invalid(name, raw, "must be between 1 and one year")),
        Err(e) => Err(ConfigError::invalid(name, raw, e)),
    }
}

/// 64 hex characters of OS randomness.
fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
