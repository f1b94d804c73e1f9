// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// User-facing message for a credential mismatch.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email o contraseña incorrectos";
/// User-facing message for an unknown SSO code.
pub const INVALID_SSO_CODE_MESSAGE: &str = "Código SSO inválido";
/// User-facing message for a protected route reached without a principal.
pub const UNAUTHENTICATED_MESSAGE: &str = "Autenticación requerida";

/// Authentication error type.
///
/// Every rejection the auth layer produces is one of these values. The
/// variants carry detail for logs only; the HTTP body is built from
/// [`AuthError::public_message`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Input failed validation before any credential logic ran
    #[error("validation failed: {0}")]
    Validation(String),
    /// Identifier or secret did not match
    #[error("invalid credentials")]
    InvalidCredentials,
    /// SSO callback code was not accepted
    #[error("invalid SSO code")]
    InvalidSsoCode,
    /// Token failed verification (signature, structure, issuer or expiry)
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// A protected route was reached with no principal attached
    #[error("request is not authenticated")]
    Unauthenticated,
    /// Unexpected fault (signing key, crypto backend, encoding)
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidSsoCode
            | AuthError::InvalidToken(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AuthError::InvalidSsoCode => INVALID_SSO_CODE_MESSAGE.to_string(),
            AuthError::InvalidToken(_) => "Token inválido o expirado".to_string(),
            AuthError::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_string(),
            AuthError::Internal(_) => crate::error::INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether this is an operational fault rather than a rejection.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Internal(_))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
