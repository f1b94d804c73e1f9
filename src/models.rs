// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `ToSchema` (or `IntoParams`) for the OpenAPI document.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{AuthError, Principal, Role};

// =============================================================================
// Login
// =============================================================================

/// Credentials submitted to `POST /api/auth/login`.
///
/// Missing fields deserialize as empty strings so that [`validate`] reports
/// them with a 400 rather than the JSON layer.
///
/// [`validate`]: LoginRequest::validate
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email
    #[serde(default)]
    #[schema(example = "test@demo.com")]
    pub email: String,
    /// Account password
    #[serde(default)]
    #[schema(example = "123456")]
    pub password: String,
}

impl LoginRequest {
    /// Reject blank fields before any credential logic runs.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("El email es obligatorio");
        }
        if self.password.trim().is_empty() {
            missing.push("La contraseña es obligatoria");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(missing.join("; ")))
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// SSO
// =============================================================================

/// Query of `GET /api/auth/sso/callback`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SsoCallbackQuery {
    /// Code delivered by the SSO redirect
    #[param(example = "simulated-code")]
    pub code: String,
}

// =============================================================================
// Users
// =============================================================================

/// Response for `GET /api/users/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Token subject
    pub subject: String,
    /// Granted authority
    pub role: Role,
}

impl From<Principal> for UserMeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            subject: principal.subject,
            role: principal.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn validate_accepts_filled_fields() {
        assert!(request("test@demo.com", "123456").validate().is_ok());
    }

    #[test]
    fn validate_reports_both_blank_fields() {
        let Err(AuthError::Validation(msg)) = request("", "  ").validate() else {
            panic!("expected validation failure");
        };
        assert!(msg.contains("email"));
        assert!(msg.contains("contraseña"));
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let parsed: LoginRequest = serde_json::from_str(r#"{"email":"test@demo.com"}"#).unwrap();
        assert_eq!(parsed.password, "");
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", request("test@demo.com", "123456"));
        assert!(!rendered.contains("123456"));
    }

    #[test]
    fn user_me_response_from_principal() {
        let response: UserMeResponse = Principal::user("test@demo.com").into();
        assert_eq!(response.subject, "test@demo.com");
        assert_eq!(response.role, Role::User);
    }
}
