// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints that require an authenticated principal.

use axum::Json;

use crate::{auth::Auth, error::ErrorBody, models::UserMeResponse};

/// Body of the protected probe endpoint.
pub const PROTECTED_MESSAGE: &str = "Acceso autorizado";

/// Protected probe endpoint.
#[utoipa::path(
    get,
    path = "/api/protected",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Access granted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    )
)]
pub async fn protected(Auth(principal): Auth) -> &'static str {
    tracing::debug!(subject = %principal.subject, "Protected resource accessed");
    PROTECTED_MESSAGE
}

/// Get the current principal.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Principal information", body = UserMeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(principal.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role};

    #[tokio::test]
    async fn protected_returns_fixed_message() {
        assert_eq!(protected(Auth(Principal::user("usuario1"))).await, "Acceso autorizado");
    }

    #[tokio::test]
    async fn me_returns_principal() {
        let Json(me) = get_current_user(Auth(Principal::user("test@demo.com"))).await;
        assert_eq!(me.subject, "test@demo.com");
        assert_eq!(me.role, Role::User);
    }
}
