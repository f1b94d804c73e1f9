// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and simulated SSO endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{LoginRequest, SsoCallbackQuery},
    state::AppState,
};

/// Log in with email and password.
///
/// Returns the signed token as the raw response body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, body is the token", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or empty fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::bad_request("Cuerpo de la petición inválido")
    })?;

    Ok(state.auth.login(&request)?)
}

/// Start the simulated SSO flow.
///
/// Redirects to the callback URL with a code query parameter.
#[utoipa::path(
    get,
    path = "/api/auth/sso",
    tag = "Auth",
    responses(
        (status = 302, description = "Redirect to the SSO callback"),
    )
)]
pub async fn sso_start(State(state): State<AppState>) -> impl IntoResponse {
    let target = state.auth.sso_start().await;
    (StatusCode::FOUND, [(LOCATION, target.to_string())])
}

/// Callback of the simulated SSO provider.
///
/// Exchanges the code for a token.
#[utoipa::path(
    get,
    path = "/api/auth/sso/callback",
    tag = "Auth",
    params(SsoCallbackQuery),
    responses(
        (status = 200, description = "SSO succeeded, body is the token", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing code", body = ErrorBody),
        (status = 401, description = "Invalid SSO code", body = ErrorBody),
    )
)]
pub async fn sso_callback(
    State(state): State<AppState>,
    query: Result<Query<SsoCallbackQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(params) = query.map_err(|_| ApiError::bad_request("El parámetro code es obligatorio"))?;

    Ok(state.auth.sso_callback(&params.code).await?)
}
