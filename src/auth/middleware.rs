// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token gate for Axum.
//!
//! Runs once per request before any handler. A valid bearer token attaches a
//! [`Principal`] to the request extensions; anything else leaves the request
//! unauthenticated and lets it through. Enforcement happens downstream in the
//! [`Auth`](super::Auth) extractor.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/protected", get(protected))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), auth_gate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::{token::TokenService, AuthError, Principal};
use crate::{error::ApiError, state::AppState};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, or uses a
/// different scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
}

/// Resolve the principal for a request.
///
/// `Ok(None)` covers every "not authenticated" outcome, including a token
/// that failed verification. Only internal faults are returned as errors.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &dyn TokenService,
) -> Result<Option<Principal>, AuthError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    match tokens.verify(token) {
        Ok(subject) => Ok(Some(Principal::user(subject))),
        Err(e) if e.is_internal() => Err(e),
        Err(e) => {
            tracing::debug!(reason = %e, "Ignoring bearer token that failed verification");
            Ok(None)
        }
    }
}

/// Authentication gate middleware.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(principal) = authenticate(request.headers(), state.auth.tokens())? {
        tracing::debug!(subject = %principal.subject, "Request authenticated");
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}
