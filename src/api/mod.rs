// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_gate, Role},
    error::ErrorBody,
    models::{LoginRequest, UserMeResponse},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/sso", get(auth::sso_start))
        .route("/auth/sso/callback", get(auth::sso_callback))
        .route("/protected", get(users::protected))
        .route("/users/me", get(users::get_current_user))
        .layer(from_fn_with_state(state.clone(), auth_gate))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::sso_start,
        auth::sso_callback,
        users::protected,
        users::get_current_user,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            UserMeResponse,
            Role,
            ErrorBody,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential login and simulated SSO"),
        (name = "Users", description = "Endpoints behind the bearer-token gate"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::for_tests();
        (router(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (app, _) = app();
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn login_success_returns_raw_token() {
        let (app, state) = app();
        let response = send(&app, login_request(r#"{"email":"test@demo.com","password":"123456"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let token = body_string(response).await;
        assert!(!token.is_empty());
        assert_eq!(state.auth.verify(&token).unwrap(), "test@demo.com");
    }

    #[tokio::test]
    async fn login_wrong_password_returns_error_body() {
        let (app, _) = app();
        let response = send(&app, login_request(r#"{"email":"test@demo.com","password":"wrong"}"#)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Email o contraseña incorrectos");
    }

    #[tokio::test]
    async fn login_missing_or_empty_fields_is_bad_request() {
        let (app, _) = app();
        for body in [
            r#"{"email":"","password":""}"#,
            r#"{"email":"test@demo.com"}"#,
            r#"{}"#,
            "not json",
        ] {
            let response = send(&app, login_request(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");

            let parsed: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(parsed["status"], 400);
        }
    }

    #[tokio::test]
    async fn sso_redirects_with_fixed_code() {
        let (app, _) = app();
        let response = send(&app, get("/api/auth/sso", None)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://localhost:4200/sso/callback?code=simulated-code"
        );
    }

    #[tokio::test]
    async fn sso_callback_with_valid_code_returns_token() {
        let (app, state) = app();
        let response = send(&app, get("/api/auth/sso/callback?code=simulated-code", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let token = body_string(response).await;
        assert_eq!(state.auth.verify(&token).unwrap(), "sso@demo.com");
    }

    #[tokio::test]
    async fn sso_callback_with_bad_code_is_unauthorized() {
        let (app, _) = app();
        let response = send(&app, get("/api/auth/sso/callback?code=bad", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["message"], "Código SSO inválido");
    }

    #[tokio::test]
    async fn one_time_sso_code_round_trip_through_router() {
        let config = crate::config::AppConfig::from_lookup(|name| match name {
            "SSO_MODE" => Some("one-time".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::from_config(&config).unwrap();
        let app = router(state.clone());

        let response = send(&app, get("/api/auth/sso", None)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = url::Url::parse(response.headers()[header::LOCATION].to_str().unwrap()).unwrap();
        let code = location
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_ne!(code, "simulated-code");

        let callback = format!("/api/auth/sso/callback?code={code}");
        let response = send(&app, get(&callback, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_string(response).await;
        assert_eq!(state.auth.verify(&token).unwrap(), "sso@demo.com");

        let replay = send(&app, get(&callback, None)).await;
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

        let literal = send(&app, get("/api/auth/sso/callback?code=simulated-code", None)).await;
        assert_eq!(literal.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sso_callback_without_code_is_bad_request() {
        let (app, _) = app();
        let response = send(&app, get("/api/auth/sso/callback", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn protected_requires_valid_bearer_token() {
        let (app, state) = app();
        let token = state.auth.tokens().issue("test@demo.com").unwrap();

        for authorization in [None, Some("Token xyz".to_string()), Some("Bearer invalid".to_string())] {
            let response = send(&app, get("/api/protected", authorization.as_deref())).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{authorization:?}");
        }

        let response = send(&app, get("/api/protected", Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Acceso autorizado");
    }

    #[tokio::test]
    async fn login_token_unlocks_users_me() {
        let (app, _) = app();
        let response = send(&app, login_request(r#"{"email":"test@demo.com","password":"123456"}"#)).await;
        let token = body_string(response).await;

        let response = send(&app, get("/api/users/me", Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["subject"], "test@demo.com");
        assert_eq!(body["role"], "ROLE_USER");
    }

    #[tokio::test]
    async fn public_routes_ignore_invalid_tokens() {
        let (app, _) = app();
        let response = send(&app, get("/api/auth/sso", Some("Bearer garbage"))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (app, _) = app();
        let response = send(&app, get("/health/live", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn openapi_document_lists_auth_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/api/auth/login", "/api/auth/sso", "/api/auth/sso/callback", "/api/protected"] {
            assert!(paths.contains_key(path), "{path} missing");
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
