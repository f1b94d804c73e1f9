// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth Backend - Credential Login, Simulated SSO and Bearer Gate
//!
//! Issues HS256 JWTs for a configured credential pair or a simulated SSO
//! callback, and attaches the verified principal to requests that carry a
//! valid bearer token.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `auth` - Token codec, credential check, SSO flow and request gate
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
