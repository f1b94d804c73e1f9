// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuance, credential checking, simulated SSO and the bearer-token
//! request gate.
//!
//! ## Auth Flow
//!
//! 1. Client obtains a token from `POST /api/auth/login` or the SSO
//!    callback
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - [`auth_gate`] verifies the HS256 signature, issuer and expiry
//!    - attaches a [`Principal`] carrying `sub` and the `ROLE_USER` authority
//!    - [`Auth`] rejects protected handlers when nothing was attached
//!
//! ## Security
//!
//! - Verification is stateless; the only shared secret is the signing key
//! - Clock skew tolerance is 60 seconds
//! - Credential and SSO rejections never say which part was wrong

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod roles;
pub mod service;
pub mod sso;
pub mod token;

pub use claims::Principal;
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use middleware::auth_gate;
pub use roles::Role;
pub use service::AuthService;
pub use token::{JwtCodec, TokenService};
