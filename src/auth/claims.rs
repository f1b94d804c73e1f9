// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated principal.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried by tokens this service issues.
///
/// Only `sub` identifies the holder; the remaining claims are issuance
/// metadata checked during verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject the token was issued to
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Identity attached to a request after its bearer token verified.
///
/// Stored in the request extensions by the auth gate and dropped with the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Token subject
    pub subject: String,
    /// Granted authority
    pub role: Role,
}

impl Principal {
    /// Principal for a verified subject with the uniform user authority.
    pub fn user(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: Role::User,
        }
    }

    /// Check if the principal has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_principal_gets_user_role() {
        let principal = Principal::user("usuario123");
        assert_eq!(principal.subject, "usuario123");
        assert_eq!(principal.role, Role::User);
        assert!(principal.has_role(Role::User));
    }

    #[test]
    fn claims_use_registered_names() {
        let claims = TokenClaims {
            sub: "test@demo.com".to_string(),
            iat: 1700000000,
            exp: 1700003600,
            iss: "auth-backend".to_string(),
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["sub"], "test@demo.com");
        assert_eq!(value["exp"], 1700003600);
    }
}
