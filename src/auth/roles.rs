// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authority attached to an authenticated principal.
///
/// The service has a single uniform access level: any verified token grants
/// `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Authenticated user
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Role {
    /// Authority name as exposed in responses and logs.
    pub fn authority(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            (Role::User, Role::User) => true,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.authority())
    }
}
