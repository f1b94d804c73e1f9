// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Simulated SSO redirect/callback.
//!
//! `start` hands back the callback URL with a `code` query parameter;
//! `callback` accepts that code and yields the fixed SSO subject.
//!
//! ## Code policies
//!
//! - [`SsoMode::Static`]: one literal code for every session. Deterministic
//!   and replayable; kept for demo front-ends that hardcode it.
//! - [`SsoMode::OneTime`]: each `start` mints a random code that is accepted
//!   once and only until it expires. At most `max_pending` codes are
//!   outstanding; minting past the cap evicts the oldest.

use std::num::NonZeroUsize;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use super::AuthError;

/// Code accepted by the static policy unless configured otherwise.
pub const DEFAULT_STATIC_CODE: &str = "simulated-code";

/// Outstanding one-time codes kept unless configured otherwise.
pub const DEFAULT_MAX_PENDING_CODES: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(n) => n,
    None => unreachable!(),
};

/// How SSO codes are produced and accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsoMode {
    /// A single fixed code
    Static(String),
    /// Random single-use codes with a lifetime
    OneTime {
        ttl: Duration,
        max_pending: NonZeroUsize,
    },
}

impl Default for SsoMode {
    fn default() -> Self {
        SsoMode::Static(DEFAULT_STATIC_CODE.to_string())
    }
}

/// SSO simulation state.
pub struct SsoFlow {
    callback_url: Url,
    subject: String,
    mode: SsoMode,
    /// Outstanding one-time codes and their expiry, oldest first
    pending: Mutex<LruCache<String, DateTime<Utc>>>,
}

impl SsoFlow {
    pub fn new(callback_url: Url, subject: impl Into<String>, mode: SsoMode) -> Self {
        let capacity = match &mode {
            SsoMode::OneTime { max_pending, .. } => *max_pending,
            SsoMode::Static(_) => NonZeroUsize::MIN,
        };

        Self {
            callback_url,
            subject: subject.into(),
            mode,
            pending: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Subject tokens are issued to after a successful callback.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Build the redirect target for a new SSO attempt.
    pub async fn start(&self) -> Url {
        let code = match &self.mode {
            SsoMode::Static(code) => code.clone(),
            SsoMode::OneTime { ttl, .. } => {
                let now = Utc::now();
                let code = Uuid::new_v4().simple().to_string();

                let mut pending = self.pending.lock().await;
                // Entries are never promoted, so LRU order is expiry order.
                while matches!(pending.peek_lru(), Some((_, expires_at)) if *expires_at <= now) {
                    pending.pop_lru();
                }
                if let Some((_, evicted_expiry)) = pending.push(code.clone(), now + *ttl) {
                    tracing::warn!(%evicted_expiry, "One-time SSO code table full, evicted oldest code");
                }
                tracing::debug!(outstanding = pending.len(), "Issued one-time SSO code");
                code
            }
        };

        let mut target = self.callback_url.clone();
        target.query_pairs_mut().append_pair("code", &code);
        target
    }

    /// Accept `code` and return the SSO subject.
    pub async fn callback(&self, code: &str) -> Result<String, AuthError> {
        let accepted = match &self.mode {
            SsoMode::Static(expected) => code == expected,
            SsoMode::OneTime { .. } => {
                let removed = self.pending.lock().await.pop(code);
                matches!(removed, Some(expires_at) if expires_at > Utc::now())
            }
        };

        if accepted {
            Ok(self.subject.clone())
        } else {
            Err(AuthError::InvalidSsoCode)
        }
    }

    #[cfg(test)]
    async fn outstanding(&self) -> usize {
        self.pending.lock().await.len()
    }
}
