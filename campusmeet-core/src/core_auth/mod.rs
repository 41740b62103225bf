//! External identity capabilities
//!
//! The engines never talk to the identity provider or the bot-verification
//! service directly; they consume the trait seams defined here. Production
//! implementations live with the transport layer. The static implementations
//! back tests and local development.

use crate::core_social::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolved caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: UserId,
    pub name: String,
}

impl UserIdentity {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            name: name.into(),
        }
    }
}

/// Verifies bearer identity tokens
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer token to an identity; `None` on missing or invalid
    /// tokens
    fn verify(&self, bearer_token: &str) -> Option<UserIdentity>;
}

/// Verifies bot-challenge tokens
pub trait CaptchaVerifier: Send + Sync {
    fn check(&self, token: &str) -> bool;
}

/// Fixed token -> identity map
#[derive(Debug, Default)]
pub struct StaticAuthenticator {
    identities: HashMap<String, UserIdentity>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and the identity it resolves to
    pub fn register(mut self, token: impl Into<String>, identity: UserIdentity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, bearer_token: &str) -> Option<UserIdentity> {
        self.identities.get(bearer_token).cloned()
    }
}

/// Captcha verifier with a fixed verdict
#[derive(Debug, Clone, Copy)]
pub struct StaticCaptchaVerifier {
    accept: bool,
}

impl StaticCaptchaVerifier {
    pub fn allow_all() -> Self {
        Self { accept: true }
    }

    pub fn deny_all() -> Self {
        Self { accept: false }
    }
}

impl CaptchaVerifier for StaticCaptchaVerifier {
    fn check(&self, token: &str) -> bool {
        // an empty challenge token is never valid, whatever the verdict
        self.accept && !token.is_empty()
    }
}
