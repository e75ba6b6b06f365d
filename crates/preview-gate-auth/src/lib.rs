#![warn(missing_docs)]
//! # preview-gate-auth
//!
//! ## Purpose
//! Implements the session gate that precedes the upload widget.
//!
//! ## Responsibilities
//! - Hold user-entered credentials without leaking the secret through `Debug`.
//! - Check credentials through an injectable verifier abstraction.
//! - Issue a [`Session`] proof value on success.
//!
//! ## Data flow
//! UI collects credentials -> [`SessionGate::submit`] asks its
//! [`CredentialVerifier`] -> returns [`Session`] or [`AuthError`] -> UI either
//! unlocks the widget or raises an alert.
//!
//! ## Ownership and lifetimes
//! Credential values are owned (`String`) so form state can be mutated per
//! keystroke without borrowing from input events.
//!
//! ## Error model
//! A mismatch is the only failure and is reported as
//! [`AuthError::InvalidCredentials`]. It is recoverable by re-entry; there is
//! no lockout.
//!
//! ## Security and privacy notes
//! The built-in verifier is a placeholder against fixed literals, not an auth
//! system. Secrets are never logged.
//!
//! ## Example
//! ```rust
//! use preview_gate_auth::{Credentials, SessionGate};
//!
//! let gate = SessionGate::with_demo_credentials();
//! assert!(gate.submit(&Credentials::new("demo", "password")).is_ok());
//! assert!(gate.submit(&Credentials::new("demo", "nope")).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Identifier accepted by [`FixedCredentialVerifier::demo`].
pub const DEMO_IDENTIFIER: &str = "demo";

/// Secret accepted by [`FixedCredentialVerifier::demo`].
pub const DEMO_SECRET: &str = "password";

/// User-entered credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Account identifier (username field).
    pub identifier: String,
    /// Account secret (password field).
    pub secret: String,
}

impl Credentials {
    /// Creates credentials from both field values.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Proof that the gate accepted a credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identifier: String,
}

impl Session {
    /// Identifier the session was opened for.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Abstract credential check used by [`SessionGate`].
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` when the pair is accepted.
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// Verifier comparing against one fixed identifier/secret pair.
///
/// Comparison is exact: no trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCredentialVerifier {
    identifier: String,
    secret: String,
}

impl FixedCredentialVerifier {
    /// Creates a verifier for an explicit pair.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Verifier accepting only `demo` / `password`.
    pub fn demo() -> Self {
        Self::new(DEMO_IDENTIFIER, DEMO_SECRET)
    }
}

impl CredentialVerifier for FixedCredentialVerifier {
    fn verify(&self, credentials: &Credentials) -> bool {
        credentials.identifier == self.identifier && credentials.secret == self.secret
    }
}

/// Gate that turns accepted credentials into a [`Session`].
#[derive(Clone)]
pub struct SessionGate {
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionGate {
    /// Creates a gate backed by `verifier`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// Gate accepting the built-in demo pair.
    pub fn with_demo_credentials() -> Self {
        Self::new(Arc::new(FixedCredentialVerifier::demo()))
    }

    /// Checks credentials.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch, including
    /// blank fields.
    pub fn submit(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if !self.verifier.verify(credentials) {
            tracing::info!(identifier = %credentials.identifier, "credentials rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(identifier = %credentials.identifier, "session opened");
        Ok(Session {
            identifier: credentials.identifier.clone(),
        })
    }
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate").finish_non_exhaustive()
    }
}

/// Errors produced by the session gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Entered pair does not match.
    #[error("Invalid credentials")]
    InvalidCredentials,
}
