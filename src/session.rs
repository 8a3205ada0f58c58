//! Session capability consumed by the gate.
//!
//! The gate never talks to an auth backend. It reads whatever the host
//! application's session provider has already resolved through the
//! [`Session`] trait. [`SessionSnapshot`] is a plain value implementation,
//! convenient for handing the gate a copy of the provider's state each frame.
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::{Session, SessionSnapshot, SessionUser};
//!
//! let session = SessionSnapshot::authenticated(SessionUser::new("7", "coach@example.com"))
//!     .with_permission("programs.view");
//!
//! assert!(session.is_authenticated());
//! assert!(session.can("programs.view"));
//! assert!(!session.can("invoices.view"));
//! ```

use std::collections::HashSet;

/// What the gate needs to know about the current session.
pub trait Session {
    /// The provider is still resolving the session.
    fn is_loading(&self) -> bool;

    /// A session is established.
    fn is_authenticated(&self) -> bool;

    /// The signed-in user, if the provider has one.
    fn user(&self) -> Option<&SessionUser>;

    /// Whether the session holds `permission`.
    fn can(&self, permission: &str) -> bool;

    /// A logout is in progress and the host is showing its own transition.
    fn is_logging_out(&self) -> bool {
        false
    }
}

/// The signed-in staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

impl SessionUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// A copy of a session provider's state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    pub logging_out: bool,
    pub permissions: HashSet<String>,
}

impl SessionSnapshot {
    /// A provider that has not resolved yet.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// A resolved provider with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A resolved provider with `user` signed in and no permissions.
    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    #[must_use]
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn with_logging_out(mut self, logging_out: bool) -> Self {
        self.logging_out = logging_out;
        self
    }
}

impl Session for SessionSnapshot {
    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn is_logging_out(&self) -> bool {
        self.logging_out
    }
}
