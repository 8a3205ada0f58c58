//! Error and denial types.
//!
//! The gate itself never fails: every outcome is a render decision or a
//! redirect. The two types here cover what is left:
//!
//! - [`NavigationError`]: a navigation tree that cannot be turned into a
//!   [`PermissionMap`](crate::PermissionMap) (for example, the same path
//!   registered twice).
//! - [`DenialReason`]: why the gate is showing the permission-denied page.
//!
//! # Examples
//!
//! ```
//! use gpui_access_gate::DenialReason;
//!
//! let reason = DenialReason::MissingPermission { permission: "teams.view".into() };
//! assert_eq!(reason.to_string(), "You do not have permission to view this page");
//! ```

use std::fmt;

// ============================================================================
// NavigationError
// ============================================================================

/// Configuration errors raised while building a permission map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The same path appears more than once in the navigation tree.
    DuplicatePath { path: String },

    /// A navigation node was registered with an empty path.
    EmptyPath { name: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::DuplicatePath { path } => {
                write!(f, "Path registered more than once: {}", path)
            }
            NavigationError::EmptyPath { name } => {
                write!(f, "Navigation entry '{}' has an empty path", name)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// DenialReason
// ============================================================================

/// Why the gate refused to render a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The route is registered but its permission field was left blank.
    ///
    /// Always denied, whatever the session can do.
    Misconfigured { path: String },

    /// The session lacks the permission the route requires.
    MissingPermission { permission: String },
}

impl DenialReason {
    /// Message shown on the denial page.
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::Misconfigured { .. } => {
                "This page is misconfigured: no permission has been assigned to it"
            }
            DenialReason::MissingPermission { .. } => {
                "You do not have permission to view this page"
            }
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ============================================================================
// Tests
// ============================================================================
