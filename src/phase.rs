//! Gate phase state machine.
//!
//! Every change to a gate's phase goes through [`AccessPhase::next`], and
//! every change to the surrounding bookkeeping (current path, pending
//! denial, redirect already issued) goes through [`GateState::apply`]. The
//! controller recomputes a decision from scratch on each sync and feeds it in
//! as events, so re-running the same sync is harmless.
//!
//! ```text
//!  Hydrating ──HydrationComplete──▶ AuthChecking ──PermissionCheckStarted──▶ PermissionChecking
//!                                        │                                        │
//!                                        ├──────────────Granted───────────────────┤──▶ Authenticated
//!                                        └──────────────Redirected────────────────┘──▶ Redirecting
//! ```
//!
//! Rules the transition function enforces:
//!
//! - `Hydrating` is left only via `HydrationComplete`.
//! - A new path sends every settled phase back to `AuthChecking`; content is
//!   only ever shown for a path that was decided.
//! - On the same path, `Authenticated` is never demoted back to a checking
//!   phase.
//! - `Redirecting` only moves on once the path changes.

use crate::error::DenialReason;
use crate::{debug_log, trace_log};

/// Where a gate is in its auth/permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPhase {
    /// Waiting for the first client frame.
    Hydrating,
    /// Waiting on the session provider.
    AuthChecking,
    /// Consulting the permission map.
    PermissionChecking,
    /// Content may be rendered.
    Authenticated,
    /// A redirect was issued; waiting for it to land.
    Redirecting,
}

impl AccessPhase {
    /// Phase after `event`. Events that don't apply leave the phase unchanged.
    #[must_use]
    pub fn next(self, event: &GateEvent) -> Self {
        match (self, event) {
            (Self::Hydrating, GateEvent::HydrationComplete) => Self::AuthChecking,
            (Self::Hydrating, _) => Self::Hydrating,

            (
                Self::Redirecting | Self::Authenticated | Self::PermissionChecking,
                GateEvent::PathChanged(_),
            ) => Self::AuthChecking,
            (Self::Redirecting, _) => Self::Redirecting,

            (Self::AuthChecking, GateEvent::PermissionCheckStarted) => Self::PermissionChecking,
            (_, GateEvent::Granted) => Self::Authenticated,
            (_, GateEvent::Redirected { .. }) => Self::Redirecting,

            (phase, _) => phase,
        }
    }

    /// Text for the loading screen shown while in this phase.
    pub fn loading_message(self) -> &'static str {
        match self {
            AccessPhase::Hydrating => "Initializing...",
            AccessPhase::AuthChecking => "Checking authentication...",
            AccessPhase::PermissionChecking => "Checking permissions...",
            AccessPhase::Authenticated => "Loading...",
            AccessPhase::Redirecting => "Redirecting...",
        }
    }
}

/// Inputs to the gate's state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// The first client frame has passed.
    HydrationComplete,
    /// The router now points at this path.
    PathChanged(String),
    /// The session was resolved on the login route and no one is signed in.
    LoginCheckCompleted,
    /// The route requires a permission and the map is being consulted.
    PermissionCheckStarted,
    /// Content may be rendered.
    Granted,
    /// Navigate away.
    Redirected { to: String },
    /// Show the permission-denied page.
    Denied(DenialReason),
}

/// Phase plus the bookkeeping rendering needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateState {
    phase: AccessPhase,
    path: Option<String>,
    denial: Option<DenialReason>,
    redirect: Option<String>,
    initial_check_done: bool,
}

impl GateState {
    pub fn new() -> Self {
        Self {
            phase: AccessPhase::Hydrating,
            path: None,
            denial: None,
            redirect: None,
            initial_check_done: false,
        }
    }

    /// Apply `event`, returning a redirect target if one must be issued now.
    ///
    /// A redirect to the same target from the same path is only returned once.
    pub fn apply(&mut self, event: GateEvent) -> Option<String> {
        if let GateEvent::PathChanged(path) = &event {
            if self.path.as_deref() == Some(path.as_str()) {
                return None;
            }
        }

        let from = self.phase;
        self.phase = from.next(&event);
        if from != self.phase {
            debug_log!("Gate phase {:?} -> {:?} on {:?}", from, self.phase, event);
        }

        match event {
            GateEvent::PathChanged(path) => {
                trace_log!("Gate path changed to '{}'", path);
                self.path = Some(path);
                self.denial = None;
                self.redirect = None;
                None
            }
            GateEvent::LoginCheckCompleted => {
                self.initial_check_done = true;
                None
            }
            GateEvent::Granted => {
                if self.phase == AccessPhase::Authenticated {
                    self.denial = None;
                }
                None
            }
            GateEvent::Denied(reason) => {
                if from != AccessPhase::Hydrating {
                    self.denial = Some(reason);
                }
                None
            }
            GateEvent::Redirected { to } => {
                if from == AccessPhase::Hydrating || self.redirect.as_deref() == Some(to.as_str()) {
                    return None;
                }
                self.denial = None;
                self.redirect = Some(to.clone());
                Some(to)
            }
            GateEvent::HydrationComplete | GateEvent::PermissionCheckStarted => None,
        }
    }

    pub fn phase(&self) -> AccessPhase {
        self.phase
    }

    /// Path the state was last synced against.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        self.denial.as_ref()
    }

    /// Redirect already issued from the current path, if any.
    pub fn pending_redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// The first client frame has passed.
    pub fn is_hydrated(&self) -> bool {
        self.phase != AccessPhase::Hydrating
    }

    /// The login route has seen a resolved, signed-out session at least once.
    pub fn initial_check_done(&self) -> bool {
        self.initial_check_done
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
