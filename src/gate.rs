//! The route access gate.
//!
//! Two layers:
//!
//! - [`AccessController`] has no GPUI types. Given the current path and a
//!   [`Session`], it decides whether to grant, redirect, deny or keep waiting,
//!   feeds that decision through the [`GateState`] reducer, and tells the
//!   caller what to render ([`GateView`]).
//! - [`AccessGate`] is the GPUI view wrapping protected content. It owns the
//!   hydration timer, reads the path from the
//!   [`GlobalRouter`](crate::GlobalRouter), issues redirects through
//!   [`Navigator::replace`], and renders through [`GatePages`].
//!
//! # Decision order
//!
//! 1. Login route: wait for the session; signed in → dashboard, otherwise
//!    show the login form.
//! 2. Signed out on a protected route → login.
//! 3. Auth or permission checks switched off → grant.
//! 4. Signed in without a user object → login.
//! 5. Dashboard route → grant.
//! 6. Permission map: unmatched → grant, blank permission → deny,
//!    public → grant, otherwise ask the session.
//!
//! # Example
//!
//! ```ignore
//! let permissions = Arc::new(PermissionMap::build(&navigation())?);
//! let gate = cx.new(|cx| {
//!     AccessGate::new(
//!         GateConfig::default(),
//!         permissions,
//!         |cx| cx.global::<AuthStore>().snapshot(),
//!         |_window, _cx| admin_layout().into_any_element(),
//!         cx,
//!     )
//! });
//! ```

#[cfg(feature = "cache")]
use crate::cache::ResolutionCache;
use crate::error::DenialReason;
use crate::navigation::RouteAccess;
use crate::pages::GatePages;
use crate::permissions::{PermissionMap, Resolution};
use crate::phase::{AccessPhase, GateEvent, GateState};
use crate::router::Navigator;
use crate::session::{Session, SessionSnapshot};
use crate::{debug_log, info_log, warn_log};
use gpui::*;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// GateConfig
// ============================================================================

/// How a gate protects the content it wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// The content needs a signed-in session.
    pub require_auth: bool,
    /// Beyond signing in, the route's permission must be held.
    pub check_permissions: bool,
    pub login_path: String,
    /// Always open to any signed-in session.
    pub dashboard_path: String,
    /// Wait before the first decision so the first frame matches a
    /// signed-out render.
    pub hydration_delay: Duration,
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }

    #[must_use]
    pub fn check_permissions(mut self, check_permissions: bool) -> Self {
        self.check_permissions = check_permissions;
        self
    }

    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.dashboard_path = path.into();
        self
    }

    #[must_use]
    pub fn hydration_delay(mut self, delay: Duration) -> Self {
        self.hydration_delay = delay;
        self
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            check_permissions: true,
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            hydration_delay: Duration::from_millis(10),
        }
    }
}

// ============================================================================
// Decision / GateView
// ============================================================================

/// Outcome of one evaluation of the decision procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not hydrated yet, or the session is still loading.
    Wait,
    Grant,
    Redirect { to: String },
    Deny(DenialReason),
}

/// What the gate should put on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Before the first client frame.
    Initializing,
    Loading { message: &'static str },
    Denied { reason: DenialReason },
    Content,
}

// ============================================================================
// AccessController
// ============================================================================

/// Framework-independent core of the gate.
#[derive(Debug)]
pub struct AccessController {
    config: GateConfig,
    permissions: Arc<PermissionMap>,
    #[cfg(feature = "cache")]
    cache: ResolutionCache,
    state: GateState,
}

impl AccessController {
    pub fn new(config: GateConfig, permissions: Arc<PermissionMap>) -> Self {
        Self {
            config,
            permissions,
            #[cfg(feature = "cache")]
            cache: ResolutionCache::new(),
            state: GateState::new(),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn phase(&self) -> AccessPhase {
        self.state.phase()
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Mark the first client frame as passed.
    pub fn hydrate(&mut self) {
        self.state.apply(GateEvent::HydrationComplete);
    }

    /// Evaluate the decision procedure for `path` without committing it to the
    /// phase state.
    pub fn evaluate(&mut self, path: &str, session: &dyn Session) -> Decision {
        self.decide(path, session).0
    }

    /// Recompute the decision for `path` and commit it.
    ///
    /// Safe to call on every render: the same inputs yield the same state,
    /// and a redirect is returned at most once per path and target.
    pub fn sync(&mut self, path: &str, session: &dyn Session) -> Option<String> {
        self.state.apply(GateEvent::PathChanged(path.to_string()));
        if !self.state.is_hydrated() {
            return None;
        }

        let (decision, checked_permission) = self.decide(path, session);
        if checked_permission {
            self.state.apply(GateEvent::PermissionCheckStarted);
        }

        match decision {
            Decision::Wait => None,
            Decision::Grant => {
                if path == self.config.login_path {
                    self.state.apply(GateEvent::LoginCheckCompleted);
                }
                self.state.apply(GateEvent::Granted);
                None
            }
            Decision::Redirect { to } => {
                let issued = self.state.apply(GateEvent::Redirected { to });
                if let Some(target) = &issued {
                    info_log!("Gate redirecting '{}' -> '{}'", path, target);
                }
                issued
            }
            Decision::Deny(reason) => {
                if self.state.denial() != Some(&reason) {
                    warn_log!("Access to '{}' denied: {:?}", path, reason);
                }
                self.state.apply(GateEvent::Denied(reason));
                None
            }
        }
    }

    /// What to render for `path`, given the last [`sync`](Self::sync).
    pub fn view(&self, path: &str, session: &dyn Session) -> GateView {
        if let Some(reason) = self.state.denial() {
            return GateView::Denied {
                reason: reason.clone(),
            };
        }
        if !self.state.is_hydrated() {
            return GateView::Initializing;
        }

        let phase = self.state.phase();
        let on_login = path == self.config.login_path;

        if on_login && session.is_authenticated() && phase != AccessPhase::Authenticated {
            return GateView::Loading {
                message: AccessPhase::Redirecting.loading_message(),
            };
        }
        if session.is_logging_out() {
            return GateView::Content;
        }
        if phase != AccessPhase::Authenticated {
            if on_login && self.state.initial_check_done() && !session.is_authenticated() {
                return GateView::Content;
            }
            return GateView::Loading {
                message: phase.loading_message(),
            };
        }

        GateView::Content
    }

    /// Returns the decision and whether the permission map was consulted for
    /// a route that requires a permission.
    fn decide(&mut self, path: &str, session: &dyn Session) -> (Decision, bool) {
        if !self.state.is_hydrated() || session.is_loading() {
            return (Decision::Wait, false);
        }

        if path == self.config.login_path {
            let decision = if session.is_authenticated() {
                Decision::Redirect {
                    to: self.config.dashboard_path.clone(),
                }
            } else {
                Decision::Grant
            };
            return (decision, false);
        }

        if self.config.require_auth && !session.is_authenticated() {
            return (self.redirect_to_login(), false);
        }
        if !self.config.require_auth || !self.config.check_permissions {
            return (Decision::Grant, false);
        }
        if session.user().is_none() {
            debug_log!("Session authenticated without a user; treating as signed out");
            return (self.redirect_to_login(), false);
        }
        if path == self.config.dashboard_path {
            return (Decision::Grant, false);
        }

        match self.resolve(path) {
            Resolution::Unmatched => (Decision::Grant, false),
            Resolution::Matched { access, route } => match access {
                RouteAccess::Public => (Decision::Grant, false),
                RouteAccess::Unset => (Decision::Deny(DenialReason::Misconfigured { path: route }), false),
                RouteAccess::Requires(permission) => {
                    let decision = if session.can(permission.as_str()) {
                        Decision::Grant
                    } else {
                        Decision::Deny(DenialReason::MissingPermission {
                            permission: permission.as_str().to_string(),
                        })
                    };
                    (decision, true)
                }
            },
        }
    }

    fn redirect_to_login(&self) -> Decision {
        Decision::Redirect {
            to: self.config.login_path.clone(),
        }
    }

    #[cfg(feature = "cache")]
    fn resolve(&mut self, path: &str) -> Resolution {
        self.cache.resolve(&self.permissions, path)
    }

    #[cfg(not(feature = "cache"))]
    fn resolve(&mut self, path: &str) -> Resolution {
        self.permissions.resolve(path)
    }
}

// ============================================================================
// AccessGate (GPUI view)
// ============================================================================

/// Reads the host's session state for the current frame.
pub type SessionSource = Box<dyn Fn(&App) -> SessionSnapshot>;

/// Builds the protected content.
pub type ContentBuilder = Box<dyn Fn(&mut Window, &mut App) -> AnyElement>;

/// GPUI view that renders its content only once access is settled.
pub struct AccessGate {
    controller: AccessController,
    session: SessionSource,
    content: ContentBuilder,
    pages: GatePages,
    /// Dropping the view cancels the pending timer.
    hydration: Option<Task<()>>,
}

impl AccessGate {
    /// Create the gate and start its hydration timer.
    pub fn new<S, C>(
        config: GateConfig,
        permissions: Arc<PermissionMap>,
        session: S,
        content: C,
        cx: &mut Context<'_, Self>,
    ) -> Self
    where
        S: Fn(&App) -> SessionSnapshot + 'static,
        C: Fn(&mut Window, &mut App) -> AnyElement + 'static,
    {
        let delay = config.hydration_delay;
        let hydration = cx.spawn(async move |this, cx| {
            cx.background_executor().timer(delay).await;
            this.update(cx, |gate, cx| {
                gate.controller.hydrate();
                gate.hydration = None;
                cx.notify();
            })
            .ok();
        });

        Self {
            controller: AccessController::new(config, permissions),
            session: Box::new(session),
            content: Box::new(content),
            pages: GatePages::default(),
            hydration: Some(hydration),
        }
    }

    #[must_use]
    pub fn with_pages(mut self, pages: GatePages) -> Self {
        self.pages = pages;
        self
    }

    pub fn controller(&self) -> &AccessController {
        &self.controller
    }

    /// The hydration timer has not fired yet.
    pub fn is_hydrating(&self) -> bool {
        self.hydration.is_some()
    }

    /// Sync against the router and session, issuing any redirect, and
    /// return what to render.
    pub fn sync(&mut self, cx: &mut Context<'_, Self>) -> GateView {
        let path = Navigator::current_path(cx);
        let session = (self.session)(cx);

        if let Some(target) = self.controller.sync(&path, &session) {
            cx.defer(move |cx| Navigator::replace(cx, target));
        }
        self.controller.view(&path, &session)
    }

    fn back_to_dashboard(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let dashboard = self.controller.config().dashboard_path.clone();
        div()
            .id("access-gate-back")
            .px_4()
            .py_2()
            .rounded_md()
            .bg(rgb(0x0f766e))
            .text_color(rgb(0xffffff))
            .cursor_pointer()
            .child("Back to dashboard")
            .on_click(cx.listener(move |_gate, _event, _window, cx| {
                Navigator::replace(cx, dashboard.clone());
            }))
            .into_any_element()
    }
}

impl Render for AccessGate {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        match self.sync(cx) {
            GateView::Content => (self.content)(window, cx),
            GateView::Initializing => self.pages.render_initializing(),
            GateView::Loading { message } => self.pages.render_loading(message),
            GateView::Denied { reason } => {
                let back = self.back_to_dashboard(cx);
                self.pages.render_denied(&reason, back)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use core::prelude::v1::test;
    use crate::navigation::{NavGroup, NavItem, NavigationTree};
    use crate::session::SessionUser;

    fn permissions() -> Arc<PermissionMap> {
        let tree = NavigationTree::new().group(
            NavGroup::new("Admin")
                .item(NavItem::new("Teams", "/admin/teams", "teams.view"))
                .item(NavItem::new("Roles", "/admin/roles", "  "))
                .item(NavItem::public("Help", "/admin/help")),
        );
        Arc::new(PermissionMap::build(&tree).unwrap())
    }

    fn controller() -> AccessController {
        let mut controller = AccessController::new(GateConfig::default(), permissions());
        controller.hydrate();
        controller
    }

    fn staff() -> SessionSnapshot {
        SessionSnapshot::authenticated(SessionUser::new("1", "staff@example.com"))
    }

    #[test]
    fn test_no_decision_before_hydration() {
        let mut controller = AccessController::new(GateConfig::default(), permissions());
        assert_eq!(controller.sync("/admin/teams", &SessionSnapshot::anonymous()), None);
        assert_eq!(
            controller.view("/admin/teams", &SessionSnapshot::anonymous()),
            GateView::Initializing
        );
        assert_eq!(controller.phase(), AccessPhase::Hydrating);
    }

    #[test]
    fn test_waits_while_session_loading() {
        let mut controller = controller();
        let session = SessionSnapshot::loading();
        assert_eq!(controller.sync("/admin/teams", &session), None);
        assert_eq!(controller.phase(), AccessPhase::AuthChecking);
        assert_eq!(
            controller.view("/admin/teams", &session),
            GateView::Loading {
                message: "Checking authentication..."
            }
        );
    }

    #[test]
    fn test_signed_out_redirects_to_login() {
        let mut controller = controller();
        let session = SessionSnapshot::anonymous();
        assert_eq!(
            controller.sync("/admin/teams", &session),
            Some("/login".to_string())
        );
        assert_eq!(controller.phase(), AccessPhase::Redirecting);
        assert_eq!(controller.sync("/admin/teams", &session), None);
    }

    #[test]
    fn test_require_auth_off_grants_anyone() {
        let mut controller =
            AccessController::new(GateConfig::default().require_auth(false), permissions());
        controller.hydrate();
        assert_eq!(controller.sync("/admin/teams", &SessionSnapshot::anonymous()), None);
        assert_eq!(controller.phase(), AccessPhase::Authenticated);
    }

    #[test]
    fn test_check_permissions_off_grants_signed_in() {
        let mut controller =
            AccessController::new(GateConfig::default().check_permissions(false), permissions());
        controller.hydrate();
        controller.sync("/admin/roles", &staff());
        assert_eq!(controller.phase(), AccessPhase::Authenticated);
        assert!(controller.state().denial().is_none());
    }

    #[test]
    fn test_missing_user_redirects_to_login() {
        let mut controller = controller();
        let session = SessionSnapshot {
            authenticated: true,
            ..SessionSnapshot::default()
        };
        assert_eq!(
            controller.sync("/admin/teams", &session),
            Some("/login".to_string())
        );
    }

    #[test]
    fn test_permission_granted() {
        let mut controller = controller();
        let session = staff().with_permission("teams.view");
        controller.sync("/admin/teams/12", &session);
        assert_eq!(controller.phase(), AccessPhase::Authenticated);
        assert_eq!(controller.view("/admin/teams/12", &session), GateView::Content);
    }

    #[test]
    fn test_permission_missing_is_denied() {
        let mut controller = controller();
        let session = staff();
        controller.sync("/admin/teams", &session);
        assert_eq!(controller.phase(), AccessPhase::PermissionChecking);
        assert_eq!(
            controller.view("/admin/teams", &session),
            GateView::Denied {
                reason: DenialReason::MissingPermission {
                    permission: "teams.view".into()
                }
            }
        );
    }

    #[test]
    fn test_public_route_granted() {
        let mut controller = controller();
        controller.sync("/admin/help", &staff());
        assert_eq!(controller.phase(), AccessPhase::Authenticated);
    }

    #[test]
    fn test_denial_cleared_on_navigation() {
        let mut controller = controller();
        let session = staff();
        controller.sync("/admin/teams", &session);
        assert!(controller.state().denial().is_some());

        controller.sync("/dashboard", &session);
        assert!(controller.state().denial().is_none());
        assert_eq!(controller.view("/dashboard", &session), GateView::Content);
    }

    #[test]
    fn test_login_form_stays_while_submitting() {
        let mut controller = controller();
        controller.sync("/login", &SessionSnapshot::anonymous());
        assert_eq!(
            controller.view("/login", &SessionSnapshot::anonymous()),
            GateView::Content
        );

        let submitting = SessionSnapshot::loading();
        controller.sync("/login", &submitting);
        assert_eq!(controller.view("/login", &submitting), GateView::Content);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_repeated_syncs_hit_cache() {
        let mut controller = controller();
        let session = staff().with_permission("teams.view");
        controller.sync("/admin/teams", &session);
        controller.sync("/admin/teams", &session);
        assert_eq!(controller.cache_stats().misses, 1);
        assert_eq!(controller.cache_stats().hits, 1);
    }
}
