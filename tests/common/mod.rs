//! Shared fixtures for the integration tests.
//!
//! The navigation tree mirrors a small coaching admin: a dashboard, a people
//! section with nested team pages, billing, and one misconfigured route.

#![allow(dead_code)]

use gpui::*;
use gpui_access_gate::*;
use std::sync::Arc;
use std::time::Duration;

/// Sidebar used by most tests.
pub fn admin_navigation() -> NavigationTree {
    NavigationTree::new()
        .group(NavGroup::new("Overview").item(NavItem::public("Dashboard", "/dashboard")))
        .group(
            NavGroup::new("People")
                .item(
                    NavItem::new("Teams", "/admin/teams", "teams.view")
                        .subitem(NavItem::new("Rosters", "/admin/teams/rosters", "rosters.view")),
                )
                .item(NavItem::new("Coaches", "/admin/coaches", "coaches.view")),
        )
        .group(
            NavGroup::new("Billing")
                .item(NavItem::new("Invoices", "/admin/invoices", "invoices.view"))
                .item(NavItem::new("Payouts", "/admin/payouts", "")),
        )
        .group(NavGroup::new("Support").item(NavItem::public("Help", "/help")))
}

pub fn admin_permissions() -> Arc<PermissionMap> {
    Arc::new(PermissionMap::build(&admin_navigation()).expect("fixture navigation is valid"))
}

/// A signed-in staff member holding `permissions`.
pub fn staff(permissions: &[&str]) -> SessionSnapshot {
    permissions.iter().fold(
        SessionSnapshot::authenticated(SessionUser::new("42", "staff@example.com")),
        |session, permission| session.with_permission(*permission),
    )
}

/// Controller with hydration already complete.
pub fn hydrated_controller(config: GateConfig) -> AccessController {
    let mut controller = AccessController::new(config, admin_permissions());
    controller.hydrate();
    controller
}

/// Gate config with a short hydration delay for clock-driven tests.
pub fn test_config() -> GateConfig {
    GateConfig::default().hydration_delay(Duration::from_millis(10))
}

/// Host-side session provider, stored as a global so tests can change it.
#[derive(Debug, Clone, Default)]
pub struct TestSession(pub SessionSnapshot);

impl Global for TestSession {}

pub fn set_session(cx: &mut App, session: SessionSnapshot) {
    cx.set_global(TestSession(session));
}

/// Build an [`AccessGate`] that reads [`TestSession`] and renders a marker
/// element as its content.
pub fn new_gate(config: GateConfig, cx: &mut Context<'_, AccessGate>) -> AccessGate {
    AccessGate::new(
        config,
        admin_permissions(),
        |cx| {
            cx.try_global::<TestSession>()
                .map(|session| session.0.clone())
                .unwrap_or_default()
        },
        |_window, _cx| div().child("Protected content").into_any_element(),
        cx,
    )
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
