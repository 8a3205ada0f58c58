//! The router the gate reads from and redirects through.
//!
//! This is deliberately small: a history stack ([`RouterState`]), a GPUI
//! global wrapping it ([`GlobalRouter`]), and static accessors
//! ([`Navigator`]). The gate only needs the current `pathname` and a
//! `replace` that does not add a history entry.
//!
//! # Initialization
//!
//! ```ignore
//! use gpui_access_gate::{init_router, Navigator};
//!
//! init_router(cx, "/dashboard");
//! Navigator::push(cx, "/admin/teams");
//! assert_eq!(Navigator::current_path(cx), "/admin/teams");
//! ```

use crate::{debug_log, info_log, warn_log};
use gpui::{App, BorrowAppContext, Global};

/// Which way a navigation moved through history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Back,
    Replace,
}

/// Emitted by every successful navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeEvent {
    pub from: Option<String>,
    pub to: String,
    pub direction: NavigationDirection,
}

// ============================================================================
// RouterState
// ============================================================================

/// Navigation history.
#[derive(Debug, Clone)]
pub struct RouterState {
    history: Vec<String>,
    current: usize,
}

impl RouterState {
    /// History starting at `/`.
    pub fn new() -> Self {
        Self::with_initial("/")
    }

    /// History starting at `path`.
    pub fn with_initial(path: impl Into<String>) -> Self {
        Self {
            history: vec![path.into()],
            current: 0,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.history[self.current]
    }

    /// Navigate to `path`, dropping any forward history.
    pub fn push(&mut self, path: String) -> RouteChangeEvent {
        let from = Some(self.current_path().to_string());

        self.history.truncate(self.current + 1);
        self.history.push(path.clone());
        self.current += 1;

        RouteChangeEvent {
            from,
            to: path,
            direction: NavigationDirection::Forward,
        }
    }

    /// Swap the current entry for `path` without growing history.
    pub fn replace(&mut self, path: String) -> RouteChangeEvent {
        let from = Some(self.current_path().to_string());

        self.history[self.current] = path.clone();

        RouteChangeEvent {
            from,
            to: path,
            direction: NavigationDirection::Replace,
        }
    }

    pub fn back(&mut self) -> Option<RouteChangeEvent> {
        if !self.can_go_back() {
            return None;
        }
        let from = Some(self.current_path().to_string());
        self.current -= 1;

        Some(RouteChangeEvent {
            from,
            to: self.current_path().to_string(),
            direction: NavigationDirection::Back,
        })
    }

    pub fn forward(&mut self) -> Option<RouteChangeEvent> {
        if !self.can_go_forward() {
            return None;
        }
        let from = Some(self.current_path().to_string());
        self.current += 1;

        Some(RouteChangeEvent {
            from,
            to: self.current_path().to_string(),
            direction: NavigationDirection::Forward,
        })
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.history.len()
    }

    /// Number of entries in history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GlobalRouter
// ============================================================================

/// Router state stored as a GPUI global.
#[derive(Debug, Clone, Default)]
pub struct GlobalRouter {
    state: RouterState,
}

impl GlobalRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            state: RouterState::with_initial(initial_path),
        }
    }

    pub fn current_path(&self) -> &str {
        self.state.current_path()
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RouterState {
        &mut self.state
    }
}

impl Global for GlobalRouter {}

/// Install a [`GlobalRouter`] starting at `initial_path`.
pub fn init_router(cx: &mut App, initial_path: impl Into<String>) {
    let router = GlobalRouter::new(initial_path);
    info_log!("Router initialized at '{}'", router.current_path());
    cx.set_global(router);
}

// ============================================================================
// Navigator
// ============================================================================

/// Static navigation API over the [`GlobalRouter`].
///
/// Every method is a no-op (with a warning) if [`init_router`] was never
/// called.
pub struct Navigator;

impl Navigator {
    /// Navigate to `path`, adding a history entry.
    pub fn push(cx: &mut App, path: impl Into<String>) {
        Self::navigate(cx, path.into(), false);
    }

    /// Navigate to `path` without adding a history entry.
    pub fn replace(cx: &mut App, path: impl Into<String>) {
        Self::navigate(cx, path.into(), true);
    }

    pub fn back(cx: &mut App) {
        if !cx.has_global::<GlobalRouter>() {
            warn_log!("Navigator::back called before init_router");
            return;
        }
        let event = cx.update_global::<GlobalRouter, _>(|router, _| router.state.back());
        if let Some(event) = event {
            debug_log!("Navigated back to '{}'", event.to);
            cx.refresh_windows();
        }
    }

    /// Current path, or `/` without a router.
    pub fn current_path(cx: &App) -> String {
        cx.try_global::<GlobalRouter>()
            .map_or_else(|| "/".to_string(), |router| router.current_path().to_string())
    }

    fn navigate(cx: &mut App, path: String, replace: bool) {
        if !cx.has_global::<GlobalRouter>() {
            warn_log!("Navigation to '{}' ignored: router not initialized", path);
            return;
        }
        let event = cx.update_global::<GlobalRouter, _>(|router, _| {
            if replace {
                router.state.replace(path)
            } else {
                router.state.push(path)
            }
        });
        debug_log!(
            "Navigation {:?}: {:?} -> '{}'",
            event.direction,
            event.from,
            event.to
        );
        cx.refresh_windows();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::TestAppContext;

    #[test]
    fn test_navigation() {
        let mut state = RouterState::new();
        assert_eq!(state.current_path(), "/");

        state.push("/admin/teams".to_string());
        state.push("/admin/teams/4".to_string());
        assert_eq!(state.current_path(), "/admin/teams/4");

        state.back();
        assert_eq!(state.current_path(), "/admin/teams");

        state.forward();
        assert_eq!(state.current_path(), "/admin/teams/4");
        assert!(!state.can_go_forward());
    }

    #[test]
    fn test_replace_keeps_history_length() {
        let mut state = RouterState::with_initial("/admin/invoices");
        let event = state.replace("/login".to_string());

        assert_eq!(state.current_path(), "/login");
        assert_eq!(state.len(), 1);
        assert_eq!(event.direction, NavigationDirection::Replace);
        assert_eq!(event.from.as_deref(), Some("/admin/invoices"));
        assert!(state.back().is_none());
    }

    #[test]
    fn test_push_truncates_forward_history() {
        let mut state = RouterState::new();
        state.push("/a".to_string());
        state.push("/b".to_string());
        state.back();
        state.push("/c".to_string());

        assert_eq!(state.len(), 3);
        assert!(!state.can_go_forward());
    }

    #[gpui::test]
    fn test_navigator_replace(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_router(cx, "/admin/teams");
            Navigator::push(cx, "/admin/teams/2");
            Navigator::replace(cx, "/login");
        });

        let (path, len) = cx.update(|cx| {
            let router = cx.global::<GlobalRouter>();
            (router.current_path().to_string(), router.state().len())
        });
        assert_eq!(path, "/login");
        assert_eq!(len, 2);
    }

    #[gpui::test]
    fn test_navigator_back(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_router(cx, "/dashboard");
            Navigator::push(cx, "/admin/teams");
            Navigator::back(cx);
            assert_eq!(Navigator::current_path(cx), "/dashboard");

            Navigator::back(cx);
            assert_eq!(Navigator::current_path(cx), "/dashboard");
            assert!(cx.global::<GlobalRouter>().state().can_go_forward());
        });
    }

    #[gpui::test]
    fn test_navigator_without_router(cx: &mut TestAppContext) {
        cx.update(|cx| {
            Navigator::replace(cx, "/login");
            Navigator::back(cx);
            assert_eq!(Navigator::current_path(cx), "/");
        });
    }
}
