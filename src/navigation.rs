//! Static navigation tree and per-route access requirements.
//!
//! The admin sidebar is described once, at startup, as a tree of
//! [`NavGroup`]s holding [`NavItem`]s, each of which may hold one level of
//! sub-items. The gate only cares about two things per node: its path and
//! its [`RouteAccess`].
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::{NavGroup, NavItem, NavigationTree, RouteAccess};
//!
//! let tree = NavigationTree::new()
//!     .group(
//!         NavGroup::new("Management")
//!             .item(NavItem::new("Teams", "/admin/teams", "teams.view"))
//!             .item(
//!                 NavItem::new("Programs", "/admin/programs", "programs.view")
//!                     .subitem(NavItem::new("Enrollments", "/admin/programs/enrollments", "enrollments.view")),
//!             ),
//!     )
//!     .group(NavGroup::new("Help").item(NavItem::public("Docs", "/admin/docs")));
//!
//! assert_eq!(tree.entries().count(), 4);
//! assert!(matches!(tree.groups()[1].items()[0].access(), RouteAccess::Public));
//! ```

use std::fmt;

// ============================================================================
// Permission
// ============================================================================

/// A non-blank permission name such as `"teams.view"`.
///
/// There is no way to build a blank `Permission`; a blank permission field
/// in configuration becomes [`RouteAccess::Unset`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission(String);

impl Permission {
    /// Create a permission, returning `None` if `name` is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    /// The permission name as passed to the session's `can` check.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// RouteAccess
// ============================================================================

/// What a registered route requires before it may be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Declared public: any authenticated session may open it.
    Public,
    /// The session must hold this permission.
    Requires(Permission),
    /// A permission field was supplied but left blank. Fails closed.
    Unset,
}

impl RouteAccess {
    /// Interpret a raw permission field from configuration.
    ///
    /// Blank input maps to [`Unset`](Self::Unset), never to
    /// [`Public`](Self::Public).
    pub fn from_field(permission: &str) -> Self {
        Permission::new(permission).map_or(Self::Unset, Self::Requires)
    }
}

// ============================================================================
// NavItem / NavGroup / NavigationTree
// ============================================================================

/// A sidebar entry. Sub-items share the same shape but cannot nest further.
#[derive(Debug, Clone)]
pub struct NavItem {
    name: String,
    path: String,
    access: RouteAccess,
    subitems: Vec<NavItem>,
}

impl NavItem {
    /// Create an entry from a raw permission field.
    ///
    /// An empty `permission` marks the route as misconfigured; use
    /// [`public`](Self::public) for routes that need no permission.
    pub fn new(name: impl Into<String>, path: impl Into<String>, permission: &str) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            access: RouteAccess::from_field(permission),
            subitems: Vec::new(),
        }
    }

    /// Create an entry that any authenticated session may open.
    pub fn public(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            access: RouteAccess::Public,
            subitems: Vec::new(),
        }
    }

    /// Attach a sub-item. Sub-items of `item` itself are dropped.
    #[must_use]
    pub fn subitem(mut self, mut item: NavItem) -> Self {
        item.subitems.clear();
        self.subitems.push(item);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn access(&self) -> &RouteAccess {
        &self.access
    }

    pub fn subitems(&self) -> &[NavItem] {
        &self.subitems
    }
}

/// A titled section of the sidebar.
#[derive(Debug, Clone)]
pub struct NavGroup {
    title: String,
    items: Vec<NavItem>,
}

impl NavGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(mut self, item: NavItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }
}

/// The full navigation configuration.
#[derive(Debug, Clone, Default)]
pub struct NavigationTree {
    groups: Vec<NavGroup>,
}

impl NavigationTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn group(mut self, group: NavGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    /// Iterate every item and sub-item, depth first.
    pub fn entries(&self) -> impl Iterator<Item = &NavItem> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter())
            .flat_map(|item| std::iter::once(item).chain(item.subitems.iter()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_permission_is_unset() {
        assert_eq!(RouteAccess::from_field(""), RouteAccess::Unset);
        assert_eq!(RouteAccess::from_field("   "), RouteAccess::Unset);
        assert!(Permission::new("\t").is_none());
    }

    #[test]
    fn test_permission_field_kept_verbatim() {
        let access = RouteAccess::from_field("invoices.view");
        match access {
            RouteAccess::Requires(permission) => assert_eq!(permission.as_str(), "invoices.view"),
            other => panic!("unexpected access: {:?}", other),
        }
    }

    #[test]
    fn test_subitems_do_not_nest() {
        let nested = NavItem::new("Foods", "/admin/foods", "foods.view")
            .subitem(NavItem::new("Deep", "/admin/foods/deep", "foods.deep"));
        let item = NavItem::new("Taxonomies", "/admin/taxonomies", "taxonomies.view").subitem(nested);

        assert_eq!(item.subitems().len(), 1);
        assert!(item.subitems()[0].subitems().is_empty());
    }

    #[test]
    fn test_entries_walks_groups_items_and_subitems() {
        let tree = NavigationTree::new()
            .group(
                NavGroup::new("Sales")
                    .item(NavItem::new("Invoices", "/admin/invoices", "invoices.view"))
                    .item(
                        NavItem::new("Programs", "/admin/programs", "programs.view")
                            .subitem(NavItem::new("Enrollments", "/admin/enrollments", "enrollments.view")),
                    ),
            )
            .group(NavGroup::new("Staff").item(NavItem::new("Users", "/admin/users", "users.view")));

        let paths: Vec<&str> = tree.entries().map(NavItem::path).collect();
        assert_eq!(
            paths,
            vec![
                "/admin/invoices",
                "/admin/programs",
                "/admin/enrollments",
                "/admin/users"
            ]
        );
    }
}
