//! Path → permission lookup built from the navigation tree.
//!
//! [`PermissionMap`] is constructed once from a
//! [`NavigationTree`](crate::NavigationTree) and shared read-only with every
//! gate. Resolution follows a fixed rule:
//!
//! 1. exact path match;
//! 2. otherwise the **longest** registered path `p` such that the request
//!    path starts with `p + "/"`;
//! 3. otherwise [`Resolution::Unmatched`].
//!
//! Unmatched paths fail open (the gate grants them). Registered paths with a
//! blank permission fail closed.
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::{NavGroup, NavItem, NavigationTree, PermissionMap, Resolution};
//!
//! let tree = NavigationTree::new().group(
//!     NavGroup::new("Admin").item(NavItem::new("Teams", "/admin/teams", "teams.view")),
//! );
//! let map = PermissionMap::build(&tree).unwrap();
//!
//! assert!(matches!(map.resolve("/admin/teams/42"), Resolution::Matched { .. }));
//! assert_eq!(map.resolve("/admin/teamsx"), Resolution::Unmatched);
//! ```

use crate::error::NavigationError;
use crate::navigation::{NavigationTree, RouteAccess};
use crate::{debug_log, error_log};
use std::collections::HashMap;

/// Outcome of looking a path up in the [`PermissionMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path, or one of its ancestors, is registered.
    Matched {
        /// The registered path that matched.
        route: String,
        /// What that route requires.
        access: RouteAccess,
    },
    /// No registered path covers this path.
    Unmatched,
}

/// Immutable path → [`RouteAccess`] table.
#[derive(Debug, Clone, Default)]
pub struct PermissionMap {
    routes: HashMap<String, RouteAccess>,
    /// Registered paths, longest first, for prefix lookups.
    by_length: Vec<String>,
}

impl PermissionMap {
    /// Build the map from every item and sub-item in `tree`.
    ///
    /// Fails if a path is empty or registered twice.
    pub fn build(tree: &NavigationTree) -> Result<Self, NavigationError> {
        let mut routes = HashMap::new();

        for entry in tree.entries() {
            if entry.path().is_empty() {
                return Err(NavigationError::EmptyPath {
                    name: entry.name().to_string(),
                });
            }
            if routes.contains_key(entry.path()) {
                return Err(NavigationError::DuplicatePath {
                    path: entry.path().to_string(),
                });
            }
            if matches!(entry.access(), RouteAccess::Unset) {
                error_log!(
                    "Route '{}' ({}) has a blank permission and will always be denied",
                    entry.path(),
                    entry.name()
                );
            } else {
                debug_log!("Registered route '{}' -> {:?}", entry.path(), entry.access());
            }
            routes.insert(entry.path().to_string(), entry.access().clone());
        }

        let mut by_length: Vec<String> = routes.keys().cloned().collect();
        by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Ok(Self { routes, by_length })
    }

    /// Resolve the requirement for `path`.
    pub fn resolve(&self, path: &str) -> Resolution {
        if let Some(access) = self.routes.get(path) {
            return Resolution::Matched {
                route: path.to_string(),
                access: access.clone(),
            };
        }

        self.by_length
            .iter()
            .find(|route| is_child_path(path, route))
            .and_then(|route| {
                self.routes.get(route).map(|access| Resolution::Matched {
                    route: route.clone(),
                    access: access.clone(),
                })
            })
            .unwrap_or(Resolution::Unmatched)
    }

    /// Access requirement registered for exactly `path`.
    pub fn get(&self, path: &str) -> Option<&RouteAccess> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// `true` if `path` lies strictly below `route`, i.e. starts with `route + "/"`.
fn is_child_path(path: &str, route: &str) -> bool {
    path.strip_prefix(route)
        .is_some_and(|rest| rest.starts_with('/'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavGroup, NavItem, Permission};

    fn sample_tree() -> NavigationTree {
        NavigationTree::new()
            .group(
                NavGroup::new("Management")
                    .item(NavItem::new("Teams", "/admin/teams", "teams.view"))
                    .item(
                        NavItem::new("Programs", "/admin/programs", "programs.view").subitem(
                            NavItem::new(
                                "Categories",
                                "/admin/programs/categories",
                                "program-categories.view",
                            ),
                        ),
                    )
                    .item(NavItem::new("Roles", "/admin/roles", "")),
            )
            .group(NavGroup::new("Help").item(NavItem::public("Docs", "/admin/docs")))
    }

    fn requires(name: &str) -> RouteAccess {
        RouteAccess::Requires(Permission::new(name).unwrap())
    }

    #[test]
    fn test_exact_match() {
        let map = PermissionMap::build(&sample_tree()).unwrap();
        assert_eq!(
            map.resolve("/admin/teams"),
            Resolution::Matched {
                route: "/admin/teams".to_string(),
                access: requires("teams.view"),
            }
        );
    }

    #[test]
    fn test_child_path_inherits_parent() {
        let map = PermissionMap::build(&sample_tree()).unwrap();
        assert_eq!(
            map.resolve("/admin/teams/123/edit"),
            Resolution::Matched {
                route: "/admin/teams".to_string(),
                access: requires("teams.view"),
            }
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let map = PermissionMap::build(&sample_tree()).unwrap();
        assert_eq!(
            map.resolve("/admin/programs/categories/7"),
            Resolution::Matched {
                route: "/admin/programs/categories".to_string(),
                access: requires("program-categories.view"),
            }
        );
        assert_eq!(
            map.resolve("/admin/programs/9"),
            Resolution::Matched {
                route: "/admin/programs".to_string(),
                access: requires("programs.view"),
            }
        );
    }

    #[test]
    fn test_prefix_requires_separator() {
        let map = PermissionMap::build(&sample_tree()).unwrap();
        assert_eq!(map.resolve("/admin/teamsettings"), Resolution::Unmatched);
        assert_eq!(map.resolve("/admin"), Resolution::Unmatched);
        assert_eq!(map.resolve(""), Resolution::Unmatched);
    }

    #[test]
    fn test_blank_permission_is_registered_as_unset() {
        let map = PermissionMap::build(&sample_tree()).unwrap();
        assert_eq!(map.get("/admin/roles"), Some(&RouteAccess::Unset));
        assert_eq!(map.get("/admin/docs"), Some(&RouteAccess::Public));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let tree = NavigationTree::new()
            .group(NavGroup::new("A").item(NavItem::new("Teams", "/admin/teams", "teams.view")))
            .group(NavGroup::new("B").item(NavItem::new("Teams again", "/admin/teams", "x")));

        let err = PermissionMap::build(&tree).unwrap_err();
        assert_eq!(
            err,
            NavigationError::DuplicatePath {
                path: "/admin/teams".to_string()
            }
        );
    }

    #[test]
    fn test_empty_path_rejected() {
        let tree = NavigationTree::new().group(NavGroup::new("A").item(NavItem::new("Blank", "", "x")));
        assert!(matches!(
            PermissionMap::build(&tree),
            Err(NavigationError::EmptyPath { .. })
        ));
    }

    #[test]
    fn test_is_child_path() {
        assert!(is_child_path("/a/b", "/a"));
        assert!(!is_child_path("/a", "/a"));
        assert!(!is_child_path("/ab", "/a"));
    }
}
