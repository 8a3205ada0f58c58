//! Route access gating and list query normalization for GPUI admin
//! dashboards.
//!
//! The crate has two independent halves.
//!
//! **Access gate.** A [`NavigationTree`] describes the sidebar: groups of
//! items, each with a path and the permission needed to open it.
//! [`PermissionMap::build`] flattens it into a lookup where nested paths
//! inherit from their closest registered prefix. [`AccessGate`] wraps
//! protected content, waits for the first client frame, and then decides per
//! path whether to show the content, redirect (to login or the dashboard), or
//! show a 403 page. The decision logic lives in [`AccessController`] and the
//! phase machine in [`GateState`], neither of which needs a window.
//!
//! **List queries.** [`ListQuery::parse`] turns whatever is in the URL into
//! valid pagination, sorting, search and filter values, never failing.
//! [`merge_parameters`] applies UI changes on top, and
//! [`build_default_list_url`] produces the "back to page 1" URL used after a
//! create or update.
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::{
//!     ListDefaults, ListQuery, NavGroup, NavItem, NavigationTree, PermissionMap, Resolution,
//!     RouteAccess,
//! };
//!
//! let tree = NavigationTree::new().group(
//!     NavGroup::new("People").item(NavItem::new("Teams", "/admin/teams", "teams.view")),
//! );
//! let map = PermissionMap::build(&tree).unwrap();
//! assert!(matches!(
//!     map.resolve("/admin/teams/7/edit"),
//!     Resolution::Matched { access: RouteAccess::Requires(_), .. }
//! ));
//!
//! let query = ListQuery::from_query_string("?page=abc&per_page=-1", &ListDefaults::default());
//! assert_eq!((query.page, query.per_page), (1, 10));
//! ```
//!
//! # Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through `tracing` instead.
//! - `cache` (default): LRU cache in front of permission lookups.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod gate;
pub mod list_query;
pub mod logging;
pub mod navigation;
pub mod pages;
pub mod params;
pub mod permissions;
pub mod phase;
pub mod router;
pub mod session;

#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolutionCache};
pub use error::{DenialReason, NavigationError};
pub use gate::{AccessController, AccessGate, Decision, GateConfig, GateView};
pub use list_query::{
    build_default_list_url, merge_parameters, parse_positive, ListDefaults, ListQuery,
    ListQueryUpdate, ListUrlOptions, SortDirection, RESERVED_KEYS,
};
pub use navigation::{NavGroup, NavItem, NavigationTree, Permission, RouteAccess};
pub use pages::GatePages;
pub use params::QueryParams;
pub use permissions::{PermissionMap, Resolution};
pub use phase::{AccessPhase, GateEvent, GateState};
pub use router::{
    init_router, GlobalRouter, NavigationDirection, Navigator, RouteChangeEvent, RouterState,
};
pub use session::{Session, SessionSnapshot, SessionUser};
