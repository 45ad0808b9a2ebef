//! Application routes and the guard deciding what may be rendered

use std::fmt::Display;

use tracing::debug;

use crate::{id::DbId, nav::is_route_visible, uac::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Profile,
    Permits,
    NewPermit,
    Search,
    Reports,
    PermitDetails(DbId),
    PermitEdit(DbId),
    Chalans,
    ChalanCreate,
    ChalanDetail(DbId),
    FeeManagement,
    Features,
    About,
    Privacy,
    Types,
    Users,
    Roles,
}

impl Route {
    /// Returns [`None`] for paths that do not name a page
    ///
    /// Query strings, fragments and a trailing slash are ignored
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let result = match segments.as_slice() {
            [""] => Self::Dashboard,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["profile"] => Self::Profile,
            ["permits"] => Self::Permits,
            ["new-permit"] => Self::NewPermit,
            ["search"] => Self::Search,
            ["reports"] => Self::Reports,
            ["permit-details", id] => Self::PermitDetails(id.parse().ok()?),
            ["permit-edit", id] => Self::PermitEdit(id.parse().ok()?),
            ["chalans"] => Self::Chalans,
            ["chalans", "create"] => Self::ChalanCreate,
            ["chalans", id] => Self::ChalanDetail(id.parse().ok()?),
            ["fee-management"] => Self::FeeManagement,
            ["features"] => Self::Features,
            ["about"] => Self::About,
            ["privacy"] => Self::Privacy,
            ["types"] => Self::Types,
            ["users"] => Self::Users,
            ["roles"] => Self::Roles,
            _ => return None,
        };
        Some(result)
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Permits => "/permits".to_string(),
            Route::NewPermit => "/new-permit".to_string(),
            Route::Search => "/search".to_string(),
            Route::Reports => "/reports".to_string(),
            Route::PermitDetails(id) => format!("/permit-details/{id}"),
            Route::PermitEdit(id) => format!("/permit-edit/{id}"),
            Route::Chalans => "/chalans".to_string(),
            Route::ChalanCreate => "/chalans/create".to_string(),
            Route::ChalanDetail(id) => format!("/chalans/{id}"),
            Route::FeeManagement => "/fee-management".to_string(),
            Route::Features => "/features".to_string(),
            Route::About => "/about".to_string(),
            Route::Privacy => "/privacy".to_string(),
            Route::Types => "/types".to_string(),
            Route::Users => "/users".to_string(),
            Route::Roles => "/roles".to_string(),
        }
    }

    /// Pages reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// The route of the menu entry this page belongs to
    pub fn menu_route(&self) -> Route {
        match self {
            Route::PermitDetails(_) | Route::PermitEdit(_) => Route::Permits,
            Route::ChalanCreate | Route::ChalanDetail(_) => Route::Chalans,
            other => *other,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Profile => "My Profile",
            Route::Permits => "Permits",
            Route::NewPermit => "New Permit",
            Route::Search => "Search Permits",
            Route::Reports => "Reports",
            Route::PermitDetails(_) => "Permit Details",
            Route::PermitEdit(_) => "Edit Permit",
            Route::Chalans => "Chalans",
            Route::ChalanCreate => "Create Chalan",
            Route::ChalanDetail(_) => "Chalan Details",
            Route::FeeManagement => "Fee Management",
            Route::Features => "Feature List",
            Route::About => "About Us",
            Route::Privacy => "Privacy Policy",
            Route::Types => "Permit Types",
            Route::Users => "User Management",
            Route::Roles => "Role Management",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(Route),
    Redirect(Route),
}

impl GuardOutcome {
    /// The route that ends up on screen
    pub fn route(&self) -> Route {
        match self {
            GuardOutcome::Render(route) | GuardOutcome::Redirect(route) => *route,
        }
    }
}

/// Decides what to show for `path` given the session state
///
/// Without a user only the public pages render, everything else goes to
/// login. With a user the public pages, unknown paths and pages the user
/// cannot see in the menu go to the dashboard.
pub fn resolve(path: &str, user: Option<&User>) -> GuardOutcome {
    let result = guard(Route::parse(path), user);
    debug!(?path, ?result, is_logged_in = user.is_some(), "route resolved");
    result
}

/// Same as [`resolve`] for an already parsed route
pub fn guard(route: Option<Route>, user: Option<&User>) -> GuardOutcome {
    match (user, route) {
        (None, Some(route)) if route.is_public() => GuardOutcome::Render(route),
        (None, _) => GuardOutcome::Redirect(Route::Login),
        (Some(_), None) => GuardOutcome::Redirect(Route::Dashboard),
        (Some(_), Some(route)) if route.is_public() => GuardOutcome::Redirect(Route::Dashboard),
        (Some(user), Some(route)) => {
            if is_route_visible(route, Some(user)) {
                GuardOutcome::Render(route)
            } else {
                GuardOutcome::Redirect(Route::Dashboard)
            }
        }
    }
}
