//! Menu entries and the rules deciding which of them a user gets to see

use crate::{
    route::Route,
    uac::{Feature, User},
};

/// Flags attached to a menu entry, see [`VisibilityFlags::is_visible`] for how
/// they combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityFlags {
    pub admin_only: bool,
    pub required_feature: Option<Feature>,
    pub required_role: Option<&'static str>,
    pub exclude_employees: bool,
    pub only_admin_or_employee: bool,
}

impl VisibilityFlags {
    pub const UNRESTRICTED: Self = Self {
        admin_only: false,
        required_feature: None,
        required_role: None,
        exclude_employees: false,
        only_admin_or_employee: false,
    };

    pub const ADMIN_ONLY: Self = Self {
        admin_only: true,
        ..Self::UNRESTRICTED
    };

    pub const NOT_EMPLOYEES: Self = Self {
        exclude_employees: true,
        ..Self::UNRESTRICTED
    };

    pub const ADMIN_OR_EMPLOYEE: Self = Self {
        only_admin_or_employee: true,
        ..Self::UNRESTRICTED
    };

    pub const fn with_feature(feature: Feature) -> Self {
        Self {
            required_feature: Some(feature),
            ..Self::UNRESTRICTED
        }
    }

    pub const fn with_role(role_name: &'static str) -> Self {
        Self {
            required_role: Some(role_name),
            ..Self::UNRESTRICTED
        }
    }

    /// The flags are checked in a fixed order and the first one that applies
    /// decides:
    /// 1. `only_admin_or_employee`
    /// 2. `exclude_employees` (only hides, falls through otherwise)
    /// 3. `required_feature` (admins always pass)
    /// 4. `required_role` (admins always pass)
    /// 5. `admin_only`
    pub fn is_visible(&self, user: Option<&User>) -> bool {
        let is_admin = user.is_some_and(User::is_admin);
        let is_employee = user.is_some_and(User::is_employee);
        if self.only_admin_or_employee {
            return is_admin || is_employee;
        }
        if self.exclude_employees && is_employee {
            return false;
        }
        if let Some(feature) = self.required_feature {
            return is_admin || user.is_some_and(|x| x.has_granted_feature(feature));
        }
        if let Some(role_name) = self.required_role {
            return is_admin || user.is_some_and(|x| x.has_role(role_name));
        }
        !self.admin_only || is_admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Route(Route),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Main,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub target: NavTarget,
    pub section: NavSection,
    pub visibility: VisibilityFlags,
}

impl NavEntry {
    const fn main(label: &'static str, route: Route, visibility: VisibilityFlags) -> Self {
        Self {
            label,
            target: NavTarget::Route(route),
            section: NavSection::Main,
            visibility,
        }
    }

    const fn info(label: &'static str, target: NavTarget, visibility: VisibilityFlags) -> Self {
        Self {
            label,
            target,
            section: NavSection::Info,
            visibility,
        }
    }
}

pub const NAV_ENTRIES: &[NavEntry] = &[
    NavEntry::main("Dashboard", Route::Dashboard, VisibilityFlags::UNRESTRICTED),
    NavEntry::main("My Profile", Route::Profile, VisibilityFlags::UNRESTRICTED),
    NavEntry::main("View Permits", Route::Permits, VisibilityFlags::UNRESTRICTED),
    NavEntry::main("New Permit", Route::NewPermit, VisibilityFlags::NOT_EMPLOYEES),
    NavEntry::main("Search Permits", Route::Search, VisibilityFlags::UNRESTRICTED),
    NavEntry::main(
        "Reports",
        Route::Reports,
        VisibilityFlags::with_feature(Feature::ReportView),
    ),
    NavEntry::main("Chalans", Route::Chalans, VisibilityFlags::ADMIN_OR_EMPLOYEE),
    NavEntry::main(
        "Fee Management",
        Route::FeeManagement,
        VisibilityFlags::ADMIN_OR_EMPLOYEE,
    ),
    NavEntry::main("Permit Types", Route::Types, VisibilityFlags::ADMIN_ONLY),
    NavEntry::main("Users", Route::Users, VisibilityFlags::ADMIN_ONLY),
    NavEntry::main("Roles", Route::Roles, VisibilityFlags::ADMIN_ONLY),
    NavEntry::info(
        "Feature List",
        NavTarget::Route(Route::Features),
        VisibilityFlags::ADMIN_ONLY,
    ),
    NavEntry::info(
        "About Us",
        NavTarget::Route(Route::About),
        VisibilityFlags::UNRESTRICTED,
    ),
    NavEntry::info(
        "Privacy Policy",
        NavTarget::Route(Route::Privacy),
        VisibilityFlags::UNRESTRICTED,
    ),
    NavEntry::info("Logout", NavTarget::Logout, VisibilityFlags::UNRESTRICTED),
];

/// Entries of `section` the user is allowed to see, in menu order
pub fn visible_entries(
    section: NavSection,
    user: Option<&User>,
) -> impl Iterator<Item = &'static NavEntry> + '_ {
    NAV_ENTRIES
        .iter()
        .filter(move |entry| entry.section == section && entry.visibility.is_visible(user))
}

/// The menu entry that governs access to `route` (detail pages share the entry
/// of their list)
pub fn entry_for(route: Route) -> Option<&'static NavEntry> {
    let governing = route.menu_route();
    NAV_ENTRIES
        .iter()
        .find(|entry| entry.target == NavTarget::Route(governing))
}

/// Routes without a menu entry are not restricted
pub fn is_route_visible(route: Route, user: Option<&User>) -> bool {
    entry_for(route).is_none_or(|entry| entry.visibility.is_visible(user))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::uac::user::test_users::user_with;

    fn labels(section: NavSection, user: Option<&User>) -> Vec<&'static str> {
        visible_entries(section, user).map(|x| x.label).collect()
    }

    #[rstest]
    #[case::non_admin(user_with(Some("clerk"), false, &[]), false)]
    #[case::admin_role(user_with(Some("admin"), false, &[]), true)]
    #[case::admin_role_other_case(user_with(Some("Admin"), false, &[]), true)]
    #[case::staff(user_with(None, true, &[]), true)]
    fn admin_only(#[case] user: User, #[case] expected: bool) {
        assert_eq!(VisibilityFlags::ADMIN_ONLY.is_visible(Some(&user)), expected);
    }

    #[rstest]
    #[case::no_feature(user_with(Some("clerk"), false, &[]), false)]
    #[case::has_feature(user_with(Some("clerk"), false, &["report_view"]), true)]
    #[case::feature_other_case(user_with(Some("clerk"), false, &["REPORT_VIEW"]), true)]
    #[case::admin_without_feature(user_with(Some("admin"), false, &[]), true)]
    fn required_feature(#[case] user: User, #[case] expected: bool) {
        let flags = VisibilityFlags::with_feature(Feature::ReportView);
        assert_eq!(flags.is_visible(Some(&user)), expected);
    }

    #[rstest]
    #[case::matching_role(user_with(Some("inspector"), false, &[]), true)]
    #[case::other_role(user_with(Some("clerk"), false, &[]), false)]
    #[case::no_role(user_with(None, false, &[]), false)]
    #[case::admin(user_with(None, true, &[]), true)]
    fn required_role(#[case] user: User, #[case] expected: bool) {
        let flags = VisibilityFlags::with_role("Inspector");
        assert_eq!(flags.is_visible(Some(&user)), expected);
    }

    #[rstest]
    #[case::employee(user_with(Some("clerk"), false, &["employee"]), false)]
    #[case::not_employee(user_with(Some("clerk"), false, &[]), true)]
    #[case::admin_employee(user_with(Some("admin"), false, &["employee"]), false)]
    fn exclude_employees(#[case] user: User, #[case] expected: bool) {
        assert_eq!(VisibilityFlags::NOT_EMPLOYEES.is_visible(Some(&user)), expected);
    }

    #[rstest]
    #[case::employee(user_with(Some("clerk"), false, &["employee"]), true)]
    #[case::admin(user_with(Some("admin"), false, &[]), true)]
    #[case::neither(user_with(Some("clerk"), false, &["report_view"]), false)]
    fn only_admin_or_employee(#[case] user: User, #[case] expected: bool) {
        assert_eq!(
            VisibilityFlags::ADMIN_OR_EMPLOYEE.is_visible(Some(&user)),
            expected
        );
    }

    #[test]
    fn first_matching_flag_wins() {
        // Arrange
        let flags = VisibilityFlags {
            admin_only: true,
            required_feature: Some(Feature::ReportView),
            ..Default::default()
        };
        let user = user_with(Some("clerk"), false, &["report_view"]);

        // Act
        let actual = flags.is_visible(Some(&user));

        // Assert
        assert!(actual, "required feature is checked before admin only");
    }

    #[test]
    fn absent_user_sees_only_unrestricted() {
        assert_eq!(
            labels(NavSection::Main, None),
            [
                "Dashboard",
                "My Profile",
                "View Permits",
                "New Permit",
                "Search Permits"
            ]
        );
        assert_eq!(
            labels(NavSection::Info, None),
            ["About Us", "Privacy Policy", "Logout"]
        );
    }

    #[test]
    fn admin_sees_everything() {
        let admin = user_with(Some("admin"), true, &[]);
        assert_eq!(
            visible_entries(NavSection::Main, Some(&admin)).count()
                + visible_entries(NavSection::Info, Some(&admin)).count(),
            NAV_ENTRIES.len()
        );
    }

    #[test]
    fn employee_menu() {
        let employee = user_with(Some("clerk"), false, &["employee"]);
        assert_eq!(
            labels(NavSection::Main, Some(&employee)),
            [
                "Dashboard",
                "My Profile",
                "View Permits",
                "Search Permits",
                "Chalans",
                "Fee Management"
            ]
        );
    }

    #[rstest]
    #[case::detail_uses_list_entry(Route::ChalanDetail(4.into()), Some("Chalans"))]
    #[case::permit_edit(Route::PermitEdit(4.into()), Some("View Permits"))]
    #[case::no_entry(Route::Login, None)]
    fn governing_entry(#[case] route: Route, #[case] expected: Option<&str>) {
        assert_eq!(entry_for(route).map(|x| x.label), expected);
    }
}
