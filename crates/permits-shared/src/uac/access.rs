//! Checks used to decide what to show a user
//!
//! These only affect presentation, the backend enforces the actual rules

use super::{Feature, User};
use crate::permit::Permit;

/// Staff accounts are treated as having every feature
pub fn has_feature(user: Option<&User>, feature: Feature) -> bool {
    let Some(user) = user else {
        return false;
    };
    user.is_staff || user.has_granted_feature(feature)
}

pub fn can_edit_permits(user: Option<&User>) -> bool {
    has_feature(user, Feature::PermitEdit)
}

pub fn can_view_reports(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin) || has_feature(user, Feature::ReportView)
}

pub fn can_manage_users(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin) || has_feature(user, Feature::UserManage)
}

pub fn can_manage_fees(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin) || has_feature(user, Feature::ChalanVehicleFeeManage)
}

/// Permit and vehicle types may only be changed by administrators
pub fn can_manage_types(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin)
}

/// Staff may edit any permit. Others need the edit feature and the permit must
/// be assigned to their role.
pub fn can_edit_this_permit(user: Option<&User>, permit: &Permit) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !can_edit_permits(Some(user)) {
        return false;
    }
    if user.is_staff {
        return true;
    }
    if permit.assigned_to.is_none() {
        return false;
    }
    match (user.role_name(), permit.assigned_to_role.as_deref()) {
        (Some(own), Some(assigned)) => {
            let own = own.trim();
            !own.is_empty() && own.eq_ignore_ascii_case(assigned.trim())
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum PermitColumn {
    #[strum(to_string = "Permit Number")]
    PermitNumber,
    Vehicle,
    Owner,
    Authority,
    Type,
    Status,
    #[strum(to_string = "Valid To")]
    ValidTo,
    #[strum(to_string = "Assigned To")]
    AssignedTo,
    Modified,
}

impl PermitColumn {
    const PUBLIC: &'static [PermitColumn] = &[
        Self::PermitNumber,
        Self::Vehicle,
        Self::Owner,
        Self::Authority,
        Self::Type,
        Self::Status,
        Self::ValidTo,
    ];
    const EMPLOYEE: &'static [PermitColumn] = &[
        Self::PermitNumber,
        Self::Vehicle,
        Self::Owner,
        Self::Authority,
        Self::Type,
        Self::Status,
        Self::ValidTo,
        Self::AssignedTo,
        Self::Modified,
    ];
}

/// Employees and staff also see the assignment related columns
pub fn visible_permit_columns(user: Option<&User>) -> &'static [PermitColumn] {
    if has_feature(user, Feature::Employee) {
        PermitColumn::EMPLOYEE
    } else {
        PermitColumn::PUBLIC
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::uac::user::test_users::user_with;

    fn permit_assigned_to(role: Option<&str>) -> Permit {
        let mut permit = Permit::default();
        if let Some(role) = role {
            permit.assigned_to = Some(5.into());
            permit.assigned_to_role = Some(role.to_string());
        }
        permit
    }

    #[rstest]
    #[case::no_user(None, false)]
    #[case::staff(Some(user_with(None, true, &[])), true)]
    #[case::granted(Some(user_with(None, false, &["report_view"])), true)]
    #[case::admin_role_without_feature(Some(user_with(Some("admin"), false, &[])), false)]
    #[case::not_granted(Some(user_with(None, false, &["permit_view"])), false)]
    fn feature_check(#[case] user: Option<User>, #[case] expected: bool) {
        assert_eq!(has_feature(user.as_ref(), Feature::ReportView), expected);
    }

    #[rstest]
    #[case::no_user(None, false)]
    #[case::staff(Some(user_with(None, true, &[])), true)]
    #[case::admin_role(Some(user_with(Some("admin"), false, &[])), true)]
    #[case::fee_manager(Some(user_with(Some("clerk"), false, &["chalan_vehicle_fee_manage"])), false)]
    fn type_management_rights(#[case] user: Option<User>, #[case] expected: bool) {
        assert_eq!(can_manage_types(user.as_ref()), expected);
    }

    #[rstest]
    #[case::staff_any_permit(user_with(None, true, &[]), None, true)]
    #[case::matching_role(user_with(Some("inspector"), false, &["permit_edit"]), Some("Inspector"), true)]
    #[case::other_role(user_with(Some("inspector"), false, &["permit_edit"]), Some("clerk"), false)]
    #[case::unassigned(user_with(Some("inspector"), false, &["permit_edit"]), None, false)]
    #[case::missing_feature(user_with(Some("inspector"), false, &[]), Some("inspector"), false)]
    fn permit_edit_rights(
        #[case] user: User,
        #[case] assigned_role: Option<&str>,
        #[case] expected: bool,
    ) {
        // Arrange
        let permit = permit_assigned_to(assigned_role);

        // Act
        let actual = can_edit_this_permit(Some(&user), &permit);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn employee_sees_assignment_columns() {
        let employee = user_with(None, false, &["employee"]);
        let public = user_with(None, false, &[]);
        assert!(visible_permit_columns(Some(&employee)).contains(&PermitColumn::AssignedTo));
        assert!(!visible_permit_columns(Some(&public)).contains(&PermitColumn::AssignedTo));
        assert!(!visible_permit_columns(None).contains(&PermitColumn::AssignedTo));
    }
}
