use crate::id::DbId;

/// Capabilities the backend can grant to a role
///
/// The backend is the source of truth, names it sends that are not listed here
/// are kept as plain strings on [`FeatureGrant`]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::EnumCount,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Feature {
    PermitView,
    PermitCreate,
    PermitEdit,
    PermitDelete,
    PermitCheck,
    PermitSubmit,
    PermitShare,
    PermitRenew,
    PermitCancel,
    ChalanView,
    ChalanCreate,
    ChalanEdit,
    ChalanManageFees,
    ChalanMarkPaid,
    ChalanCancel,
    ChalanVehicleFeeView,
    ChalanVehicleFeeManage,
    UserManage,
    RoleManage,
    ReportView,
    DashboardView,
    Employee,
}

impl Feature {
    /// Feature names are compared without regard to case
    pub fn matches(&self, name: &str) -> bool {
        self.as_ref().eq_ignore_ascii_case(name.trim())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::PermitView => "View Permits",
            Feature::PermitCreate => "Create Permits",
            Feature::PermitEdit => "Edit Permits",
            Feature::PermitDelete => "Delete Permits",
            Feature::PermitCheck => "Check Permits",
            Feature::PermitSubmit => "Submit Permits",
            Feature::PermitShare => "Share Permits",
            Feature::PermitRenew => "Renew Permits",
            Feature::PermitCancel => "Cancel Permits",
            Feature::ChalanView => "View Chalans",
            Feature::ChalanCreate => "Create Chalans",
            Feature::ChalanEdit => "Edit Chalans",
            Feature::ChalanManageFees => "Manage Chalan Fees",
            Feature::ChalanMarkPaid => "Mark Chalan as Paid",
            Feature::ChalanCancel => "Cancel Chalans",
            Feature::ChalanVehicleFeeView => "View Vehicle Fee Structures",
            Feature::ChalanVehicleFeeManage => "Manage Vehicle Fee Structures",
            Feature::UserManage => "Manage Users",
            Feature::RoleManage => "Manage Roles",
            Feature::ReportView => "View Reports",
            Feature::DashboardView => "View Dashboard",
            Feature::Employee => "Is Employee",
        }
    }
}

/// A feature as attached to a user or role
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct FeatureGrant {
    #[serde(default)]
    pub id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

impl FeatureGrant {
    pub fn is(&self, feature: Feature) -> bool {
        feature.matches(&self.name)
    }

    /// Returns the known feature if the name is recognized
    pub fn known(&self) -> Option<Feature> {
        self.name.trim().parse().ok()
    }

    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// A row of the feature catalogue (`/features/`)
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[rstest]
    #[case("report_view", true)]
    #[case("REPORT_VIEW", true)]
    #[case(" Report_View ", true)]
    #[case("reports_view", false)]
    #[case("", false)]
    fn feature_name_matching(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(Feature::ReportView.matches(name), expected);
    }

    #[test]
    fn names_round_trip_through_parse() {
        for feature in Feature::iter() {
            let parsed: Feature = feature.as_ref().parse().unwrap();
            assert_eq!(parsed, feature);
        }
        assert_eq!(Feature::iter().count(), Feature::COUNT);
    }

    #[test]
    fn unknown_grant_is_kept() {
        // Arrange
        let grant: FeatureGrant =
            serde_json::from_str(r#"{"name": "something_new", "display_name": "New"}"#).unwrap();

        // Act / Assert
        assert_eq!(grant.known(), None);
        assert_eq!(grant.label(), "New");
        assert!(!grant.is(Feature::Employee));
    }

    #[test]
    fn serde_uses_backend_names() {
        let actual = serde_json::to_string(&Feature::ChalanVehicleFeeManage).unwrap();
        assert_eq!(actual, r#""chalan_vehicle_fee_manage""#);
    }
}
