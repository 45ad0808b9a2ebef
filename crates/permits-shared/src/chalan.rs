//! Traffic violation tickets

use std::collections::BTreeMap;

use anyhow::bail;
use chrono::{DateTime, Utc};

use crate::{amount::Amount, errors::ValidationError, id::DbId};

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
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChalanStatus {
    Pending,
    Issued,
    Paid,
    Cancelled,
    Disputed,
    Resolved,
}

impl ChalanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChalanStatus::Pending => "Pending",
            ChalanStatus::Issued => "Issued",
            ChalanStatus::Paid => "Paid",
            ChalanStatus::Cancelled => "Cancelled",
            ChalanStatus::Disputed => "Disputed",
            ChalanStatus::Resolved => "Resolved",
        }
    }

    /// Paid and cancelled chalans cannot be acted on further
    pub fn is_closed(&self) -> bool {
        matches!(self, ChalanStatus::Paid | ChalanStatus::Cancelled)
    }
}

/// Row of the chalan list
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ChalanSummary {
    pub id: DbId,
    pub chalan_number: String,
    pub owner_name: String,
    #[serde(default)]
    pub owner_cnic: String,
    pub car_number: String,
    #[serde(default)]
    pub permit_number: Option<String>,
    #[serde(default)]
    pub owner_username: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<DbId>,
    #[serde(default)]
    pub vehicle_type_name: Option<String>,
    pub fees_amount: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    #[serde(default)]
    pub remaining_amount: Amount,
    pub status: ChalanStatus,
    #[serde(default)]
    pub issued_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

/// Brief details of the permit a chalan was issued against
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PermitBrief {
    pub id: DbId,
    pub permit_number: String,
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub valid_from: String,
    #[serde(default)]
    pub valid_to: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ChalanHistoryEntry {
    pub id: DbId,
    pub action: String,
    #[serde(default)]
    pub performed_by: Option<DbId>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changes: serde_json::Value,
    #[serde(default)]
    pub notes: String,
}

/// Full chalan as shown on the detail screen
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct Chalan {
    pub id: DbId,
    pub chalan_number: String,
    pub owner_name: String,
    #[serde(default)]
    pub owner_cnic: String,
    #[serde(default)]
    pub owner_phone: Option<String>,
    pub car_number: String,
    #[serde(default)]
    pub owner_username: Option<String>,
    #[serde(default)]
    pub permit: Option<DbId>,
    #[serde(default)]
    pub permit_details: Option<PermitBrief>,
    #[serde(default)]
    pub vehicle_type: Option<DbId>,
    #[serde(default)]
    pub vehicle_type_name: Option<String>,
    #[serde(default)]
    pub violation_description: String,
    pub fees_amount: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    #[serde(default)]
    pub remaining_amount: Amount,
    #[serde(default)]
    pub is_paid: bool,
    pub status: ChalanStatus,
    #[serde(default)]
    pub issued_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub issued_by_name: Option<String>,
    #[serde(default)]
    pub issue_location: Option<String>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<ChalanHistoryEntry>,
}

/// Body of `/chalans/statistics/`
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Default)]
pub struct ChalanStatistics {
    pub total_chalans: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    pub total_fees_amount: Amount,
    pub total_paid_amount: Amount,
    pub pending_collection: Amount,
}

impl ChalanStatistics {
    pub fn count_for(&self, status: ChalanStatus) -> u64 {
        self.by_status.get(status.as_ref()).copied().unwrap_or(0)
    }
}

/// Validated body for creating a chalan
#[derive(Debug, serde::Serialize, Clone, PartialEq)]
pub struct NewChalan {
    pub owner_name: String,
    pub owner_cnic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    pub car_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit: Option<DbId>,
    pub vehicle_type: DbId,
    pub violation_description: String,
    /// Left out when the backend is asked to calculate it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub auto_calculate_fee: bool,
}

/// Form state of the create chalan screen
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChalanDraft {
    pub owner_name: String,
    pub owner_cnic: String,
    pub owner_phone: String,
    pub car_number: String,
    pub permit: Option<DbId>,
    pub vehicle_type: Option<DbId>,
    pub violation_description: String,
    pub fees_amount: String,
    pub issue_location: String,
    pub remarks: String,
    pub auto_calculate_fee: bool,
}

impl ChalanDraft {
    pub fn new() -> Self {
        Self {
            auto_calculate_fee: true,
            ..Default::default()
        }
    }

    /// Checks required fields in the order they appear on the form and
    /// returns the first problem found
    pub fn validate(&self) -> Result<NewChalan, ValidationError> {
        let owner_name = required(&self.owner_name, "Owner name")?;
        let owner_cnic = required(&self.owner_cnic, "Owner CNIC")?;
        let car_number = required(&self.car_number, "Car number")?;
        let vehicle_type = self
            .vehicle_type
            .ok_or(ValidationError::Required("Vehicle type"))?;
        let violation_description =
            required(&self.violation_description, "Violation description")?;
        let fees_amount = if self.fees_amount.trim().is_empty() {
            if self.auto_calculate_fee {
                None
            } else {
                return Err(ValidationError::Required("Fees amount"));
            }
        } else {
            Some(Amount::parse_positive_field(
                &self.fees_amount,
                "Fees amount",
            )?)
        };
        Ok(NewChalan {
            owner_name,
            owner_cnic,
            owner_phone: optional(&self.owner_phone),
            car_number,
            permit: self.permit,
            vehicle_type,
            violation_description,
            fees_amount,
            issue_location: optional(&self.issue_location),
            remarks: optional(&self.remarks),
            auto_calculate_fee: self.auto_calculate_fee,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Fields editable on the detail screen
///
/// Fees and status are changed only through their dedicated actions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChalanEdit {
    pub id: DbId,
    pub owner_name: String,
    pub owner_phone: String,
    pub violation_description: String,
    pub issue_location: String,
    pub remarks: String,
}

impl From<&Chalan> for ChalanEdit {
    fn from(value: &Chalan) -> Self {
        Self {
            id: value.id,
            owner_name: value.owner_name.clone(),
            owner_phone: value.owner_phone.clone().unwrap_or_default(),
            violation_description: value.violation_description.clone(),
            issue_location: value.issue_location.clone().unwrap_or_default(),
            remarks: value.remarks.clone().unwrap_or_default(),
        }
    }
}

/// Partial update sent to the backend
///
/// `Some` are the ones changed
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct ChalanDiff {
    #[serde(skip)]
    pub id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

fn changed(from: &str, to: &str) -> Option<String> {
    if from == to {
        None
    } else {
        Some(to.to_string())
    }
}

impl ChalanDiff {
    /// Returns an error if the ids do not match
    ///
    /// Returns None if there are no differences otherwise sets the changed
    /// fields to `Some`
    pub fn from_diff(from: &ChalanEdit, to: &ChalanEdit) -> anyhow::Result<Option<Self>> {
        if from.id != to.id {
            bail!("chalan ids do not match");
        }
        let result = Self {
            id: from.id,
            owner_name: changed(&from.owner_name, &to.owner_name),
            owner_phone: changed(&from.owner_phone, &to.owner_phone),
            violation_description: changed(
                &from.violation_description,
                &to.violation_description,
            ),
            issue_location: changed(&from.issue_location, &to.issue_location),
            remarks: changed(&from.remarks, &to.remarks),
        };
        Ok(if result.is_empty() { None } else { Some(result) })
    }

    pub fn is_empty(&self) -> bool {
        self.owner_name.is_none()
            && self.owner_phone.is_none()
            && self.violation_description.is_none()
            && self.issue_location.is_none()
            && self.remarks.is_none()
    }

    /// Changed fields may not clear values the backend requires
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self
            .owner_name
            .as_deref()
            .is_some_and(|x| x.trim().is_empty())
        {
            return Err(ValidationError::Required("Owner name"));
        }
        if self
            .violation_description
            .as_deref()
            .is_some_and(|x| x.trim().is_empty())
        {
            return Err(ValidationError::Required("Violation description"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn complete_draft() -> ChalanDraft {
        ChalanDraft {
            owner_name: "Ahmed Raza".into(),
            owner_cnic: "35202-1234567-1".into(),
            car_number: "LEA-1234".into(),
            vehicle_type: Some(3.into()),
            violation_description: "Overloading".into(),
            ..ChalanDraft::new()
        }
    }

    #[rstest]
    #[case::owner_name(|d: &mut ChalanDraft| d.owner_name.clear(), "Owner name is required")]
    #[case::owner_cnic(|d: &mut ChalanDraft| d.owner_cnic = "  ".into(), "Owner CNIC is required")]
    #[case::car_number(|d: &mut ChalanDraft| d.car_number.clear(), "Car number is required")]
    #[case::vehicle_type(|d: &mut ChalanDraft| d.vehicle_type = None, "Vehicle type is required")]
    #[case::violation(|d: &mut ChalanDraft| d.violation_description.clear(), "Violation description is required")]
    #[case::fee_when_manual(|d: &mut ChalanDraft| d.auto_calculate_fee = false, "Fees amount is required")]
    #[case::fee_not_number(|d: &mut ChalanDraft| d.fees_amount = "lots".into(), "Fees amount must be a number")]
    fn draft_validation_errors(#[case] change: fn(&mut ChalanDraft), #[case] expected: &str) {
        // Arrange
        let mut draft = complete_draft();
        change(&mut draft);

        // Act
        let actual = draft.validate().unwrap_err();

        // Assert
        assert_eq!(actual.to_string(), expected);
    }

    #[test]
    fn first_missing_field_reported() {
        let draft = ChalanDraft::new();
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::Required("Owner name")
        );
    }

    #[test]
    fn auto_calculated_fee_left_out_of_body() {
        // Arrange
        let draft = complete_draft();

        // Act
        let body = serde_json::to_value(draft.validate().unwrap()).unwrap();

        // Assert
        assert_eq!(
            body,
            serde_json::json!({
                "owner_name": "Ahmed Raza",
                "owner_cnic": "35202-1234567-1",
                "car_number": "LEA-1234",
                "vehicle_type": 3,
                "violation_description": "Overloading",
                "auto_calculate_fee": true
            })
        );
    }

    #[test]
    fn manual_fee_included() {
        let draft = ChalanDraft {
            auto_calculate_fee: false,
            fees_amount: "1500".into(),
            ..complete_draft()
        };
        let body = serde_json::to_value(draft.validate().unwrap()).unwrap();
        assert_eq!(body["fees_amount"], serde_json::json!("1500.00"));
        assert_eq!(body["auto_calculate_fee"], serde_json::json!(false));
    }

    fn edit() -> ChalanEdit {
        ChalanEdit {
            id: 5.into(),
            owner_name: "Ahmed".into(),
            owner_phone: "0300".into(),
            violation_description: "Speeding".into(),
            issue_location: String::new(),
            remarks: String::new(),
        }
    }

    #[test]
    fn no_changes_gives_no_diff() {
        assert_eq!(ChalanDiff::from_diff(&edit(), &edit()).unwrap(), None);
    }

    #[test]
    fn diff_contains_only_changed_fields() {
        // Arrange
        let mut to = edit();
        to.remarks = "Driver cooperative".into();
        to.owner_phone = "0311".into();

        // Act
        let diff = ChalanDiff::from_diff(&edit(), &to).unwrap().unwrap();

        // Assert
        assert_eq!(
            serde_json::to_value(&diff).unwrap(),
            serde_json::json!({"owner_phone": "0311", "remarks": "Driver cooperative"})
        );
    }

    #[test]
    fn diff_of_different_records_rejected() {
        let mut to = edit();
        to.id = 6.into();
        assert!(ChalanDiff::from_diff(&edit(), &to).is_err());
    }

    #[test]
    fn clearing_owner_name_rejected() {
        let mut to = edit();
        to.owner_name = " ".into();
        let diff = ChalanDiff::from_diff(&edit(), &to).unwrap().unwrap();
        assert_eq!(diff.validate(), Err(ValidationError::Required("Owner name")));
    }

    #[test]
    fn detail_deserializes_backend_shape() {
        // Arrange
        let json = r#"{
            "id": 12,
            "chalan_number": "CHL-20240115103000-12345",
            "owner_name": "Ahmed Raza",
            "owner_cnic": "35202-1234567-1",
            "owner_phone": null,
            "car_number": "LEA-1234",
            "permit": null,
            "permit_details": null,
            "vehicle_type": 3,
            "vehicle_type_name": "Truck",
            "violation_description": "Overloading",
            "fees_amount": "1500.00",
            "paid_amount": "0.00",
            "remaining_amount": "1500.00",
            "is_paid": false,
            "status": "issued",
            "issued_date": "2024-01-15T10:30:00.123456Z",
            "payment_date": null,
            "history": [{
                "id": 1, "chalan": 12, "action": "created", "performed_by": 2,
                "timestamp": "2024-01-15T10:30:00+05:00", "changes": {}, "notes": ""
            }]
        }"#;

        // Act
        let chalan: Chalan = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(chalan.status, ChalanStatus::Issued);
        assert_eq!(chalan.remaining_amount, Amount::from(1500.0));
        assert_eq!(chalan.history.len(), 1);
        assert_eq!(chalan.history[0].performed_by, Some(2.into()));
    }

    #[test]
    fn statistics_lookup_by_status() {
        let stats: ChalanStatistics = serde_json::from_str(
            r#"{"total_chalans": 4, "by_status": {"paid": 3, "issued": 1},
                "total_fees_amount": "6000", "total_paid_amount": "4500",
                "pending_collection": "1500"}"#,
        )
        .unwrap();
        assert_eq!(stats.count_for(ChalanStatus::Paid), 3);
        assert_eq!(stats.count_for(ChalanStatus::Disputed), 0);
        assert_eq!(stats.pending_collection.to_string(), "1500.00");
    }
}
