//! Transport authority permits

use anyhow::bail;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    errors::ValidationError,
    id::DbId,
    list::Lookup,
    vehicle_type::{required, VehicleType},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PermitStatus {
    Draft,
    Active,
    Inactive,
    Cancelled,
    Expired,
    #[default]
    Pending,
}

impl PermitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PermitStatus::Draft => "Draft",
            PermitStatus::Active => "Active",
            PermitStatus::Inactive => "Inactive",
            PermitStatus::Cancelled => "Cancelled",
            PermitStatus::Expired => "Expired",
            PermitStatus::Pending => "Pending",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Authority {
    #[default]
    #[serde(rename = "PTA")]
    #[strum(serialize = "PTA")]
    Pta,
    #[serde(rename = "RTA")]
    #[strum(serialize = "RTA")]
    Rta,
}

impl Authority {
    pub fn label(&self) -> &'static str {
        match self {
            Authority::Pta => "Provincial Transport Authority",
            Authority::Rta => "Regional Transport Authority",
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PermitType {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

/// Fields sent in full to both create and update a permit type
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct PermitTypeArgs {
    pub name: String,
    pub code: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PermitTypeForm {
    pub name: String,
    pub code: String,
    pub icon: String,
    pub description: String,
}

impl From<&PermitType> for PermitTypeForm {
    fn from(value: &PermitType) -> Self {
        Self {
            name: value.name.clone(),
            code: value.code.clone(),
            icon: value.icon.clone(),
            description: value.description.clone(),
        }
    }
}

impl PermitTypeForm {
    pub fn validate(&self) -> Result<PermitTypeArgs, ValidationError> {
        Ok(PermitTypeArgs {
            name: required(&self.name, "Name")?,
            code: required(&self.code, "Code")?,
            icon: self.icon.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

impl Lookup for PermitType {
    fn lookup_id(&self) -> DbId {
        self.id
    }

    fn lookup_label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PermitHistoryEntry {
    pub id: DbId,
    pub action: String,
    #[serde(default)]
    pub performed_by: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changes: serde_json::Value,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A permit as returned by both the list and detail endpoints
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Default)]
pub struct Permit {
    pub id: DbId,
    #[serde(default)]
    pub permit_number: Option<String>,
    #[serde(default)]
    pub authority: Authority,
    #[serde(default)]
    pub permit_type: Option<PermitType>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default)]
    pub vehicle_year: Option<i32>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_cnic: Option<String>,
    #[serde(default)]
    pub owner_phone: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub status: PermitStatus,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<DbId>,
    #[serde(default)]
    pub assigned_to_username: Option<String>,
    #[serde(default)]
    pub assigned_to_role: Option<String>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<PermitHistoryEntry>,
}

impl Permit {
    pub fn vehicle_type_name(&self) -> Option<&str> {
        self.vehicle_type.as_ref().map(|x| x.name.as_str())
    }

    pub fn permit_type_name(&self) -> Option<&str> {
        self.permit_type.as_ref().map(|x| x.name.as_str())
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields editable on the permit edit screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermitEdit {
    pub id: DbId,
    pub vehicle_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub owner_address: String,
    pub status: PermitStatus,
    pub valid_from: String,
    pub valid_to: String,
    pub description: String,
    pub remarks: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date_text(value: &Option<NaiveDate>) -> String {
    value
        .map(|x| x.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl From<&Permit> for PermitEdit {
    fn from(value: &Permit) -> Self {
        Self {
            id: value.id,
            vehicle_number: text(&value.vehicle_number),
            vehicle_make: text(&value.vehicle_make),
            vehicle_model: text(&value.vehicle_model),
            owner_name: text(&value.owner_name),
            owner_phone: text(&value.owner_phone),
            owner_email: text(&value.owner_email),
            owner_address: text(&value.owner_address),
            status: value.status,
            valid_from: date_text(&value.valid_from),
            valid_to: date_text(&value.valid_to),
            description: text(&value.description),
            remarks: text(&value.remarks),
        }
    }
}

/// Partial update for a permit, `Some` are the ones changed
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq, Default)]
pub struct PermitDiff {
    #[serde(skip)]
    pub id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PermitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

fn changed_text(from: &str, to: &str) -> Option<String> {
    (from != to).then(|| to.trim().to_string())
}

fn parse_date(value: &str, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(field))
}

impl PermitDiff {
    /// Returns an error if the ids do not match or a date is invalid
    ///
    /// Returns None if there are no differences
    pub fn from_diff(from: &PermitEdit, to: &PermitEdit) -> anyhow::Result<Option<Self>> {
        if from.id != to.id {
            bail!("permit ids do not match");
        }
        let valid_from = parse_date(&to.valid_from, "Valid from")?;
        let valid_to = parse_date(&to.valid_to, "Valid to")?;
        if let (Some(start), Some(end)) = (valid_from, valid_to) {
            if end < start {
                return Err(ValidationError::DateOrder.into());
            }
        }
        let result = Self {
            id: from.id,
            vehicle_number: changed_text(&from.vehicle_number, &to.vehicle_number),
            vehicle_make: changed_text(&from.vehicle_make, &to.vehicle_make),
            vehicle_model: changed_text(&from.vehicle_model, &to.vehicle_model),
            owner_name: changed_text(&from.owner_name, &to.owner_name),
            owner_phone: changed_text(&from.owner_phone, &to.owner_phone),
            owner_email: changed_text(&from.owner_email, &to.owner_email),
            owner_address: changed_text(&from.owner_address, &to.owner_address),
            status: (from.status != to.status).then_some(to.status),
            valid_from: if from.valid_from == to.valid_from {
                None
            } else {
                valid_from
            },
            valid_to: if from.valid_to == to.valid_to {
                None
            } else {
                valid_to
            },
            description: changed_text(&from.description, &to.description),
            remarks: changed_text(&from.remarks, &to.remarks),
        };
        Ok(if result.is_empty() { None } else { Some(result) })
    }

    pub fn is_empty(&self) -> bool {
        *self
            == Self {
                id: self.id,
                ..Default::default()
            }
    }
}

/// Form backing the new permit screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitDraft {
    pub authority: Authority,
    pub permit_type: Option<DbId>,
    pub vehicle_type: Option<DbId>,
    pub vehicle_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: String,
    pub owner_name: String,
    pub owner_cnic: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub owner_address: String,
    pub valid_from: String,
    pub valid_to: String,
    pub description: String,
    pub remarks: String,
}

impl PermitDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            authority: Authority::Rta,
            permit_type: None,
            vehicle_type: None,
            vehicle_number: String::new(),
            vehicle_make: String::new(),
            vehicle_model: String::new(),
            vehicle_year: today.format("%Y").to_string(),
            owner_name: String::new(),
            owner_cnic: String::new(),
            owner_phone: String::new(),
            owner_email: String::new(),
            owner_address: String::new(),
            valid_from: today.format(DATE_FORMAT).to_string(),
            valid_to: String::new(),
            description: String::new(),
            remarks: String::new(),
        }
    }

    /// Checks presence of the required fields and converts to the request body
    pub fn validate(&self) -> Result<NewPermit, ValidationError> {
        let (Some(permit_type), Some(vehicle_type)) = (self.permit_type, self.vehicle_type) else {
            return Err(ValidationError::IncompleteForm);
        };
        let required = [
            &self.vehicle_number,
            &self.vehicle_make,
            &self.vehicle_model,
            &self.vehicle_year,
            &self.owner_name,
            &self.owner_cnic,
            &self.owner_phone,
            &self.owner_address,
            &self.description,
        ];
        if required.iter().any(|x| x.trim().is_empty()) {
            return Err(ValidationError::IncompleteForm);
        }
        let vehicle_year = self
            .vehicle_year
            .trim()
            .parse()
            .map_err(|_| ValidationError::NotANumber("Vehicle year"))?;
        let valid_from = parse_date(&self.valid_from, "Valid from")?;
        let valid_to = parse_date(&self.valid_to, "Valid to")?;
        if let (Some(start), Some(end)) = (valid_from, valid_to) {
            if end < start {
                return Err(ValidationError::DateOrder);
            }
        }
        let optional = |x: &str| {
            let x = x.trim();
            (!x.is_empty()).then(|| x.to_string())
        };
        Ok(NewPermit {
            authority: self.authority,
            permit_type,
            vehicle_type,
            vehicle_number: self.vehicle_number.trim().to_string(),
            vehicle_make: self.vehicle_make.trim().to_string(),
            vehicle_model: self.vehicle_model.trim().to_string(),
            vehicle_year,
            owner_name: self.owner_name.trim().to_string(),
            owner_cnic: self.owner_cnic.trim().to_string(),
            owner_phone: self.owner_phone.trim().to_string(),
            owner_email: optional(&self.owner_email),
            owner_address: self.owner_address.trim().to_string(),
            valid_from,
            valid_to,
            description: self.description.trim().to_string(),
            remarks: optional(&self.remarks),
        })
    }
}

/// Body of `POST /permits/`
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct NewPermit {
    pub authority: Authority,
    pub permit_type: DbId,
    pub vehicle_type: DbId,
    pub vehicle_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub owner_name: String,
    pub owner_cnic: String,
    pub owner_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    pub owner_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
