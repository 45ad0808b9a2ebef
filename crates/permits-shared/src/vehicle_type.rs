use crate::{errors::ValidationError, id::DbId, list::Lookup};

pub const VEHICLE_TYPE_DEFAULT_DURATION_DAYS: u32 = 365;
pub const VEHICLE_TYPE_MAX_DURATION_DAYS: u32 = 10950;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct VehicleType {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub permit_duration_days: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Lookup for VehicleType {
    fn lookup_id(&self) -> DbId {
        self.id
    }

    fn lookup_label(&self) -> &str {
        &self.name
    }
}

/// Fields sent in full to both create and update a vehicle type
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct VehicleTypeArgs {
    pub name: String,
    pub icon: String,
    pub permit_duration_days: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleTypeForm {
    pub name: String,
    pub icon: String,
    pub permit_duration_days: String,
    pub description: String,
}

impl Default for VehicleTypeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: String::new(),
            permit_duration_days: VEHICLE_TYPE_DEFAULT_DURATION_DAYS.to_string(),
            description: String::new(),
        }
    }
}

impl From<&VehicleType> for VehicleTypeForm {
    fn from(value: &VehicleType) -> Self {
        Self {
            name: value.name.clone(),
            icon: value.icon.clone(),
            permit_duration_days: value
                .permit_duration_days
                .unwrap_or(VEHICLE_TYPE_DEFAULT_DURATION_DAYS)
                .to_string(),
            description: value.description.clone(),
        }
    }
}

impl VehicleTypeForm {
    pub fn validate(&self) -> Result<VehicleTypeArgs, ValidationError> {
        let name = required(&self.name, "Name")?;
        let icon = required(&self.icon, "Icon")?;
        let days = required(&self.permit_duration_days, "Permit duration")?;
        let permit_duration_days: u32 = days
            .parse()
            .map_err(|_| ValidationError::NotANumber("Permit duration"))?;
        if !(1..=VEHICLE_TYPE_MAX_DURATION_DAYS).contains(&permit_duration_days) {
            return Err(ValidationError::OutOfRange {
                field: "Permit duration",
                min: 1,
                max: VEHICLE_TYPE_MAX_DURATION_DAYS,
            });
        }
        Ok(VehicleTypeArgs {
            name,
            icon,
            permit_duration_days,
            description: self.description.trim().to_string(),
        })
    }
}

pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}
