use crate::{amount::Amount, errors::ValidationError, id::DbId};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct FeeStructure {
    pub id: DbId,
    pub vehicle_type: DbId,
    #[serde(default)]
    pub vehicle_type_name: String,
    pub base_fee: Amount,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Validated fields sent to create or update a fee structure
#[derive(Debug, serde::Serialize, Clone, PartialEq)]
pub struct FeeStructureArgs {
    pub vehicle_type: DbId,
    pub base_fee: Amount,
    pub description: String,
    pub is_active: bool,
}

/// Form state for creating or editing a fee structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeStructureForm {
    pub vehicle_type: Option<DbId>,
    pub base_fee: String,
    pub description: String,
    pub is_active: bool,
}

impl Default for FeeStructureForm {
    fn default() -> Self {
        Self {
            vehicle_type: None,
            base_fee: String::new(),
            description: String::new(),
            is_active: true,
        }
    }
}

impl From<&FeeStructure> for FeeStructureForm {
    fn from(value: &FeeStructure) -> Self {
        Self {
            vehicle_type: Some(value.vehicle_type),
            base_fee: value.base_fee.to_string(),
            description: value.description.clone(),
            is_active: value.is_active,
        }
    }
}

impl FeeStructureForm {
    pub fn validate(&self) -> Result<FeeStructureArgs, ValidationError> {
        let vehicle_type = self
            .vehicle_type
            .ok_or(ValidationError::Required("Vehicle type"))?;
        let base_fee = Amount::parse_positive_field(&self.base_fee, "Base fee")?;
        Ok(FeeStructureArgs {
            vehicle_type,
            base_fee,
            description: self.description.trim().to_string(),
            is_active: self.is_active,
        })
    }
}

/// Query for `/vehicle-fee-structures/by_vehicle/`
#[derive(Debug, serde::Serialize, Clone, Copy)]
pub struct ByVehicleQuery {
    pub vehicle_type_id: DbId,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn form(vehicle_type: Option<u64>, base_fee: &str) -> FeeStructureForm {
        FeeStructureForm {
            vehicle_type: vehicle_type.map(Into::into),
            base_fee: base_fee.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case::no_vehicle(form(None, "100"), ValidationError::Required("Vehicle type"))]
    #[case::no_fee(form(Some(1), ""), ValidationError::Required("Base fee"))]
    #[case::zero_fee(form(Some(1), "0"), ValidationError::NotPositive("Base fee"))]
    #[case::bad_fee(form(Some(1), "ten"), ValidationError::NotANumber("Base fee"))]
    fn invalid_forms(#[case] form: FeeStructureForm, #[case] expected: ValidationError) {
        assert_eq!(form.validate().unwrap_err(), expected);
    }

    #[test]
    fn valid_form() {
        // Arrange
        let form = form(Some(2), "750.5");

        // Act
        let actual = form.validate().unwrap();

        // Assert
        assert_eq!(actual.vehicle_type, 2.into());
        assert_eq!(
            serde_json::to_value(&actual).unwrap()["base_fee"],
            serde_json::json!("750.50")
        );
    }
}
