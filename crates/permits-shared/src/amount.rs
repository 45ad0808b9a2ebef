use std::{fmt::Display, str::FromStr};

use serde_aux::field_attributes::deserialize_number_from_string;

use crate::errors::ValidationError;

/// A monetary value
///
/// The backend sends decimals as strings (`"1500.00"`) but numbers are also
/// accepted. Always sent back as a string with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Parses user input for the field named `field`
    pub fn parse_field(input: &str, field: &'static str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required(field));
        }
        trimmed
            .parse()
            .map_err(|_| ValidationError::NotANumber(field))
    }

    /// Same as [`Self::parse_field`] but also rejects zero and negatives
    pub fn parse_positive_field(input: &str, field: &'static str) -> Result<Self, ValidationError> {
        let result = Self::parse_field(input, field)?;
        if result.is_positive() {
            Ok(result)
        } else {
            Err(ValidationError::NotPositive(field))
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse()?;
        if !value.is_finite() {
            anyhow::bail!("amount must be a finite number but got {s:?}");
        }
        Ok(Self(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_number_from_string::<f64, D>(deserializer).map(Self)
    }
}
