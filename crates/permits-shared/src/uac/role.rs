use std::fmt::Display;

use crate::{errors::ConversionError, id::DbId, list::Lookup};

use super::FeatureGrant;

/// Role whose members are treated as administrators by the client
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Role names are stored lowercase with underscores instead of spaces
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct RoleName(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: DbId,
    pub name: RoleName,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<FeatureGrant>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub user_count: Option<u32>,
}

/// Fields sent to create a role
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: RoleName,
    pub description: String,
}

fn default_true() -> bool {
    true
}

impl RoleName {
    pub const MAX_LENGTH: usize = 50;

    pub fn is_admin(&self) -> bool {
        self.0.eq_ignore_ascii_case(ADMIN_ROLE_NAME)
    }

    /// Role names compare without regard to case or surrounding whitespace
    pub fn matches(&self, other: &str) -> bool {
        let own = self.0.trim();
        !own.is_empty() && own.eq_ignore_ascii_case(other.trim())
    }
}

impl TryFrom<&str> for RoleName {
    type Error = ConversionError;

    /// Normalizes the name the way the backend expects it
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase().replace(' ', "_");
        if normalized.is_empty() {
            return Err(ConversionError::Empty);
        }
        if normalized.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: normalized.len(),
            });
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Role {
    pub fn has_feature_id(&self, feature_id: DbId) -> bool {
        self.features.iter().any(|x| x.id == Some(feature_id))
    }

    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            self.name.as_ref()
        } else {
            &self.display_name
        }
    }
}

impl Lookup for Role {
    fn lookup_id(&self) -> DbId {
        self.id
    }

    fn lookup_label(&self) -> &str {
        self.label()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::lowercased("Inspector", "inspector")]
    #[case::spaces("Fee Collector", "fee_collector")]
    #[case::trimmed("  data entry ", "data_entry")]
    fn role_name_normalized(#[case] input: &str, #[case] expected: &str) {
        let actual = RoleName::try_from(input).unwrap();
        assert_eq!(actual.as_ref(), expected);
    }

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::whitespace("   ", ConversionError::Empty)]
    #[case::too_long("a".repeat(51), ConversionError::MaxExceeded{max: 50, actual: 51})]
    fn illegal_role_name(#[case] input: String, #[case] expected: ConversionError) {
        let actual = RoleName::try_from(input.as_str());
        assert_eq!(actual.unwrap_err(), expected);
    }

    #[test]
    fn role_with_minimal_fields_deserializes() {
        let role: Role = serde_json::from_str(r#"{"id": 3, "name": "admin"}"#).unwrap();
        assert!(role.name.is_admin());
        assert!(role.is_active);
        assert_eq!(role.label(), "admin");
    }
}
