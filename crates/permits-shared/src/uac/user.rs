use std::fmt::Display;

use egui::WidgetText;

use crate::{errors::ConversionError, id::DbId};

use super::{Feature, FeatureGrant, Role};

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
/// Represents a username and is constrained to not be an empty string
pub struct Username(String);

impl TryFrom<String> for Username {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl Username {
    pub const MAX_LENGTH: usize = 150;
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Username> for WidgetText {
    fn from(value: &Username) -> Self {
        (&value.0).into()
    }
}

/// The authenticated identity as returned by the backend
///
/// Also used for rows on the user management screen
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: DbId,
    pub username: Username,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub features: Vec<FeatureGrant>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Members of the admin role and staff accounts are administrators
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.role.as_ref().is_some_and(|role| role.name.is_admin())
    }

    /// Only checks the features granted, administrators are not special cased
    /// here
    pub fn has_granted_feature(&self, feature: Feature) -> bool {
        self.features.iter().any(|grant| grant.is(feature))
    }

    pub fn is_employee(&self) -> bool {
        self.has_granted_feature(Feature::Employee)
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.name.matches(role_name))
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.name.as_ref())
    }

    /// Full name if available otherwise the username
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.username.to_string()
        } else {
            full_name.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_users {
    use super::*;
    use crate::uac::RoleName;

    pub fn user_with(role: Option<&str>, is_staff: bool, features: &[&str]) -> User {
        User {
            id: 1.into(),
            username: "tester".try_into().unwrap(),
            email: "tester@example.com".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            is_staff,
            is_active: true,
            role: role.map(|name| Role {
                id: 9.into(),
                name: RoleName::try_from(name).unwrap(),
                display_name: String::new(),
                description: String::new(),
                features: Vec::new(),
                is_active: true,
                user_count: None,
            }),
            features: features
                .iter()
                .map(|name| FeatureGrant {
                    id: None,
                    name: name.to_string(),
                    display_name: String::new(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::test_users::user_with;
    use super::*;

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::too_long("a".repeat(151), ConversionError::MaxExceeded{max:150, actual:151})]
    fn illegal_username(#[case] name: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<Username, ConversionError> = name.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[rstest]
    #[case::admin_role(Some("admin"), false, true)]
    #[case::staff_without_role(None, true, true)]
    #[case::other_role(Some("inspector"), false, false)]
    #[case::no_role(None, false, false)]
    fn admin_detection(
        #[case] role: Option<&str>,
        #[case] is_staff: bool,
        #[case] expected: bool,
    ) {
        let user = user_with(role, is_staff, &[]);
        assert_eq!(user.is_admin(), expected);
    }

    #[test]
    fn deserialize_backend_user() {
        // Arrange
        let json = r#"{
            "id": 4,
            "username": "officer1",
            "email": "o@example.com",
            "first_name": "Ali",
            "last_name": "Khan",
            "is_staff": false,
            "is_active": true,
            "role": {"id": 2, "name": "inspector", "display_name": "Inspector"},
            "features": [{"name": "Employee", "display_name": "Is Employee"}]
        }"#;

        // Act
        let user: User = serde_json::from_str(json).unwrap();

        // Assert
        assert!(user.is_employee());
        assert!(user.has_role("INSPECTOR"));
        assert_eq!(user.display_name(), "Ali Khan");
        assert!(!user.is_admin());
    }

    #[test]
    fn null_role_accepted() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "x", "role": null}"#).unwrap();
        assert_eq!(user.role_name(), None);
        assert_eq!(user.display_name(), "x");
    }
}
