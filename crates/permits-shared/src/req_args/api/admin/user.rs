use secrecy::{ExposeSecret, SecretString};

use crate::{
    const_config::validation::MIN_PASSWORD_LENGTH, errors::ValidationError, id::DbId,
};

/// Fields for `/users/create-user/`
#[derive(Clone)]
pub struct NewUserReqArgs {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Option<DbId>,
}

impl Default for NewUserReqArgs {
    fn default() -> Self {
        Self {
            username: Default::default(),
            email: Default::default(),
            password: SecretString::from(""),
            first_name: Default::default(),
            last_name: Default::default(),
            role_id: Default::default(),
        }
    }
}

impl NewUserReqArgs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::Required("Username"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::Required("Email"));
        }
        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for NewUserReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUserReqArgs")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Body of `/users/{id}/assign_role/`
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AssignRoleReqArgs {
    pub role_id: DbId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_requires_long_password() {
        let args = NewUserReqArgs {
            username: "clerk1".into(),
            email: "clerk1@example.com".into(),
            password: "1234".into(),
            ..Default::default()
        };
        assert_eq!(
            args.validate(),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
    }
}
