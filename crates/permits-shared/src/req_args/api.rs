use secrecy::{ExposeSecret, SecretString};

use crate::errors::ValidationError;

use super::validate_new_password;

pub mod admin;
pub mod chalans;

#[derive(Clone)]
pub struct ChangePasswordReqArgs {
    pub old_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

impl Default for ChangePasswordReqArgs {
    fn default() -> Self {
        Self {
            old_password: SecretString::from(""),
            new_password: SecretString::from(""),
            confirm_password: SecretString::from(""),
        }
    }
}

impl ChangePasswordReqArgs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.old_password.expose_secret().is_empty() {
            return Err(ValidationError::Required("Old password"));
        }
        if self.new_password.expose_secret().is_empty() {
            return Err(ValidationError::Required("New password"));
        }
        if self.confirm_password.expose_secret().is_empty() {
            return Err(ValidationError::Required("Password confirmation"));
        }
        validate_new_password(&self.new_password, &self.confirm_password)
    }
}

impl std::fmt::Debug for ChangePasswordReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordReqArgs").finish_non_exhaustive()
    }
}

/// Body of `/auth/update-profile/`
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq, Default)]
pub struct UpdateProfileReqArgs {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_password_checks_in_order() {
        // Arrange
        let mut args = ChangePasswordReqArgs::default();

        // Act / Assert
        assert_eq!(
            args.validate(),
            Err(ValidationError::Required("Old password"))
        );
        args.old_password = "old-password".into();
        args.new_password = "newpassword".into();
        assert_eq!(
            args.validate(),
            Err(ValidationError::Required("Password confirmation"))
        );
        args.confirm_password = "different1".into();
        assert_eq!(args.validate(), Err(ValidationError::PasswordMismatch));
        args.confirm_password = "newpassword".into();
        assert_eq!(args.validate(), Ok(()));
    }
}
