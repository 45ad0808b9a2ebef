//! This module stores the expected format of the arguments for the requests
//! The structure of the module is supposed to match the path of the endpoints.
//! For example `/auth/change-password/` would map to
//! [`api::ChangePasswordReqArgs`]. Structs holding secrets are not
//! serializable, the client builds the body from them explicitly

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

use crate::{const_config::validation::MIN_PASSWORD_LENGTH, errors::ValidationError};

pub mod api;

#[derive(Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[derive(Clone)]
pub struct RegisterReqArgs {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirmation: SecretString,
    pub first_name: String,
    pub last_name: String,
}

impl Default for RegisterReqArgs {
    fn default() -> Self {
        Self {
            username: Default::default(),
            email: Default::default(),
            password: SecretString::from(""),
            password_confirmation: SecretString::from(""),
            first_name: Default::default(),
            last_name: Default::default(),
        }
    }
}

impl RegisterReqArgs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.expose_secret().is_empty()
            || self.password_confirmation.expose_secret().is_empty()
        {
            return Err(ValidationError::IncompleteForm);
        }
        validate_new_password(&self.password, &self.password_confirmation)
    }
}

impl Debug for RegisterReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReqArgs")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Shared by registration, password change and user creation
pub fn validate_new_password(
    password: &SecretString,
    confirmation: &SecretString,
) -> Result<(), ValidationError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password.expose_secret() != confirmation.expose_secret() {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn register_args(username: &str, password: &str, confirmation: &str) -> RegisterReqArgs {
        RegisterReqArgs {
            username: username.into(),
            email: "new@example.com".into(),
            password: password.into(),
            password_confirmation: confirmation.into(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case::missing_username(register_args("", "password1", "password1"), Err(ValidationError::IncompleteForm))]
    #[case::missing_confirmation(register_args("amir", "password1", ""), Err(ValidationError::IncompleteForm))]
    #[case::short(register_args("amir", "short", "short"), Err(ValidationError::PasswordTooShort { min: 8 }))]
    #[case::mismatch(register_args("amir", "password1", "password2"), Err(ValidationError::PasswordMismatch))]
    #[case::ok(register_args("amir", "password1", "password1"), Ok(()))]
    fn register_validation(
        #[case] args: RegisterReqArgs,
        #[case] expected: Result<(), ValidationError>,
    ) {
        assert_eq!(args.validate(), expected);
    }

    #[test]
    fn debug_does_not_leak_password() {
        let args = LoginReqArgs::new("amir", "hunter2-secret".into());
        let actual = format!("{args:?}");
        assert!(!actual.contains("hunter2-secret"), "{actual}");
        assert!(actual.contains("has_password: true"), "{actual}");
    }
}
