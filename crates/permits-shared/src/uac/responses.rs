use secrecy::SecretString;

use super::User;

#[derive(Debug, serde::Deserialize, Clone)]
pub struct LoginResponse {
    pub user: User,
    pub token: SecretString,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct RegisterResponse {
    pub user: User,
    pub token: SecretString,
}

/// Body of `/auth/user/`
#[derive(Debug, serde::Deserialize, serde::Serialize, Clone)]
pub struct CurrentUserResponse {
    pub user: User,
}
