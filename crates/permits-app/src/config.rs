//! Settings read at start up
//!
//! Natively these come from `configuration/base.toml`, then
//! `configuration/{APP_ENVIRONMENT}.toml` then environment variables prefixed
//! with `APP_` (for example `APP_API__BASE_URL`). Every file is optional. In
//! the browser only the built in defaults are used.

use permits_shared::const_config::client::{
    CLIENT_DEFAULT_API_BASE_URL, CLIENT_DEFAULT_API_KEY, CLIENT_DEFAULT_PAGE_SIZE,
};
use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub ui: UiSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: SecretString,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct UiSettings {
    /// Rows requested per page by list screens
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: CLIENT_DEFAULT_API_BASE_URL.to_string(),
                api_key: CLIENT_DEFAULT_API_KEY.into(),
            },
            ui: UiSettings {
                page_size: CLIENT_DEFAULT_PAGE_SIZE,
            },
        }
    }
}

impl Settings {
    /// A base URL given on the command line wins over every other source
    pub fn with_server_override(mut self, server: Option<&str>) -> Self {
        if let Some(server) = server.map(str::trim).filter(|x| !x.is_empty()) {
            self.api.base_url = server.to_string();
        }
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{get_configuration, load_from, Environment};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use anyhow::Context as _;

    use super::Settings;
    use crate::cli::Cli;

    #[tracing::instrument(skip(cli))]
    pub fn get_configuration(cli: &Cli) -> anyhow::Result<Settings> {
        let base_path = std::env::current_dir().context("failed to determine the current directory")?;
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let settings = load_from(&base_path.join("configuration"), &environment)?;
        Ok(settings.with_server_override(cli.server.as_deref()))
    }

    /// Builds the settings from the files in `configuration_directory` and
    /// the environment
    pub fn load_from(
        configuration_directory: &Path,
        environment: &Environment,
    ) -> anyhow::Result<Settings> {
        let defaults = Settings::default();
        let environment_filename = format!("{}.toml", environment.as_str());
        let settings = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default(
                "api.api_key",
                permits_shared::const_config::client::CLIENT_DEFAULT_API_KEY,
            )?
            .set_default("ui.page_size", i64::from(defaults.ui.page_size))?
            .add_source(
                config::File::from(configuration_directory.join("base.toml")).required(false),
            )
            .add_source(
                config::File::from(configuration_directory.join(environment_filename))
                    .required(false),
            )
            // E.g. `APP_UI__PAGE_SIZE=50` would set `Settings.ui.page_size`
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize::<Settings>()
            .context("failed to deserialize configuration")
    }

    /// The possible runtime environment for our application.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Environment {
        Local,
        Production,
    }

    impl Environment {
        pub fn as_str(&self) -> &'static str {
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        }
    }

    impl TryFrom<String> for Environment {
        type Error = String;

        fn try_from(s: String) -> Result<Self, Self::Error> {
            match s.to_lowercase().as_str() {
                "local" => Ok(Self::Local),
                "production" => Ok(Self::Production),
                other => Err(format!(
                    "{other} is not a supported environment. Use either `local` or `production`."
                )),
            }
        }
    }
}
