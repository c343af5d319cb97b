// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{path::Path, time::Duration};

use config::{Config, Environment, File};
use duration_string::DurationString;
use serde::Deserialize;

use crate::lamp::Account;

mod error;

pub use error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.particle.io";

/// Environment variables starting with this prefix override the config file.
const ENV_PREFIX: &str = "LAMP";

/// The settings needed to reach the lamp.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    /// The Particle access token.
    access_token: Option<String>,
    /// The name (or id) of the lamp to control.
    device: Option<String>,
    /// The base URL of the cloud API.
    api_url: Option<String>,
    /// How long to wait for a single cloud request, e.g. "10s".
    timeout: Option<String>,
    /// How long to pause between the colours of a sequence, e.g. "250ms".
    delay: Option<String>,
}

impl Settings {
    /// Loads settings from the optional YAML file, then the environment. Environment values
    /// win over file values.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder().set_default("api_url", DEFAULT_API_URL)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        Ok(builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// Overrides settings with the values given on the command line.
    pub fn with_overrides(
        mut self,
        access_token: Option<String>,
        device: Option<String>,
        timeout: Option<String>,
        delay: Option<String>,
    ) -> Settings {
        self.access_token = access_token.or(self.access_token);
        self.device = device.or(self.device);
        self.timeout = timeout.or(self.timeout);
        self.delay = delay.or(self.delay);
        self
    }

    pub fn device(&self) -> Result<&str, ConfigError> {
        self.device
            .as_deref()
            .filter(|device| !device.is_empty())
            .ok_or(ConfigError::MissingDevice)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Returns the cloud request timeout, if one is set.
    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        parse_duration(self.timeout.as_ref())
    }

    /// Returns the pause between sequence colours (default: none).
    pub fn delay(&self) -> Result<Duration, ConfigError> {
        Ok(parse_duration(self.delay.as_ref())?.unwrap_or(Duration::ZERO))
    }

    /// Returns the cloud account described by these settings.
    pub fn account(&self) -> Result<Account, ConfigError> {
        let access_token = self
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingAccessToken)?;

        Ok(Account::new(self.api_url(), access_token, self.timeout()?))
    }
}

fn parse_duration(value: Option<&String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        Some(value) => Ok(Some(DurationString::from_string(value.clone())?.into())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    const ENV_VARS: [&str; 5] = [
        "LAMP_ACCESS_TOKEN",
        "LAMP_DEVICE",
        "LAMP_API_URL",
        "LAMP_TIMEOUT",
        "LAMP_DELAY",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_config(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        file.write_all(yaml.as_bytes()).expect("write config");
        file
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let settings = Settings::load(None).unwrap();
        assert_eq!(DEFAULT_API_URL, settings.api_url());
        assert!(matches!(settings.device(), Err(ConfigError::MissingDevice)));
        assert!(matches!(
            settings.account(),
            Err(ConfigError::MissingAccessToken)
        ));
        assert_eq!(None, settings.timeout().unwrap());
        assert_eq!(Duration::ZERO, settings.delay().unwrap());
    }

    #[test]
    #[serial]
    fn test_file() {
        clear_env();
        let file = write_config(
            r#"
            access_token: file-token
            device: attic
            api_url: http://localhost:8080/
            timeout: 5s
            delay: 250ms
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!("attic", settings.device().unwrap());
        assert_eq!("http://localhost:8080/", settings.api_url());
        assert_eq!(Some(Duration::from_secs(5)), settings.timeout().unwrap());
        assert_eq!(Duration::from_millis(250), settings.delay().unwrap());
        assert!(settings.account().is_ok());
    }

    #[test]
    #[serial]
    fn test_precedence() {
        clear_env();
        let file = write_config(
            r#"
            access_token: file-token
            device: file-device
            delay: 1s
            "#,
        );
        std::env::set_var("LAMP_DEVICE", "env-device");
        std::env::set_var("LAMP_DELAY", "2s");

        let settings = Settings::load(Some(file.path())).unwrap();
        clear_env();

        assert_eq!("env-device", settings.device().unwrap());
        assert_eq!(Duration::from_secs(2), settings.delay().unwrap());

        let settings =
            settings.with_overrides(None, Some("cli-device".to_string()), None, None);
        assert_eq!("cli-device", settings.device().unwrap());
        assert_eq!(Duration::from_secs(2), settings.delay().unwrap());
        assert_eq!(
            Some("file-token".to_string()),
            settings.access_token.clone()
        );
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        clear_env();
        assert!(matches!(
            Settings::load(Some(Path::new("/nonexistent/lampdemo.yaml"))),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_bad_duration() {
        let settings = Settings::default().with_overrides(
            None,
            None,
            Some("soon".to_string()),
            Some("forever".to_string()),
        );
        assert!(matches!(settings.timeout(), Err(ConfigError::Duration(_))));
        assert!(matches!(settings.delay(), Err(ConfigError::Duration(_))));
    }

    #[test]
    fn test_empty_values_are_missing() {
        let settings = Settings::default().with_overrides(
            Some(String::new()),
            Some(String::new()),
            None,
            None,
        );
        assert!(matches!(settings.device(), Err(ConfigError::MissingDevice)));
        assert!(matches!(
            settings.account(),
            Err(ConfigError::MissingAccessToken)
        ));
    }
}
