// secrets
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use url::Url;

pub static SECRET_MANAGER: Lazy<SecretManager> = Lazy::new(SecretManager::new);

const KEYS: [&str; 9] = [
    "PORT",
    "DB_DRIVER",
    "DB_SERVICE",
    "DB_USERNAME",
    "DB_PASSWORD",
    "DB_NAME",
    "DB_MAX_CONNECTIONS",
    "SEED_FILE",
    "MODE",
];

#[derive(Debug, PartialEq)]
enum Mode {
    Dev,
    Prod,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0}: set it in the environment")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

pub struct SecretManager {
    secrets: HashMap<String, String>,
}

impl SecretManager {
    fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from `lookup`, filling development defaults unless
    /// `MODE=prod`. A key that is present but empty stays empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("MODE") {
            Some(mode) if mode.to_lowercase() == "prod" => Mode::Prod,
            _ => Mode::Dev,
        };

        let mut secrets: HashMap<String, String> = HashMap::new();
        for key in KEYS {
            if let Some(value) = lookup(key) {
                secrets.insert(key.to_string(), value);
            }
        }

        let mut defaults = vec![
            ("DB_DRIVER", "postgres"),
            ("DB_NAME", "songs"),
            ("DB_MAX_CONNECTIONS", "5"),
        ];
        if mode == Mode::Dev {
            defaults.push(("PORT", "8000"));
            defaults.push(("SEED_FILE", "data/songs.json"));
        }
        for (key, value) in defaults {
            secrets
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }

        // Log which secrets are configured (NOT their values!)
        let mut configured: Vec<&str> = secrets
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        configured.sort_unstable();
        info!("Secrets configured ({:?} mode): {:?}", mode, configured);

        SecretManager { secrets }
    }

    pub fn get(&self, key: &str) -> String {
        self.secrets.get(key).cloned().unwrap_or_default()
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        match self.secrets.get(key) {
            Some(value) if !value.is_empty() => Ok(value.clone()),
            _ => Err(ConfigError::Missing(key)),
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let value = self.require(key)?;
        value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value })
    }

    pub fn port(&self) -> Result<u16, ConfigError> {
        self.parsed("PORT")
    }

    pub fn max_connections(&self) -> Result<u32, ConfigError> {
        self.parsed("DB_MAX_CONNECTIONS")
    }

    pub fn seed_file(&self) -> Option<PathBuf> {
        self.secrets
            .get("SEED_FILE")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// `driver://[user:password@]service/name`. Credentials are only used
    /// when both are set, and are percent-encoded.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        let service = self.require("DB_SERVICE")?;
        let driver = self.require("DB_DRIVER")?;
        let name = self.get("DB_NAME");

        let raw = format!("{}://{}/{}", driver, service, name);
        let invalid = || ConfigError::Invalid {
            key: "DB_SERVICE",
            value: service.clone(),
        };
        let mut url = Url::parse(&raw).map_err(|_| invalid())?;

        let username = self.get("DB_USERNAME");
        let password = self.get("DB_PASSWORD");
        if !username.is_empty() && !password.is_empty() {
            url.set_username(&username).map_err(|_| invalid())?;
            url.set_password(Some(&password)).map_err(|_| invalid())?;
        }

        Ok(url.to_string())
    }
}
