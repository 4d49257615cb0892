//! Settings for the front-end. Read from an optional `settings.toml`, then
//! `DOMPET_*` environment variables, then command-line flags.
//!
//! Nested keys use `__` in the environment, e.g. `DOMPET_API__BASE_URL`.

use axum_extra::extract::cookie::Key;
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("session.key must be at least 64 bytes long")]
    SessionKey,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Api {
    pub base_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Master key for the cookie jar. Without it every restart signs
    /// everybody out.
    pub key: Option<String>,
}

impl Session {
    pub fn cookie_key(&self) -> Result<Key, SettingsError> {
        match &self.key {
            Some(key) => Key::try_from(key.as_bytes()).map_err(|_| SettingsError::SessionKey),
            None => {
                tracing::warn!("session.key not set, using a random key for this process");
                Ok(Key::generate())
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub api: Api,
    pub session: Session,
}

#[derive(Debug, Parser)]
#[command(name = "dompet", about = "Web front-end for the finance API")]
struct Args {
    /// Settings file (TOML), without extension.
    #[arg(long)]
    config: Option<String>,
    /// Address to listen on.
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Base URL of the finance API, e.g. http://localhost:8080/api.
    #[arg(long)]
    api_url: Option<String>,
    /// Log level for the front-end crates.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, SettingsError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("DOMPET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply(args);
        Ok(settings)
    }

    fn apply(&mut self, args: Args) {
        if let Some(bind) = args.bind {
            self.server.bind = bind;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(api_url) = args.api_url {
            self.api.base_url = api_url;
        }
        if let Some(level) = args.level {
            self.app.level = level;
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.listen_addr(), "127.0.0.1:5000");
        assert_eq!(settings.api.base_url, "http://localhost:8080/api");
        assert!(settings.session.key.is_none());
    }

    #[test]
    fn file_values_and_flags() {
        let mut settings = parse(
            r#"
            [server]
            port = 8000

            [api]
            base_url = "http://finance:8080/api"
            "#,
        );
        assert_eq!(settings.listen_addr(), "127.0.0.1:8000");
        assert_eq!(settings.api.base_url, "http://finance:8080/api");

        let args = Args::parse_from(["dompet", "--bind", "0.0.0.0", "--level", "debug"]);
        settings.apply(args);
        assert_eq!(settings.listen_addr(), "0.0.0.0:8000");
        assert_eq!(settings.app.level, "debug");
    }

    #[test]
    fn short_session_key_is_rejected() {
        let session = Session {
            key: Some("too short".to_string()),
        };
        assert!(matches!(
            session.cookie_key(),
            Err(SettingsError::SessionKey)
        ));

        let session = Session {
            key: Some("k".repeat(64)),
        };
        assert!(session.cookie_key().is_ok());
        assert!(Session::default().cookie_key().is_ok());
    }
}
