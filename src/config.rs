use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::session::MAX_TIMEOUT_HOURS;

pub const DEFAULT_CONFIG_FILE: &str = "regdesk.toml";

const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 4004

[admin]
credentials_file = "regdesk_admins.dat"
username = "admin"
password = "admin123"
display_name = "System Administrator"

[session]
require_session = false
timeout_hours = 24

[activity]
max_entries = 1000
"#;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub tls: Option<TlsConfig>,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Extra files served when no API route or embedded page matches
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TlsConfig {
    pub port: u16,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub chain_file: Option<PathBuf>,
}

/// Credential table location plus the admin seeded into it on first start
#[derive(Deserialize, Clone, Debug)]
pub struct AdminConfig {
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default = "default_admin_password")]
    pub password: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            username: default_admin_username(),
            password: default_admin_password(),
            display_name: default_display_name(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionConfig {
    /// Reject API calls that carry no valid session cookie
    #[serde(default)]
    pub require_session: bool,
    #[serde(default = "default_timeout_hours")]
    pub timeout_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_session: false,
            timeout_hours: default_timeout_hours(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ActivityConfig {
    /// 0 keeps every entry for the process lifetime
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4004
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("regdesk_admins.dat")
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_display_name() -> String {
    "System Administrator".to_string()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_timeout_hours() -> i64 {
    24
}

fn default_max_entries() -> usize {
    1000
}

impl Config {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("invalid configuration")?;

        let hours = config.session.timeout_hours;
        anyhow::ensure!(
            (1..=MAX_TIMEOUT_HOURS).contains(&hours),
            "session.timeout_hours must be between 1 and {MAX_TIMEOUT_HOURS}, got {hours}"
        );

        Ok(config)
    }

    /// Read the config file, writing the default one first if it does not exist.
    pub async fn load_or_create(path: &Path) -> anyhow::Result<Self> {
        let config_str = match fs::read_to_string(path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "configuration file not found, creating default");
                fs::write(path, DEFAULT_CONFIG)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                DEFAULT_CONFIG.to_string()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        Self::parse(&config_str).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_matches_default_struct() {
        let parsed = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed.server.port, 4004);
        assert_eq!(parsed.admin.username, "admin");
        assert_eq!(parsed.admin.display_name, "System Administrator");
        assert_eq!(parsed.admin.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(!parsed.session.require_session);
        assert_eq!(parsed.activity.max_entries, 1000);
        assert!(parsed.tls.is_none());
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let parsed = Config::parse("").unwrap();
        assert_eq!(parsed.listen_addr(), "0.0.0.0:4004");
        assert_eq!(parsed.session.timeout_hours, 24);
    }

    #[test]
    fn session_timeout_out_of_range_is_a_config_error() {
        for hours in ["0", "-1", "8785", "9223372036854775807"] {
            let err = Config::parse(&format!("[session]\ntimeout_hours = {hours}\n")).unwrap_err();
            assert!(err.to_string().contains("timeout_hours"), "{hours}: {err}");
        }
        let parsed = Config::parse("[session]\ntimeout_hours = 8784\n").unwrap();
        assert_eq!(parsed.session.timeout_hours, 8784);
    }

    #[test]
    fn tls_section_is_optional_but_complete() {
        let parsed = Config::parse(
            r#"
[tls]
port = 4443
cert_file = "cert.pem"
key_file = "key.pem"
"#,
        )
        .unwrap();
        let tls = parsed.tls.unwrap();
        assert_eq!(tls.port, 4443);
        assert!(tls.chain_file.is_none());

        assert!(Config::parse("[tls]\nport = 4443\n").is_err());
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regdesk.toml");
        let config = Config::load_or_create(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.admin.password, "admin123");
    }
}
