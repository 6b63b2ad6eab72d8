// Process configuration, read once at startup
use anyhow::{Context, Result};
use conoha_providers::conoha::{DEFAULT_COMPUTE_URL, DEFAULT_IDENTITY_URL};
use conoha_providers::Credentials;
use std::fmt;
use std::fs;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PASSWORD_FILE: &str = "/run/secrets/conoha_password";

#[derive(Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub tenant_id: String,
    pub server_id: String,
    pub identity_url: String,
    pub compute_url: String,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("server_id", &self.server_id)
            .field("identity_url", &self.identity_url)
            .field("compute_url", &self.compute_url)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let required = |key: &str| get(key).with_context(|| format!("{} must be set", key));

        // Prefer *_FILE for the password (Docker/K8s secrets), fallback to env var.
        let password_file =
            get("CONOHA_PASSWORD_FILE").unwrap_or_else(|| DEFAULT_PASSWORD_FILE.to_string());
        let password = fs::read_to_string(&password_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| get("CONOHA_PASSWORD"))
            .context("CONOHA_PASSWORD (or CONOHA_PASSWORD_FILE) must be set")?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            username: required("CONOHA_USERNAME")?,
            password,
            tenant_id: required("CONOHA_TENANT_ID")?,
            server_id: required("CONOHA_SERVER_ID")?,
            identity_url: get("CONOHA_IDENTITY_URL")
                .unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string()),
            compute_url: get("CONOHA_COMPUTE_URL")
                .unwrap_or_else(|| DEFAULT_COMPUTE_URL.to_string()),
            port,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.username.clone(),
            self.password.clone(),
            self.tenant_id.clone(),
        )
    }
}
