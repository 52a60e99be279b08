//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use rolegate_auth::{AccessControl, RbacConfig};

pub const BIND_ENV: &str = "ROLEGATE_BIND";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const RBAC_CONFIG_ENV: &str = "ROLEGATE_RBAC_CONFIG";
pub const STRICT_HIERARCHY_ENV: &str = "ROLEGATE_STRICT_HIERARCHY";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    pub rbac_config: Option<PathBuf>,
    pub strict_hierarchy: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("{BIND_ENV}={bind} is not a socket address"))?;

        let jwt_secret = lookup(JWT_SECRET_ENV).unwrap_or_else(|| {
            tracing::warn!("{JWT_SECRET_ENV} not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let rbac_config = lookup(RBAC_CONFIG_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let strict_hierarchy = match lookup(STRICT_HIERARCHY_ENV) {
            None => false,
            Some(v) => parse_bool(&v)
                .with_context(|| format!("{STRICT_HIERARCHY_ENV}={v} is not a boolean"))?,
        };

        Ok(Self {
            bind,
            jwt_secret,
            rbac_config,
            strict_hierarchy,
        })
    }

    /// Build the access-control service once for the process lifetime.
    pub fn load_access_control(&self) -> anyhow::Result<AccessControl> {
        let mut rbac = match &self.rbac_config {
            Some(path) => RbacConfig::from_path(path)
                .with_context(|| format!("loading rbac config from {}", path.display()))?,
            None => RbacConfig::default(),
        };
        if self.strict_hierarchy {
            rbac = rbac.strict();
        }
        AccessControl::from_config(rbac).context("building access control")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
