//! Service configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

pub const DEFAULT_PORT: u16 = 3550;
pub const DEFAULT_CATALOG_PATH: &str = "products.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `BIND_ADDR`, default `0.0.0.0`.
    pub bind_addr: IpAddr,
    /// `PORT`, default 3550.
    pub port: u16,
    /// `CATALOG_PATH`, default `products.json`.
    pub catalog_path: PathBuf,
    /// `CATALOG_RELOAD_INTERVAL_SECS`; unset disables periodic reload.
    pub reload_interval: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            reload_interval: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            cfg.bind_addr = v.parse().with_context(|| format!("invalid BIND_ADDR: {v:?}"))?;
        }

        if let Some(v) = get("PORT") {
            cfg.port = v.parse().with_context(|| format!("invalid PORT: {v:?}"))?;
        }

        if let Some(v) = get("CATALOG_PATH") {
            cfg.catalog_path = PathBuf::from(v);
        }

        if let Some(v) = get("CATALOG_RELOAD_INTERVAL_SECS") {
            let secs: u64 = v
                .parse()
                .with_context(|| format!("invalid CATALOG_RELOAD_INTERVAL_SECS: {v:?}"))?;
            if secs == 0 {
                bail!("CATALOG_RELOAD_INTERVAL_SECS must be greater than zero");
            }
            cfg.reload_interval = Some(Duration::from_secs(secs));
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
