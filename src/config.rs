use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Longest token lifetime accepted from the environment: ten years.
pub const MAX_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// When set, tokens carry an `exp` claim this many minutes after issue.
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string. Without it users live in process memory.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let jwt = JwtConfig {
            secret,
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        let bind_addr = parse_bind_addr(
            std::env::var("APP_HOST").ok().as_deref(),
            std::env::var("APP_PORT").ok().as_deref(),
        )?;
        Ok(Self {
            database_url,
            jwt,
            bind_addr,
        })
    }
}

/// An unset or blank value means tokens never expire; anything else must be a
/// whole number of minutes in `1..=MAX_TTL_MINUTES`.
fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let minutes: i64 = raw
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES is not a whole number of minutes: {raw:?}"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(Some(minutes))
}

fn parse_bind_addr(host: Option<&str>, port: Option<&str>) -> anyhow::Result<SocketAddr> {
    let host = host.unwrap_or("0.0.0.0");
    let port = port.unwrap_or("8080");
    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid APP_HOST/APP_PORT: {host}:{port}"))
}
