use std::net::SocketAddr;

use anyhow::Context;

/// Page size used by the catalog listing when none is configured.
pub const DEFAULT_MOVIES_PER_PAGE: u64 = 3;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub movies_per_page: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://netmovies.db?mode=rwc".to_string());

        let movies_per_page: u64 = std::env::var("MOVIES_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MOVIES_PER_PAGE);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            movies_per_page,
        })
    }
}
