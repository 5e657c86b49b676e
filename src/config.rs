//! Run configuration, constructed once at the entry point and threaded
//! through every component call. Store settings resolve CLI flag first, then
//! the conventional PG* environment variable, then a documented default.

use std::{env, path::PathBuf};

use anyhow::Result;
use encoding_rs::Encoding;

use crate::{cli::RunArgs, io_utils};

pub const DEFAULT_PG_USER: &str = "vendor_user";
pub const DEFAULT_PG_PASSWORD: &str = "vendor_pass";
pub const DEFAULT_PG_HOST: &str = "localhost";
pub const DEFAULT_PG_DATABASE: &str = "vendor_db";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
}

impl StoreConfig {
    pub fn resolve(args: &RunArgs) -> Self {
        StoreConfig {
            user: setting(args.pg_user.as_deref(), "PGUSER", DEFAULT_PG_USER),
            password: setting(args.pg_password.as_deref(), "PGPASS", DEFAULT_PG_PASSWORD),
            host: setting(args.pg_host.as_deref(), "PGHOST", DEFAULT_PG_HOST),
            database: setting(args.pg_database.as_deref(), "PGDB", DEFAULT_PG_DATABASE),
        }
    }

    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.user, self.password, self.host, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub raw_dir: PathBuf,
    pub clean_dir: PathBuf,
    pub encoding: &'static Encoding,
    pub store: StoreConfig,
}

impl EtlConfig {
    pub fn from_run_args(args: &RunArgs) -> Result<Self> {
        Ok(EtlConfig {
            raw_dir: args.raw_dir.clone(),
            clean_dir: args.clean_dir.clone(),
            encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
            store: StoreConfig::resolve(args),
        })
    }
}

fn setting(cli: Option<&str>, env_key: &str, default: &str) -> String {
    if let Some(value) = cli {
        return value.to_string();
    }
    env::var(env_key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_prefers_cli_value() {
        assert_eq!(setting(Some("alice"), "PROCURE_ETL_UNSET", "bob"), "alice");
    }

    #[test]
    fn setting_falls_back_to_default() {
        assert_eq!(setting(None, "PROCURE_ETL_UNSET", "bob"), "bob");
    }

    #[test]
    fn url_joins_all_four_settings() {
        let store = StoreConfig {
            user: "u".into(),
            password: "p".into(),
            host: "h".into(),
            database: "d".into(),
        };
        assert_eq!(store.url(), "postgres://u:p@h/d");
    }
}
