use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_POOL_SIZE: u32 = 10;

#[derive(Deserialize, Debug, PartialEq)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    pub honeycomb_api_key: Option<String>,
    pub ssl: Option<SSLConfig>,
}

fn default_max_pool_size() -> u32 {
    DEFAULT_MAX_POOL_SIZE
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        Config::from_toml(config.as_str())
    }

    pub fn from_toml(config: &str) -> Result<Config, anyhow::Error> {
        let config: Config = toml::from_str(config).with_context(|| "Unable to parse config")?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let database_url = read_env("DATABASE_URL")?;
        let max_pool_size = match env::var("MAX_POOL_SIZE") {
            Ok(size) => size
                .parse()
                .context("Unable to parse MAX_POOL_SIZE value")?,
            Err(_) => DEFAULT_MAX_POOL_SIZE,
        };
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let honeycomb_api_key = env::var("HONEYCOMB_API_KEY").ok();

        let config = Config {
            database_url,
            max_pool_size,
            bind_address,
            honeycomb_api_key,
            ssl: None,
        };
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}
