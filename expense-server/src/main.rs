#[macro_use]
extern crate tracing;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use expense_lib::config::{Config, SSLConfig};
use expense_lib::{app_config_func, create_cors};

const SERVICE_NAME: &str = "expense-server";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config = match get_config_file() {
        Some(config_path) => {
            info!(?config_path, "Reading config file");
            Config::from_file(config_path)?
        }
        None => {
            info!("No config file found, reading config from environment");
            Config::from_env()?
        }
    };

    let telemetry_layer = match &config.honeycomb_api_key {
        Some(api_key) => Some(expense_lib::tracing::create_opentelemetry_layer(
            SERVICE_NAME,
            api_key,
        )?),
        None => None,
    };
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default())
        .with(telemetry_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    drop(tracing_guard);

    let (user_repo, expense_repo, health_check) =
        expense_repo::sqlx_repo::create_repos(config.database_url, config.max_pool_size).await?;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(create_cors())
            .wrap(expense_lib::tracing::create_middleware())
            .configure(app_config_func(
                user_repo.clone(),
                expense_repo.clone(),
                health_check.clone(),
            ))
    });
    server = match config.ssl {
        None => {
            warn!(address = %config.bind_address, "Using http");
            server.bind(&config.bind_address)?
        }
        Some(ssl_config) => {
            info!(address = %config.bind_address, "Using https");
            server.bind_rustls(&config.bind_address, load_rustls_config(ssl_config)?)?
        }
    };
    server.run().await?;

    Ok(())
}

fn load_rustls_config(ssl_config: SSLConfig) -> Result<ServerConfig, anyhow::Error> {
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth();

    let mut cert_file = BufReader::new(
        File::open(ssl_config.certificate_chain_file)
            .context("Error opening certificate chain file")?,
    );
    let mut key_file = BufReader::new(
        File::open(ssl_config.private_key_file).context("Error opening private key file")?,
    );

    let cert_chain = certs(&mut cert_file)
        .context("Unable to read certificate chain file")?
        .into_iter()
        .map(Certificate)
        .collect();
    let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
        .context("Unable to read private key file")?
        .into_iter()
        .map(PrivateKey)
        .collect();
    if keys.is_empty() {
        return Err(anyhow!("No private key found in file"));
    }

    config
        .with_single_cert(cert_chain, keys.remove(0))
        .context("Invalid certificate or key")
}

/// `config.toml` in the working directory, then in `$CONFIGURATION_DIRECTORY`.
fn get_config_file() -> Option<PathBuf> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Some(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}
