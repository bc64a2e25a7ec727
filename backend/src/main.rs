//! Salon CRM entry-point: loads settings, wires the record store and serves
//! the REST API with health probes and OpenAPI docs.

use std::env;

use actix_web::web;
use camino::Utf8PathBuf;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use salon_crm::inbound::http::health::HealthState;
use salon_crm::settings::CrmSettings;

mod server;

use server::{ServerConfig, create_server};

/// Translate loaded settings into a server configuration.
fn server_config(settings: &CrmSettings) -> Result<ServerConfig> {
    let config = ServerConfig::new(settings.bind_addr(), settings.policy())
        .with_undo_capacity(settings.undo_capacity()?);
    if settings.ephemeral {
        warn!("ephemeral mode: records are kept in memory and lost on exit");
        return Ok(config);
    }
    let data_dir = Utf8PathBuf::from_path_buf(settings.data_dir())
        .map_err(|path| eyre!("data directory is not valid UTF-8: {}", path.display()))?;
    Ok(config.with_data_dir(data_dir))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = CrmSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let config = server_config(&settings)?;
    let bind_addr = settings.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to start server on {bind_addr}"))?;
    info!(%bind_addr, "salon CRM listening");

    server.await.wrap_err("server terminated with an error")?;
    health_state.mark_unhealthy();
    Ok(())
}

#[cfg(test)]
mod tests;
