// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fluxion_outages::{
    DynScheduleCache, FileScheduleStore, ScheduleExtractor, ScheduleProvider, ScheduleStore,
};
use fluxion_outages_server::config::ServerConfig;
use fluxion_outages_server::routes::{self, OutagesState};

#[derive(Parser)]
#[command(name = "fluxion-outages-server")]
#[command(author, version, about = "Serves outage schedules extracted from the operator's page")]
struct Args {
    /// TOML configuration file; defaults are used when it does not exist
    #[arg(short, long, default_value = "outages.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("fluxion_outages_server=info,fluxion_outages=info")
        }))
        .init();

    let args = Args::parse();
    info!(path = %args.config.display(), "Loading configuration");
    let config = ServerConfig::load_or_default(&args.config)?;

    let extractor: Box<dyn ScheduleProvider> = Box::new(ScheduleExtractor::new(&config.outages)?);
    let store = FileScheduleStore::from_settings(&config.outages.cache);
    info!(path = %store.path().display(), "Schedule cache");
    let store: Box<dyn ScheduleStore> = Box::new(store);

    let state = OutagesState::new(DynScheduleCache::new(extractor, store));
    let app = routes::router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FluxION Outages server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
