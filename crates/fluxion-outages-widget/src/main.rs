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
    FileScheduleStore, OutagesConfig, RemoteScheduleProvider, ResilientScheduleCache,
    ScheduleExtractor, ScheduleProvider,
};
use fluxion_outages_widget::{WidgetParameter, load_view};

/// Cache key of the widget's own last-known schedule
const WIDGET_CACHE_KEY: &str = "outages_cache";

#[derive(Parser)]
#[command(name = "fluxion-outages-widget")]
#[command(author, version, about = "Prints today's outage slots for one subqueue")]
struct Args {
    /// Subqueue such as 1.1; a trailing є shows the hours with power
    #[arg(default_value = "1.1")]
    parameter: WidgetParameter,

    /// Show the hours with power (same as the є suffix)
    #[arg(long)]
    invert: bool,

    /// Read the schedule from an outage server instead of the operator's page
    #[arg(long)]
    api_url: Option<String>,

    /// TOML configuration file; defaults are used when it does not exist
    #[arg(short, long, default_value = "outages.toml")]
    config: PathBuf,

    /// Directory for the last-known schedule (overrides cache.dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the widget text
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = OutagesConfig::load_or_default(&args.config)?;

    let provider: Box<dyn ScheduleProvider> = match &args.api_url {
        Some(url) => {
            info!(url = %url, "Using outage server");
            Box::new(RemoteScheduleProvider::new(url, &config.source)?)
        }
        None => Box::new(ScheduleExtractor::new(&config)?),
    };
    let cache_dir = args.cache_dir.unwrap_or(config.cache.dir);
    let store = FileScheduleStore::new(&cache_dir, WIDGET_CACHE_KEY);

    let mut param = args.parameter;
    param.inverted |= args.invert;

    let cache = ResilientScheduleCache::new(provider, store);
    let view = load_view(&cache, &param).await;
    print!("{view}");

    Ok(())
}
