// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use dj_mapper_lib::config::{MapperArgs, RunConfig};
use dj_mapper_lib::models::RunOutcome;
use dj_mapper_lib::pipeline;
use dj_mapper_lib::utils::env::load_env;
use log::{error, info};
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    load_env();

    let args = MapperArgs::parse();
    let config = match RunConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    config.log_config();

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    ctrlc::set_handler(move || pipeline::request_shutdown(&flag))
        .context("Failed to install the interrupt handler")?;

    let summary = match pipeline::run(&config, shutdown) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    match summary.stats.outcome {
        RunOutcome::WriteFailed => process::exit(1),
        RunOutcome::Aborted => info!("Run aborted, {} lines kept", summary.stats.records_written),
        RunOutcome::Completed => {}
    }
    Ok(())
}
