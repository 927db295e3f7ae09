#![allow(non_snake_case)]

mod cli;
mod clients;
mod compiler;
mod config;
mod models;
mod service;

use std::env;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::compiler::CompilerOptions;
use crate::config::AppConfig;

const DEFAULT_TIME_ZONE: &str = "UTC";

#[tokio::main]
async fn main() {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let default_zone = get_prop("DEFAULT_TIME_ZONE").unwrap_or(DEFAULT_TIME_ZONE.to_string());
    let openai_api_key = get_prop("OPENAI_API_KEY");
    let google_access_token = get_prop("GOOGLE_ACCESS_TOKEN");

    let mut options = CompilerOptions::default();
    if let Some(max_duration) = config.max_event_duration() {
        options.max_duration = max_duration;
    }

    cli::cli(default_zone, openai_api_key, google_access_token, options).await;
}
