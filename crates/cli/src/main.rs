// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wdib - per-device autonomous control plane CLI
//!
//! One `tick` is one full orchestration cycle; cadence comes from an
//! external scheduler. Structured JSON goes to stdout, logs to stderr.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;

use clap::{Parser, Subcommand};
use serde_json::json;
use wdib_engine::runtime::{enqueue_message, RuntimeConfig};
use wdib_engine::run_tick;
use wdib_storage::ProjectPaths;

#[derive(Parser)]
#[command(
    name = "wdib",
    version,
    about = "What Do I Become - per-device autonomous control plane"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one orchestration cycle
    Tick {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Enqueue a human message for the next cycle
    Message {
        /// Message body
        #[arg(long)]
        text: String,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn print_payload(payload: &serde_json::Value, pretty: bool) {
    // Sorted keys fall out of Value's BTreeMap representation.
    let rendered = if pretty {
        serde_json::to_string_pretty(payload)
    } else {
        serde_json::to_string(payload)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(error) => println!("{{\"ok\": false, \"error\": \"{error}\"}}"),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_runtime_config() -> anyhow::Result<RuntimeConfig> {
    let paths = ProjectPaths::resolve(env::project_root());
    env::load_dotenv(&paths.env_file);
    let device_id = env::resolve_device_id(&paths)?;
    Ok(RuntimeConfig { paths, device_id })
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    setup_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tick { pretty } => {
            let result = match resolve_runtime_config() {
                Ok(config) => run_tick(&config).await.map_err(anyhow::Error::from),
                Err(error) => Err(error),
            };
            match result {
                Ok(tick) => {
                    let payload = match serde_json::to_value(&tick) {
                        Ok(value) => json!({"ok": true, "result": value}),
                        Err(error) => json!({"ok": false, "error": error.to_string()}),
                    };
                    let ok = payload["ok"].as_bool().unwrap_or(false);
                    print_payload(&payload, pretty);
                    if ok {
                        std::process::ExitCode::SUCCESS
                    } else {
                        std::process::ExitCode::FAILURE
                    }
                }
                Err(error) => {
                    print_payload(&json!({"ok": false, "error": error.to_string()}), pretty);
                    std::process::ExitCode::FAILURE
                }
            }
        }
        Commands::Message { text, pretty } => {
            let result = resolve_runtime_config()
                .and_then(|config| enqueue_message(&config, &text).map_err(anyhow::Error::from));
            match result {
                Ok(path) => {
                    print_payload(
                        &json!({"ok": true, "result": {"path": path.display().to_string()}}),
                        pretty,
                    );
                    std::process::ExitCode::SUCCESS
                }
                Err(error) => {
                    print_payload(&json!({"ok": false, "error": error.to_string()}), pretty);
                    std::process::ExitCode::FAILURE
                }
            }
        }
    }
}
