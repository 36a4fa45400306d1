//! FlintKV - An in-process, in-memory typed key-value store
//!
//! This is the main entry point for the FlintKV shell.
//! It parses flags, sets up logging, and runs the shell on stdin/stdout.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use flintkv::config::{Config, DEFAULT_KEYS_WARN_THRESHOLD};
use flintkv::{repl, CommandHandler, StorageEngine};
use tokio::io::BufReader;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "flintkv", version, about = "In-memory typed key-value store shell")]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Don't print a prompt (useful when piping commands in)
    #[arg(long)]
    no_prompt: bool,

    /// Number of keys above which KEYS logs a warning
    #[arg(long, default_value_t = DEFAULT_KEYS_WARN_THRESHOLD)]
    keys_warn_threshold: usize,
}

impl Args {
    fn to_config(&self) -> Config {
        let builder = Config::builder().keys_warn_threshold(self.keys_warn_threshold);
        if self.no_prompt {
            builder.no_prompt().build()
        } else {
            builder.build()
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // replies own stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_banner() {
    println!(
        "FlintKV v{} - in-memory typed key-value store\n\
         Type QUIT or press Ctrl+D to leave.\n",
        flintkv::VERSION
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.to_config();
    if config.prompt.is_some() {
        print_banner();
    }

    let storage = Arc::new(StorageEngine::with_config(config.clone()));
    let handler = CommandHandler::new(storage);
    info!(
        keys_warn_threshold = config.keys_warn_threshold,
        "Storage engine initialized"
    );

    let session = repl::run(
        &handler,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        config.prompt.as_deref(),
    );

    tokio::select! {
        result = session => result.context("shell session failed")?,
        _ = signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            // a pending stdin read would keep the runtime from shutting down
            std::process::exit(0);
        }
    }

    Ok(())
}
