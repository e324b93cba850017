use std::{fs::File, sync::Mutex};

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Installs the log subscriber. `RUST_LOG` overrides the default level.
///
/// Interactive sessions own stdout and stderr, so without `--log-file` they
/// log nowhere.
pub fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {} failed", path.display()))?;
        return tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
            .map_err(|err| anyhow!("installing log subscriber failed: {err}"));
    }

    if cli.one_shot {
        return tracing_subscriber::fmt()
            .with_env_filter(env_filter("warn"))
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!("installing log subscriber failed: {err}"));
    }

    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
