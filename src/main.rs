use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use go_vanity::config::{Config, DEFAULT_ADDR};

#[derive(Parser)]
#[command(name = "go-vanity")]
#[command(version, about = "Vanity import path server for Go packages hosted on Git")]
struct Cli {
    /// Serve HTTP at given address
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Serve HTTP at given UNIX socket (takes precedence over --addr)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Vanity root URL (e.g.: https://upper.io)
    #[arg(long)]
    vanity_root: Option<String>,

    /// Git repository root URL (e.g.: https://github.com/upper)
    #[arg(long)]
    repo_root: Option<String>,

    /// Only count annotated tags as versions, and fall back to the default
    /// branch only for repositories without any version reference
    #[arg(long)]
    strict_tags: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref())?;

    let config = Config::new(
        Some(cli.addr),
        cli.socket,
        cli.repo_root,
        cli.vanity_root,
        cli.strict_tags,
    )?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(go_vanity::server::run(config))
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default `info` level.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}
