//! Logging setup for the Genix SPV chain core.
//!
//! Console output plus an optional per-network log file. Each network writes to
//! `genix-spv-<network>.log`; on start the previous file of that network is archived under its
//! modification time and only the newest archives of that network are kept. Sessions on
//! different networks can therefore share one log directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use genix_network::Network;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{LoggingError, LoggingResult};

const LOG_NAME_PREFIX: &str = "genix-spv-";

/// Keeps the file writer alive. Dropping it flushes buffered entries.
#[derive(Debug)]
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Falls back to `RUST_LOG`, then INFO.
    pub level: Option<LevelFilter>,
    /// Write to stderr.
    pub console: bool,
    pub file: Option<LogFileConfig>,
}

#[derive(Debug, Clone)]
pub struct LogFileConfig {
    pub log_dir: PathBuf,
    /// Network of the session. Names the log file and scopes rotation.
    pub network: Network,
    /// Archived logs of this network to keep besides the active one.
    pub max_files: usize,
}

/// Console-only logging at `level`.
pub fn init_console_logging(level: LevelFilter) -> LoggingResult<LoggingGuard> {
    init_logging(LoggingConfig {
        level: Some(level),
        console: true,
        file: None,
    })
}

/// Install the global tracing subscriber.
///
/// With neither console nor file output enabled nothing is installed and the tracing macros
/// stay no-ops.
///
/// # Errors
///
/// Fails if the log directory cannot be prepared or a global subscriber is already set.
///
/// # Examples
///
/// ```no_run
/// use genix_spv::logging::{LogFileConfig, LoggingConfig, init_logging};
/// use genix_spv::{LevelFilter, Network};
///
/// let _guard = init_logging(LoggingConfig {
///     level: Some(LevelFilter::DEBUG),
///     console: false,
///     file: Some(LogFileConfig {
///         log_dir: "/var/lib/genix-spv/logs".into(),
///         network: Network::Testnet,
///         max_files: 20,
///     }),
/// })
/// .unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> LoggingResult<LoggingGuard> {
    if !config.console && config.file.is_none() {
        return Ok(LoggingGuard {
            _worker_guard: None,
        });
    }

    let filter = match config.level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LevelFilter::INFO.to_string())),
    };

    let (writer, worker_guard) = match &config.file {
        Some(file_config) => {
            let (writer, guard) = open_network_log(file_config)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));
    let console_layer = config.console.then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::SubscriberInit(e.to_string()))?;

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
    })
}

fn active_log_name(network: Network) -> String {
    format!("{LOG_NAME_PREFIX}{network}.log")
}

fn archive_prefix(network: Network) -> String {
    format!("{LOG_NAME_PREFIX}{network}-")
}

fn archive_name(network: Network, modified: DateTime<Local>, collision: usize) -> String {
    let prefix = archive_prefix(network);
    let stamp = modified.format("%Y-%m-%d.%H%M%S");
    match collision {
        0 => format!("{prefix}{stamp}.log"),
        n => format!("{prefix}{stamp}-{n}.log"),
    }
}

fn is_archive_of(network: Network, name: &str) -> bool {
    name.starts_with(&archive_prefix(network)) && name.ends_with(".log")
}

/// Archives and prunes the network's previous log, then opens a fresh one headed by a
/// session line.
fn open_network_log(config: &LogFileConfig) -> LoggingResult<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.log_dir)?;
    archive_network_log(&config.log_dir, config.network)?;
    prune_network_archives(&config.log_dir, config.network, config.max_files)?;

    let mut file = File::create(config.log_dir.join(active_log_name(config.network)))?;
    writeln!(
        file,
        "genix-spv {} {} session started {}",
        crate::VERSION,
        config.network,
        Local::now().to_rfc3339()
    )?;
    Ok(tracing_appender::non_blocking(file))
}

/// Renames `genix-spv-<network>.log` to `genix-spv-<network>-<YYYY-MM-DD.HHMMSS>.log`.
fn archive_network_log(log_dir: &Path, network: Network) -> LoggingResult<()> {
    let active = log_dir.join(active_log_name(network));
    if !active.exists() {
        return Ok(());
    }

    let modified = fs::metadata(&active)
        .and_then(|metadata| metadata.modified())
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());

    let target = (0..1000)
        .map(|collision| log_dir.join(archive_name(network, modified, collision)))
        .find(|path| !path.exists())
        .ok_or_else(|| {
            LoggingError::RotationFailed(format!("too many {network} archives with one timestamp"))
        })?;

    fs::rename(&active, &target).map_err(|e| LoggingError::RotationFailed(e.to_string()))
}

/// Deletes the network's oldest archives until at most `max_files` remain. Files of other
/// networks are left alone.
fn prune_network_archives(log_dir: &Path, network: Network, max_files: usize) -> LoggingResult<()> {
    let entries = fs::read_dir(log_dir)
        .map_err(|e| LoggingError::RotationFailed(format!("failed to read log dir: {e}")))?;

    let mut archives: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| is_archive_of(network, name)))
        .map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok();
            (modified, entry.path())
        })
        .collect();

    if archives.len() <= max_files {
        return Ok(());
    }

    // oldest first
    archives.sort();
    let excess = archives.len() - max_files;
    for (_, path) in archives.into_iter().take(excess) {
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("Failed to remove old log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}
