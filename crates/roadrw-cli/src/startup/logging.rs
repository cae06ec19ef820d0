//! Console and rolling-file logging for the command-line client
//!
//! | Output       | Default | Control                               |
//! |--------------|---------|---------------------------------------|
//! | stderr       | on      | `RUST_LOG`, else `ROADRW_LOG_LEVEL`   |
//! | `roadrw.log` | off     | `ROADRW_LOG_FILE`, `ROADRW_LOG_DIR`   |
//!
//! Log files are stored in `~/.roadrw/logs` by default and rotate daily
//! unless `ROADRW_LOG_ROTATION` says `hourly` or `never`. Stdout is left to
//! command output.
//!
//! The console filter sits behind a reload handle so the level can be
//! raised once the persisted client configuration is known.

use std::path::PathBuf;

use anyhow::Context;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload};

pub const LOG_FILE_NAME: &str = "roadrw.log";

/// Log rotation policy
#[derive(Debug, Clone, Copy)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl std::str::FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown log rotation: {}", other)),
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log directory (default: `~/.roadrw/logs`)
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
    /// `RUST_LOG` directives; when valid they replace both levels.
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::WARN,
            file_logging: false,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_dir = lookup("ROADRW_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let console_output = lookup("ROADRW_LOG_CONSOLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(defaults.console_output);

        let file_logging = lookup("ROADRW_LOG_FILE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.file_logging);

        let console_level = lookup("ROADRW_LOG_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.console_level);

        let file_level = lookup("ROADRW_LOG_FILE_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.file_level);

        let rotation = lookup("ROADRW_LOG_ROTATION")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rotation);

        let env_filter = lookup("RUST_LOG").filter(|v| !v.trim().is_empty());

        Self {
            log_dir,
            console_output,
            console_level,
            file_logging,
            file_level,
            rotation,
            env_filter,
        }
    }

    /// Filter for one output: `RUST_LOG` when it parses, else `level`.
    /// The flag tells whether `RUST_LOG` won.
    fn filter(&self, level: Level) -> (EnvFilter, bool) {
        match self.env_filter.as_deref().map(EnvFilter::try_new) {
            Some(Ok(filter)) => (filter, true),
            _ => (EnvFilter::new(level.to_string()), false),
        }
    }
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".roadrw").join("logs")
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

struct ConsoleFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    level: Level,
    from_env: bool,
}

/// Keeps the non-blocking file writer alive and owns the console filter
/// handle. Buffered output is flushed when dropped.
pub struct LoggingGuard {
    console: Option<ConsoleFilter>,
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Makes sure events at `level` reach the console. Does nothing when
    /// `RUST_LOG` drives the console or the level is already enabled.
    pub fn raise_console_level(&mut self, level: Level) -> anyhow::Result<()> {
        let Some(console) = self.console.as_mut() else {
            return Ok(());
        };
        if console.from_env || console.level >= level {
            return Ok(());
        }

        console
            .handle
            .reload(EnvFilter::new(level.to_string()))
            .map_err(|e| anyhow::anyhow!("Failed to raise console log level: {}", e))?;
        console.level = level;
        Ok(())
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured levels on every layer.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let (layers, guard) = build_layers(config, std::io::stderr)?;

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::debug!(log_dir = %config.log_dir.display(), "File logging initialized");
    }

    Ok(guard)
}

fn build_layers<W>(
    config: &LoggingConfig,
    console_writer: W,
) -> anyhow::Result<(Vec<BoxedLayer>, LoggingGuard)>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut console = None;
    let mut file_guard = None;

    if config.console_output {
        let (filter, from_env) = config.filter(config.console_level);
        let (filter, handle) = reload::Layer::new(filter);
        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_target(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
        console = Some(ConsoleFilter {
            handle,
            level: config.console_level,
            from_env,
        });
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

        let appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let (filter, _) = config.filter(config.file_level);
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(filter);
        layers.push(Box::new(file_layer));
    }

    Ok((
        layers,
        LoggingGuard {
            console,
            _file_guard: file_guard,
        },
    ))
}
