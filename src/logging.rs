//! Diagnostic logging for doccat.
//!
//! The library emits `tracing` events (one `debug!` per input, `info!` at the
//! start and end of a merge). The binary installs a `tracing-subscriber`
//! formatter on stderr; user-facing messages go through
//! [`OutputFormatter`](crate::output::OutputFormatter) instead.
//!
//! `RUST_LOG` takes precedence over the level derived from the CLI flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-object detail.
    Trace,
    /// Per-input events.
    Debug,
    /// Start and end of each merge.
    Info,
    /// Only problems.
    #[default]
    Warn,
    /// Only failures.
    Error,
}

impl LogLevel {
    /// Level used for the CLI's `--verbose` / `--quiet` flags.
    #[must_use]
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Debug,
            (false, true) => Self::Error,
            (false, false) => Self::Warn,
        }
    }

    /// Convert to a filter string for tracing-subscriber.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Filter directive restricting output to this crate.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{}={}", crate::NAME, self.as_filter_str())
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Level applied when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Include source file and line in each event.
    pub with_location: bool,
}

impl LogConfig {
    /// Logging configuration for the CLI's verbosity flags.
    #[must_use]
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        Self {
            level: LogLevel::from_flags(verbose, quiet),
            with_location: verbose,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.directive()))
    }
}

/// Install the global stderr subscriber.
///
/// Returns `false` if a global subscriber was already installed, which
/// happens when the library is embedded in a host that set up its own.
pub fn init_logging(config: &LogConfig) -> bool {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_file(config.with_location)
        .with_line_number(config.with_location)
        .compact();

    tracing_subscriber::registry()
        .with(config.filter())
        .with(layer)
        .try_init()
        .is_ok()
}
