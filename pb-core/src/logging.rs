//! Tracing setup for the client.
//!
//! Library code logs under the `pb_api` and `pb_core` targets (requests,
//! token refreshes, uploads). The log file records those at the configured
//! level; the terminal only shows warnings unless verbose output is asked
//! for, so command output on stdout stays readable.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::constants::APP_NAME;
use crate::error::{PbError, PbResult};

/// Crates whose events are worth recording. Dependencies such as reqwest
/// and hyper are held at `warn`.
const CLIENT_TARGETS: &[&str] = &["pb_core", "pb_api", APP_NAME];

/// Turn a bare level into directives scoped to the client's own targets.
///
/// Anything that already looks like a filter expression (`target=level`
/// or a comma list) is passed through untouched.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return filter_directives("info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = String::from("warn");
    for target in CLIENT_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directives(level)).unwrap_or_else(|_| EnvFilter::new(filter_directives("info")))
}

/// Install the global subscriber: a daily `pushbullet.log` under
/// `log_dir` plus stderr output.
///
/// `verbose` raises the console to debug; otherwise it shows warnings and
/// errors only. The file follows `config.level` and `config.json_output`.
pub fn init_logging(config: &LoggingConfig, log_dir: &Path, verbose: bool) -> PbResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, format!("{APP_NAME}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = if config.json_output {
        fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_current_span(false)
            .with_filter(env_filter(&config.level))
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_filter(env_filter(&config.level))
            .boxed()
    };

    let console_level = if verbose { "debug" } else { "warn" };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact()
        .with_filter(env_filter(console_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| PbError::Config(format!("failed to install log subscriber: {e}")))?;

    tracing::debug!(level = %config.level, dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard { _guard: guard })
}

/// Keeps the non-blocking file writer alive; dropping it flushes the log.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_scoped_to_client_targets() {
        assert_eq!(
            filter_directives("debug"),
            "warn,pb_core=debug,pb_api=debug,pushbullet=debug"
        );
        assert_eq!(filter_directives(" "), filter_directives("info"));
    }

    #[test]
    fn test_filter_expressions_pass_through() {
        assert_eq!(filter_directives("pb_api=trace"), "pb_api=trace");
        assert_eq!(filter_directives("info,hyper=debug"), "info,hyper=debug");
    }

    #[test]
    fn test_init_logging_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let config = LoggingConfig {
            level: "not a level ====".into(),
            ..Default::default()
        };
        // Another test may already own the global subscriber; the directory
        // is created either way.
        let _ = init_logging(&config, &log_dir, false);
        assert!(log_dir.is_dir());
    }
}
