//! Logging initialization and configuration.
//!
//! Logs go to stderr so they never interleave with command output on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor a configured level is usable.
pub const DEFAULT_FILTER: &str = "dynamo_shell=warn";

/// Build the filter for a configured level.
///
/// `RUST_LOG` takes precedence. A bare level such as `debug` is scoped to
/// this crate; anything containing `=` or `,` is used as a full directive.
pub fn filter_for(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    directive_filter(level)
}

fn directive_filter(level: &str) -> EnvFilter {
    let level = level.trim();
    let directive = if level.is_empty() {
        DEFAULT_FILTER.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("dynamo_shell={}", level)
    };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_crate_scoped() {
        let filter = directive_filter("debug");
        assert_eq!(filter.to_string().to_lowercase(), "dynamo_shell=debug");
    }

    #[test]
    fn test_full_directive_passes_through() {
        let filter = directive_filter("dynamo_shell=trace,aws_config=info");
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("dynamo_shell=trace"));
        assert!(rendered.contains("aws_config=info"));
    }

    #[test]
    fn test_empty_level_uses_default() {
        let filter = directive_filter("  ");
        assert_eq!(filter.to_string().to_lowercase(), DEFAULT_FILTER);
    }

    #[test]
    fn test_try_init_idempotent() {
        // First call may or may not succeed depending on test order
        let _ = try_init("info");
        let _ = try_init("info");
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init("debug");

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
        tracing::error!("test error message");
    }
}
