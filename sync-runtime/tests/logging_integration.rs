//! Integration tests for the logging configuration surface.
//!
//! Logging can only be initialized once per process, so these exercise the
//! builder and defaults rather than the live subscriber.

use sync_runtime::logging::{LogFormat, LogLevel, LoggingConfig};

#[test]
fn config_builder_chains() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn format_defaults_follow_the_build_profile() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn custom_filter_is_kept() {
    let config = LoggingConfig::default().with_filter("sync_engine=debug,store_traits=trace");

    assert_eq!(
        config.filter,
        Some("sync_engine=debug,store_traits=trace".to_string())
    );
}
