// tests/logging.rs

use taskd::cli::LogLevel;
use taskd::logging::build_filter;

#[test]
fn cli_level_wins_over_env() {
    let filter = build_filter(Some(LogLevel::Debug), Some("error"));
    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn env_directives_are_used_when_valid() {
    let filter = build_filter(None, Some("taskd=trace,tower_http=info"));
    let rendered = filter.to_string();
    assert!(rendered.contains("taskd=trace"), "{rendered}");
    assert!(rendered.contains("tower_http=info"), "{rendered}");
}

#[test]
fn missing_or_invalid_env_falls_back_to_info() {
    assert_eq!(build_filter(None, None).to_string(), "info");
    assert_eq!(build_filter(None, Some("   ")).to_string(), "info");
    assert_eq!(build_filter(None, Some("taskd=notalevel")).to_string(), "info");
}
