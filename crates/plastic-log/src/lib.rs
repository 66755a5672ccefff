// ABOUTME: Shared logging setup for plastic-relay binaries
// ABOUTME: Crate-filtered stderr logging in human-readable or JSON form

use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Crate-filtered logging to stderr. `level` applies to the named crates and
/// WARN to everything else; RUST_LOG directives are added on top.
pub fn init_for(crate_names: &[&str], level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(crate_names, level))
        .init();
}

/// Same filtering as [`init_for`], one JSON object per line.
pub fn init_json_for(crate_names: &[&str], level: &str) {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(false)
        .with_env_filter(filter_for(crate_names, level))
        .init();
}

pub fn init(crate_names: &[&str], level: &str, format: LogFormat) {
    match format {
        LogFormat::Text => init_for(crate_names, level),
        LogFormat::Json => init_json_for(crate_names, level),
    }
}

fn filter_for(crate_names: &[&str], level: &str) -> EnvFilter {
    crate_names.iter().fold(
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        |filter, crate_name| {
            let directive = format!("{crate_name}={level}");
            filter.add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
        },
    )
}
