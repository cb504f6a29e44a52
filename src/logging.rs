//! Log setup for the `snowcast` binary.

use tracing_subscriber::EnvFilter;

/// Library and binary targets whose events are shown.
const CRATE_TARGETS: &[&str] = &[
    "snowcast",
    "snowcast_ensemble",
    "snowcast_forecast",
    "snowcast_snow",
    "snowcast_stats",
    "snowcast_table",
];

/// Level for a `-v` count: warnings only by default, pipeline progress
/// (`info`) at `-v`, per-variable decisions such as skipped comparisons
/// (`debug`) at `-vv`, everything at `-vvv`.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn default_directives(verbosity: u8) -> String {
    let level = level_for(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. A set `RUST_LOG` replaces the `-v`
/// mapping. Output goes to stderr; stdout carries the forecast JSON.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
