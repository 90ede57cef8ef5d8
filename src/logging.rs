use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "hydronorm",
    "hydronorm_boxcox",
    "hydronorm_ecdf",
    "hydronorm_gamma",
];

/// Builds the filter directive for a verbosity level.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a global `tracing` subscriber for the hydronorm crates.
///
/// `RUST_LOG` overrides `verbosity` if set. Does nothing when a global
/// subscriber is already installed, so embedding applications keep theirs.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
