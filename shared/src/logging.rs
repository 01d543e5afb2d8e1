//! Shared logging bootstrap for consistent tracing across all binaries

use chrono::{DateTime, Utc};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber with a per-crate level filter
///
/// `RUST_LOG` overrides the computed filter when set. Noisy HTTP internals
/// are pinned to `warn` regardless of the requested base level.
pub fn init(log_level: Option<&str>) {
    let base_level = log_level.unwrap_or("info");
    let directives = format!(
        "collector={base_level},launcher={base_level},shared={base_level},reqwest=warn,hyper=warn"
    );

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&directives));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent file naming
pub fn file_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_timestamp_has_expected_shape() {
        let stamp = file_timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
    }
}
