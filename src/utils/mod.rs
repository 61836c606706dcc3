pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "recurrence_core=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set; otherwise
/// the crate logs at `info`. Logs go to stderr so command output stays clean for
/// scripts.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
        // Another subscriber may already be installed by the host application.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    match directives.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => EnvFilter::try_new(value).unwrap_or_else(|err| {
            eprintln!("Ignoring invalid {}: {err}", EnvFilter::DEFAULT_ENV);
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}
