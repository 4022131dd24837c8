use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,service=debug";

/// Output format of the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// `"json"` (any case) selects JSON; everything else is compact.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact }
    }
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global stdout subscriber. A second call is a no-op.
/// - Respects `RUST_LOG` if set
/// - Falls back to `fallback_filter`
pub fn init_logging(format: LogFormat, fallback_filter: &str) {
    let builder = fmt()
        .with_env_filter(env_filter(fallback_filter))
        .with_target(false)
        .with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
