//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// How logs are filtered and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (e.g. `info`,
    /// `catalog_infra=debug,info`).
    pub filter: String,
    /// JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl LogSettings {
    /// `RUST_LOG` wins over the configured directive; an unparsable directive
    /// falls back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(settings: &LogSettings) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    if settings.json {
        builder.json().with_target(false).try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
