use std::sync::Once;

/// Filter used when neither `LoggingConfig::env_filter` nor `RUST_LOG` is set.
///
/// wgpu logs shader and resource churn at `info`; keep it to warnings.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "volley_sim=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        builder.parse_filters(&filter);

        builder.write_style(config.write_style);

        if let Err(e) = builder.try_init() {
            // Another logger was installed first (e.g. by a test harness).
            eprintln!("volley logging not installed: {e}");
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}
