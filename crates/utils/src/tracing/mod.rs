use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use ::tracing::{debug, error, info, instrument, trace, warn, Level, Span};

/// Default directive when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the tracing system
///
/// Filters with `RUST_LOG` (default `info`) and writes compact lines to
/// stderr. Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber writing through the test harness, once per process
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_for_tests() {
    static INSTALLED: OnceCell<()> = OnceCell::new();

    INSTALLED.get_or_init(|| {
        let fmt_layer = fmt::layer().with_test_writer().compact().with_target(true);
        // Another harness may have installed a subscriber already
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init();
    });
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
