//! Logging for the file-operations bridge.
//!
//! Provides compact timestamped logging with per-module level configuration.
//! Supports `RUST_LOG` environment variable for runtime overrides.
//!
//! # Configuration
//!
//! ```toml
//! debug = false
//!
//! [logging]
//! default = "warn"    # quiet by default
//!
//! [logging.modules]
//! router = "debug"    # enable router debug logs
//! ```
//!
//! # Environment Variable
//!
//! `RUST_LOG` takes precedence over both config and the debug flag:
//! ```bash
//! RUST_LOG=debug
//! RUST_LOG=lsp_fileops::sources=trace
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::Settings;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Initialize logging from resolved settings.
///
/// Called by setup; safe to call multiple times (only the first call takes
/// effect, so repeated setup calls do not re-install the subscriber).
///
/// Level selection, highest precedence first:
/// 1. `RUST_LOG` environment variable
/// 2. `debug = true` forces a `debug` default level
/// 3. `logging.default` plus `logging.modules` overrides
pub fn init_with_settings(settings: &Settings) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            let mut filter_str = if settings.debug {
                "debug".to_string()
            } else {
                settings.logging.default.clone()
            };
            for (module, level) in &settings.logging.modules {
                filter_str.push_str(&format!(",{module}={level}"));
            }
            EnvFilter::new(&filter_str)
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true) // Show target for filtering visibility
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Initialize logging with default settings.
///
/// Uses `Settings::default()` which sets `logging.default = "warn"` for quiet
/// operation. Use the `RUST_LOG` environment variable for verbose output.
pub fn init() {
    init_with_settings(&Settings::default());
}

/// Info-level bridge event, tagged with the component it came from.
///
/// Used for the rare once-per-setup messages (a source integrated, nothing
/// per-dispatch):
///
/// ```ignore
/// log_event!("setup", "integrated", "{}", adapter.name());
/// ```
#[macro_export]
macro_rules! log_event {
    ($source:expr, $event:expr) => {
        tracing::info!("[{}] {}", $source, $event)
    };
    ($source:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $source, $event, format!($($arg)*))
    };
}

/// Debug-level counterpart of [`log_event!`].
///
/// This is the only place skipped operations and unsupported
/// operation/source combinations are reported; they are never surfaced as
/// failures:
///
/// ```ignore
/// debug_event!("router", "disabled", "{op}");
/// ```
#[macro_export]
macro_rules! debug_event {
    ($source:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $source, $event)
    };
    ($source:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $source, $event, format!($($arg)*))
    };
}
