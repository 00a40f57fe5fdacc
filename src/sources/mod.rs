//! Source adapters for file-explorer plugins.
//!
//! Each adapter integrates one explorer plugin: it detects whether the plugin
//! is present on the [`PluginHost`], declares which of its native events feed
//! which operation, and wraps the plugin's callbacks so handler modules only
//! ever see canonical [`FileOperationArgs`](crate::router::FileOperationArgs).
//!
//! Adding a new explorer plugin means adding a new module here; the event
//! router is never touched.

mod host;

pub mod drawer;
pub mod tree_explorer;

pub use host::PluginHost;

use std::sync::Arc;

use crate::config::Settings;
use crate::error::SetupError;
use crate::router::HandlerSet;

/// Callback shape the explorer plugin buses deliver native payloads to.
pub type NativeCallback = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// One explorer plugin integration.
///
/// At most one instance per supported plugin exists per process. An absent
/// plugin is the expected common case: `detect` returns false and the adapter
/// contributes nothing.
pub trait SourceAdapter {
    /// Adapter name for logging.
    fn name(&self) -> &'static str;

    /// Probe the host for this adapter's plugin surface.
    fn detect(&self, host: &PluginHost) -> bool;

    /// Build the handler map and subscribe handler modules to the plugin's
    /// native events. Must be idempotent across repeated setup calls.
    fn integrate(
        &self,
        host: &PluginHost,
        settings: &Settings,
        handlers: &HandlerSet,
    ) -> Result<(), SetupError>;
}

/// The adapters this crate ships.
pub fn builtin() -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(tree_explorer::TreeExplorerAdapter),
        Box::new(drawer::DrawerAdapter),
    ]
}
