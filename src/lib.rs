//! Bridges file-explorer plugin events to LSP workspace file-operation
//! notifications.
//!
//! File-explorer plugins each emit their own proprietary events when the user
//! renames, creates, or deletes a file. Language servers expect the six
//! standardized `workspace/willRenameFiles` .. `workspace/didDeleteFiles`
//! messages. This crate sits between the two: it resolves a declarative
//! configuration, probes the host for whichever explorer plugins are present,
//! normalizes their payloads into one canonical shape, and dispatches each
//! logical event exactly once to the matching handler module.
//!
//! ```no_run
//! use lsp_fileops::{FileOperations, HandlerSet, PluginHost, SetupOptions};
//!
//! let host = PluginHost::new();
//! let handlers = HandlerSet::new(); // register your six handler modules
//! let bridge = FileOperations::setup(&host, handlers, SetupOptions::new())?;
//! let capabilities = bridge.capabilities(); // advertise during initialize
//! # Ok::<(), lsp_fileops::SetupError>(())
//! ```

pub mod capabilities;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod router;
pub mod sources;

use std::sync::Arc;

pub use config::{Settings, SetupOptions};
pub use error::SetupError;
pub use registry::Operation;
pub use router::{FileOperationArgs, HandlerMap, HandlerSet, OperationHandler, route};
pub use sources::PluginHost;

/// The configured bridge: resolved settings plus wired source adapters.
///
/// Setup may be called repeatedly in one process; the configuration is
/// replaced wholesale and adapters guarantee no duplicate dispatch.
pub struct FileOperations {
    settings: Arc<Settings>,
    handlers: HandlerSet,
}

impl FileOperations {
    /// Resolve configuration, initialize logging, and integrate every
    /// detected source adapter.
    ///
    /// A missing explorer plugin is the expected common case and contributes
    /// nothing. A failing adapter is contained: it is logged and the
    /// remaining adapters still integrate.
    pub fn setup(
        host: &PluginHost,
        handlers: HandlerSet,
        options: SetupOptions,
    ) -> Result<Self, SetupError> {
        Self::setup_with_sources(host, handlers, options, sources::builtin())
    }

    /// Like [`setup`](Self::setup), but with an explicit adapter list
    /// instead of the built-in ones.
    ///
    /// Lets hosts integrate their own explorer plugins alongside or instead
    /// of the shipped adapters.
    pub fn setup_with_sources(
        host: &PluginHost,
        handlers: HandlerSet,
        options: SetupOptions,
        adapters: Vec<Box<dyn sources::SourceAdapter>>,
    ) -> Result<Self, SetupError> {
        let settings = Arc::new(Settings::resolve(&options)?);
        logging::init_with_settings(&settings);

        for adapter in adapters {
            if !adapter.detect(host) {
                crate::debug_event!("setup", "not present", "{}", adapter.name());
                continue;
            }

            match adapter.integrate(host, &settings, &handlers) {
                Ok(()) => {
                    crate::log_event!("setup", "integrated", "{}", adapter.name());
                }
                Err(e) => {
                    // Contained: one plugin integration must never take the
                    // others down.
                    tracing::warn!("[setup] source '{}' failed: {e}", adapter.name());
                }
            }
        }

        Ok(Self { settings, handlers })
    }

    /// The resolved, immutable configuration for this setup cycle.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The handler modules this bridge dispatches to.
    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Capability document reflecting the resolved configuration.
    pub fn capabilities(&self) -> lsp_types::ClientCapabilities {
        capabilities::build(&self.settings)
    }
}
