//! Event router for workspace file operations.
//!
//! This module normalizes heterogeneous file-explorer events and dispatches
//! them to per-operation handler modules.
//!
//! # Architecture
//!
//! ```text
//! route(settings, handlers, handler_map, subscribe)
//!   - Walks the six operations
//!   - Skips disabled or unsupported ones
//!   - Subscribes one handler module per native event
//!         |
//!    +---------+---------+
//!    |                   |
//! tree_explorer        drawer
//! (source adapters supply handler_map + subscribe)
//! ```
//!
//! The router itself is stateless; idempotence across repeated setup calls is
//! each source adapter's responsibility, since only the adapter knows how its
//! plugin's subscription API behaves.

mod handler;
mod route;

pub use handler::{FileOperationArgs, HandlerSet, OperationHandler};
pub use route::{HandlerMap, route};
