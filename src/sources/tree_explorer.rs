//! Adapter for the tree-explorer plugin.
//!
//! The tree explorer reports file-system changes after the fact through a
//! token-keyed event bus: subscribing again with the same token replaces the
//! previous callback, so its subscription API is naturally idempotent.
//!
//! Native payload shapes:
//! - rename: `{"old_name": "...", "new_name": "..."}`
//! - create/remove: `{"fname": "..."}` (also fired for folders, with
//!   separate `Folder*` event names fanning into the same operation)

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::Settings;
use crate::error::SetupError;
use crate::registry::Operation;
use crate::router::{FileOperationArgs, HandlerMap, HandlerSet, route};

use super::{NativeCallback, PluginHost, SourceAdapter};

pub const FILE_CREATED: &str = "FileCreated";
pub const FOLDER_CREATED: &str = "FolderCreated";
pub const FILE_REMOVED: &str = "FileRemoved";
pub const FOLDER_REMOVED: &str = "FolderRemoved";
pub const NODE_RENAMED: &str = "NodeRenamed";

/// The tree explorer's event bus, as exposed on the [`PluginHost`].
///
/// Subscriptions are keyed by (event, token); subscribing the same pair again
/// replaces the earlier callback instead of appending.
#[derive(Default)]
pub struct TreeExplorerEvents {
    subscribers: Mutex<HashMap<String, HashMap<String, NativeCallback>>>,
}

impl TreeExplorerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback under a token. Replaces any previous callback
    /// registered for the same (event, token) pair.
    pub fn subscribe(&self, event: &str, token: &str, callback: NativeCallback) {
        self.subscribers
            .lock()
            .entry(event.to_string())
            .or_default()
            .insert(token.to_string(), callback);
    }

    /// Deliver a native event to every subscriber.
    pub fn emit(&self, event: &str, payload: &Value) {
        // Clone callbacks out so a callback may subscribe without deadlock.
        let callbacks: Vec<NativeCallback> = self
            .subscribers
            .lock()
            .get(event)
            .map(|subs| subs.values().cloned().collect())
            .unwrap_or_default();

        for callback in callbacks {
            callback(payload);
        }
    }

    /// Live subscription count for an event.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers
            .lock()
            .get(event)
            .map_or(0, HashMap::len)
    }
}

/// Translate a tree-explorer payload into canonical arguments.
///
/// Falls back to the single-path shape when no rename field pair is present;
/// a payload with no usable path is dropped with a debug log so an odd shape
/// never aborts the host's event-loop tick.
fn normalize(payload: &Value) -> Option<FileOperationArgs> {
    if let Some(obj) = payload.as_object() {
        if let (Some(old), Some(new)) = (
            obj.get("old_name").and_then(Value::as_str),
            obj.get("new_name").and_then(Value::as_str),
        ) {
            return Some(FileOperationArgs::rename(old, new));
        }

        for key in ["fname", "path"] {
            if let Some(path) = obj.get(key).and_then(Value::as_str) {
                return Some(FileOperationArgs::path(path));
            }
        }
    } else if let Some(path) = payload.as_str() {
        return Some(FileOperationArgs::path(path));
    }

    crate::debug_event!("tree-explorer", "unrecognized payload", "{payload}");
    None
}

pub struct TreeExplorerAdapter;

impl TreeExplorerAdapter {
    fn handler_map() -> HandlerMap {
        let mut map = HandlerMap::new();
        // The tree explorer only reports changes after the fact, so the
        // will-operations have no native counterpart here.
        map.insert(Operation::DidRename, [NODE_RENAMED]);
        map.insert(Operation::DidCreate, [FILE_CREATED, FOLDER_CREATED]);
        map.insert(Operation::DidDelete, [FILE_REMOVED, FOLDER_REMOVED]);
        map
    }
}

impl SourceAdapter for TreeExplorerAdapter {
    fn name(&self) -> &'static str {
        "tree-explorer"
    }

    fn detect(&self, host: &PluginHost) -> bool {
        host.get::<TreeExplorerEvents>().is_some()
    }

    fn integrate(
        &self,
        host: &PluginHost,
        settings: &Settings,
        handlers: &HandlerSet,
    ) -> Result<(), SetupError> {
        let Some(api) = host.get::<TreeExplorerEvents>() else {
            return Ok(());
        };

        let map = Self::handler_map();
        route(settings, handlers, &map, |handler, event| {
            let handler = Arc::clone(handler);
            // The handler module id doubles as the token: resubscribing on a
            // later setup call replaces rather than duplicates.
            api.subscribe(
                event,
                handler.name(),
                Arc::new(move |payload| {
                    if let Some(args) = normalize(payload) {
                        handler.callback(args);
                    }
                }),
            );
        });

        Ok(())
    }
}
