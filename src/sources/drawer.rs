//! Adapter for the project-drawer plugin.
//!
//! The drawer fires events both before and after a change, so all six
//! operations have native counterparts. Its event bus is append-only: every
//! `subscribe` call adds another callback, and removal is by explicit id.
//! The adapter therefore derives a deterministic subscription identity per
//! (handler module, native event) pair and unsubscribes it before
//! subscribing, so repeated setup calls leave exactly one live subscription
//! per pair.
//!
//! Native payload shapes:
//! - rename/move: `{"source": "...", "destination": "..."}`
//! - create/delete: `{"path": "..."}` or a bare path string

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::Settings;
use crate::error::SetupError;
use crate::registry::Operation;
use crate::router::{FileOperationArgs, HandlerMap, HandlerSet, route};

use super::{NativeCallback, PluginHost, SourceAdapter};

pub const BEFORE_FILE_ADD: &str = "before_file_add";
pub const FILE_ADDED: &str = "file_added";
pub const BEFORE_FILE_RENAME: &str = "before_file_rename";
pub const FILE_RENAMED: &str = "file_renamed";
pub const BEFORE_FILE_MOVE: &str = "before_file_move";
pub const FILE_MOVED: &str = "file_moved";
pub const BEFORE_FILE_DELETE: &str = "before_file_delete";
pub const FILE_DELETED: &str = "file_deleted";

struct DrawerSubscription {
    id: String,
    callback: NativeCallback,
}

/// The drawer's event bus, as exposed on the [`PluginHost`].
///
/// Append-only: the bus itself never deduplicates; callers that need
/// replace-on-resubscribe semantics must unsubscribe their id first.
#[derive(Default)]
pub struct DrawerEvents {
    subscribers: Mutex<HashMap<String, Vec<DrawerSubscription>>>,
}

impl DrawerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback for an event under the given id.
    pub fn subscribe(&self, event: &str, id: &str, callback: NativeCallback) {
        self.subscribers
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(DrawerSubscription {
                id: id.to_string(),
                callback,
            });
    }

    /// Remove every callback registered for an event under the given id.
    pub fn unsubscribe(&self, event: &str, id: &str) {
        if let Some(subs) = self.subscribers.lock().get_mut(event) {
            subs.retain(|sub| sub.id != id);
        }
    }

    /// Deliver a native event to every subscriber.
    pub fn emit(&self, event: &str, payload: &Value) {
        // Clone callbacks out so a callback may subscribe without deadlock.
        let callbacks: Vec<NativeCallback> = self
            .subscribers
            .lock()
            .get(event)
            .map(|subs| subs.iter().map(|sub| sub.callback.clone()).collect())
            .unwrap_or_default();

        for callback in callbacks {
            callback(payload);
        }
    }

    /// Live subscription count for an event.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.lock().get(event).map_or(0, Vec::len)
    }
}

/// Identity registry for drawer subscriptions.
///
/// Owns the deterministic (handler module, native event) identities the
/// adapter has claimed. Local to this adapter: other sources have naturally
/// idempotent subscription APIs and never need it.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    ids: HashSet<String>,
}

impl SubscriptionRegistry {
    /// Deterministic identity for a (handler module, native event) pair.
    pub fn identity(handler: &str, event: &str) -> String {
        format!("lsp-fileops/{handler}/{event}")
    }

    /// Record the identity for a pair and return it for use with the bus.
    pub fn claim(&mut self, handler: &str, event: &str) -> String {
        let id = Self::identity(handler, event);
        self.ids.insert(id.clone());
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Translate a drawer payload into canonical arguments.
///
/// Falls back to the single-path shape when no source/destination pair is
/// present; a payload with no usable path is dropped with a debug log.
fn normalize(payload: &Value) -> Option<FileOperationArgs> {
    if let Some(obj) = payload.as_object() {
        if let (Some(source), Some(destination)) = (
            obj.get("source").and_then(Value::as_str),
            obj.get("destination").and_then(Value::as_str),
        ) {
            return Some(FileOperationArgs::rename(source, destination));
        }

        for key in ["path", "source"] {
            if let Some(path) = obj.get(key).and_then(Value::as_str) {
                return Some(FileOperationArgs::path(path));
            }
        }
    } else if let Some(path) = payload.as_str() {
        return Some(FileOperationArgs::path(path));
    }

    crate::debug_event!("drawer", "unrecognized payload", "{payload}");
    None
}

pub struct DrawerAdapter;

impl DrawerAdapter {
    fn handler_map() -> HandlerMap {
        let mut map = HandlerMap::new();
        // Moves and renames are distinct drawer events fanning into the same
        // rename operation.
        map.insert(Operation::WillRename, [BEFORE_FILE_MOVE, BEFORE_FILE_RENAME]);
        map.insert(Operation::DidRename, [FILE_MOVED, FILE_RENAMED]);
        map.insert(Operation::WillCreate, [BEFORE_FILE_ADD]);
        map.insert(Operation::DidCreate, [FILE_ADDED]);
        map.insert(Operation::WillDelete, [BEFORE_FILE_DELETE]);
        map.insert(Operation::DidDelete, [FILE_DELETED]);
        map
    }
}

impl SourceAdapter for DrawerAdapter {
    fn name(&self) -> &'static str {
        "drawer"
    }

    fn detect(&self, host: &PluginHost) -> bool {
        host.get::<DrawerEvents>().is_some()
    }

    fn integrate(
        &self,
        host: &PluginHost,
        settings: &Settings,
        handlers: &HandlerSet,
    ) -> Result<(), SetupError> {
        let Some(api) = host.get::<DrawerEvents>() else {
            return Ok(());
        };

        let map = Self::handler_map();
        let mut registry = SubscriptionRegistry::default();
        route(settings, handlers, &map, |handler, event| {
            let id = registry.claim(handler.name(), event);
            // The bus appends on every subscribe; drop the previous
            // subscription for this identity first.
            api.unsubscribe(event, &id);

            let handler = Arc::clone(handler);
            api.subscribe(
                event,
                &id,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_move_shape() {
        let args = normalize(&json!({"source": "/p/a.rs", "destination": "/q/a.rs"})).unwrap();
        assert_eq!(args, FileOperationArgs::rename("/p/a.rs", "/q/a.rs"));
    }

    #[test]
    fn test_normalize_single_path_shapes() {
        let from_obj = normalize(&json!({"path": "/p/new.rs"})).unwrap();
        assert_eq!(from_obj, FileOperationArgs::path("/p/new.rs"));

        let from_str = normalize(&json!("/p/new.rs")).unwrap();
        assert_eq!(from_str, FileOperationArgs::path("/p/new.rs"));
    }

    #[test]
    fn test_normalize_source_without_destination_falls_back() {
        let args = normalize(&json!({"source": "/p/a.rs"})).unwrap();
        assert_eq!(args, FileOperationArgs::path("/p/a.rs"));
    }

    #[test]
    fn test_normalize_unusable_payload_is_dropped() {
        assert!(normalize(&json!({"count": 3})).is_none());
        assert!(normalize(&json!(null)).is_none());
    }

    #[test]
    fn test_subscription_identity_is_deterministic() {
        let id1 = SubscriptionRegistry::identity("will-rename", BEFORE_FILE_RENAME);
        let id2 = SubscriptionRegistry::identity("will-rename", BEFORE_FILE_RENAME);
        assert_eq!(id1, id2);

        let mut registry = SubscriptionRegistry::default();
        registry.claim("will-rename", BEFORE_FILE_RENAME);
        registry.claim("will-rename", BEFORE_FILE_RENAME);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unsubscribe_then_subscribe_keeps_one_live() {
        let bus = DrawerEvents::new();
        let id = SubscriptionRegistry::identity("did-create", FILE_ADDED);

        // Two rounds of the unsubscribe-before-subscribe dance.
        for _ in 0..2 {
            bus.unsubscribe(FILE_ADDED, &id);
            bus.subscribe(FILE_ADDED, &id, Arc::new(|_| {}));
        }

        assert_eq!(bus.subscriber_count(FILE_ADDED), 1);
    }
}
