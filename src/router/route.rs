//! The routing traversal: enabled operations to native event subscriptions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Settings;
use crate::registry::Operation;

use super::handler::{HandlerSet, OperationHandler};

/// Per-source mapping from operation to that source's native event
/// identifiers.
///
/// Built fresh by a source adapter each time its integration runs and
/// consumed immediately by [`route`]; never persisted. An operation may map
/// to several native events (e.g. separate file-created and folder-created
/// events both feeding the create handler).
#[derive(Debug, Default, Clone)]
pub struct HandlerMap {
    events: HashMap<Operation, Vec<String>>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the native events for an operation, replacing any previous
    /// declaration.
    pub fn insert<I, S>(&mut self, op: Operation, events: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.insert(op, events.into_iter().map(Into::into).collect());
    }

    /// Native events declared for an operation, if any.
    pub fn events(&self, op: Operation) -> Option<&[String]> {
        self.events.get(&op).map(Vec::as_slice)
    }

    /// Number of operations with declared events.
    pub fn operation_count(&self) -> usize {
        self.events.len()
    }
}

/// Walk every operation and subscribe its handler module to each of the
/// source's native events.
///
/// Skips disabled operations, operations without a registered handler
/// module, and operations the source declares no events for; none of these
/// is an error. For each remaining (operation, native event) pair,
/// `subscribe` is invoked exactly once.
///
/// The traversal is stateless and retains nothing between calls. For a fixed
/// configuration and map, repeated invocations must not grow the number of
/// live subscriptions; that guarantee belongs to the `subscribe`
/// implementation supplied by the source adapter.
pub fn route<F>(settings: &Settings, handlers: &HandlerSet, map: &HandlerMap, mut subscribe: F)
where
    F: FnMut(&Arc<dyn OperationHandler>, &str),
{
    for op in Operation::ALL {
        if !settings.operations.enabled(op) {
            crate::debug_event!("router", "disabled", "{op}");
            continue;
        }

        let Some(handler) = handlers.get(op) else {
            crate::debug_event!("router", "no handler module registered", "{op}");
            continue;
        };

        let Some(events) = map.events(op) else {
            // Unsupported combination for this source, not an error.
            crate::debug_event!("router", "no native events", "{op}");
            continue;
        };

        for event in events {
            subscribe(handler, event.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SetupOptions;
    use crate::router::FileOperationArgs;

    struct NamedHandler(&'static str);

    impl OperationHandler for NamedHandler {
        fn name(&self) -> &'static str {
            self.0
        }

        fn callback(&self, _args: FileOperationArgs) {}
    }

    fn full_handler_set() -> HandlerSet {
        Operation::ALL.iter().fold(HandlerSet::new(), |set, op| {
            set.with(*op, Arc::new(NamedHandler(op.handler_module())))
        })
    }

    fn collect_subscriptions(
        settings: &Settings,
        handlers: &HandlerSet,
        map: &HandlerMap,
    ) -> Vec<(String, String)> {
        let mut seen = Vec::new();
        route(settings, handlers, map, |handler, event| {
            seen.push((handler.name().to_string(), event.to_string()));
        });
        seen
    }

    #[test]
    fn test_disabled_operation_is_never_subscribed() {
        let settings = Settings::resolve_from(
            "/nonexistent/config.toml",
            &SetupOptions::new().operation(Operation::WillDelete, false),
        )
        .unwrap();

        let mut map = HandlerMap::new();
        map.insert(Operation::WillDelete, ["will-remove"]);
        map.insert(Operation::DidDelete, ["removed"]);

        let seen = collect_subscriptions(&settings, &full_handler_set(), &map);

        assert!(!seen.iter().any(|(h, _)| h == "will-delete"));
        assert_eq!(seen, vec![("did-delete".to_string(), "removed".to_string())]);
    }

    #[test]
    fn test_one_subscription_per_native_event() {
        let settings = Settings::default();

        let mut map = HandlerMap::new();
        map.insert(Operation::DidCreate, ["file-created", "folder-created"]);
        map.insert(Operation::DidRename, ["node-renamed"]);

        let seen = collect_subscriptions(&settings, &full_handler_set(), &map);

        assert_eq!(seen.len(), 3);
        let creates: Vec<_> = seen.iter().filter(|(h, _)| h == "did-create").collect();
        assert_eq!(creates.len(), 2);
    }

    #[test]
    fn test_unmapped_operations_are_skipped() {
        // Map declares nothing at all; no handler is subscribed.
        let seen = collect_subscriptions(
            &Settings::default(),
            &full_handler_set(),
            &HandlerMap::new(),
        );
        assert!(seen.is_empty());
    }

    #[test]
    fn test_missing_handler_module_is_skipped() {
        let mut map = HandlerMap::new();
        map.insert(Operation::DidCreate, ["file-created"]);

        // Empty handler set: nothing to subscribe, nothing panics.
        let seen = collect_subscriptions(&Settings::default(), &HandlerSet::new(), &map);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_route_is_a_pure_traversal() {
        // Two identical invocations observe identical subscription requests.
        let settings = Settings::default();
        let handlers = full_handler_set();
        let mut map = HandlerMap::new();
        map.insert(Operation::WillRename, ["before-rename"]);

        let first = collect_subscriptions(&settings, &handlers, &map);
        let second = collect_subscriptions(&settings, &handlers, &map);
        assert_eq!(first, second);
    }
}
