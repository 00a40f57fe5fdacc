//! Handler module boundary for the event router.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::Operation;

/// Canonical event payload passed to handler modules.
///
/// Exactly one shape is populated per dispatch; the router never forwards a
/// plugin-native payload untransformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperationArgs {
    /// A file or folder was renamed or moved (or is about to be).
    Rename {
        old_path: PathBuf,
        new_path: PathBuf,
    },
    /// A file or folder was created or deleted (or is about to be).
    Path { path: PathBuf },
}

impl FileOperationArgs {
    pub fn rename(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self::Rename {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path { path: path.into() }
    }
}

/// Trait for the per-operation handler modules.
///
/// Handlers turn a canonical event into the LSP request or notification for
/// one operation. The router's contract ends once `callback` has been invoked
/// with correctly normalized arguments; a handler may be invoked for any of
/// the native events fanned into its operation and must tolerate each.
pub trait OperationHandler: Send + Sync {
    /// Handler module identifier, used for logging and subscription identity.
    fn name(&self) -> &'static str;

    /// Invoked exactly once per logical file-system event.
    fn callback(&self, args: FileOperationArgs);
}

/// The handler modules wired into the bridge, keyed by operation.
#[derive(Default, Clone)]
pub struct HandlerSet {
    handlers: HashMap<Operation, Arc<dyn OperationHandler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler module for an operation.
    pub fn with(mut self, op: Operation, handler: Arc<dyn OperationHandler>) -> Self {
        self.handlers.insert(op, handler);
        self
    }

    /// Get the handler module for an operation, if one was registered.
    pub fn get(&self, op: Operation) -> Option<&Arc<dyn OperationHandler>> {
        self.handlers.get(&op)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.values().map(|h| h.name()).collect();
        names.sort_unstable();
        f.debug_struct("HandlerSet").field("handlers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    impl OperationHandler for NoopHandler {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn callback(&self, _args: FileOperationArgs) {}
    }

    #[test]
    fn test_handler_set_lookup() {
        let set = HandlerSet::new().with(Operation::DidRename, Arc::new(NoopHandler));

        assert_eq!(set.len(), 1);
        assert!(set.get(Operation::DidRename).is_some());
        assert!(set.get(Operation::WillRename).is_none());
    }

    #[test]
    fn test_args_constructors() {
        let rename = FileOperationArgs::rename("/a/old.rs", "/a/new.rs");
        assert_eq!(
            rename,
            FileOperationArgs::Rename {
                old_path: PathBuf::from("/a/old.rs"),
                new_path: PathBuf::from("/a/new.rs"),
            }
        );

        let single = FileOperationArgs::path("/a/file.rs");
        assert_eq!(
            single,
            FileOperationArgs::Path {
                path: PathBuf::from("/a/file.rs"),
            }
        );
    }
}
