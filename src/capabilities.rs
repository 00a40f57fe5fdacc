//! Client capability advertisement for workspace file operations.
//!
//! Derives the `workspace.fileOperations` capability flags from resolved
//! settings, independent of which source adapters are active. The returned
//! document is meant to be merged into the larger client-capabilities
//! document sent during LSP session initialization.

use lsp_types::{
    ClientCapabilities, WorkspaceClientCapabilities, WorkspaceFileOperationsClientCapabilities,
};

use crate::config::Settings;

/// Build the capability document from resolved settings.
///
/// Pure function: one flag per operation, equal to that operation's enabled
/// state. Callable any number of times.
pub fn build(settings: &Settings) -> ClientCapabilities {
    let ops = &settings.operations;

    ClientCapabilities {
        workspace: Some(WorkspaceClientCapabilities {
            file_operations: Some(WorkspaceFileOperationsClientCapabilities {
                will_rename: Some(ops.will_rename_files),
                did_rename: Some(ops.did_rename_files),
                will_create: Some(ops.will_create_files),
                did_create: Some(ops.did_create_files),
                will_delete: Some(ops.will_delete_files),
                did_delete: Some(ops.did_delete_files),
                dynamic_registration: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Capability document before any configuration has been resolved.
///
/// Falls back to the built-in defaults (all six operations enabled) rather
/// than failing.
pub fn default_capabilities() -> ClientCapabilities {
    build(&Settings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SetupOptions;
    use crate::registry::Operation;

    fn file_operations(caps: &ClientCapabilities) -> &WorkspaceFileOperationsClientCapabilities {
        caps.workspace
            .as_ref()
            .unwrap()
            .file_operations
            .as_ref()
            .unwrap()
    }

    #[test]
    fn test_all_enabled_by_default() {
        let caps = default_capabilities();
        let ops = file_operations(&caps);

        assert_eq!(ops.will_rename, Some(true));
        assert_eq!(ops.did_rename, Some(true));
        assert_eq!(ops.will_create, Some(true));
        assert_eq!(ops.did_create, Some(true));
        assert_eq!(ops.will_delete, Some(true));
        assert_eq!(ops.did_delete, Some(true));
    }

    #[test]
    fn test_disabling_one_operation_leaves_others_untouched() {
        let settings = Settings::resolve_from(
            "/nonexistent/config.toml",
            &SetupOptions::new().operation(Operation::DidRename, false),
        )
        .unwrap();

        let caps = build(&settings);
        let ops = file_operations(&caps);

        assert_eq!(ops.did_rename, Some(false));
        assert_eq!(ops.will_rename, Some(true));
        assert_eq!(ops.did_delete, Some(true));
    }

    #[test]
    fn test_document_shape() {
        // The serialized document nests as workspace.fileOperations with
        // camelCase flags, ready to merge into the initialize request.
        let json = serde_json::to_value(default_capabilities()).unwrap();
        assert_eq!(
            json["workspace"]["fileOperations"]["willRename"],
            serde_json::json!(true)
        );
    }
}
