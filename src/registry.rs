//! Static registry of LSP workspace file operations.
//!
//! Maps each of the six operations to the handler module responsible for it
//! and the client capability it is advertised under. Pure data; referenced by
//! the configuration resolver, the event router, and the capability builder.

use std::fmt;

/// One of the six LSP workspace file-operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    WillRename,
    DidRename,
    WillCreate,
    DidCreate,
    WillDelete,
    DidDelete,
}

impl Operation {
    /// All operations. Iteration order carries no meaning; operations are
    /// independent of each other.
    pub const ALL: [Operation; 6] = [
        Operation::WillRename,
        Operation::DidRename,
        Operation::WillCreate,
        Operation::DidCreate,
        Operation::WillDelete,
        Operation::DidDelete,
    ];

    /// Identifier of the handler module invoked for this operation.
    pub fn handler_module(&self) -> &'static str {
        match self {
            Operation::WillRename => "will-rename",
            Operation::DidRename => "did-rename",
            Operation::WillCreate => "will-create",
            Operation::DidCreate => "did-create",
            Operation::WillDelete => "will-delete",
            Operation::DidDelete => "did-delete",
        }
    }

    /// Field name of this operation inside the client's
    /// `workspace.fileOperations` capabilities.
    pub fn capability(&self) -> &'static str {
        match self {
            Operation::WillRename => "willRename",
            Operation::DidRename => "didRename",
            Operation::WillCreate => "willCreate",
            Operation::DidCreate => "didCreate",
            Operation::WillDelete => "willDelete",
            Operation::DidDelete => "didDelete",
        }
    }

    /// Key under `[operations]` in the configuration file.
    pub fn config_key(&self) -> &'static str {
        match self {
            Operation::WillRename => "will_rename_files",
            Operation::DidRename => "did_rename_files",
            Operation::WillCreate => "will_create_files",
            Operation::DidCreate => "did_create_files",
            Operation::WillDelete => "will_delete_files",
            Operation::DidDelete => "did_delete_files",
        }
    }

    /// Whether this operation fires before the file-system change happens.
    pub fn is_will(&self) -> bool {
        matches!(
            self,
            Operation::WillRename | Operation::WillCreate | Operation::WillDelete
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_module())
    }
}
