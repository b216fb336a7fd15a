use lexvar_blocks::BlockError;
use lexvar_common::NameSet;
use thiserror::Error;

/// Errors raised by the analyzer and renamer.
///
/// Ordinary user renames never fail: the default policy adjusts the new name
/// instead. Only a broken tree or an explicit request that would capture an
/// outer name comes back as an error, and in both cases nothing has been
/// written to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A closed declaration (a procedure) refers to names it does not bind.
    /// This is a defect in how the tree was built, not a user mistake.
    #[error(
        "Violation of invariant: procedure declaration has nonempty free variables: {free} \
         (block '{block}', {type_name})"
    )]
    InvariantViolation {
        block: String,
        type_name: String,
        free: NameSet,
    },

    #[error("newName {new_name} is in existing declarations {{{names}}}", names = .declared.join(","))]
    ExternalCapture {
        new_name: String,
        declared: Vec<String>,
    },

    #[error(
        "oldName {name} is not in declarations {{{names}}} of block '{block}'",
        names = .declared.join(",")
    )]
    UndeclaredName {
        block: String,
        name: String,
        declared: Vec<String>,
    },

    #[error("block '{block}' ({type_name}) is not a declaration block")]
    NotADeclaration { block: String, type_name: String },

    /// Tree-level failures: missing blocks, positional list mismatches.
    #[error(transparent)]
    Block(#[from] BlockError),
}

impl ScopeError {
    /// Internal defects, as opposed to rejected requests.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, ScopeError::InvariantViolation { .. })
    }

    /// Requests the caller may retry with a different name.
    pub fn is_rejected_rename(&self) -> bool {
        matches!(
            self,
            ScopeError::ExternalCapture { .. } | ScopeError::UndeclaredName { .. }
        )
    }
}
