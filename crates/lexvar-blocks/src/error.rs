use thiserror::Error;

use crate::block::BlockIndex;

/// Errors raised by tree edits and document loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("no block at {0}")]
    MissingBlock(BlockIndex),

    #[error("no block with id '{0}'")]
    UnknownId(String),

    #[error("duplicate block id '{0}'")]
    DuplicateId(String),

    #[error("block '{block}' ({type_name}) has no input named '{input}'")]
    UnknownInput {
        block: String,
        type_name: String,
        input: String,
    },

    #[error("block '{block}' ({type_name}) is missing field '{field}'")]
    MissingField {
        block: String,
        type_name: String,
        field: String,
    },

    #[error("connecting '{child}' below '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },

    #[error("block '{block}' cannot take a next block")]
    NoNextConnection { block: String },

    /// Positional lists that must line up do not.
    #[error("{context}: expected {expected} entries, found {found}")]
    StructuralMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("block '{block}' ({type_name}) is not a {expected}")]
    WrongKind {
        block: String,
        type_name: String,
        expected: &'static str,
    },

    #[error("program nested deeper than {0} levels")]
    TooDeep(usize),
}
