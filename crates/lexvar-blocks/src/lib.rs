//! The program tree the lexvar scope engine operates on.
//!
//! This crate provides:
//! - `BlockArena`: blocks stored flat, addressed by `BlockIndex`, with
//!   explicit parent links and a tree-edit API
//! - Block kinds: references, declarations, globals, procedure calls,
//!   parameter editors and opaque blocks
//! - `ScopeNode`: the capability the engine consumes, implemented for
//!   `BlockArena`
//! - JSON program documents (`BlockDoc`, `ProgramDoc`)

// Block data
pub mod block;
pub use block::{Block, BlockIndex, BlockKind, Declaration, DeclarationKind, InputSlot, Workspace};

// Arena and tree edits
pub mod arena;
pub use arena::BlockArena;

pub mod error;
pub use error::BlockError;

// Scope capability
pub mod scope_node;
pub use scope_node::{NodeRole, ScopeNode};

// Parameter editors
pub mod mutator;

// Procedure call sites
pub mod procedures;

// JSON documents
pub mod document;
pub use document::{BlockDoc, ProgramDoc};
