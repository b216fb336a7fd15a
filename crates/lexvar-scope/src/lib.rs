//! The lexvar scope engine.
//!
//! This crate provides:
//! - Reference/capture analysis (`reference_result`)
//! - Free-variable computation (`free_variables`)
//! - Capture-avoiding renaming (`rename_free`, `rename_bound`,
//!   `rename_param_from_to`) planned as `RenameEdits` before commit
//! - Names-in-scope queries for reference menus
//! - Global and procedure renaming
//! - Checks for references that no longer resolve
//!
//! Everything works over any tree implementing `lexvar_blocks::ScopeNode`;
//! global and procedure renaming and the reference checks need the concrete
//! `BlockArena`.

pub mod error;
pub use error::ScopeError;

// Analysis
pub mod free_vars;
pub mod references;
pub use free_vars::free_variables;
pub use references::{ReferenceResult, reference_result};

// Renaming
pub mod renamer;
pub use renamer::{
    RenameEdits, plan_rename_bound, plan_rename_free, plan_rename_param, rename_bound,
    rename_free, rename_param, rename_param_from_to,
};

pub mod globals;
pub mod procedures;
pub use globals::rename_global;
pub use procedures::rename_procedure;

// Checks
pub mod checks;
pub use checks::{ReferenceProblem, ReferenceProblemKind, check_references, unbound_references};

// Menus
pub mod scope_names;
pub use scope_names::{lexical_names_in_scope, names_in_scope};
