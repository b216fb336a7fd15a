//! Common types and utilities for the lexvar scope engine.
//!
//! This crate provides the leaf algebra used across all lexvar crates:
//! - Name sets (`NameSet`) and substitutions (`Substitution`)
//! - Namespace prefixes (`Prefix`) and prefix/unprefix helpers
//! - Identifier legalization and fresh-name generation
//! - The engine configuration (`ScopeConfig`)
//! - Walk limits and stack growth for deep trees

// Set-of-names algebra
pub mod name_set;
pub use name_set::NameSet;

// Finite old-name -> new-name mappings
pub mod substitution;
pub use substitution::Substitution;

// Namespace prefixes ("global", "input", "local", "item", "counter")
pub mod prefix;
pub use prefix::{GLOBAL_KEYWORD, MENU_SEPARATOR, Prefix};

// Identifier legality and uniqueness suffixing
pub mod identifier;
pub use identifier::{
    IdentifierCheck, check_identifier, make_legal_identifier, name_not_in, prefix_suffix,
    sort_and_remove_duplicates, string_lists_equal,
};

// Prefix display/namespace flags
pub mod config;
pub use config::ScopeConfig;

// Centralized limits
pub mod limits;
pub mod stack;
