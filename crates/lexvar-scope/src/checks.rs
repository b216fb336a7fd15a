//! Reference checks.
//!
//! Flags getters and setters whose stored name no longer resolves: the
//! name is not offered by the reference menu at that point, or the reference
//! sits inside a global initializer where nothing lexical is in scope.

use lexvar_blocks::{BlockArena, BlockIndex, ScopeNode};
use lexvar_common::ScopeConfig;
use lexvar_common::limits::MAX_PARENT_CHAIN_DEPTH;
use lexvar_common::prefix::unprefix_name;
use tracing::{debug, warn};

use crate::scope_names::lexical_names_in_scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblemKind {
    /// The name is neither a global nor declared by an enclosing scope.
    NotInScope,
    /// The reference is part of a global declaration's initializer.
    InGlobalDefinition,
}

impl ReferenceProblemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotInScope => "notInScope",
            Self::InGlobalDefinition => "inGlobalDefinition",
        }
    }
}

/// One reference that needs the user's attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceProblem {
    pub block: BlockIndex,
    /// The reference text as stored.
    pub name: String,
    pub kind: ReferenceProblemKind,
}

/// Check every getter and setter of the main workspace, in workspace order.
pub fn check_references(arena: &BlockArena, config: &ScopeConfig) -> Vec<ReferenceProblem> {
    let problems: Vec<ReferenceProblem> = arena
        .main_workspace_blocks()
        .into_iter()
        .filter_map(|block| {
            let name = arena.get(block)?.reference_text()?;
            let kind = if in_global_definition(arena, block) {
                ReferenceProblemKind::InGlobalDefinition
            } else if !resolves(arena, block, name, config) {
                ReferenceProblemKind::NotInScope
            } else {
                return None;
            };
            Some(ReferenceProblem {
                block,
                name: name.to_string(),
                kind,
            })
        })
        .collect();
    debug!(problems = problems.len(), "checked references");
    problems
}

/// The references of the main workspace whose name does not resolve.
pub fn unbound_references(arena: &BlockArena, config: &ScopeConfig) -> Vec<BlockIndex> {
    check_references(arena, config)
        .into_iter()
        .filter(|problem| problem.kind == ReferenceProblemKind::NotInScope)
        .map(|problem| problem.block)
        .collect()
}

fn in_global_definition(arena: &BlockArena, block: BlockIndex) -> bool {
    let mut root = block;
    let mut depth = 0;
    while arena.parent(root).is_some() {
        depth += 1;
        if depth > MAX_PARENT_CHAIN_DEPTH {
            warn!(%block, "parent chain too deep; root not found");
            return false;
        }
        root = arena.parent(root);
    }
    root != block && arena.get(root).is_some_and(|top| top.global_name().is_some())
}

fn resolves(arena: &BlockArena, block: BlockIndex, name: &str, config: &ScopeConfig) -> bool {
    let (prefix, base) = unprefix_name(name, config);
    if base.trim().is_empty() {
        return false;
    }
    if prefix.is_global() {
        return arena
            .global_names(BlockIndex::NONE)
            .iter()
            .any(|global| global == base);
    }
    lexical_names_in_scope(arena, block, config)
        .iter()
        .any(|(_, value)| {
            let (declared_prefix, declared) = unprefix_name(value, config);
            declared == base && (!config.use_prefix_in_code || declared_prefix == prefix)
        })
}

#[cfg(test)]
#[path = "../tests/checks_tests.rs"]
mod tests;
