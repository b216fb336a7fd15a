//! Free-variable computation.

use lexvar_blocks::{BlockIndex, NodeRole, ScopeNode};
use lexvar_common::prefix::unprefix_name;
use lexvar_common::stack::ensure_stack;
use lexvar_common::{NameSet, ScopeConfig};
use tracing::warn;

use crate::error::ScopeError;

/// Names referenced in the subtree at `node` (including its `next` chain)
/// that no declaration inside that subtree binds. Global references are
/// never free.
///
/// Fails with [`ScopeError::InvariantViolation`] when a closed declaration
/// anywhere in the subtree has free variables of its own.
pub fn free_variables<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    config: &ScopeConfig,
) -> Result<NameSet, ScopeError> {
    if node.is_none() {
        return Ok(NameSet::new());
    }
    ensure_stack(|| match tree.role(node) {
        NodeRole::Reference => {
            let mut result = union_of(tree, &tree.children(node), config)?;
            if let Some(text) = tree.referenced_name(node) {
                let (prefix, base) = unprefix_name(text, config);
                if !prefix.is_global() {
                    result.insert(base);
                }
            }
            Ok(result)
        }
        NodeRole::Declaration => declaration_free_variables(tree, node, config),
        NodeRole::PatternArgument | NodeRole::Opaque => {
            union_of(tree, &tree.children(node), config)
        }
    })
}

fn declaration_free_variables<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    config: &ScopeConfig,
) -> Result<NameSet, ScopeError> {
    let declared = NameSet::from_names(tree.declared_names(node));
    let mut result = free_variables(tree, tree.scoped_child(node), config)?;
    result.subtract(&declared);

    if tree.is_closed(node) {
        if result.is_empty() {
            return Ok(result);
        }
        let (block, type_name) = tree.describe(node);
        warn!(%block, %type_name, free = %result, "closed declaration has free variables");
        return Err(ScopeError::InvariantViolation {
            block,
            type_name,
            free: result,
        });
    }

    result.unite(&union_of(tree, &tree.non_scoped_children(node), config)?);
    result.unite(&free_variables(tree, tree.next(node), config)?);
    Ok(result)
}

fn union_of<T: ScopeNode + ?Sized>(
    tree: &T,
    nodes: &[BlockIndex],
    config: &ScopeConfig,
) -> Result<NameSet, ScopeError> {
    let mut result = NameSet::new();
    for &child in nodes {
        result.unite(&free_variables(tree, child, config)?);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "../tests/free_vars_tests.rs"]
mod tests;
