//! Reference/capture analysis.
//!
//! For a prospective rename of `name`, [`reference_result`] finds the
//! getters and setters that currently resolve to it and the names it must
//! not be renamed to. A capturable is either a name declared between the
//! binder and one of its references (renaming to it would make the inner
//! declaration capture the reference) or the name of an unrelated free
//! reference in the same scope (renaming to it would make our binder capture
//! that reference).
//!
//! Capturables are a multiset: the same name is reported once per reference
//! path that could be shadowed by it. Callers collapse them with
//! `sort_and_remove_duplicates` where a set is wanted.

use lexvar_blocks::{BlockIndex, NodeRole, ScopeNode};
use lexvar_common::prefix::unprefix_name;
use lexvar_common::stack::ensure_stack;
use lexvar_common::{Prefix, ScopeConfig};
use tracing::trace;

/// Outcome of a reference analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceResult {
    /// Reference nodes resolving to the searched name, in tree order.
    pub blocks_to_rename: Vec<BlockIndex>,
    /// Names the searched name cannot be renamed to; may repeat.
    pub capturables: Vec<String>,
}

impl ReferenceResult {
    pub fn is_empty(&self) -> bool {
        self.blocks_to_rename.is_empty() && self.capturables.is_empty()
    }

    /// Concatenate `other` onto `self`, element-wise.
    pub fn append(&mut self, other: ReferenceResult) {
        self.blocks_to_rename.extend(other.blocks_to_rename);
        self.capturables.extend(other.capturables);
    }
}

/// Analyze the subtree rooted at `node` (and its `next` chain) for references
/// to `name` declared with `prefix`.
///
/// `env` holds the names declared between the binder and `node`; prefixed
/// ("local x") when prefixes separate namespaces, bare otherwise.
#[tracing::instrument(level = "debug", skip(tree, env, config), fields(node = %node))]
pub fn reference_result<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    name: &str,
    prefix: Prefix,
    env: &[String],
    config: &ScopeConfig,
) -> ReferenceResult {
    let mut result = ReferenceResult::default();
    Analyzer {
        tree,
        name,
        prefix,
        config,
    }
    .walk(node, env, &mut result);
    result
}

struct Analyzer<'a, T: ?Sized> {
    tree: &'a T,
    name: &'a str,
    prefix: Prefix,
    config: &'a ScopeConfig,
}

impl<T: ScopeNode + ?Sized> Analyzer<'_, T> {
    fn walk(&self, node: BlockIndex, env: &[String], result: &mut ReferenceResult) {
        if node.is_none() {
            return;
        }
        ensure_stack(|| match self.tree.role(node) {
            NodeRole::Reference => self.reference(node, env, result),
            NodeRole::Declaration => self.declaration(node, env, result),
            NodeRole::PatternArgument | NodeRole::Opaque => {
                for child in self.tree.children(node) {
                    self.walk(child, env, result);
                }
            }
        });
    }

    fn declaration(&self, node: BlockIndex, env: &[String], result: &mut ReferenceResult) {
        for child in self.tree.non_scoped_children(node) {
            self.walk(child, env, result);
        }

        let declared_prefix = self.tree.declared_prefix(node);
        let mut inner_env = env.to_vec();
        inner_env.extend(self.tree.declared_names(node).into_iter().map(|declared| {
            if self.config.use_prefix_in_code {
                declared_prefix.possibly_prefix_menu_name_with(&declared, self.config)
            } else {
                declared
            }
        }));
        self.walk(self.tree.scoped_child(node), &inner_env, result);

        self.walk(self.tree.next(node), env, result);
    }

    fn reference(&self, node: BlockIndex, env: &[String], result: &mut ReferenceResult) {
        for child in self.tree.children(node) {
            self.walk(child, env, result);
        }

        let Some(text) = self.tree.referenced_name(node) else {
            return;
        };
        let (reference_prefix, base) = unprefix_name(text, self.config);
        if reference_prefix.is_global() {
            return;
        }

        let not_in_env = if self.config.use_prefix_in_code {
            !env.iter().any(|entry| entry == text)
        } else {
            !env.iter().any(|entry| entry == base)
        };

        if base == self.name && not_in_env {
            trace!(%node, reference = text, "reference to target");
            result.blocks_to_rename.push(node);
            if self.config.use_prefix_in_code {
                for entry in env {
                    let (entry_prefix, entry_base) = unprefix_name(entry, self.config);
                    if entry_prefix == self.prefix {
                        result.capturables.push(entry_base.to_string());
                    }
                }
            } else {
                result.capturables.extend(env.iter().cloned());
            }
        } else if not_in_env && (!self.config.use_prefix_in_code || self.prefix == reference_prefix)
        {
            trace!(%node, reference = text, "free reference is capturable");
            result.capturables.push(base.to_string());
        }
    }
}

#[cfg(test)]
#[path = "../tests/references_tests.rs"]
mod tests;
