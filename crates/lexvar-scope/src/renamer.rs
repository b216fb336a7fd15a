//! Capture-avoiding renaming.
//!
//! Every operation runs in two phases. A planner walks the unmodified tree
//! and records the field rewrites a rename needs in a [`RenameEdits`]
//! buffer; only once the whole walk has succeeded is the buffer committed.
//! A failing rename therefore leaves the tree untouched, and no decision is
//! ever made while looking at a half-renamed tree.
//!
//! Two user-facing policies exist for renaming a declared name:
//!
//! - renaming capturables: inner declarations that would capture the new name
//!   are themselves alpha-renamed; a clash with a name declared outside the
//!   node is rejected with [`ScopeError::ExternalCapture`].
//! - keeping capturables (the default for direct edits): the inner tree is
//!   left alone and the new name is adjusted with `name_not_in` until nothing
//!   would be captured.

use lexvar_blocks::{BlockIndex, NodeRole, ScopeNode};
use lexvar_common::prefix::unprefix_name;
use lexvar_common::stack::ensure_stack;
use lexvar_common::{
    NameSet, Prefix, ScopeConfig, Substitution, make_legal_identifier, name_not_in,
    sort_and_remove_duplicates,
};
use tracing::{debug, trace};

use crate::error::ScopeError;
use crate::free_vars::free_variables;
use crate::references::reference_result;
use crate::scope_names::names_in_scope;

// =============================================================================
// Edit buffer
// =============================================================================

/// Field rewrites planned against an unmodified tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameEdits {
    declarations: Vec<(BlockIndex, Substitution)>,
    references: Vec<(BlockIndex, String)>,
}

impl RenameEdits {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.references.is_empty()
    }

    /// Declaring nodes and the substitution applied to their names.
    pub fn declarations(&self) -> &[(BlockIndex, Substitution)] {
        &self.declarations
    }

    /// Reference nodes and their new field text.
    pub fn references(&self) -> &[(BlockIndex, String)] {
        &self.references
    }

    /// Apply every planned rewrite to `tree`.
    pub fn commit<T: ScopeNode + ?Sized>(self, tree: &mut T) {
        debug!(
            declarations = self.declarations.len(),
            references = self.references.len(),
            "commit rename"
        );
        for (node, substitution) in self.declarations {
            tree.rename_declared_names(node, &substitution);
        }
        for (node, text) in self.references {
            tree.set_referenced_name(node, text);
        }
    }

    fn rename_reference(&mut self, node: BlockIndex, text: &str, base: &str, new_base: &str) {
        // Keep whatever prefix the reference was written with.
        let kept = &text[..text.len() - base.len()];
        self.references.push((node, format!("{kept}{new_base}")));
    }
}

// =============================================================================
// Planner
// =============================================================================

struct Planner<'a, T: ?Sized> {
    tree: &'a T,
    config: &'a ScopeConfig,
    edits: RenameEdits,
}

impl<'a, T: ScopeNode + ?Sized> Planner<'a, T> {
    fn new(tree: &'a T, config: &'a ScopeConfig) -> Self {
        Self {
            tree,
            config,
            edits: RenameEdits::default(),
        }
    }

    fn rename_free(&mut self, node: BlockIndex, free: &Substitution) -> Result<(), ScopeError> {
        if node.is_none() {
            return Ok(());
        }
        let tree = self.tree;
        ensure_stack(|| match tree.role(node) {
            NodeRole::Reference => {
                if let Some(text) = tree.referenced_name(node) {
                    let (prefix, base) = unprefix_name(text, self.config);
                    if !prefix.is_global() {
                        let new_base = free.apply(base);
                        if new_base != base {
                            trace!(%node, from = base, to = new_base, "rename free reference");
                            self.edits.rename_reference(node, text, base, new_base);
                        }
                    }
                }
                for child in tree.children(node) {
                    self.rename_free(child, free)?;
                }
                Ok(())
            }
            NodeRole::Declaration if tree.is_closed(node) => {
                // Closed declarations have nothing free to rename.
                free_variables(tree, node, self.config).map(|_| ())
            }
            NodeRole::Declaration => {
                let bound = self.capture_avoiding_substitution(node, free)?;
                self.rename_bound(node, &bound, free)
            }
            NodeRole::PatternArgument => Ok(()),
            NodeRole::Opaque => {
                for child in tree.children(node) {
                    self.rename_free(child, free)?;
                }
                Ok(())
            }
        })
    }

    /// Fresh names for the declared names of `node` that `free` would make
    /// capture a body reference.
    fn capture_avoiding_substitution(
        &self,
        node: BlockIndex,
        free: &Substitution,
    ) -> Result<Substitution, ScopeError> {
        let locals = NameSet::from_names(self.tree.declared_names(node));
        let mut body_free = free_variables(self.tree, self.tree.scoped_child(node), self.config)?;
        body_free.subtract(&locals);
        let renamed_free = body_free.renamed(free);
        let captured = renamed_free.intersection(&locals);

        let mut bound = Substitution::new();
        if captured.is_empty() {
            return Ok(bound);
        }
        let mut forbidden = locals.union(&renamed_free).to_list();
        for name in captured.to_list() {
            let fresh = name_not_in(&name, &forbidden);
            debug!(%node, captured = %name, fresh = %fresh, "capture avoided");
            forbidden.push(fresh.clone());
            bound.extend(&Substitution::simple(name, fresh));
        }
        Ok(bound)
    }

    fn rename_bound(
        &mut self,
        node: BlockIndex,
        bound: &Substitution,
        free: &Substitution,
    ) -> Result<(), ScopeError> {
        if self.tree.role(node) != NodeRole::Declaration {
            let (block, type_name) = self.tree.describe(node);
            return Err(ScopeError::NotADeclaration { block, type_name });
        }

        for child in self.tree.non_scoped_children(node) {
            self.rename_free(child, free)?;
        }

        let locals = self.tree.declared_names(node);
        let param = bound.restrict_domain(&locals);
        if param.entries().iter().any(|(old, new)| old != new) {
            self.edits.declarations.push((node, param.clone()));
        }
        let body = free.removed(&locals).extended(&param);
        self.rename_free(self.tree.scoped_child(node), &body)?;

        self.rename_free(self.tree.next(node), free)
    }

    /// Rename `old` to `new` in the declaration at `node` and its scope,
    /// renaming any inner declaration that would capture `new`.
    fn rename_capturables(
        &mut self,
        node: BlockIndex,
        old: &str,
        new: &str,
    ) -> Result<(), ScopeError> {
        if old == new {
            return Ok(());
        }
        self.check_declared(node, old)?;

        let mut declared = self.tree.declared_names(node);
        for (display, value) in names_in_scope(self.tree, node, self.config) {
            let distinct = display != value;
            declared.push(display);
            if distinct {
                declared.push(value);
            }
        }
        if declared.iter().any(|name| name == new) {
            debug!(%node, new, "rename would capture an outer name");
            return Err(ScopeError::ExternalCapture {
                new_name: new.to_string(),
                declared,
            });
        }

        self.rename_bound(node, &Substitution::simple(old, new), &Substitution::new())
    }

    fn check_declared(&self, node: BlockIndex, old: &str) -> Result<(), ScopeError> {
        if self.tree.declares(node, old) {
            return Ok(());
        }
        let (block, _) = self.tree.describe(node);
        Err(ScopeError::UndeclaredName {
            block,
            name: old.to_string(),
            declared: self.tree.declared_names(node),
        })
    }

    /// Rename `old` to a variant of `new` that nothing in scope captures,
    /// leaving inner declarations alone. Returns the chosen name.
    fn rename_keeping_capturables(
        &mut self,
        node: BlockIndex,
        old: &str,
        new: &str,
    ) -> Result<String, ScopeError> {
        if old == new {
            return Ok(old.to_string());
        }
        if self.tree.role(node) == NodeRole::Declaration {
            self.check_declared(node, old)?;
        }
        let source_prefix = if self.config.show_prefix_to_user {
            self.tree.declared_prefix(node)
        } else {
            Prefix::None
        };

        let mut blocks_to_rename = Vec::new();
        let mut capturables = Vec::new();
        for root in self.tree.blocks_in_scope(node) {
            let result = reference_result(self.tree, root, old, source_prefix, &[], self.config);
            blocks_to_rename.extend(result.blocks_to_rename);
            capturables.extend(result.capturables);
        }

        let mut declared = self.tree.declared_names(node);
        if let Some(position) = declared.iter().position(|name| name == old) {
            declared.remove(position);
        }

        let mut conflicts = sort_and_remove_duplicates(&capturables);
        conflicts.extend(declared.iter().cloned());
        let conflicts = sort_and_remove_duplicates(&conflicts);
        let chosen = name_not_in(new, &conflicts);
        debug!(%node, old, requested = new, chosen = %chosen, "rename keeping capturables");

        // With `old` declared twice here the references stay with the other
        // copy.
        if chosen != old && !declared.iter().any(|name| name == old) {
            let tree = self.tree;
            for block in blocks_to_rename {
                if let Some(text) = tree.referenced_name(block) {
                    let (_, base) = unprefix_name(text, self.config);
                    self.edits.rename_reference(block, text, base, &chosen);
                }
            }
            self.edits
                .declarations
                .push((node, Substitution::simple(old, chosen.clone())));
        }
        Ok(chosen)
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Plan applying `free` to every free reference under `node` (and its `next`
/// chain), alpha-renaming declarations that would otherwise capture.
pub fn plan_rename_free<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    free: &Substitution,
    config: &ScopeConfig,
) -> Result<RenameEdits, ScopeError> {
    let mut planner = Planner::new(tree, config);
    planner.rename_free(node, free)?;
    Ok(planner.edits)
}

#[tracing::instrument(level = "debug", skip(tree, config), fields(node = %node))]
pub fn rename_free<T: ScopeNode + ?Sized>(
    tree: &mut T,
    node: BlockIndex,
    free: &Substitution,
    config: &ScopeConfig,
) -> Result<(), ScopeError> {
    plan_rename_free(&*tree, node, free, config)?.commit(tree);
    Ok(())
}

/// Plan renaming the declaration at `node` with `bound`, pushing `free` into
/// its children. Names `bound` leaves alone are shadowed inside the scope, so
/// `free` does not reach references to them there.
pub fn plan_rename_bound<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    bound: &Substitution,
    free: &Substitution,
    config: &ScopeConfig,
) -> Result<RenameEdits, ScopeError> {
    let mut planner = Planner::new(tree, config);
    planner.rename_bound(node, bound, free)?;
    Ok(planner.edits)
}

pub fn rename_bound<T: ScopeNode + ?Sized>(
    tree: &mut T,
    node: BlockIndex,
    bound: &Substitution,
    free: &Substitution,
    config: &ScopeConfig,
) -> Result<(), ScopeError> {
    plan_rename_bound(&*tree, node, bound, free, config)?.commit(tree);
    Ok(())
}

/// Plan [`rename_param_from_to`]. Returns the chosen name with the edits.
pub fn plan_rename_param<T: ScopeNode + ?Sized>(
    tree: &T,
    node: BlockIndex,
    old: &str,
    new: &str,
    rename_capturables: bool,
    config: &ScopeConfig,
) -> Result<(String, RenameEdits), ScopeError> {
    let mut planner = Planner::new(tree, config);
    let chosen = if rename_capturables && !tree.must_not_rename_capturables(node) {
        planner.rename_capturables(node, old, new)?;
        new.to_string()
    } else {
        planner.rename_keeping_capturables(node, old, new)?
    };
    Ok((chosen, planner.edits))
}

/// Rename the name `old` declared at `node` to `new`, updating every
/// reference in its scope.
///
/// With `rename_capturables` the result is always `new`; inner declarations
/// that would capture it are renamed instead. Without it (and always for
/// parameter-editor arguments) the result is the possibly adjusted new name.
#[tracing::instrument(level = "debug", skip(tree, config), fields(node = %node))]
pub fn rename_param_from_to<T: ScopeNode + ?Sized>(
    tree: &mut T,
    node: BlockIndex,
    old: &str,
    new: &str,
    rename_capturables: bool,
    config: &ScopeConfig,
) -> Result<String, ScopeError> {
    let (chosen, edits) = plan_rename_param(&*tree, node, old, new, rename_capturables, config)?;
    edits.commit(tree);
    Ok(chosen)
}

/// A direct edit of a declared name: legalize the typed text, then rename
/// without touching inner declarations.
pub fn rename_param<T: ScopeNode + ?Sized>(
    tree: &mut T,
    node: BlockIndex,
    old: &str,
    raw_new: &str,
    config: &ScopeConfig,
) -> Result<String, ScopeError> {
    let new = make_legal_identifier(raw_new);
    rename_param_from_to(tree, node, old, &new, false, config)
}

#[cfg(test)]
#[path = "../tests/renamer_tests.rs"]
mod tests;
