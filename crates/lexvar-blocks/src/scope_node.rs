//! The capability a program tree exposes to the scope engine.
//!
//! The engine never matches on block kinds. It asks the tree for a node's
//! [`NodeRole`] and then uses the accessors below. Structural defaults
//! (`children`, `blocks_in_scope`, `scope_covers`, ...) are provided once
//! here and shared by every node kind.

use lexvar_common::{Prefix, Substitution};
use smallvec::SmallVec;
use tracing::trace;

use crate::arena::BlockArena;
use crate::block::{BlockIndex, BlockKind, DeclarationKind};

/// How the engine treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Binds names over its scoped input.
    Declaration,
    /// A getter or setter naming a variable.
    Reference,
    /// An argument in a parameter editor. It names a declaration's
    /// parameter but is not part of the program tree.
    PatternArgument,
    /// Anything else; recursed into uniformly.
    Opaque,
}

pub trait ScopeNode {
    fn role(&self, node: BlockIndex) -> NodeRole;

    /// Names bound by `node`, in declaration order.
    fn declared_names(&self, node: BlockIndex) -> Vec<String>;

    /// Namespace of the names `node` declares.
    fn declared_prefix(&self, node: BlockIndex) -> Prefix;

    /// The child subtree in which the declared names are visible.
    fn scoped_child(&self, node: BlockIndex) -> BlockIndex;

    /// Child subtrees (possibly empty slots) that are not in scope of the
    /// declared names, in input order.
    fn non_scoped_children(&self, node: BlockIndex) -> SmallVec<[BlockIndex; 4]>;

    fn next(&self, node: BlockIndex) -> BlockIndex;

    fn parent(&self, node: BlockIndex) -> BlockIndex;

    /// Closed declarations scope over every child and must not have free
    /// variables.
    fn is_closed(&self, node: BlockIndex) -> bool;

    /// Renaming from this node always adjusts the new name instead of
    /// renaming inner declarations.
    fn must_not_rename_capturables(&self, node: BlockIndex) -> bool;

    /// Field text of a reference node, possibly prefixed.
    fn referenced_name(&self, node: BlockIndex) -> Option<&str>;

    /// Sorted-by-workspace names of every global declaration except
    /// `excluded`.
    fn global_names(&self, excluded: BlockIndex) -> Vec<String>;

    /// Human-readable identity for logs and errors.
    fn describe(&self, node: BlockIndex) -> (String, String);

    fn set_referenced_name(&mut self, node: BlockIndex, name: String);

    /// Apply `substitution` to the names `node` declares, together with any
    /// storage mirroring them (open parameter editors, call sites).
    fn rename_declared_names(&mut self, node: BlockIndex, substitution: &Substitution);

    // =========================================================================
    // Provided
    // =========================================================================

    /// Non-scoped children, then the scoped child, then `next`; empty slots
    /// dropped.
    fn children(&self, node: BlockIndex) -> SmallVec<[BlockIndex; 4]> {
        let mut children = self.non_scoped_children(node);
        children.push(self.scoped_child(node));
        children.push(self.next(node));
        children.retain(|child| child.is_some());
        children
    }

    /// The value expression of a setter.
    fn value_child(&self, node: BlockIndex) -> BlockIndex {
        if self.role(node) != NodeRole::Reference {
            return BlockIndex::NONE;
        }
        self.non_scoped_children(node)
            .first()
            .copied()
            .unwrap_or(BlockIndex::NONE)
    }

    /// Roots of the subtrees in which a rename of one of `node`'s names must
    /// look for references.
    fn blocks_in_scope(&self, node: BlockIndex) -> Vec<BlockIndex> {
        let scoped = self.scoped_child(node);
        if scoped.is_some() {
            vec![scoped]
        } else {
            Vec::new()
        }
    }

    /// Whether `name` is one of the names `node` declares.
    fn declares(&self, node: BlockIndex, name: &str) -> bool {
        self.declared_names(node).iter().any(|declared| declared == name)
    }

    /// Whether names declared by `ancestor` are visible in its child `child`.
    fn scope_covers(&self, ancestor: BlockIndex, child: BlockIndex) -> bool {
        if self.role(ancestor) != NodeRole::Declaration || child.is_none() {
            return false;
        }
        self.is_closed(ancestor) || self.scoped_child(ancestor) == child
    }
}

impl BlockArena {
    /// The container of the parameter editor holding `arg`, if any.
    pub fn container_of(&self, arg: BlockIndex) -> BlockIndex {
        let mut current = self.parent(arg);
        while let Some(block) = self.get(current) {
            if matches!(block.kind, BlockKind::MutatorContainer { .. }) {
                return current;
            }
            current = block.parent;
        }
        BlockIndex::NONE
    }

    /// The declaration edited by the parameter editor holding `arg`.
    pub fn owner_of(&self, arg: BlockIndex) -> BlockIndex {
        match self.get(self.container_of(arg)).map(|block| &block.kind) {
            Some(BlockKind::MutatorContainer { owner }) => *owner,
            _ => BlockIndex::NONE,
        }
    }

    /// Arguments of a mutator container, in stack order.
    pub fn container_args(&self, container: BlockIndex) -> Vec<BlockIndex> {
        let mut args = Vec::new();
        let mut current = self.input_target(container, "STACK");
        while let Some(block) = self.get(current) {
            args.push(current);
            current = block.next;
        }
        args
    }

    pub fn mutator_arg_name(&self, arg: BlockIndex) -> Option<&str> {
        match self.get(arg).map(|block| &block.kind) {
            Some(BlockKind::MutatorArg { name }) => Some(name),
            _ => None,
        }
    }

    /// Parameter names listed in a mutator container.
    pub fn container_names(&self, container: BlockIndex) -> Vec<String> {
        self.container_args(container)
            .into_iter()
            .filter_map(|arg| self.mutator_arg_name(arg).map(str::to_string))
            .collect()
    }

    fn rename_declaration_names(&mut self, node: BlockIndex, substitution: &Substitution) {
        let Ok(decl) = self.declaration_mut(node) else {
            return;
        };
        let renamed = substitution.map(&decl.names);
        if renamed == decl.names {
            return;
        }
        trace!(%node, from = ?decl.names, to = ?renamed, "rename declared names");
        decl.names = renamed;
        let mutator = decl.mutator;
        let procedure = match decl.kind {
            DeclarationKind::Procedure { .. } => decl.procedure_name.clone(),
            _ => None,
        };

        for arg in self.container_args(mutator) {
            if let Some(BlockKind::MutatorArg { name }) =
                self.block_mut(arg).ok().map(|block| &mut block.kind)
            {
                let new_name = substitution.apply(name).to_string();
                *name = new_name;
            }
        }

        if let Some(procedure) = procedure {
            for call in self.callers_of(&procedure) {
                if let Some(BlockKind::ProcedureCall { arg_names, .. }) =
                    self.block_mut(call).ok().map(|block| &mut block.kind)
                {
                    *arg_names = substitution.map(arg_names);
                }
            }
        }
    }

    fn rename_mutator_arg(&mut self, arg: BlockIndex, substitution: &Substitution) {
        let Some(old) = self.mutator_arg_name(arg).map(str::to_string) else {
            return;
        };
        let new = substitution.apply(&old).to_string();
        if new == old {
            return;
        }
        if let Some(BlockKind::MutatorArg { name }) =
            self.block_mut(arg).ok().map(|block| &mut block.kind)
        {
            *name = new.clone();
        }

        let container = self.container_of(arg);
        let owner = self.owner_of(arg);
        let Some(position) = self.container_args(container).iter().position(|&a| a == arg) else {
            return;
        };
        let owner_name = self
            .declaration(owner)
            .ok()
            .and_then(|decl| decl.names.get(position).cloned());
        if owner_name.as_deref() == Some(old.as_str()) {
            self.rename_declaration_names(owner, &Substitution::simple(old, new));
        }
    }
}

impl ScopeNode for BlockArena {
    fn role(&self, node: BlockIndex) -> NodeRole {
        match self.get(node).map(|block| &block.kind) {
            Some(BlockKind::Declaration(_)) => NodeRole::Declaration,
            Some(BlockKind::Getter { .. }) | Some(BlockKind::Setter { .. }) => NodeRole::Reference,
            Some(BlockKind::MutatorArg { .. }) => NodeRole::PatternArgument,
            _ => NodeRole::Opaque,
        }
    }

    fn declared_names(&self, node: BlockIndex) -> Vec<String> {
        match self.get(node).map(|block| &block.kind) {
            Some(BlockKind::Declaration(decl)) => decl.names.clone(),
            Some(BlockKind::MutatorArg { .. }) => self.container_names(self.container_of(node)),
            Some(BlockKind::MutatorContainer { .. }) => self.container_names(node),
            _ => Vec::new(),
        }
    }

    fn declared_prefix(&self, node: BlockIndex) -> Prefix {
        match self.get(node).map(|block| &block.kind) {
            Some(BlockKind::Declaration(decl)) => decl.kind.prefix(),
            Some(BlockKind::MutatorArg { .. }) => self
                .declaration(self.owner_of(node))
                .map_or(Prefix::Local, |decl| decl.kind.prefix()),
            Some(BlockKind::GlobalDeclaration { .. }) => Prefix::Global,
            _ => Prefix::None,
        }
    }

    fn scoped_child(&self, node: BlockIndex) -> BlockIndex {
        match self.get(node) {
            Some(block) => match &block.kind {
                BlockKind::Declaration(decl) => block.input_target(decl.kind.scoped_input()),
                _ => BlockIndex::NONE,
            },
            None => BlockIndex::NONE,
        }
    }

    fn non_scoped_children(&self, node: BlockIndex) -> SmallVec<[BlockIndex; 4]> {
        let Some(block) = self.get(node) else {
            return SmallVec::new();
        };
        let scoped_input = block.declaration().map(|decl| decl.kind.scoped_input());
        block
            .inputs
            .iter()
            .filter(|slot| Some(slot.name.as_str()) != scoped_input)
            .map(|slot| slot.target)
            .collect()
    }

    fn next(&self, node: BlockIndex) -> BlockIndex {
        self.next_block(node)
    }

    fn parent(&self, node: BlockIndex) -> BlockIndex {
        BlockArena::parent(self, node)
    }

    fn is_closed(&self, node: BlockIndex) -> bool {
        self.declaration(node).is_ok_and(|decl| decl.kind.is_closed())
    }

    fn must_not_rename_capturables(&self, node: BlockIndex) -> bool {
        matches!(
            self.get(node).map(|block| &block.kind),
            Some(BlockKind::MutatorArg { .. })
        )
    }

    fn referenced_name(&self, node: BlockIndex) -> Option<&str> {
        self.get(node).and_then(|block| block.reference_text())
    }

    fn global_names(&self, excluded: BlockIndex) -> Vec<String> {
        self.top_blocks()
            .iter()
            .filter(|&&top| top != excluded)
            .filter_map(|&top| self.get(top).and_then(|block| block.global_name()))
            .map(str::to_string)
            .collect()
    }

    fn describe(&self, node: BlockIndex) -> (String, String) {
        match self.get(node) {
            Some(block) => (block.id.clone(), block.type_name.clone()),
            None => ("?".to_string(), "?".to_string()),
        }
    }

    fn set_referenced_name(&mut self, node: BlockIndex, name: String) {
        if let Err(err) = self.set_reference_text(node, name) {
            tracing::warn!(%node, %err, "cannot rename reference");
        }
    }

    fn rename_declared_names(&mut self, node: BlockIndex, substitution: &Substitution) {
        match self.role(node) {
            NodeRole::Declaration => self.rename_declaration_names(node, substitution),
            NodeRole::PatternArgument => self.rename_mutator_arg(node, substitution),
            _ => {}
        }
    }

    fn blocks_in_scope(&self, node: BlockIndex) -> Vec<BlockIndex> {
        match self.role(node) {
            NodeRole::PatternArgument => {
                let owner = self.owner_of(node);
                if owner.is_some() {
                    self.blocks_in_scope(owner)
                } else {
                    Vec::new()
                }
            }
            _ => {
                let scoped = self.scoped_child(node);
                if scoped.is_some() {
            vec![scoped]
        } else {
            Vec::new()
        }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/scope_node_tests.rs"]
mod tests;
