//! Parameter editors.
//!
//! Local declarations and procedure definitions expose their name list
//! through a private editor: a container block whose `STACK` holds one
//! argument block per name. Arguments live on the mutator workspace and are
//! never top blocks of the program.

use lexvar_common::name_not_in;
use tracing::debug;

use crate::arena::{BlockArena, wrong_kind};
use crate::block::{
    BlockIndex, BlockKind, DeclarationKind, InputSlot, LOCAL_MUTATOR_ARG,
    LOCAL_MUTATOR_CONTAINER, PROCEDURES_MUTATOR_ARG, Workspace,
};
use crate::error::BlockError;

impl BlockArena {
    /// Open the editor of `decl` and return its container. Opening an
    /// already open editor returns the existing container.
    ///
    /// Opening a procedure's editor starts parameter tracking on every call
    /// site, keyed by the ids of the new argument blocks.
    pub fn open_mutator(&mut self, decl: BlockIndex) -> Result<BlockIndex, BlockError> {
        let (kind, names, open, id, procedure) = {
            let block = self.block(decl)?;
            let declaration = block
                .declaration()
                .ok_or_else(|| wrong_kind(block, "declaration"))?;
            if !declaration.kind.has_mutator() {
                return Err(wrong_kind(block, "declaration with a parameter list"));
            }
            (
                declaration.kind,
                declaration.names.clone(),
                declaration.mutator,
                block.id.clone(),
                declaration.procedure_name.clone(),
            )
        };
        if open.is_some() {
            return Ok(open);
        }

        let (container_type, _) = kind.mutator_types();
        let container = self.add_block_in(
            Workspace::Mutator,
            format!("{id}:mutator{}", self.len()),
            container_type.to_string(),
            BlockKind::MutatorContainer { owner: decl },
            vec!["STACK".to_string()],
        )?;
        for name in &names {
            self.append_mutator_arg(container, name)?;
        }
        self.declaration_mut(decl)?.mutator = container;
        debug!(%decl, %container, ?names, "opened parameter editor");

        if let (DeclarationKind::Procedure { .. }, Some(procedure)) = (kind, procedure) {
            let arg_ids = self.container_arg_ids(container);
            for call in self.callers_of(&procedure) {
                self.set_procedure_parameters(call, &names, Some(&arg_ids), true)?;
            }
        }
        Ok(container)
    }

    /// Close the editor of `decl`, discarding its argument blocks.
    pub fn close_mutator(&mut self, decl: BlockIndex) -> Result<(), BlockError> {
        let container = self.declaration(decl)?.mutator;
        if container.is_none() {
            return Ok(());
        }
        for arg in self.container_args(container) {
            self.disconnect(arg)?;
        }
        self.block_mut(container)?.kind = BlockKind::MutatorContainer {
            owner: BlockIndex::NONE,
        };
        self.declaration_mut(decl)?.mutator = BlockIndex::NONE;
        Ok(())
    }

    /// Append an argument named `name` to the editor `container`, repairing
    /// a duplicate name. Returns the new argument block.
    pub fn add_mutator_arg(
        &mut self,
        container: BlockIndex,
        name: &str,
    ) -> Result<BlockIndex, BlockError> {
        let arg = self.append_mutator_arg(container, name)?;
        self.repair_duplicate_argument(arg)?;
        Ok(arg)
    }

    /// Remove the argument `arg` from its editor's stack.
    pub fn remove_mutator_arg(&mut self, arg: BlockIndex) -> Result<(), BlockError> {
        let next = self.next_block(arg);
        let parent = self.parent(arg);
        let in_stack = self
            .get(parent)
            .map(|block| block.input_target("STACK") == arg);
        if next.is_some() {
            self.disconnect(next)?;
        }
        self.disconnect(arg)?;
        if next.is_some() {
            match in_stack {
                Some(true) => self.connect_input(parent, "STACK", next)?,
                Some(false) => self.connect_next(parent, next)?,
                None => {}
            }
        }
        Ok(())
    }

    /// If `arg` now shares its name with another argument of the same
    /// editor, give it a fresh name. Returns the new name when one was
    /// chosen.
    pub fn repair_duplicate_argument(
        &mut self,
        arg: BlockIndex,
    ) -> Result<Option<String>, BlockError> {
        let Some(name) = self.mutator_arg_name(arg).map(str::to_string) else {
            let block = self.block(arg)?;
            return Err(wrong_kind(block, "parameter editor argument"));
        };
        let names = self.container_names(self.container_of(arg));
        if names.iter().filter(|declared| **declared == name).count() < 2 {
            return Ok(None);
        }
        let fresh = name_not_in(&name, &names);
        debug!(%arg, from = %name, to = %fresh, "repaired duplicate argument");
        if let BlockKind::MutatorArg { name } = &mut self.block_mut(arg)?.kind {
            name.clone_from(&fresh);
        }
        Ok(Some(fresh))
    }

    /// Copy the edited parameter list back onto the declaration.
    ///
    /// Initializers of local declarations follow their names; initializers
    /// of removed names are detached. Procedure call sites are rebuilt with
    /// the argument-block ids as parameter ids.
    pub fn compose_mutator(&mut self, decl: BlockIndex) -> Result<(), BlockError> {
        let container = self.declaration(decl)?.mutator;
        if container.is_none() {
            return Ok(());
        }
        let names = self.container_names(container);
        self.set_declared_names(decl, names.clone())?;

        let declaration = self.declaration(decl)?;
        if let (DeclarationKind::Procedure { .. }, Some(procedure)) =
            (declaration.kind, declaration.procedure_name.clone())
        {
            let arg_ids = self.container_arg_ids(container);
            for call in self.callers_of(&procedure) {
                self.set_procedure_parameters(call, &names, Some(&arg_ids), false)?;
            }
        }
        Ok(())
    }

    /// Replace the name list of `decl`, rebuilding `DECLi` inputs of local
    /// declarations so each initializer stays with its name.
    pub fn set_declared_names(
        &mut self,
        decl: BlockIndex,
        names: Vec<String>,
    ) -> Result<(), BlockError> {
        let declaration = self.declaration(decl)?;
        let kind = declaration.kind;
        if !kind.has_name_list() && names.len() != 1 {
            return Err(BlockError::StructuralMismatch {
                context: format!("{} '{}' loop variables", kind.type_name(), self.id_of(decl)),
                expected: 1,
                found: names.len(),
            });
        }
        let old_names = declaration.names.clone();

        if matches!(
            kind,
            DeclarationKind::LocalStatement | DeclarationKind::LocalExpression
        ) {
            let block = self.block(decl)?;
            let mut old_inits: Vec<Option<BlockIndex>> = (0..old_names.len())
                .map(|i| Some(block.input_target(&format!("DECL{i}"))))
                .collect();
            let scoped = block.input_target(kind.scoped_input());

            let mut new_inits = Vec::with_capacity(names.len());
            for name in &names {
                let reused = old_names
                    .iter()
                    .zip(old_inits.iter_mut())
                    .find(|(old, init)| *old == name && init.is_some())
                    .and_then(|(_, init)| init.take());
                new_inits.push(reused.unwrap_or(BlockIndex::NONE));
            }
            for orphan in old_inits.into_iter().flatten().filter(|init| init.is_some()) {
                self.disconnect(orphan)?;
            }

            let block = self.block_mut(decl)?;
            block.inputs = new_inits
                .into_iter()
                .enumerate()
                .map(|(i, target)| InputSlot {
                    name: format!("DECL{i}"),
                    target,
                })
                .chain(std::iter::once(InputSlot {
                    name: kind.scoped_input().to_string(),
                    target: scoped,
                }))
                .collect();
        }

        self.declaration_mut(decl)?.names = names;
        Ok(())
    }

    fn append_mutator_arg(
        &mut self,
        container: BlockIndex,
        name: &str,
    ) -> Result<BlockIndex, BlockError> {
        let container_block = self.block(container)?;
        let arg_type = match container_block.kind {
            BlockKind::MutatorContainer { .. } => {
                if container_block.type_name == LOCAL_MUTATOR_CONTAINER {
                    LOCAL_MUTATOR_ARG
                } else {
                    PROCEDURES_MUTATOR_ARG
                }
            }
            _ => return Err(wrong_kind(container_block, "parameter editor")),
        };
        let id = format!("{}:arg{}", container_block.id, self.len());
        let last = self.container_args(container).last().copied();
        let arg = self.add_block_in(
            Workspace::Mutator,
            id,
            arg_type.to_string(),
            BlockKind::MutatorArg {
                name: name.to_string(),
            },
            Vec::new(),
        )?;
        match last {
            Some(last) => self.connect_next(last, arg)?,
            None => self.connect_input(container, "STACK", arg)?,
        }
        Ok(arg)
    }

    fn container_arg_ids(&self, container: BlockIndex) -> Vec<String> {
        self.container_args(container)
            .into_iter()
            .map(|arg| self.id_of(arg).to_string())
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/mutator_tests.rs"]
mod tests;
