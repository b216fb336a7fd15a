//! The block arena and its tree-edit API.
//!
//! Blocks are stored flat and addressed by [`BlockIndex`]. Child links
//! (input targets and `next`) and parent links are both explicit; every edit
//! in this module keeps them in sync. A block reached through a `next` link
//! has the preceding statement as its parent.
//!
//! Unparented blocks on the main workspace are the "top blocks", kept in
//! insertion order.

use indexmap::IndexMap;
use lexvar_common::limits::MAX_PARENT_CHAIN_DEPTH;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::block::{
    Block, BlockIndex, BlockKind, Declaration, DeclarationKind, GLOBAL_DECLARATION, InputSlot,
    LEXICAL_VARIABLE_GET, LEXICAL_VARIABLE_SET, PROCEDURES_CALL_NO_RETURN, PROCEDURES_CALL_RETURN,
    Workspace,
};
use crate::error::BlockError;

#[derive(Debug, Clone, Default)]
pub struct BlockArena {
    blocks: Vec<Block>,
    ids: FxHashMap<String, BlockIndex>,
    top_blocks: Vec<BlockIndex>,
}

impl BlockArena {
    pub fn new() -> BlockArena {
        BlockArena::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: BlockIndex) -> Option<&Block> {
        if index.is_none() {
            return None;
        }
        self.blocks.get(index.as_usize())
    }

    pub fn block(&self, index: BlockIndex) -> Result<&Block, BlockError> {
        self.get(index).ok_or(BlockError::MissingBlock(index))
    }

    pub(crate) fn block_mut(&mut self, index: BlockIndex) -> Result<&mut Block, BlockError> {
        if index.is_none() {
            return Err(BlockError::MissingBlock(index));
        }
        self.blocks
            .get_mut(index.as_usize())
            .ok_or(BlockError::MissingBlock(index))
    }

    /// Look a block up by its stable id.
    pub fn find(&self, id: &str) -> Option<BlockIndex> {
        self.ids.get(id).copied()
    }

    pub fn lookup(&self, id: &str) -> Result<BlockIndex, BlockError> {
        self.find(id).ok_or_else(|| BlockError::UnknownId(id.to_string()))
    }

    /// Id of the block at `index`, or `"?"` for an empty slot.
    pub fn id_of(&self, index: BlockIndex) -> &str {
        self.get(index).map_or("?", |block| block.id.as_str())
    }

    pub fn indices(&self) -> impl Iterator<Item = BlockIndex> + '_ {
        (0..self.blocks.len() as u32).map(BlockIndex)
    }

    /// Unparented blocks of the main workspace, in insertion order.
    pub fn top_blocks(&self) -> &[BlockIndex] {
        &self.top_blocks
    }

    pub fn parent(&self, index: BlockIndex) -> BlockIndex {
        self.get(index).map_or(BlockIndex::NONE, |block| block.parent)
    }

    pub fn next_block(&self, index: BlockIndex) -> BlockIndex {
        self.get(index).map_or(BlockIndex::NONE, |block| block.next)
    }

    pub fn input_target(&self, index: BlockIndex, input: &str) -> BlockIndex {
        self.get(index).map_or(BlockIndex::NONE, |block| block.input_target(input))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Add an unconnected block with empty input slots named `inputs`.
    pub fn add_block(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        kind: BlockKind,
        inputs: Vec<String>,
    ) -> Result<BlockIndex, BlockError> {
        self.add_block_in(Workspace::Main, id.into(), type_name.into(), kind, inputs)
    }

    pub(crate) fn add_block_in(
        &mut self,
        workspace: Workspace,
        id: String,
        type_name: String,
        kind: BlockKind,
        inputs: Vec<String>,
    ) -> Result<BlockIndex, BlockError> {
        if self.ids.contains_key(&id) {
            return Err(BlockError::DuplicateId(id));
        }
        let index = BlockIndex(self.blocks.len() as u32);
        trace!(%index, id = %id, type_name = %type_name, "add block");
        self.ids.insert(id.clone(), index);
        self.blocks.push(Block {
            id,
            type_name,
            kind,
            inputs: inputs
                .into_iter()
                .map(|name| InputSlot {
                    name,
                    target: BlockIndex::NONE,
                })
                .collect(),
            next: BlockIndex::NONE,
            parent: BlockIndex::NONE,
            workspace,
        });
        if workspace == Workspace::Main {
            self.top_blocks.push(index);
        }
        Ok(index)
    }

    pub fn add_getter(
        &mut self,
        id: impl Into<String>,
        var: impl Into<String>,
    ) -> Result<BlockIndex, BlockError> {
        let kind = BlockKind::Getter { var: var.into() };
        self.add_block(id, LEXICAL_VARIABLE_GET, kind, Vec::new())
    }

    pub fn add_setter(
        &mut self,
        id: impl Into<String>,
        var: impl Into<String>,
    ) -> Result<BlockIndex, BlockError> {
        let kind = BlockKind::Setter { var: var.into() };
        self.add_block(id, LEXICAL_VARIABLE_SET, kind, vec!["VALUE".to_string()])
    }

    pub fn add_global(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<BlockIndex, BlockError> {
        let kind = BlockKind::GlobalDeclaration { name: name.into() };
        self.add_block(id, GLOBAL_DECLARATION, kind, vec!["VALUE".to_string()])
    }

    /// Add a declaring block. Loops must declare exactly one name.
    pub fn add_declaration(
        &mut self,
        id: impl Into<String>,
        kind: DeclarationKind,
        names: Vec<String>,
        procedure_name: Option<String>,
    ) -> Result<BlockIndex, BlockError> {
        let id = id.into();
        if !kind.has_name_list() && names.len() != 1 {
            return Err(BlockError::StructuralMismatch {
                context: format!("{} '{id}' loop variables", kind.type_name()),
                expected: 1,
                found: names.len(),
            });
        }
        let inputs = kind.input_names(names.len());
        let decl = Declaration {
            kind,
            names,
            procedure_name,
            mutator: BlockIndex::NONE,
        };
        self.add_block(id, kind.type_name(), BlockKind::Declaration(decl), inputs)
    }

    pub fn add_procedure_call(
        &mut self,
        id: impl Into<String>,
        procedure: impl Into<String>,
        arg_names: Vec<String>,
        returns: bool,
    ) -> Result<BlockIndex, BlockError> {
        let inputs = (0..arg_names.len()).map(|i| format!("ARG{i}")).collect();
        let kind = BlockKind::ProcedureCall {
            procedure: procedure.into(),
            arg_ids: arg_names.clone(),
            arg_names,
        };
        let type_name = if returns {
            PROCEDURES_CALL_RETURN
        } else {
            PROCEDURES_CALL_NO_RETURN
        };
        self.add_block(id, type_name, kind, inputs)
    }

    /// Add a block the scope engine knows nothing about.
    pub fn add_opaque(
        &mut self,
        id: impl Into<String>,
        type_name: impl Into<String>,
        inputs: &[&str],
    ) -> Result<BlockIndex, BlockError> {
        let inputs = inputs.iter().map(|s| s.to_string()).collect();
        let kind = BlockKind::Opaque {
            fields: IndexMap::new(),
        };
        self.add_block(id, type_name, kind, inputs)
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Whether `block` accepts a block on its `next` link.
    pub fn has_next_connection(&self, index: BlockIndex) -> bool {
        match self.get(index).map(|block| &block.kind) {
            Some(BlockKind::Setter { .. })
            | Some(BlockKind::MutatorArg { .. })
            | Some(BlockKind::Opaque { .. }) => true,
            Some(BlockKind::Declaration(decl)) => decl.kind.has_next(),
            Some(BlockKind::ProcedureCall { .. }) => {
                self.block(index)
                    .is_ok_and(|block| block.type_name == PROCEDURES_CALL_NO_RETURN)
            }
            _ => false,
        }
    }

    /// Plug `child` into `parent`'s input slot `input`.
    ///
    /// `child` is first detached from wherever it was; a block previously in
    /// the slot is detached and becomes a top block.
    pub fn connect_input(
        &mut self,
        parent: BlockIndex,
        input: &str,
        child: BlockIndex,
    ) -> Result<(), BlockError> {
        let slot = {
            let block = self.block(parent)?;
            block
                .inputs
                .iter()
                .position(|slot| slot.name == input)
                .ok_or_else(|| BlockError::UnknownInput {
                    block: block.id.clone(),
                    type_name: block.type_name.clone(),
                    input: input.to_string(),
                })?
        };
        self.check_no_cycle(parent, child)?;
        self.disconnect(child)?;

        let previous = self.block(parent)?.inputs[slot].target;
        if previous.is_some() {
            self.disconnect(previous)?;
        }
        self.block_mut(parent)?.inputs[slot].target = child;
        self.attach(child, parent)
    }

    /// Link `child` after the statement `previous`.
    pub fn connect_next(
        &mut self,
        previous: BlockIndex,
        child: BlockIndex,
    ) -> Result<(), BlockError> {
        if !self.has_next_connection(previous) {
            return Err(BlockError::NoNextConnection {
                block: self.block(previous)?.id.clone(),
            });
        }
        self.check_no_cycle(previous, child)?;
        self.disconnect(child)?;

        let old_next = self.block(previous)?.next;
        if old_next.is_some() {
            self.disconnect(old_next)?;
        }
        self.block_mut(previous)?.next = child;
        self.attach(child, previous)
    }

    /// Detach `child` from its parent. It becomes a top block of its
    /// workspace. No-op for an unparented block.
    pub fn disconnect(&mut self, child: BlockIndex) -> Result<(), BlockError> {
        let parent = self.block(child)?.parent;
        if parent.is_none() {
            return Ok(());
        }
        let parent_block = self.block_mut(parent)?;
        if parent_block.next == child {
            parent_block.next = BlockIndex::NONE;
        }
        for slot in parent_block.inputs.iter_mut() {
            if slot.target == child {
                slot.target = BlockIndex::NONE;
            }
        }
        let block = self.block_mut(child)?;
        block.parent = BlockIndex::NONE;
        let workspace = block.workspace;
        if workspace == Workspace::Main {
            self.top_blocks.push(child);
        }
        Ok(())
    }

    fn attach(&mut self, child: BlockIndex, parent: BlockIndex) -> Result<(), BlockError> {
        self.block_mut(child)?.parent = parent;
        self.top_blocks.retain(|&top| top != child);
        Ok(())
    }

    fn check_no_cycle(&self, parent: BlockIndex, child: BlockIndex) -> Result<(), BlockError> {
        self.block(child)?;
        let mut current = parent;
        for _ in 0..MAX_PARENT_CHAIN_DEPTH {
            if current.is_none() {
                return Ok(());
            }
            if current == child {
                break;
            }
            current = self.parent(current);
        }
        Err(BlockError::Cycle {
            parent: self.id_of(parent).to_string(),
            child: self.id_of(child).to_string(),
        })
    }

    // =========================================================================
    // Field edits
    // =========================================================================

    /// Overwrite the field text of a getter or setter.
    pub fn set_reference_text(
        &mut self,
        index: BlockIndex,
        text: impl Into<String>,
    ) -> Result<(), BlockError> {
        let block = self.block_mut(index)?;
        match &mut block.kind {
            BlockKind::Getter { var } | BlockKind::Setter { var } => {
                *var = text.into();
                Ok(())
            }
            _ => Err(wrong_kind(block, "getter or setter")),
        }
    }

    pub fn set_global_name(
        &mut self,
        index: BlockIndex,
        name: impl Into<String>,
    ) -> Result<(), BlockError> {
        let block = self.block_mut(index)?;
        match &mut block.kind {
            BlockKind::GlobalDeclaration { name: current } => {
                *current = name.into();
                Ok(())
            }
            _ => Err(wrong_kind(block, "global declaration")),
        }
    }

    pub fn declaration(&self, index: BlockIndex) -> Result<&Declaration, BlockError> {
        let block = self.block(index)?;
        block
            .declaration()
            .ok_or_else(|| wrong_kind(block, "declaration"))
    }

    pub(crate) fn declaration_mut(
        &mut self,
        index: BlockIndex,
    ) -> Result<&mut Declaration, BlockError> {
        self.declaration(index)?;
        match &mut self.block_mut(index)?.kind {
            BlockKind::Declaration(decl) => Ok(decl),
            _ => Err(BlockError::MissingBlock(index)),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Direct children: input targets in input order, then `next`.
    pub fn child_blocks(&self, index: BlockIndex) -> SmallVec<[BlockIndex; 4]> {
        let Some(block) = self.get(index) else {
            return SmallVec::new();
        };
        block
            .inputs
            .iter()
            .map(|slot| slot.target)
            .chain(std::iter::once(block.next))
            .filter(|child| child.is_some())
            .collect()
    }

    /// `root` and everything below it (inputs and `next` chains), pre-order.
    pub fn descendants(&self, root: BlockIndex) -> Vec<BlockIndex> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if index.is_none() {
                continue;
            }
            result.push(index);
            let children = self.child_blocks(index);
            stack.extend(children.into_iter().rev());
        }
        result
    }

    /// All blocks of the main workspace, top block by top block.
    pub fn main_workspace_blocks(&self) -> Vec<BlockIndex> {
        self.top_blocks
            .iter()
            .flat_map(|&top| self.descendants(top))
            .collect()
    }
}

pub(crate) fn wrong_kind(block: &Block, expected: &'static str) -> BlockError {
    BlockError::WrongKind {
        block: block.id.clone(),
        type_name: block.type_name.clone(),
        expected,
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
