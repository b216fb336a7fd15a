//! Procedure call sites.
//!
//! A call keeps one `ARGi` input per parameter. Each parameter also carries
//! a stable id so that an argument block stays attached to "its" parameter
//! while the parameter list is reordered or renamed in the editor.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::arena::{BlockArena, wrong_kind};
use crate::block::{Block, BlockIndex, BlockKind, Declaration, InputSlot};
use crate::error::BlockError;

impl BlockArena {
    /// Rebuild the argument list of `call` for the parameters `names`.
    ///
    /// `ids` defaults to a copy of `names`. Argument blocks are matched to
    /// the new parameters by id: with `start_tracking` the current sockets
    /// are (re)associated positionally with `ids`, otherwise with the ids the
    /// call already carries. Argument blocks whose id disappears are
    /// detached and become top blocks.
    pub fn set_procedure_parameters(
        &mut self,
        call: BlockIndex,
        names: &[String],
        ids: Option<&[String]>,
        start_tracking: bool,
    ) -> Result<(), BlockError> {
        let ids: Vec<String> = ids.map_or_else(|| names.to_vec(), <[String]>::to_vec);
        if ids.len() != names.len() {
            return Err(BlockError::StructuralMismatch {
                context: format!(
                    "procedure call '{}': paramNames and paramIds must be the same length",
                    self.id_of(call)
                ),
                expected: names.len(),
                found: ids.len(),
            });
        }

        let (keys, targets) = {
            let block = self.block(call)?;
            let BlockKind::ProcedureCall { arg_ids, .. } = &block.kind else {
                return Err(wrong_kind(block, "procedure call"));
            };
            let targets: Vec<BlockIndex> = (0..arg_ids.len())
                .map(|i| block.input_target(&format!("ARG{i}")))
                .collect();
            let keys = if start_tracking {
                ids.clone()
            } else {
                arg_ids.clone()
            };
            (keys, targets)
        };

        let mut by_id: FxHashMap<String, BlockIndex> = keys
            .into_iter()
            .zip(targets)
            .filter(|(_, target)| target.is_some())
            .collect();
        let new_targets: Vec<BlockIndex> = ids
            .iter()
            .map(|id| by_id.remove(id).unwrap_or(BlockIndex::NONE))
            .collect();
        let mut dropped: Vec<BlockIndex> = by_id.into_values().collect();
        dropped.sort();
        for orphan in dropped {
            trace!(%call, %orphan, "argument lost its parameter");
            self.disconnect(orphan)?;
        }

        let block = self.block_mut(call)?;
        block.inputs = new_targets
            .into_iter()
            .enumerate()
            .map(|(i, target)| InputSlot {
                name: format!("ARG{i}"),
                target,
            })
            .collect();
        if let BlockKind::ProcedureCall {
            arg_names, arg_ids, ..
        } = &mut block.kind
        {
            *arg_names = names.to_vec();
            *arg_ids = ids;
        }
        Ok(())
    }

    /// Call sites of the procedure named `procedure`.
    pub fn callers_of(&self, procedure: &str) -> Vec<BlockIndex> {
        self.indices()
            .filter(|&index| {
                matches!(
                    self.get(index).map(|block| &block.kind),
                    Some(BlockKind::ProcedureCall { procedure: called, .. }) if called == procedure
                )
            })
            .collect()
    }

    /// Names of the procedure definitions among the top blocks, except the
    /// one at `excluded`.
    pub fn procedure_names(&self, excluded: BlockIndex) -> Vec<String> {
        self.top_blocks()
            .iter()
            .filter(|&&top| top != excluded)
            .filter_map(|&top| self.get(top).and_then(Block::declaration))
            .filter_map(|decl| decl.procedure_name.clone())
            .collect()
    }

    pub fn set_procedure_name(
        &mut self,
        decl: BlockIndex,
        name: impl Into<String>,
    ) -> Result<(), BlockError> {
        let block = self.block_mut(decl)?;
        match &mut block.kind {
            BlockKind::Declaration(Declaration {
                procedure_name: Some(current),
                ..
            }) => {
                *current = name.into();
                Ok(())
            }
            _ => Err(wrong_kind(block, "procedure definition")),
        }
    }

    /// Point `call` at the procedure named `name`.
    pub fn set_called_procedure(
        &mut self,
        call: BlockIndex,
        name: impl Into<String>,
    ) -> Result<(), BlockError> {
        let block = self.block_mut(call)?;
        match &mut block.kind {
            BlockKind::ProcedureCall { procedure, .. } => {
                *procedure = name.into();
                Ok(())
            }
            _ => Err(wrong_kind(block, "procedure call")),
        }
    }

    /// Parameter names shown on a call.
    pub fn call_arg_names(&self, call: BlockIndex) -> Result<&[String], BlockError> {
        let block = self.block(call)?;
        match &block.kind {
            BlockKind::ProcedureCall { arg_names, .. } => Ok(arg_names),
            _ => Err(wrong_kind(block, "procedure call")),
        }
    }
}

#[cfg(test)]
#[path = "../tests/procedures_tests.rs"]
mod tests;
