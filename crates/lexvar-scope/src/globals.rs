//! Renaming global variables.
//!
//! Globals live in their own namespace and are always referenced with the
//! `global` prefix, so a global rename never interacts with lexical scope:
//! it only has to stay distinct from the other globals.

use lexvar_blocks::{BlockArena, BlockIndex, ScopeNode};
use lexvar_common::prefix::{global_reference, prefix_global_menu_name};
use lexvar_common::{ScopeConfig, make_legal_identifier, name_not_in};
use tracing::debug;

use crate::error::ScopeError;

/// Rename the global declared at `decl` and every reference to it in the
/// main workspace. Returns the final name, which is `new_name` legalized and
/// made distinct from the other globals.
#[tracing::instrument(level = "debug", skip(arena, config), fields(decl = %decl))]
pub fn rename_global(
    arena: &mut BlockArena,
    decl: BlockIndex,
    new_name: &str,
    config: &ScopeConfig,
) -> Result<String, ScopeError> {
    let block = arena.block(decl)?;
    let Some(old) = block.global_name().map(str::to_string) else {
        return Err(ScopeError::NotADeclaration {
            block: block.id.clone(),
            type_name: block.type_name.clone(),
        });
    };

    let legal = make_legal_identifier(new_name);
    let chosen = name_not_in(&legal, &arena.global_names(decl));
    if chosen == old {
        return Ok(chosen);
    }

    let stored = global_reference(&old);
    let shown = prefix_global_menu_name(&old, config);
    let references: Vec<BlockIndex> = arena
        .main_workspace_blocks()
        .into_iter()
        .filter(|&index| {
            arena
                .get(index)
                .and_then(|block| block.reference_text())
                .is_some_and(|text| text == stored || text == shown)
        })
        .collect();

    debug!(old = %old, new = %chosen, references = references.len(), "rename global");
    arena.set_global_name(decl, chosen.as_str())?;
    let text = global_reference(&chosen);
    for reference in references {
        arena.set_reference_text(reference, text.as_str())?;
    }
    Ok(chosen)
}

#[cfg(test)]
#[path = "../tests/globals_tests.rs"]
mod tests;
