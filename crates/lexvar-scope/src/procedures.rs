//! Renaming procedures.
//!
//! Procedure names form one more namespace, separate from variables: a
//! rename only has to stay distinct from the other procedure definitions
//! and carry every call site along.

use lexvar_blocks::{BlockArena, BlockIndex};
use lexvar_common::{make_legal_identifier, name_not_in};
use tracing::debug;

use crate::error::ScopeError;

/// Rename the procedure defined at `decl` and every call to it. Returns the
/// final name, which is `new_name` legalized and made distinct from the other
/// procedure names.
#[tracing::instrument(level = "debug", skip(arena), fields(decl = %decl))]
pub fn rename_procedure(
    arena: &mut BlockArena,
    decl: BlockIndex,
    new_name: &str,
) -> Result<String, ScopeError> {
    let block = arena.block(decl)?;
    let Some(old) = block
        .declaration()
        .and_then(|declaration| declaration.procedure_name.clone())
    else {
        return Err(ScopeError::NotADeclaration {
            block: block.id.clone(),
            type_name: block.type_name.clone(),
        });
    };

    let legal = make_legal_identifier(new_name);
    let chosen = name_not_in(&legal, &arena.procedure_names(decl));
    if chosen == old {
        return Ok(chosen);
    }

    let callers = arena.callers_of(&old);
    debug!(old = %old, new = %chosen, callers = callers.len(), "rename procedure");
    arena.set_procedure_name(decl, chosen.as_str())?;
    for call in callers {
        arena.set_called_procedure(call, chosen.as_str())?;
    }
    Ok(chosen)
}

#[cfg(test)]
#[path = "../tests/procedures_tests.rs"]
mod tests;
