//! Command execution. Every command yields a JSON value; the binary prints
//! it and tests inspect it.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use lexvar_blocks::{BlockArena, BlockIndex, ProgramDoc, ScopeNode};
use lexvar_common::{ScopeConfig, check_identifier, make_legal_identifier};
use lexvar_scope::{
    ReferenceResult, check_references, free_variables, names_in_scope, reference_result,
    rename_global, rename_param_from_to, rename_procedure,
};

use crate::args::{CliArgs, Command};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeVarsOutput {
    block: String,
    free_variables: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferencesOutput {
    blocks_to_rename: Vec<String>,
    capturables: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameOutput {
    old_name: String,
    new_name: String,
    program: ProgramDoc,
}

#[derive(Serialize)]
struct ReferenceProblemEntry {
    block: String,
    name: String,
    problem: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NameEntry {
    menu_text: String,
    reference_text: String,
}

/// Read a program document from disk.
pub fn load_program(path: &Path) -> Result<ProgramDoc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read program {}", path.display()))?;
    ProgramDoc::from_json(&text)
        .with_context(|| format!("failed to parse program {}", path.display()))
}

/// The configuration file if one is given, else the document's
/// configuration, with flag overrides applied.
pub fn effective_config(args: &CliArgs, doc: &ProgramDoc) -> Result<ScopeConfig> {
    let mut config: ScopeConfig = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => doc.config.clone(),
    };
    if args.show_prefix {
        config.show_prefix_to_user = true;
    }
    if args.use_prefix {
        config.use_prefix_in_code = true;
    }
    if let Some(label) = &args.global_label {
        config.global_label = label.clone();
    }
    Ok(config.validated())
}

/// Stack reserved for a command. Serializing a program recurses once per
/// nesting level of its documents.
const COMMAND_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Run the selected command.
pub fn run(args: &CliArgs) -> Result<Value> {
    stacker::grow(COMMAND_STACK_SIZE, || execute(args))
}

fn execute(args: &CliArgs) -> Result<Value> {
    if let Command::CheckIdentifier { raw } = &args.command {
        return Ok(serde_json::to_value(check_identifier(raw))?);
    }

    let Some(path) = &args.program else {
        bail!("a program document is required (--program <PATH>)");
    };
    let doc = load_program(path)?;
    let config = effective_config(args, &doc)?;
    let mut arena = BlockArena::load(&doc.blocks).context("failed to build block tree")?;

    let value = match &args.command {
        Command::FreeVars { block } => {
            let index = arena.lookup(block)?;
            let free = free_variables(&arena, index, &config)?;
            serde_json::to_value(FreeVarsOutput {
                block: block.clone(),
                free_variables: free.to_list(),
            })?
        }
        Command::References {
            block,
            name,
            prefix,
        } => {
            let index = arena.lookup(block)?;
            let prefix = prefix.unwrap_or_else(|| arena.declared_prefix(index));
            let mut result = ReferenceResult::default();
            for root in arena.blocks_in_scope(index) {
                result.append(reference_result(&arena, root, name, prefix, &[], &config));
            }
            serde_json::to_value(ReferencesOutput {
                blocks_to_rename: ids(&arena, &result.blocks_to_rename),
                capturables: result.capturables,
            })?
        }
        Command::Rename {
            block,
            from,
            to,
            rename_capturables,
            output,
        } => {
            let index = arena.lookup(block)?;
            let new = make_legal_identifier(to);
            let chosen =
                rename_param_from_to(&mut arena, index, from, &new, *rename_capturables, &config)?;
            info!(block = %block, from = %from, to = %chosen, "renamed declaration");
            finish_rename(&arena, &config, from, chosen, output.as_deref())?
        }
        Command::RenameGlobal { block, to, output } => {
            let index = arena.lookup(block)?;
            let old = arena
                .block(index)?
                .global_name()
                .unwrap_or_default()
                .to_string();
            let chosen = rename_global(&mut arena, index, to, &config)?;
            info!(block = %block, from = %old, to = %chosen, "renamed global");
            finish_rename(&arena, &config, &old, chosen, output.as_deref())?
        }
        Command::RenameProcedure { block, to, output } => {
            let index = arena.lookup(block)?;
            let old = arena
                .block(index)?
                .declaration()
                .and_then(|decl| decl.procedure_name.clone())
                .unwrap_or_default();
            let chosen = rename_procedure(&mut arena, index, to)?;
            info!(block = %block, from = %old, to = %chosen, "renamed procedure");
            finish_rename(&arena, &config, &old, chosen, output.as_deref())?
        }
        Command::CheckReferences => {
            let problems: Vec<ReferenceProblemEntry> = check_references(&arena, &config)
                .into_iter()
                .map(|problem| ReferenceProblemEntry {
                    block: arena.id_of(problem.block).to_string(),
                    name: problem.name,
                    problem: problem.kind.as_str(),
                })
                .collect();
            info!(problems = problems.len(), "checked references");
            serde_json::to_value(problems)?
        }
        Command::NamesInScope { block } => {
            let index = arena.lookup(block)?;
            let entries: Vec<NameEntry> = names_in_scope(&arena, index, &config)
                .into_iter()
                .map(|(menu_text, reference_text)| NameEntry {
                    menu_text,
                    reference_text,
                })
                .collect();
            serde_json::to_value(entries)?
        }
        Command::CheckIdentifier { raw } => serde_json::to_value(check_identifier(raw))?,
    };
    Ok(value)
}

fn ids(arena: &BlockArena, blocks: &[BlockIndex]) -> Vec<String> {
    blocks.iter().map(|&b| arena.id_of(b).to_string()).collect()
}

fn finish_rename(
    arena: &BlockArena,
    config: &ScopeConfig,
    old: &str,
    new: String,
    output: Option<&Path>,
) -> Result<Value> {
    let program = ProgramDoc {
        config: config.clone(),
        blocks: arena.to_docs(),
    };
    if let Some(path) = output {
        let text = serde_json::to_string_pretty(&program)?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write program {}", path.display()))?;
    }
    Ok(serde_json::to_value(RenameOutput {
        old_name: old.to_string(),
        new_name: new,
        program,
    })?)
}

#[cfg(test)]
#[path = "../tests/commands_tests.rs"]
mod tests;
