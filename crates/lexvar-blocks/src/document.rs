//! JSON program documents.
//!
//! A document is a list of top-level block trees. Each block object names
//! its `type` and `id`, its text `fields`, its named `inputs` and its `next`
//! statement:
//!
//! ```json
//! { "type": "local_declaration_statement", "id": "decl",
//!   "fields": { "VAR0": "a" },
//!   "inputs": { "DECL0": { "type": "math_number", "id": "n", "fields": { "NUM": "1" } },
//!               "STACK": { "type": "lexical_variable_get", "id": "g", "fields": { "VAR": "a" } } } }
//! ```
//!
//! Field names follow the block types: `VAR` for references and loops,
//! `VARi` for local and procedure names, `NAME` for globals and procedure
//! names, `PROCNAME`/`ARGi` for calls.

use indexmap::IndexMap;
use lexvar_common::ScopeConfig;
use lexvar_common::limits::MAX_TREE_DEPTH;
use lexvar_common::stack::ensure_stack;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::BlockArena;
use crate::block::{
    BlockIndex, BlockKind, CONTROLS_FOR_EACH, CONTROLS_FOR_RANGE, DeclarationKind,
    GLOBAL_DECLARATION, LEXICAL_VARIABLE_GET, LEXICAL_VARIABLE_SET, LOCAL_DECLARATION_EXPRESSION,
    LOCAL_DECLARATION_STATEMENT, PROCEDURES_CALL_NO_RETURN, PROCEDURES_CALL_RETURN,
    PROCEDURES_DEF_NO_RETURN, PROCEDURES_DEF_RETURN, Workspace,
};
use crate::error::BlockError;

/// One block and everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDoc {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Generated on load when empty.
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, BlockDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<BlockDoc>>,
}

/// A whole program plus the configuration it is analyzed under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDoc {
    #[serde(default)]
    pub config: ScopeConfig,
    #[serde(default)]
    pub blocks: Vec<BlockDoc>,
}

// Nested documents are dropped from a worklist rather than recursively.
impl Drop for BlockDoc {
    fn drop(&mut self) {
        let mut pending: Vec<BlockDoc> = self.inputs.drain(..).map(|(_, child)| child).collect();
        pending.extend(self.next.take().map(|next| *next));
        while let Some(mut doc) = pending.pop() {
            pending.extend(doc.inputs.drain(..).map(|(_, child)| child));
            pending.extend(doc.next.take().map(|next| *next));
        }
    }
}

impl ProgramDoc {
    /// Parse a document of any nesting depth.
    pub fn from_json(text: &str) -> Result<ProgramDoc, serde_json::Error> {
        let mut json = serde_json::Deserializer::from_str(text);
        json.disable_recursion_limit();
        let doc = ProgramDoc::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Ok(doc)
    }
}

// =============================================================================
// Builders
// =============================================================================

impl BlockDoc {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> BlockDoc {
        BlockDoc {
            type_name: type_name.into(),
            id: id.into(),
            fields: IndexMap::new(),
            inputs: IndexMap::new(),
            next: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> BlockDoc {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, child: BlockDoc) -> BlockDoc {
        self.inputs.insert(name.into(), child);
        self
    }

    pub fn with_next(mut self, next: BlockDoc) -> BlockDoc {
        self.next = Some(Box::new(next));
        self
    }

    pub fn get(id: &str, var: &str) -> BlockDoc {
        BlockDoc::new(LEXICAL_VARIABLE_GET, id).with_field("VAR", var)
    }

    pub fn set(id: &str, var: &str, value: Option<BlockDoc>) -> BlockDoc {
        let doc = BlockDoc::new(LEXICAL_VARIABLE_SET, id).with_field("VAR", var);
        match value {
            Some(value) => doc.with_input("VALUE", value),
            None => doc,
        }
    }

    pub fn global(id: &str, name: &str, value: Option<BlockDoc>) -> BlockDoc {
        let doc = BlockDoc::new(GLOBAL_DECLARATION, id).with_field("NAME", name);
        match value {
            Some(value) => doc.with_input("VALUE", value),
            None => doc,
        }
    }

    /// A local declaration; `decls` pairs each name with its initializer.
    pub fn local(id: &str, statement: bool, decls: Vec<(&str, Option<BlockDoc>)>) -> BlockDoc {
        let type_name = if statement {
            LOCAL_DECLARATION_STATEMENT
        } else {
            LOCAL_DECLARATION_EXPRESSION
        };
        let mut doc = BlockDoc::new(type_name, id);
        for (i, (name, init)) in decls.into_iter().enumerate() {
            doc = doc.with_field(format!("VAR{i}"), name);
            if let Some(init) = init {
                doc = doc.with_input(format!("DECL{i}"), init);
            }
        }
        doc
    }

    pub fn for_range(id: &str, var: &str) -> BlockDoc {
        BlockDoc::new(CONTROLS_FOR_RANGE, id).with_field("VAR", var)
    }

    pub fn for_each(id: &str, var: &str) -> BlockDoc {
        BlockDoc::new(CONTROLS_FOR_EACH, id).with_field("VAR", var)
    }

    pub fn procedure(id: &str, name: &str, params: &[&str], returns: bool) -> BlockDoc {
        let type_name = if returns {
            PROCEDURES_DEF_RETURN
        } else {
            PROCEDURES_DEF_NO_RETURN
        };
        let mut doc = BlockDoc::new(type_name, id).with_field("NAME", name);
        for (i, param) in params.iter().enumerate() {
            doc = doc.with_field(format!("VAR{i}"), *param);
        }
        doc
    }

    pub fn call(id: &str, procedure: &str, args: &[&str], returns: bool) -> BlockDoc {
        let type_name = if returns {
            PROCEDURES_CALL_RETURN
        } else {
            PROCEDURES_CALL_NO_RETURN
        };
        let mut doc = BlockDoc::new(type_name, id).with_field("PROCNAME", procedure);
        for (i, arg) in args.iter().enumerate() {
            doc = doc.with_field(format!("ARG{i}"), *arg);
        }
        doc
    }
}

// =============================================================================
// Loading
// =============================================================================

fn required_field<'a>(doc: &'a BlockDoc, field: &str) -> Result<&'a str, BlockError> {
    doc.fields
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| BlockError::MissingField {
            block: doc.id.clone(),
            type_name: doc.type_name.clone(),
            field: field.to_string(),
        })
}

/// Values of `<stem>0`, `<stem>1`, ... up to the first gap.
fn indexed_fields(doc: &BlockDoc, stem: &str) -> Vec<String> {
    (0..)
        .map_while(|i| doc.fields.get(&format!("{stem}{i}")).cloned())
        .collect()
}

impl BlockArena {
    /// Build an arena from top-level block trees, in order.
    pub fn load(docs: &[BlockDoc]) -> Result<BlockArena, BlockError> {
        let mut arena = BlockArena::new();
        for doc in docs {
            arena.load_block(doc, 0)?;
        }
        debug!(blocks = arena.len(), tops = arena.top_blocks().len(), "loaded program");
        Ok(arena)
    }

    fn load_block(&mut self, doc: &BlockDoc, depth: usize) -> Result<BlockIndex, BlockError> {
        ensure_stack(|| self.load_one(doc, depth))
    }

    fn load_one(&mut self, doc: &BlockDoc, depth: usize) -> Result<BlockIndex, BlockError> {
        if depth > MAX_TREE_DEPTH {
            return Err(BlockError::TooDeep(MAX_TREE_DEPTH));
        }
        let id = if doc.id.is_empty() {
            format!("block{}", self.len())
        } else {
            doc.id.clone()
        };

        let index = match doc.type_name.as_str() {
            LEXICAL_VARIABLE_GET => self.add_getter(id, required_field(doc, "VAR")?)?,
            LEXICAL_VARIABLE_SET => self.add_setter(id, required_field(doc, "VAR")?)?,
            GLOBAL_DECLARATION => self.add_global(id, required_field(doc, "NAME")?)?,
            PROCEDURES_CALL_NO_RETURN | PROCEDURES_CALL_RETURN => self.add_procedure_call(
                id,
                required_field(doc, "PROCNAME")?,
                indexed_fields(doc, "ARG"),
                doc.type_name == PROCEDURES_CALL_RETURN,
            )?,
            type_name => match DeclarationKind::from_type_name(type_name) {
                Some(kind) => {
                    let names = if kind.has_name_list() {
                        indexed_fields(doc, "VAR")
                    } else {
                        vec![required_field(doc, "VAR")?.to_string()]
                    };
                    let procedure_name = match kind {
                        DeclarationKind::Procedure { .. } => {
                            Some(required_field(doc, "NAME")?.to_string())
                        }
                        _ => None,
                    };
                    let index = self.add_declaration(id, kind, names, procedure_name)?;
                    if type_name != kind.type_name() {
                        self.block_mut(index)?.type_name = type_name.to_string();
                    }
                    index
                }
                None => {
                    let inputs = doc.inputs.keys().cloned().collect();
                    let kind = BlockKind::Opaque {
                        fields: doc.fields.clone(),
                    };
                    self.add_block(id, type_name, kind, inputs)?
                }
            },
        };

        for (input, child) in &doc.inputs {
            let child = self.load_block(child, depth + 1)?;
            self.connect_input(index, input, child)?;
        }
        if let Some(next) = &doc.next {
            let next = self.load_block(next, depth + 1)?;
            self.connect_next(index, next)?;
        }
        Ok(index)
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// The main workspace as top-level block trees.
    pub fn to_docs(&self) -> Vec<BlockDoc> {
        self.top_blocks()
            .iter()
            .filter(|&&top| {
                self.get(top)
                    .is_some_and(|block| block.workspace == Workspace::Main)
            })
            .map(|&top| self.to_doc(top))
            .collect()
    }

    pub fn to_doc(&self, index: BlockIndex) -> BlockDoc {
        ensure_stack(|| self.build_doc(index))
    }

    fn build_doc(&self, index: BlockIndex) -> BlockDoc {
        let Some(block) = self.get(index) else {
            return BlockDoc::default();
        };
        let mut doc = BlockDoc::new(block.type_name.clone(), block.id.clone());
        match &block.kind {
            BlockKind::Getter { var } | BlockKind::Setter { var } => {
                doc.fields.insert("VAR".to_string(), var.clone());
            }
            BlockKind::GlobalDeclaration { name } => {
                doc.fields.insert("NAME".to_string(), name.clone());
            }
            BlockKind::Declaration(decl) => {
                if let Some(procedure) = &decl.procedure_name {
                    doc.fields.insert("NAME".to_string(), procedure.clone());
                }
                if decl.kind.has_name_list() {
                    for (i, name) in decl.names.iter().enumerate() {
                        doc.fields.insert(format!("VAR{i}"), name.clone());
                    }
                } else if let Some(name) = decl.names.first() {
                    doc.fields.insert("VAR".to_string(), name.clone());
                }
            }
            BlockKind::ProcedureCall {
                procedure,
                arg_names,
                ..
            } => {
                doc.fields.insert("PROCNAME".to_string(), procedure.clone());
                for (i, name) in arg_names.iter().enumerate() {
                    doc.fields.insert(format!("ARG{i}"), name.clone());
                }
            }
            BlockKind::MutatorArg { name } => {
                doc.fields.insert("NAME".to_string(), name.clone());
            }
            BlockKind::Opaque { fields } => doc.fields.clone_from(fields),
            BlockKind::MutatorContainer { .. } => {}
        }
        for slot in &block.inputs {
            if slot.target.is_some() {
                doc.inputs.insert(slot.name.clone(), self.to_doc(slot.target));
            }
        }
        if block.next.is_some() {
            doc.next = Some(Box::new(self.to_doc(block.next)));
        }
        doc
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
