//! Block data: indices, kinds and per-kind payloads.

use std::fmt;

use indexmap::IndexMap;
use lexvar_common::Prefix;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index of a block in a [`crate::BlockArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockIndex(pub u32);

impl BlockIndex {
    /// An empty slot: no input target, no next block, no parent.
    pub const NONE: BlockIndex = BlockIndex(u32::MAX);

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("#none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

// Block type names understood by the scope engine. Any other type name is an
// opaque block.
pub const LEXICAL_VARIABLE_GET: &str = "lexical_variable_get";
pub const LEXICAL_VARIABLE_SET: &str = "lexical_variable_set";
pub const GLOBAL_DECLARATION: &str = "global_declaration";
pub const LOCAL_DECLARATION_STATEMENT: &str = "local_declaration_statement";
pub const LOCAL_DECLARATION_EXPRESSION: &str = "local_declaration_expression";
pub const CONTROLS_FOR_RANGE: &str = "controls_forRange";
pub const CONTROLS_FOR: &str = "controls_for";
pub const CONTROLS_FOR_EACH: &str = "controls_forEach";
pub const PROCEDURES_DEF_NO_RETURN: &str = "procedures_defnoreturn";
pub const PROCEDURES_DEF_RETURN: &str = "procedures_defreturn";
pub const PROCEDURES_CALL_NO_RETURN: &str = "procedures_callnoreturn";
pub const PROCEDURES_CALL_RETURN: &str = "procedures_callreturn";
pub const LOCAL_MUTATOR_CONTAINER: &str = "local_mutatorcontainer";
pub const PROCEDURES_MUTATOR_CONTAINER: &str = "procedures_mutatorcontainer";
pub const LOCAL_MUTATOR_ARG: &str = "local_mutatorarg";
pub const PROCEDURES_MUTATOR_ARG: &str = "procedures_mutatorarg";

/// The declaring block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `initialize local a to DECL0 ... in STACK`, a statement with `next`.
    LocalStatement,
    /// `initialize local a to DECL0 ... in RETURN`, an expression.
    LocalExpression,
    /// `for each number from START to END by STEP do DO`.
    ForRange,
    /// `for each item in LIST do DO`.
    ForEach,
    /// A top-level procedure definition; parameters scope over the body.
    Procedure { returns: bool },
}

impl DeclarationKind {
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Some(match type_name {
            LOCAL_DECLARATION_STATEMENT => Self::LocalStatement,
            LOCAL_DECLARATION_EXPRESSION => Self::LocalExpression,
            CONTROLS_FOR_RANGE | CONTROLS_FOR => Self::ForRange,
            CONTROLS_FOR_EACH => Self::ForEach,
            PROCEDURES_DEF_NO_RETURN => Self::Procedure { returns: false },
            PROCEDURES_DEF_RETURN => Self::Procedure { returns: true },
            _ => return None,
        })
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::LocalStatement => LOCAL_DECLARATION_STATEMENT,
            Self::LocalExpression => LOCAL_DECLARATION_EXPRESSION,
            Self::ForRange => CONTROLS_FOR_RANGE,
            Self::ForEach => CONTROLS_FOR_EACH,
            Self::Procedure { returns: false } => PROCEDURES_DEF_NO_RETURN,
            Self::Procedure { returns: true } => PROCEDURES_DEF_RETURN,
        }
    }

    /// The input in which the declared names are visible.
    pub fn scoped_input(self) -> &'static str {
        match self {
            Self::LocalStatement | Self::Procedure { returns: false } => "STACK",
            Self::LocalExpression | Self::Procedure { returns: true } => "RETURN",
            Self::ForRange | Self::ForEach => "DO",
        }
    }

    pub fn prefix(self) -> Prefix {
        match self {
            Self::LocalStatement | Self::LocalExpression => Prefix::Local,
            Self::ForRange => Prefix::LoopCounter,
            Self::ForEach => Prefix::LoopItem,
            Self::Procedure { .. } => Prefix::Parameter,
        }
    }

    /// Closed declarations must have no free variables besides their own
    /// names, and scope over every child rather than one scoped input.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Procedure { .. })
    }

    /// Whether names live in an indexed `VARi` list (as opposed to a single
    /// `VAR` field).
    pub fn has_name_list(self) -> bool {
        !matches!(self, Self::ForRange | Self::ForEach)
    }

    /// Whether the block can be edited through a mutator.
    pub fn has_mutator(self) -> bool {
        self.has_name_list()
    }

    pub fn mutator_types(self) -> (&'static str, &'static str) {
        match self {
            Self::Procedure { .. } => (PROCEDURES_MUTATOR_CONTAINER, PROCEDURES_MUTATOR_ARG),
            _ => (LOCAL_MUTATOR_CONTAINER, LOCAL_MUTATOR_ARG),
        }
    }

    /// Input names for a declaration of `name_count` names, in input order.
    pub fn input_names(self, name_count: usize) -> Vec<String> {
        let mut inputs = Vec::new();
        match self {
            Self::LocalStatement | Self::LocalExpression => {
                inputs.extend((0..name_count).map(|i| format!("DECL{i}")));
            }
            Self::ForRange => inputs.extend(["START", "END", "STEP"].map(String::from)),
            Self::ForEach => inputs.push("LIST".to_string()),
            Self::Procedure { .. } => {}
        }
        inputs.push(self.scoped_input().to_string());
        inputs
    }

    pub fn has_next(self) -> bool {
        matches!(self, Self::LocalStatement | Self::ForRange | Self::ForEach)
    }
}

/// Payload of a declaring block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared names, pairwise distinct.
    pub names: Vec<String>,
    /// Procedure name (procedure definitions only).
    pub procedure_name: Option<String>,
    /// Container of the open mutator editor, or `NONE`.
    pub mutator: BlockIndex,
}

/// What a block is, as far as scoping is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Getter; `var` is the field text, possibly prefixed ("global x").
    Getter { var: String },
    /// Setter with a `VALUE` input.
    Setter { var: String },
    /// Top-level global variable with a `VALUE` initializer.
    GlobalDeclaration { name: String },
    Declaration(Declaration),
    /// Call to the procedure named `procedure`. `arg_ids` keeps argument
    /// sockets attached to the same parameter across parameter renames.
    ProcedureCall {
        procedure: String,
        arg_names: Vec<String>,
        arg_ids: Vec<String>,
    },
    /// Root of a mutator editor; its `STACK` holds a chain of arguments.
    MutatorContainer { owner: BlockIndex },
    /// One parameter in a mutator editor.
    MutatorArg { name: String },
    /// Anything else: recursed into uniformly. Fields are carried through
    /// untouched.
    Opaque { fields: IndexMap<String, String> },
}

/// Which surface a block lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workspace {
    #[default]
    Main,
    /// The private editing surface of an open mutator.
    Mutator,
}

/// A named child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSlot {
    pub name: String,
    pub target: BlockIndex,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    pub type_name: String,
    pub kind: BlockKind,
    pub inputs: SmallVec<[InputSlot; 4]>,
    pub next: BlockIndex,
    /// The block whose input or `next` link holds this one.
    pub parent: BlockIndex,
    pub workspace: Workspace,
}

impl Block {
    pub fn input(&self, name: &str) -> Option<&InputSlot> {
        self.inputs.iter().find(|slot| slot.name == name)
    }

    pub fn input_target(&self, name: &str) -> BlockIndex {
        self.input(name).map_or(BlockIndex::NONE, |slot| slot.target)
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        match &self.kind {
            BlockKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Field text of a getter or setter.
    pub fn reference_text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Getter { var } | BlockKind::Setter { var } => Some(var),
            _ => None,
        }
    }

    pub fn global_name(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::GlobalDeclaration { name } => Some(name),
            _ => None,
        }
    }
}
