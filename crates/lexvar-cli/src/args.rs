use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lexvar_common::Prefix;

/// CLI arguments for the lexvar binary.
#[derive(Parser, Debug)]
#[command(
    name = "lexvar",
    version,
    about = "Scope analysis and capture-avoiding renaming for lexical-variable block programs"
)]
pub struct CliArgs {
    /// Path to the program document (JSON with `config` and `blocks`).
    /// Every command except `check-identifier` needs one.
    #[arg(short = 'p', long = "program")]
    pub program: Option<PathBuf>,

    /// Path to a JSON configuration file replacing the document's `config`.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Show namespace prefixes ("local x") to the user.
    #[arg(long = "showPrefix", alias = "show-prefix")]
    pub show_prefix: bool,

    /// Treat each prefix as a separate namespace. Implies --showPrefix.
    #[arg(long = "usePrefix", alias = "use-prefix")]
    pub use_prefix: bool,

    /// User-visible spelling of the global prefix.
    #[arg(long = "globalLabel", alias = "global-label")]
    pub global_label: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the free variables of a block and its next chain.
    FreeVars {
        /// Block id.
        #[arg(long)]
        block: String,
    },

    /// List the references to a name declared at a block, and the inner
    /// declarations that could capture them.
    References {
        /// Id of the declaring block.
        #[arg(long)]
        block: String,

        /// Declared name.
        #[arg(long)]
        name: String,

        /// Namespace prefix of the declaration (none, local, input, item,
        /// counter). Defaults to the block's own prefix.
        #[arg(long)]
        prefix: Option<Prefix>,
    },

    /// Rename a name declared at a block and every reference to it.
    Rename {
        /// Id of the declaring block.
        #[arg(long)]
        block: String,

        /// Currently declared name.
        #[arg(long)]
        from: String,

        /// Requested new name; legalized before use.
        #[arg(long)]
        to: String,

        /// Rename inner declarations that would capture the new name instead
        /// of adjusting the new name.
        #[arg(long = "renameCapturables", alias = "rename-capturables")]
        rename_capturables: bool,

        /// Write the updated program here.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Rename a global declaration and every global reference to it.
    RenameGlobal {
        /// Id of the global declaration block.
        #[arg(long)]
        block: String,

        /// Requested new name; legalized and made unique among globals.
        #[arg(long)]
        to: String,

        /// Write the updated program here.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Rename a procedure definition and every call to it.
    RenameProcedure {
        /// Id of the procedure definition block.
        #[arg(long)]
        block: String,

        /// Requested new name; legalized and made unique among procedures.
        #[arg(long)]
        to: String,

        /// Write the updated program here.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Report getters and setters whose name does not resolve.
    CheckReferences,

    /// List the (menu text, reference text) pairs visible at a block.
    NamesInScope {
        /// Block id.
        #[arg(long)]
        block: String,
    },

    /// Check whether a string is a legal identifier.
    CheckIdentifier {
        /// Text to check.
        raw: String,
    },
}
