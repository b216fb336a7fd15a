//! Namespace prefixes.
//!
//! Every non-global name is introduced by a declaration kind that carries a
//! prefix label: procedure parameters are `input`, local declarations are
//! `local`, for-each indices are `item` and range indices are `counter`.
//! Depending on [`ScopeConfig`] the label may be shown to the user
//! ("local x") and may separate namespaces during analysis.
//!
//! Globals are always written with a prefix, regardless of the flags. The
//! stored form uses [`GLOBAL_KEYWORD`]; the displayed form uses the
//! configured (translatable) `global_label`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ScopeConfig;

/// Internal token identifying global variables; never translated.
pub const GLOBAL_KEYWORD: &str = "global";

/// Separates a prefix from the name it qualifies, e.g. the space in "local x".
pub const MENU_SEPARATOR: &str = " ";

/// The namespace a name was declared in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prefix {
    /// No prefix (prefixes hidden, or an unrecognized label).
    #[default]
    None,
    Global,
    /// Procedure and event-handler parameters.
    #[serde(rename = "input")]
    Parameter,
    Local,
    /// For-each loop index.
    #[serde(rename = "item")]
    LoopItem,
    /// Range loop index.
    #[serde(rename = "counter")]
    LoopCounter,
}

impl Prefix {
    /// Lexical prefixes in the order `unprefix_name` tries them.
    pub const LEXICAL: [Prefix; 4] = [
        Prefix::Parameter,
        Prefix::Local,
        Prefix::LoopItem,
        Prefix::LoopCounter,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Global => GLOBAL_KEYWORD,
            Prefix::Parameter => "input",
            Prefix::Local => "local",
            Prefix::LoopItem => "item",
            Prefix::LoopCounter => "counter",
        }
    }

    pub const fn is_global(self) -> bool {
        matches!(self, Prefix::Global)
    }

    /// `name` as shown in menus: "<label> name" when prefixes are shown to the
    /// user, the bare name otherwise.
    pub fn possibly_prefix_menu_name_with(self, name: &str, config: &ScopeConfig) -> String {
        if config.show_prefix_to_user && self != Prefix::None {
            format!("{}{MENU_SEPARATOR}{name}", self.label())
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Prefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Prefix::None),
            "global" => Ok(Prefix::Global),
            "input" | "param" => Ok(Prefix::Parameter),
            "local" => Ok(Prefix::Local),
            "item" => Ok(Prefix::LoopItem),
            "counter" => Ok(Prefix::LoopCounter),
            other => Err(format!("unknown prefix '{other}'")),
        }
    }
}

/// A global name as shown in menus, using the configured label.
pub fn prefix_global_menu_name(name: &str, config: &ScopeConfig) -> String {
    format!("{}{MENU_SEPARATOR}{name}", config.global_label)
}

/// A global name as stored in reference fields.
pub fn global_reference(name: &str) -> String {
    format!("{GLOBAL_KEYWORD}{MENU_SEPARATOR}{name}")
}

fn strip_label<'a>(name: &'a str, label: &str) -> Option<&'a str> {
    name.strip_prefix(label)?.strip_prefix(MENU_SEPARATOR)
}

/// Split a possibly prefixed name into its prefix and base name.
///
/// Globals are recognized by either the configured label or the internal
/// keyword. Lexical prefixes are only recognized when prefixes are shown to
/// the user; otherwise the whole text is the base name.
pub fn unprefix_name<'a>(name: &'a str, config: &ScopeConfig) -> (Prefix, &'a str) {
    if let Some(base) = strip_label(name, &config.global_label) {
        return (Prefix::Global, base);
    }
    if let Some(base) = strip_label(name, GLOBAL_KEYWORD) {
        return (Prefix::Global, base);
    }
    if !config.show_prefix_to_user {
        return (Prefix::None, name);
    }
    for prefix in Prefix::LEXICAL {
        if let Some(base) = strip_label(name, prefix.label()) {
            return (prefix, base);
        }
    }
    (Prefix::None, name)
}

#[cfg(test)]
#[path = "../tests/prefix_tests.rs"]
mod tests;
