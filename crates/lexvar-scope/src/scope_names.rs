//! Names visible at a point in the tree.
//!
//! Results are `(display, value)` pairs in the form menus use: the display
//! text shown to the user and the text stored in a reference field when the
//! entry is picked.

use lexvar_blocks::{BlockIndex, ScopeNode};
use lexvar_common::limits::MAX_PARENT_CHAIN_DEPTH;
use lexvar_common::prefix::{global_reference, prefix_global_menu_name};
use lexvar_common::{Prefix, ScopeConfig, sort_and_remove_duplicates};
use rustc_hash::FxHashMap;
use tracing::warn;

/// Lexical names declared by ancestors of `block` whose scope covers it,
/// sorted and de-duplicated.
///
/// With a single shared namespace a name declared at several levels is listed
/// once, carrying the prefix of the innermost declaration.
pub fn lexical_names_in_scope<T: ScopeNode + ?Sized>(
    tree: &T,
    block: BlockIndex,
    config: &ScopeConfig,
) -> Vec<(String, String)> {
    let mut prefixed = Vec::new();
    let mut innermost: FxHashMap<String, Prefix> = FxHashMap::default();

    let mut child = block;
    let mut ancestor = tree.parent(block);
    let mut depth = 0;
    while ancestor.is_some() {
        depth += 1;
        if depth > MAX_PARENT_CHAIN_DEPTH {
            warn!(%block, "parent chain too deep; names in scope truncated");
            break;
        }
        if tree.scope_covers(ancestor, child) {
            let prefix = tree.declared_prefix(ancestor);
            for name in tree.declared_names(ancestor) {
                if config.use_prefix_in_code {
                    prefixed.push(prefix.possibly_prefix_menu_name_with(&name, config));
                } else {
                    innermost.entry(name).or_insert(prefix);
                }
            }
        }
        child = ancestor;
        ancestor = tree.parent(ancestor);
    }

    prefixed.extend(
        innermost
            .into_iter()
            .map(|(name, prefix)| prefix.possibly_prefix_menu_name_with(&name, config)),
    );
    sort_and_remove_duplicates(&prefixed)
        .into_iter()
        .map(|name| (name.clone(), name))
        .collect()
}

/// Every name a reference at `block` may pick: the globals, then the lexical
/// names in scope.
pub fn names_in_scope<T: ScopeNode + ?Sized>(
    tree: &T,
    block: BlockIndex,
    config: &ScopeConfig,
) -> Vec<(String, String)> {
    let globals = sort_and_remove_duplicates(&tree.global_names(BlockIndex::NONE));
    let mut names: Vec<(String, String)> = globals
        .iter()
        .map(|name| (prefix_global_menu_name(name, config), global_reference(name)))
        .collect();
    names.extend(lexical_names_in_scope(tree, block, config));
    names
}

#[cfg(test)]
#[path = "../tests/scope_names_tests.rs"]
mod tests;
