//! Engine configuration.
//!
//! Two independent flags control namespace prefixes:
//!
//! | showPrefixToUser | usePrefixInCode | Meaning |
//! |---|---|---|
//! | false | false | prefixes hidden, one shared lexical namespace (default) |
//! | true  | false | prefixes shown as annotations, one shared namespace |
//! | true  | true  | prefixes shown, each prefix is its own namespace |
//!
//! Hiding prefixes while separating namespaces is not supported: two
//! declarations could then display identically. [`ScopeConfig::validated`]
//! turns that combination into the third row.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::prefix::GLOBAL_KEYWORD;

/// Immutable configuration threaded into every analyzer and renamer entry
/// point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeConfig {
    /// Render namespace prefixes ("local x", "input y") to the user.
    pub show_prefix_to_user: bool,
    /// Treat prefixes as separate namespaces during analysis.
    pub use_prefix_in_code: bool,
    /// User-visible spelling of the global prefix. The internal keyword
    /// `global` is always recognized as well.
    pub global_label: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            show_prefix_to_user: false,
            use_prefix_in_code: false,
            global_label: GLOBAL_KEYWORD.to_string(),
        }
    }
}

impl ScopeConfig {
    pub fn new(show_prefix_to_user: bool, use_prefix_in_code: bool) -> Self {
        Self {
            show_prefix_to_user,
            use_prefix_in_code,
            ..Self::default()
        }
    }

    pub fn with_global_label(mut self, label: impl Into<String>) -> Self {
        self.global_label = label.into();
        self
    }

    /// Normalize unsupported flag combinations.
    pub fn validated(mut self) -> Self {
        if self.use_prefix_in_code && !self.show_prefix_to_user {
            warn!("usePrefixInCode requires showPrefixToUser; enabling prefix display");
            self.show_prefix_to_user = true;
        }
        if self.global_label.is_empty() {
            warn!("empty global label; falling back to '{GLOBAL_KEYWORD}'");
            self.global_label = GLOBAL_KEYWORD.to_string();
        }
        self
    }
}
