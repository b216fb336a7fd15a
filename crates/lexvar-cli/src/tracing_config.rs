//! Tracing configuration for the `lexvar` binary.
//!
//! Supports three output formats controlled by `LEXVAR_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, which follows
//!   the nesting of rename and analysis spans
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! LEXVAR_LOG=debug LEXVAR_LOG_FORMAT=tree lexvar -p program.json rename --block d --from a --to b
//! LEXVAR_LOG="lexvar_scope::renamer=trace" lexvar -p program.json free-vars --block d
//! ```
//!
//! The subscriber is only initialised when `LEXVAR_LOG` (or `RUST_LOG`) is
//! set.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `LEXVAR_LOG_FORMAT` value; anything unrecognized is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("LEXVAR_LOG_FORMAT").unwrap_or_default())
    }
}

/// `LEXVAR_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("LEXVAR_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Build a subscriber for `format` that writes through `writer`.
pub fn build_subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true)
                .with_writer(writer);

            Box::new(Registry::default().with(filter).with(tree_layer))
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(writer);

            Box::new(Registry::default().with(filter).with(json_layer))
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(writer);

            Box::new(Registry::default().with(filter).with(text_layer))
        }
    }
}

/// Initialise the global tracing subscriber. All output goes to stderr so it
/// never mixes with the JSON printed on stdout.
pub fn init_tracing() {
    let has_lexvar_log = std::env::var("LEXVAR_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_lexvar_log && !has_rust_log {
        return;
    }

    build_subscriber(LogFormat::from_env(), build_filter(), std::io::stderr).init();
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
