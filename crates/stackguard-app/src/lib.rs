//! Use case orchestration for stackguard.
//!
//! This crate provides the application layer: use cases that coordinate the tree loader, the
//! settings, the domain engine, and the render layer. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod tree;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, RuleExplanation, format_explanation, format_not_found, run_explain};
pub use render::{
    parse_report_json, render_annotations, render_markdown, serialize_report, to_renderable,
};
pub use tree::{LoadedTree, load_tree, parse_tree_json};
