//! Stable DTOs and IDs used across the stackguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted findings and report
//! - stable string IDs (reserved rule ids, schema ids)
//! - canonical resource path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod receipt;

pub use path::ResourcePath;
pub use receipt::{
    EvaluationCounts, Finding, Level, ReportEnvelope, SCHEMA_CONFIG_V1, SCHEMA_REPORT_V1, StackguardData,
    StackguardReport, ToolMeta, Verdict,
};
