//! CLI entry point for stackguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `stackguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use stackguard_app::{
    CheckInput, ExplainOutput, parse_report_json, render_annotations, render_markdown, run_check,
    run_explain, serialize_report, to_renderable, verdict_exit_code,
};
use stackguard_settings::Overrides;
use stackguard_types::{StackguardReport, ids};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stackguard",
    version,
    about = "Compliance rule evaluation for declared infrastructure resource trees"
)]
struct Cli {
    /// Path to stackguard config TOML (missing file means defaults).
    #[arg(long, default_value = "stackguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|audit).
    #[arg(long)]
    profile: Option<String>,

    /// Override the rule framework to evaluate.
    #[arg(long)]
    framework: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long)]
    max_findings: Option<u32>,

    /// Log engine decisions to stderr (RUST_LOG takes precedence).
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a resource tree and write artifacts.
    Check {
        /// Resource-tree JSON document to evaluate.
        #[arg(long)]
        tree: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report_out: Utf8PathBuf,

        /// Append each rule's explanation to its finding message.
        #[arg(long)]
        verbose: bool,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/stackguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule id in the selected framework.
    Explain {
        /// The rule id (e.g., "s3.bucket_encryption") to explain.
        rule_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.cmd {
        Commands::Check {
            ref tree,
            ref report_out,
            verbose,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, tree, report_out, verbose, write_markdown, markdown_out),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { ref rule_id } => cmd_explain(&cli, rule_id),
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_check(
    cli: &Cli,
    tree: &Utf8Path,
    report_out: &Utf8Path,
    verbose: bool,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Load config if present; missing file is allowed (defaults apply).
        let cfg_text = match std::fs::read_to_string(&cli.config) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(config = %cli.config, "no config file, using defaults");
                String::new()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config: {}", cli.config));
            }
        };

        let overrides = Overrides {
            profile: cli.profile.clone(),
            framework: cli.framework.clone(),
            // The flag can only switch verbose messages on.
            verbose: verbose.then_some(true),
            max_findings: cli.max_findings,
        };

        let output = run_check(CheckInput {
            tree_path: tree,
            config_text: &cfg_text,
            overrides,
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("stackguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &StackguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<StackguardReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(cli: &Cli, rule_id: &str) -> anyhow::Result<()> {
    let framework = cli.framework.as_deref().unwrap_or(ids::FRAMEWORK_BASELINE);
    match run_explain(rule_id, framework) {
        ExplainOutput::Found(exp) => {
            print!("{}", stackguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available,
        } => {
            eprint!(
                "{}",
                stackguard_app::format_not_found(&identifier, &available)
            );
            std::process::exit(1);
        }
    }
}
