// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-audit CLI - deterministic WCAG AA conformance checks over a
//! normalized document model.

use a11y_audit::report::{generate_report, OutputFormat};
use a11y_audit::rules;
use a11y_audit::{evaluate, AuditConfig, DocumentModel, Severity};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deterministic WCAG AA conformance engine
#[derive(Parser)]
#[command(name = "a11y-audit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a document model (JSON) against the rule catalog
    Audit {
        /// Document model file, or "-" for stdin
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when a finding at or above this severity exists
        #[arg(long, default_value = "high")]
        fail_on: SeverityArg,

        /// Rule ids to skip (repeatable)
        #[arg(long = "disable")]
        disabled: Vec<String>,

        /// Minimum interactive target size in logical units
        #[arg(long, default_value_t = 44.0)]
        min_target_size: f64,

        /// Evaluate on a single thread
        #[arg(long)]
        sequential: bool,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the rule catalog with WCAG references
    Rules,
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

/// Severity threshold CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeverityArg {
    Critical,
    High,
    Medium,
    Low,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("a11y_audit=debug")
    } else {
        EnvFilter::new("a11y_audit=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            file,
            format,
            output,
            fail_on,
            disabled,
            min_target_size,
            sequential,
            verbose,
        } => {
            init_logging(verbose);

            let input = read_input(&file)?;
            let doc = DocumentModel::from_json(&input)?;

            let mut config = AuditConfig { min_target_size, parallel: !sequential, ..AuditConfig::default() };
            config.disabled_rules.extend(disabled);

            let findings = evaluate(&doc, &config)?;
            let report = generate_report(&findings, format.into());
            write_output(&report, output.as_deref())?;

            if findings.at_or_above(fail_on.into()) {
                std::process::exit(1);
            }
        }

        Commands::Rules => {
            for rule in rules::catalog() {
                println!("{:<24} WCAG {:<7} {}", rule.id(), rule.wcag(), rule.description());
            }
        }
    }

    Ok(())
}

/// Read the document model from a file or stdin.
fn read_input(path: &std::path::Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        use std::io::Read;
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
