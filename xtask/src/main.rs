use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for blockview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the scene update benchmarks (release)
    Bench,
    /// Print the reference forward trace through the CLI
    Trace,
}

/// One cargo invocation with a label for the log line and the failure.
struct Step {
    label: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    label: "cargo fmt --check",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    label: "cargo clippy",
    args: &[
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ],
};
const TEST: Step = Step {
    label: "cargo test",
    args: &["test", "--workspace"],
};
const DENY: Step = Step {
    label: "cargo deny check (licenses bans sources)",
    args: &["deny", "check", "licenses", "bans", "sources"],
};
const DOC: Step = Step {
    label: "cargo doc",
    args: &["doc", "--workspace", "--no-deps"],
};
const BUILD: Step = Step {
    label: "cargo build",
    args: &["build", "--workspace"],
};
const BENCH: Step = Step {
    label: "cargo bench (blockview-kernel)",
    args: &["bench", "-p", "blockview-kernel"],
};
const TRACE: Step = Step {
    label: "blockview-cli simulate",
    args: &[
        "run",
        "-q",
        "-p",
        "blockview-cli",
        "--",
        "simulate",
        "--frames",
        "10",
        "--dt",
        "0.1",
        "--intent",
        "forward",
    ],
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps: &[&Step] = match cli.command {
        Commands::Check => &[&FMT, &CLIPPY, &TEST, &DENY, &DOC],
        Commands::Fmt => &[&FMT],
        Commands::Clippy => &[&CLIPPY],
        Commands::Test => &[&TEST],
        Commands::Deny => &[&DENY],
        Commands::Doc => &[&DOC],
        Commands::Build => &[&BUILD],
        Commands::Bench => &[&BENCH],
        Commands::Trace => &[&TRACE],
    };

    for step in steps {
        run(step)?;
    }

    Ok(())
}

fn run(step: &Step) -> Result<()> {
    println!("==> Running {}", step.label);
    let status = Command::new("cargo").args(step.args).status()?;
    if !status.success() {
        anyhow::bail!("{} failed", step.label);
    }
    Ok(())
}
