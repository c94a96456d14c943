//! Development automation for the plansim workspace.
//!
//! Run with: `cargo xtask <command>`

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::Context;

/// Workspace packages that must build on their own.
const PACKAGES: &[&str] = &["plansim-domain", "plansim-core", "plansim-infra", "plansim-cli"];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("check-packages") => run_check_packages(),
        Some("deny") => run_optional_tool("deny", &["deny", "check"]),
        Some("audit") => run_optional_tool("audit", &["audit"]),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("plansim development tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci              Run fmt, clippy, check-packages and test");
    println!("    fmt             Check Rust code formatting");
    println!("    clippy          Run Clippy lints");
    println!("    test            Run all tests");
    println!("    check-packages  Check each workspace package on its own");
    println!("    deny            Check dependencies with cargo-deny");
    println!("    audit           Audit dependencies for security vulnerabilities");
    println!("    help            Show this help message");
}

fn run_ci() -> anyhow::Result<()> {
    let steps: [(&str, fn() -> anyhow::Result<()>); 4] = [
        ("Checking Rust format", run_fmt),
        ("Running Clippy", run_clippy),
        ("Checking packages in isolation", run_check_packages),
        ("Running tests", run_test),
    ];

    for (index, (label, step)) in steps.iter().enumerate() {
        println!("\n==> Step {}/{}: {label}...", index + 1, steps.len());
        step()?;
    }

    println!("\nAll CI checks passed");
    Ok(())
}

fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "Format check failed. Run 'cargo fmt --all' to fix.")
}

fn run_clippy() -> anyhow::Result<()> {
    cargo(
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        "Clippy run failed. See output above.",
    )
}

fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace"], "Tests failed")
}

/// Feature unification can hide a missing dependency; checking packages
/// one at a time catches it.
fn run_check_packages() -> anyhow::Result<()> {
    for (index, package) in PACKAGES.iter().enumerate() {
        println!("[{}/{}] cargo check -p {package}", index + 1, PACKAGES.len());
        cargo(&["check", "-p", package, "--all-targets"], &format!("{package} failed to check"))?;
    }
    Ok(())
}

fn run_optional_tool(tool: &str, args: &[&str]) -> anyhow::Result<()> {
    let installed = Command::new("cargo")
        .args([tool, "--version"])
        .output()
        .is_ok_and(|output| output.status.success());

    if !installed {
        eprintln!("cargo-{tool} is not installed.");
        eprintln!("Install it with: cargo install cargo-{tool}");
        anyhow::bail!("cargo-{tool} not found");
    }

    cargo(args, &format!("cargo-{tool} found issues"))
}

fn cargo(args: &[&str], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}
