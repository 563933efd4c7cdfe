use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding the sample trace scripts
const TRACE_DIR: &str = "traces";

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "gba-timer developer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test suites (all of them when none is named)
    Test {
        #[arg(value_enum)]
        suites: Vec<Suite>,
    },
    /// Play trace scripts through the gba-timer binary
    Trace {
        /// Scripts to play; defaults to every script under traces/
        scripts: Vec<PathBuf>,
        /// Print JSON reports instead of the step log
        #[arg(long)]
        json: bool,
    },
    /// Run the advance benchmarks, optionally filtered by name
    Bench { filter: Option<String> },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Suite {
    /// Register file, advance and cascade unit tests
    Timer,
    /// IF/IE/IME unit tests
    Interrupt,
    /// Bus decoding and IRQ delivery unit tests
    System,
    /// Batched advance against the cycle-by-cycle model
    Props,
    /// Config and trace script loading
    Trace,
    /// Whole-system scenarios
    Integration,
    /// Doc examples
    Doc,
}

impl Suite {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Suite::Timer => &["--lib", "core::timer"],
            Suite::Interrupt => &["--lib", "core::interrupt"],
            Suite::System => &["--lib", "core::system"],
            Suite::Props => &["--test", "timer_properties"],
            Suite::Trace => &["--test", "trace_script"],
            Suite::Integration => &["--test", "integration_test"],
            Suite::Doc => &["--doc"],
        }
    }

    fn label(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Test { suites } => test(&suites),
        Commands::Trace { scripts, json } => trace(scripts, json),
        Commands::Bench { filter } => bench(filter.as_deref()),
    }
}

fn test(suites: &[Suite]) -> Result<()> {
    if suites.is_empty() {
        return cargo(&["test", "-p", "gba-timer"]);
    }

    let mut failed = Vec::new();
    for &suite in suites {
        println!("{} {} tests", "→".blue(), suite.label().bold());

        let mut args = vec!["test", "-p", "gba-timer"];
        args.extend_from_slice(suite.cargo_args());
        if cargo(&args).is_err() {
            failed.push(suite.label());
        }
    }

    if !failed.is_empty() {
        bail!("failed suites: {}", failed.join(", "));
    }
    println!("{}", "✓ all requested suites passed".green());
    Ok(())
}

fn trace(scripts: Vec<PathBuf>, json: bool) -> Result<()> {
    let scripts = if scripts.is_empty() {
        bundled_traces()?
    } else {
        scripts
    };

    for script in &scripts {
        if !script.is_file() {
            bail!("trace script not found: {}", script.display());
        }

        println!("{} {}", "▶".cyan(), script.display().to_string().bold());

        let path = script.to_string_lossy();
        let mut args = vec!["run", "--quiet", "--bin", "gba-timer", "--", &*path];
        if json {
            args.push("--json");
        }
        cargo(&args).with_context(|| format!("trace {} failed", script.display()))?;
    }

    Ok(())
}

fn bundled_traces() -> Result<Vec<PathBuf>> {
    let dir = Path::new(TRACE_DIR);
    let mut scripts: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    scripts.sort();

    if scripts.is_empty() {
        bail!("no trace scripts under {}", dir.display());
    }
    Ok(scripts)
}

fn bench(filter: Option<&str>) -> Result<()> {
    let mut args = vec!["bench", "-p", "gba-timer", "--bench", "timer_bench"];
    if let Some(filter) = filter {
        args.extend(["--", filter]);
    }
    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("failed to spawn cargo")?;

    if !status.success() {
        bail!("cargo {} exited with {}", args.join(" "), status);
    }
    Ok(())
}
