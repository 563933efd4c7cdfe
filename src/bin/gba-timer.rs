// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use gba_timer::core::config::Config;
use gba_timer::core::error::Result;
use gba_timer::core::system::System;
use gba_timer::core::trace::{Script, StepOutcome};
use log::{error, info};
use std::path::PathBuf;

/// Play a timer trace script against the GBA timer block
#[derive(Parser)]
#[command(name = "gba-timer")]
#[command(about = "GBA timer trace runner", long_about = None)]
struct Args {
    /// Path to the trace script (.toml)
    script: PathBuf,

    /// Path to a configuration file (.toml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // RUST_LOG may come from .env
    dotenvy::dotenv().ok();

    // Default level INFO, RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    info!("gba-timer v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    info!("Loading trace from: {}", args.script.display());
    let script = Script::load(&args.script).inspect_err(|e| {
        error!("Failed to load trace: {}", e);
    })?;

    let mut system = System::with_config(&config);
    let report = script.run(&mut system).inspect_err(|e| {
        error!("Trace failed: {}", e);
    })?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    for (index, outcome) in report.outcomes.iter().enumerate() {
        match outcome {
            StepOutcome::Read { value } => info!("step {}: read 0x{:02X}", index, value),
            StepOutcome::Advanced(step) if step.any_overflow() => info!(
                "step {}: overflows {:?}, irq 0x{:04X}",
                index, step.overflows, step.irq
            ),
            _ => {}
        }
    }

    for timer in &report.timers {
        info!(
            "TM{}: counter=0x{:04X} reload=0x{:04X} control=0x{:02X}",
            timer.id,
            timer.counter,
            timer.reload,
            timer.control.to_byte()
        );
    }
    info!(
        "IF=0x{:04X} after {} cycles",
        report.irq_status, report.total_cycles
    );

    Ok(())
}
