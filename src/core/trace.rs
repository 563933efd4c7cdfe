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

//! Scripted timer traces
//!
//! A trace script is a TOML list of register accesses and cycle batches
//! played against a [`System`]. The resulting [`TraceReport`] records what
//! each step observed and serializes to JSON.
//!
//! ```toml
//! [[step]]
//! op = "write32"
//! address = 0x04000100
//! value = 0x00C0FFF0
//!
//! [[step]]
//! op = "advance"
//! cycles = 32
//!
//! [[step]]
//! op = "read"
//! timer = 0
//! offset = 0
//! ```

use super::error::{EmulatorError, Result};
use super::system::System;
use super::timer::{TimerSnapshot, TimerStep, TIMER_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Byte write to a timer register slot
    Write { timer: usize, offset: usize, value: u8 },
    /// Halfword write to an absolute address
    Write16 { address: u32, value: u16 },
    /// Word write to an absolute address
    Write32 { address: u32, value: u32 },
    /// Byte read from a timer register slot
    Read { timer: usize, offset: usize },
    /// Hand `cycles` elapsed cycles to the timers
    Advance { cycles: u32 },
    /// Reset timers and interrupt controller
    Reset,
}

/// A parsed trace script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// What a single step observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Written,
    Read { value: u8 },
    Advanced(TimerStep),
    Reset,
}

/// Result of playing a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    /// One outcome per script step, in order
    pub outcomes: Vec<StepOutcome>,
    /// Timer state after the last step
    pub timers: [TimerSnapshot; TIMER_COUNT],
    /// Interrupt-request word after the last step
    pub irq_status: u16,
    /// Cycles advanced since the last reset
    pub total_cycles: u64,
}

impl Script {
    /// Parse a script from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a script from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Play every step against `system`
    ///
    /// Stops at the first step that addresses a timer outside 0-3 or an
    /// unmapped address.
    pub fn run(&self, system: &mut System) -> Result<TraceReport> {
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let outcome = apply(system, step).map_err(|e| {
                EmulatorError::Trace(format!("step {} ({:?}): {}", index, step, e))
            })?;
            log::debug!("step {}: {:?} -> {:?}", index, step, outcome);
            outcomes.push(outcome);
        }

        Ok(TraceReport {
            outcomes,
            timers: system.timers().snapshot(),
            irq_status: system.interrupts().read_status(),
            total_cycles: system.total_cycles(),
        })
    }
}

fn apply(system: &mut System, step: &Step) -> Result<StepOutcome> {
    let outcome = match *step {
        Step::Write {
            timer,
            offset,
            value,
        } => {
            system.timers().get(timer)?;
            system.timers_mut().write(timer, offset, value);
            StepOutcome::Written
        }
        Step::Write16 { address, value } => {
            system.write16(address, value)?;
            StepOutcome::Written
        }
        Step::Write32 { address, value } => {
            system.write32(address, value)?;
            StepOutcome::Written
        }
        Step::Read { timer, offset } => StepOutcome::Read {
            value: system.timers().get(timer)?.read(offset),
        },
        Step::Advance { cycles } => StepOutcome::Advanced(system.run(cycles)),
        Step::Reset => {
            system.reset();
            StepOutcome::Reset
        }
    };
    Ok(outcome)
}

impl TraceReport {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
