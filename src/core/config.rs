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

//! Emulator configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [timers]
//! mmio_base = 0x04000100
//! irq_base_bit = 3
//! ```

use crate::core::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest IRQ base bit that still fits timer 3 in a 16-bit request word
pub const MAX_IRQ_BASE_BIT: u16 = 12;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timers: TimerConfig,
}

/// Timer block placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Absolute address of TM0CNT_L
    pub mmio_base: u32,

    /// Bit index of the timer 0 IRQ in the interrupt-request word
    pub irq_base_bit: u16,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mmio_base: 0x0400_0100,
            irq_base_bit: 3,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the timer block cannot represent
    pub fn validate(&self) -> Result<()> {
        if self.timers.irq_base_bit > MAX_IRQ_BASE_BIT {
            return Err(EmulatorError::InvalidConfig(format!(
                "timers.irq_base_bit = {} (max {})",
                self.timers.irq_base_bit, MAX_IRQ_BASE_BIT
            )));
        }
        if self.timers.mmio_base & 0x03 != 0 {
            return Err(EmulatorError::InvalidConfig(format!(
                "timers.mmio_base = 0x{:08X} is not word aligned",
                self.timers.mmio_base
            )));
        }
        if self.timers.mmio_base.checked_add(0x0F).is_none() {
            return Err(EmulatorError::InvalidConfig(format!(
                "timers.mmio_base = 0x{:08X} leaves no room for the register block",
                self.timers.mmio_base
            )));
        }
        Ok(())
    }
}
