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

//! System integration module
//!
//! Ties the timer block to the interrupt controller and stands in for the
//! parts of the machine that drive it: the address decoder that routes guest
//! accesses, and the scheduler that hands over elapsed cycles.
//!
//! # Address Map
//!
//! | Address                 | Register           | Access |
//! |-------------------------|--------------------|--------|
//! | 0x04000100-0x0400010F   | TM0CNT - TM3CNT    | R/W    |
//! | 0x04000200-0x04000201   | IE                 | R/W    |
//! | 0x04000202-0x04000203   | IF                 | R/W1C  |
//! | 0x04000208              | IME (bit 0)        | R/W    |
//!
//! The timer block can be moved with [`Config`]; the interrupt registers
//! are fixed.

use super::config::Config;
use super::error::{EmulatorError, Result};
use super::interrupt::InterruptController;
use super::memory::IODevice;
use super::timer::{TimerStep, Timers};

/// IE register address
pub const REG_IE: u32 = 0x0400_0200;

/// IF register address
pub const REG_IF: u32 = 0x0400_0202;

/// IME register address
pub const REG_IME: u32 = 0x0400_0208;

/// Timer block plus interrupt controller
///
/// # Example
/// ```
/// use gba_timer::core::system::System;
///
/// let mut system = System::new();
///
/// // TM0: reload 0xFFF0, prescaler 1, IRQ + enable in one 32-bit store
/// system.write32(0x0400_0100, 0x00C0_FFF0).unwrap();
/// system.run(16);
///
/// assert_eq!(system.interrupts().read_status(), 1 << 3);
/// ```
pub struct System {
    /// Timers
    timers: Timers,
    /// Interrupt controller (owner of IF)
    interrupts: InterruptController,
    /// Total cycles handed to the timers since reset
    cycles: u64,
}

impl System {
    /// Create a system with the default GBA address map
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create a system from a configuration
    pub fn with_config(config: &Config) -> Self {
        log::debug!(
            "System: timers at 0x{:08X}, IRQ base bit {}",
            config.timers.mmio_base,
            config.timers.irq_base_bit
        );

        Self {
            timers: Timers::with_config(&config.timers),
            interrupts: InterruptController::new(),
            cycles: 0,
        }
    }

    /// Reset timers and interrupt controller
    pub fn reset(&mut self) {
        self.timers.reset();
        self.interrupts.reset();
        self.cycles = 0;
    }

    /// Advance the timers by `cycles` and request any raised IRQs
    pub fn run(&mut self, cycles: u32) -> TimerStep {
        let step = self.timers.advance(cycles);
        self.interrupts.request(step.irq);
        self.cycles += cycles as u64;
        step
    }

    /// Read a byte from the I/O map
    pub fn read8(&self, addr: u32) -> Result<u8> {
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.read_register8(offset);
        }

        let value = match addr {
            REG_IE => self.interrupts.read_enable() as u8,
            a if a == REG_IE + 1 => (self.interrupts.read_enable() >> 8) as u8,
            REG_IF => self.interrupts.read_status() as u8,
            a if a == REG_IF + 1 => (self.interrupts.read_status() >> 8) as u8,
            REG_IME => self.interrupts.master_enable() as u8,
            a if (REG_IME + 1..REG_IME + 4).contains(&a) => 0,
            _ => return Err(EmulatorError::InvalidMemoryAccess { address: addr }),
        };
        Ok(value)
    }

    /// Write a byte to the I/O map
    pub fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.write_register8(offset, value);
        }

        let ie = self.interrupts.read_enable();
        match addr {
            REG_IE => self.interrupts.write_enable((ie & 0xFF00) | value as u16),
            a if a == REG_IE + 1 => self
                .interrupts
                .write_enable((ie & 0x00FF) | ((value as u16) << 8)),
            REG_IF => self.interrupts.acknowledge(value as u16),
            a if a == REG_IF + 1 => self.interrupts.acknowledge((value as u16) << 8),
            REG_IME => self.interrupts.set_master_enable(value & 1 != 0),
            a if (REG_IME + 1..REG_IME + 4).contains(&a) => {}
            _ => return Err(EmulatorError::InvalidMemoryAccess { address: addr }),
        }
        Ok(())
    }

    /// Read a halfword (force-aligned)
    pub fn read16(&self, addr: u32) -> Result<u16> {
        let addr = addr & !0x01;
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.read_register16(offset);
        }
        Ok(u16::from_le_bytes([self.read8(addr)?, self.read8(addr + 1)?]))
    }

    /// Write a halfword (force-aligned, low byte first)
    pub fn write16(&mut self, addr: u32, value: u16) -> Result<()> {
        let addr = addr & !0x01;
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.write_register16(offset, value);
        }
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo)?;
        self.write8(addr + 1, hi)
    }

    /// Read a word (force-aligned)
    pub fn read32(&self, addr: u32) -> Result<u32> {
        let addr = addr & !0x03;
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.read_register(offset);
        }
        let lo = self.read16(addr)? as u32;
        let hi = self.read16(addr + 2)? as u32;
        Ok(lo | (hi << 16))
    }

    /// Write a word (force-aligned, ascending byte order)
    pub fn write32(&mut self, addr: u32, value: u32) -> Result<()> {
        let addr = addr & !0x03;
        if let Some(offset) = self.timer_offset(addr) {
            return self.timers.write_register(offset, value);
        }
        self.write16(addr, value as u16)?;
        self.write16(addr + 2, (value >> 16) as u16)
    }

    /// Offset into the timer block, if `addr` falls inside it
    fn timer_offset(&self, addr: u32) -> Option<u32> {
        let (start, _) = self.timers.address_range();
        self.timers.contains(addr).then(|| addr - start)
    }

    /// Total cycles run since reset
    pub fn total_cycles(&self) -> u64 {
        self.cycles
    }

    /// Get reference to the timers
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Get mutable reference to the timers
    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    /// Get reference to the interrupt controller
    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    /// Get mutable reference to the interrupt controller
    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
