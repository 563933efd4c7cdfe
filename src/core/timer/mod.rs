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

//! GBA Timer Implementation
//!
//! The GBA has 4 incrementing 16-bit timers. Each one either counts system
//! cycles through a prescaler or, in cascade (count-up) mode, counts the
//! overflows of the timer right before it. On overflow the counter is
//! reloaded and an IRQ can be raised.
//!
//! ## Register Layout
//!
//! Each timer has a 4-byte slot starting at `0x04000100 + (n * 4)`:
//! - `+0`: Counter low byte (R) / Reload low byte (W)
//! - `+1`: Counter high byte (R) / Reload high byte (W)
//! - `+2`: Control byte (R/W)
//! - `+3`: Unused (reads 0, writes ignored)
//!
//! ## Control Byte Format
//!
//! ```text
//! 7:   Enable (0=stop, 1=run)
//! 6:   IRQ on overflow
//! 5-3: Not used
//! 2:   Cascade (count-up timing)
//! 1-0: Prescaler (0=1, 1=64, 2=256, 3=1024 cycles per tick)
//! ```
//!
//! ## Batched Advance
//!
//! The scheduler hands over elapsed cycles in batches of any size.
//! [`Timers::advance`] computes counters in closed form, carrying the
//! sub-tick remainder between calls, so the result matches stepping the
//! hardware one cycle at a time.
//!
//! ## References
//!
//! - [GBATEK: Timers](https://problemkaputt.de/gbatek.htm#gbatimers)

mod control;

pub use control::{ControlFlags, TimerControl, PRESCALER_MASK, PRESCALER_SHIFT};

use crate::core::config::{TimerConfig, MAX_IRQ_BASE_BIT};
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::IODevice;
use serde::Serialize;

/// Number of hardware timers
pub const TIMER_COUNT: usize = 4;

/// Counter low byte (read) / reload low byte (write)
pub const REG_COUNTER_LO: usize = 0;

/// Counter high byte (read) / reload high byte (write)
pub const REG_COUNTER_HI: usize = 1;

/// Control byte
pub const REG_CONTROL: usize = 2;

/// Bytes per timer slot in the I/O map
const SLOT_SIZE: u32 = 4;

/// A single timer
pub struct Timer {
    /// Timer number (0-3)
    id: usize,

    /// Current counter value
    counter: u16,

    /// Value loaded on enable and on overflow
    reload: u16,

    /// Decoded control byte
    control: TimerControl,

    /// Prescaler shift, derived from `control.frequency`
    shift: u32,

    /// Prescaler mask, derived from `control.frequency`
    mask: u32,

    /// Cycles left over below one prescaler tick
    cycles: u32,

    /// Set when the counter wrapped during the most recent step
    overflow: bool,
}

impl Timer {
    /// Create a timer in the reset state
    pub fn new(id: usize) -> Self {
        Self {
            id,
            counter: 0,
            reload: 0,
            control: TimerControl::default(),
            shift: 0,
            mask: 0,
            cycles: 0,
            overflow: false,
        }
    }

    /// Current counter value
    #[inline(always)]
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Programmed reload value
    #[inline(always)]
    pub fn reload(&self) -> u16 {
        self.reload
    }

    #[inline(always)]
    pub fn control(&self) -> TimerControl {
        self.control
    }

    #[inline(always)]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline(always)]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Leftover cycles carried into the next advance
    #[inline(always)]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Whether the counter wrapped in the most recent step and the flag
    /// has not been consumed by a cascade successor yet
    #[inline(always)]
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Read one byte of this timer's register slot
    pub fn read(&self, offset: usize) -> u8 {
        match offset {
            REG_COUNTER_LO => self.counter as u8,
            REG_COUNTER_HI => (self.counter >> 8) as u8,
            REG_CONTROL => self.control.to_byte(),
            _ => 0,
        }
    }

    /// Write one byte of this timer's register slot
    ///
    /// Reload writes never touch the counter; the new value is picked up
    /// on the next enable edge or overflow.
    pub fn write(&mut self, offset: usize, value: u8) {
        match offset {
            REG_COUNTER_LO => {
                self.reload = (self.reload & 0xFF00) | value as u16;
                log::trace!("Timer {} reload = 0x{:04X}", self.id, self.reload);
            }
            REG_COUNTER_HI => {
                self.reload = (self.reload & 0x00FF) | ((value as u16) << 8);
                log::trace!("Timer {} reload = 0x{:04X}", self.id, self.reload);
            }
            REG_CONTROL => self.write_control(value),
            _ => {}
        }
    }

    fn write_control(&mut self, value: u8) {
        let was_enabled = self.control.enabled();

        self.control = TimerControl::from_byte(value);
        self.shift = self.control.shift();
        self.mask = self.control.mask();

        if !was_enabled && self.control.enabled() {
            self.counter = self.reload;
        }

        log::debug!(
            "Timer {} control: freq={} cascade={} irq={} enable={} counter=0x{:04X}",
            self.id,
            self.control.frequency,
            self.control.cascade(),
            self.control.interrupt(),
            self.control.enabled(),
            self.counter
        );
    }

    /// Advance a free-running timer by `cycles` system cycles
    ///
    /// Returns the number of overflows that happened. Only the first one
    /// sets `overflow`; the rest are folded into the counter arithmetic.
    fn run(&mut self, cycles: u32) -> u64 {
        let available = self.cycles as u64 + cycles as u64;
        let mut ticks = available >> self.shift;
        let mut counter = self.counter as u64;
        let mut overflows = 0;

        self.overflow = false;

        let to_overflow = 0x1_0000 - counter;
        if ticks >= to_overflow {
            counter = self.reload as u64;
            self.overflow = true;
            overflows = 1;
            ticks -= to_overflow;

            // Every later wrap restarts from reload
            let period = 0x1_0000 - self.reload as u64;
            if ticks >= period {
                overflows += ticks / period;
                ticks %= period;
            }
        }

        // Both branches leave ticks short of the next wrap
        self.counter = (counter + ticks) as u16;
        self.cycles = (available & self.mask as u64) as u32;

        overflows
    }

    /// Count one overflow of the previous timer
    ///
    /// Returns `true` if this timer wrapped.
    fn cascade_tick(&mut self) -> bool {
        self.overflow = false;

        if self.counter != 0xFFFF {
            self.counter += 1;
            return false;
        }

        self.counter = self.reload;
        self.overflow = true;
        true
    }

    /// Capture the full timer state for reporting
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            id: self.id,
            counter: self.counter,
            reload: self.reload,
            control: self.control,
            shift: self.shift,
            mask: self.mask,
            cycles: self.cycles,
            overflow: self.overflow,
        }
    }
}

/// Point-in-time copy of one timer's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub id: usize,
    pub counter: u16,
    pub reload: u16,
    pub control: TimerControl,
    pub shift: u32,
    pub mask: u32,
    pub cycles: u32,
    pub overflow: bool,
}

/// Outcome of one [`Timers::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimerStep {
    /// Interrupt-request bits raised during this call
    ///
    /// The owner of the interrupt-request word ORs these in.
    pub irq: u16,

    /// Overflow events per timer during this call
    ///
    /// A free-running timer can wrap several times in one batch; a cascade
    /// timer wraps at most once. Sound FIFOs driven by timers 0 and 1 pull
    /// one sample per overflow.
    pub overflows: [u64; TIMER_COUNT],
}

impl TimerStep {
    /// Whether any timer wrapped during this call
    pub fn any_overflow(&self) -> bool {
        self.overflows.iter().any(|&n| n > 0)
    }
}

/// Timer system managing all 4 timers
pub struct Timers {
    /// The 4 timers
    timers: [Timer; TIMER_COUNT],

    /// Bit index of the timer 0 IRQ in the interrupt-request word
    irq_base: u16,

    /// Start of the timer register block in the I/O map
    base_addr: u32,
}

impl Timers {
    /// Create a new timer system with the GBA defaults
    ///
    /// # Example
    ///
    /// ```
    /// use gba_timer::core::timer::Timers;
    ///
    /// let mut timers = Timers::new();
    ///
    /// // Reload 0xFFFF, prescaler 1, IRQ + enable
    /// timers.write(0, 0, 0xFF);
    /// timers.write(0, 1, 0xFF);
    /// timers.write(0, 2, 0xC0);
    ///
    /// let step = timers.advance(1);
    /// assert_eq!(step.irq, 1 << 3);
    /// assert_eq!(step.overflows[0], 1);
    /// ```
    pub fn new() -> Self {
        Self::with_config(&TimerConfig::default())
    }

    /// Create a timer system raising `1 << (irq_base_bit + id)` on overflow
    pub fn with_irq_base(irq_base_bit: u16) -> Self {
        Self::with_config(&TimerConfig {
            irq_base_bit,
            ..TimerConfig::default()
        })
    }

    /// Create a timer system with an explicit I/O base and IRQ base bit
    pub fn with_config(config: &TimerConfig) -> Self {
        debug_assert!(
            config.irq_base_bit <= MAX_IRQ_BASE_BIT,
            "IRQ base bit {} leaves no room for timer 3",
            config.irq_base_bit
        );
        debug_assert!(
            config.mmio_base & 0x03 == 0,
            "timer block base 0x{:08X} is not word aligned",
            config.mmio_base
        );

        Self {
            timers: std::array::from_fn(Timer::new),
            irq_base: config.irq_base_bit,
            base_addr: config.mmio_base,
        }
    }

    /// Return every timer to the stopped, zeroed state
    pub fn reset(&mut self) {
        self.timers = std::array::from_fn(Timer::new);
        log::debug!("Timers reset");
    }

    /// Get a reference to a timer
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in 0-3.
    #[inline(always)]
    pub fn timer(&self, id: usize) -> &Timer {
        debug_assert!(id < TIMER_COUNT, "invalid timer id {}", id);
        &self.timers[id]
    }

    /// Checked variant of [`Timers::timer`]
    pub fn get(&self, id: usize) -> Result<&Timer> {
        self.timers.get(id).ok_or(EmulatorError::InvalidTimer { id })
    }

    /// Interrupt-request bit for a timer
    #[inline(always)]
    pub fn irq_bit(&self, id: usize) -> u16 {
        irq_bit(self.irq_base, id)
    }

    /// Read a register byte
    ///
    /// `id` must be in 0-3; the address decoder is responsible for bounds.
    pub fn read(&self, id: usize, offset: usize) -> u8 {
        self.timer(id).read(offset)
    }

    /// Write a register byte
    ///
    /// `id` must be in 0-3; the address decoder is responsible for bounds.
    pub fn write(&mut self, id: usize, offset: usize, value: u8) {
        debug_assert!(id < TIMER_COUNT, "invalid timer id {}", id);
        self.timers[id].write(offset, value);
    }

    /// Advance all timers by `cycles` system cycles
    ///
    /// Free-running timers go first, then cascade timers in index order,
    /// so each cascade timer sees the overflow its predecessor produced in
    /// this same call.
    pub fn advance(&mut self, cycles: u32) -> TimerStep {
        let mut step = TimerStep::default();
        let irq_base = self.irq_base;

        for timer in self.timers.iter_mut() {
            let control = timer.control;
            if !control.enabled() || control.cascade() {
                continue;
            }

            let overflows = timer.run(cycles);
            if overflows == 0 {
                continue;
            }

            step.overflows[timer.id] = overflows;
            log::trace!(
                "Timer {} overflow x{} (counter=0x{:04X})",
                timer.id,
                overflows,
                timer.counter
            );

            if control.interrupt() {
                step.irq |= irq_bit(irq_base, timer.id);
            }
        }

        // Timer 0 has no predecessor, so its cascade bit does nothing
        for id in 1..TIMER_COUNT {
            let (head, tail) = self.timers.split_at_mut(id);
            let prev = &mut head[id - 1];
            let timer = &mut tail[0];

            let control = timer.control;
            if !control.enabled() || !control.cascade() || !prev.overflow {
                continue;
            }

            if timer.cascade_tick() {
                step.overflows[id] = 1;
                log::trace!("Timer {} cascade overflow", id);

                if control.interrupt() {
                    step.irq |= irq_bit(irq_base, id);
                }
            }

            prev.overflow = false;
        }

        step
    }

    /// Capture the state of all 4 timers
    pub fn snapshot(&self) -> [TimerSnapshot; TIMER_COUNT] {
        std::array::from_fn(|id| self.timers[id].snapshot())
    }
}

/// Interrupt-request bit raised by timer `id` when timer 0 maps to `base`
#[inline(always)]
fn irq_bit(base: u16, id: usize) -> u16 {
    1 << (base + id as u16)
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

impl IODevice for Timers {
    fn address_range(&self) -> (u32, u32) {
        let size = SLOT_SIZE * TIMER_COUNT as u32;
        (self.base_addr, self.base_addr + size - 1)
    }

    fn read_register8(&self, offset: u32) -> Result<u8> {
        let id = (offset / SLOT_SIZE) as usize;
        if id >= TIMER_COUNT {
            return Err(EmulatorError::InvalidMemoryAccess {
                address: self.base_addr.wrapping_add(offset),
            });
        }
        Ok(self.read(id, (offset % SLOT_SIZE) as usize))
    }

    fn write_register8(&mut self, offset: u32, value: u8) -> Result<()> {
        let id = (offset / SLOT_SIZE) as usize;
        if id >= TIMER_COUNT {
            return Err(EmulatorError::InvalidMemoryAccess {
                address: self.base_addr.wrapping_add(offset),
            });
        }
        self.write(id, (offset % SLOT_SIZE) as usize, value);
        Ok(())
    }

    fn name(&self) -> &str {
        "Timers"
    }
}

#[cfg(test)]
mod tests;
