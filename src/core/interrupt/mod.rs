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

//! GBA Interrupt Controller
//!
//! Owns the interrupt-request word that peripherals OR their bits into.
//! Peripherals only ever set bits; clearing is done here when the guest
//! acknowledges.
//!
//! ## Registers
//!
//! - **IE** (0x04000200): Interrupt enable (R/W)
//! - **IF** (0x04000202): Interrupt request flags (R, write 1 to acknowledge)
//! - **IME** (0x04000208): Interrupt master enable (bit 0)
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit  | Source        | Description
//! -----|---------------|----------------------------------
//! 0    | VBLANK        | Vertical blank
//! 1    | HBLANK        | Horizontal blank
//! 2    | VCOUNT        | Vertical counter match
//! 3-6  | TIMER0-3      | Timer overflow
//! 7    | SERIAL        | Serial communication
//! 8-11 | DMA0-3        | DMA transfer complete
//! 12   | KEYPAD        | Keypad
//! 13   | GAMEPAK       | Game Pak (external IRQ)
//! 14-15| -             | Not used
//! ```
//!
//! ## References
//!
//! - [GBATEK: Interrupt Control](https://problemkaputt.de/gbatek.htm#gbainterruptcontrol)

/// Interrupt source bit flags
pub mod interrupts {
    /// Vertical blank interrupt (bit 0)
    pub const VBLANK: u16 = 1 << 0;

    /// Horizontal blank interrupt (bit 1)
    pub const HBLANK: u16 = 1 << 1;

    /// Vertical counter match interrupt (bit 2)
    pub const VCOUNT: u16 = 1 << 2;

    /// Timer 0 overflow interrupt (bit 3)
    pub const TIMER0: u16 = 1 << 3;

    /// Timer 1 overflow interrupt (bit 4)
    pub const TIMER1: u16 = 1 << 4;

    /// Timer 2 overflow interrupt (bit 5)
    pub const TIMER2: u16 = 1 << 5;

    /// Timer 3 overflow interrupt (bit 6)
    pub const TIMER3: u16 = 1 << 6;

    /// Serial communication interrupt (bit 7)
    pub const SERIAL: u16 = 1 << 7;

    /// DMA 0 complete (bit 8)
    pub const DMA0: u16 = 1 << 8;

    /// DMA 1 complete (bit 9)
    pub const DMA1: u16 = 1 << 9;

    /// DMA 2 complete (bit 10)
    pub const DMA2: u16 = 1 << 10;

    /// DMA 3 complete (bit 11)
    pub const DMA3: u16 = 1 << 11;

    /// Keypad interrupt (bit 12)
    pub const KEYPAD: u16 = 1 << 12;

    /// Game Pak interrupt (bit 13)
    pub const GAMEPAK: u16 = 1 << 13;

    /// Bit index of TIMER0, the base for `TIMER0 << id`
    pub const TIMER0_BIT: u16 = 3;
}

/// GBA Interrupt Controller
///
/// # Example
///
/// ```
/// use gba_timer::core::interrupt::{InterruptController, interrupts};
///
/// let mut ic = InterruptController::new();
///
/// ic.request(interrupts::TIMER0);
/// ic.write_enable(interrupts::TIMER0);
/// ic.set_master_enable(true);
/// assert!(ic.is_pending());
///
/// // Acknowledge (write 1 to clear)
/// ic.write_status(interrupts::TIMER0);
/// assert!(!ic.is_pending());
/// ```
pub struct InterruptController {
    /// IF - pending request flags
    status: u16,

    /// IE - per-source enable
    enable: u16,

    /// IME - master enable
    master_enable: bool,
}

impl InterruptController {
    /// Create a new interrupt controller with nothing requested or enabled
    pub fn new() -> Self {
        Self {
            status: 0,
            enable: 0,
            master_enable: false,
        }
    }

    /// Clear all request and enable state
    pub fn reset(&mut self) {
        self.status = 0;
        self.enable = 0;
        self.master_enable = false;
        log::debug!("Interrupt controller reset");
    }

    /// Request an interrupt
    ///
    /// ORs the given bit(s) into IF. This is the only operation peripherals use.
    ///
    /// # Arguments
    ///
    /// * `interrupt` - Interrupt bit(s) to set (can be multiple ORed together)
    pub fn request(&mut self, interrupt: u16) {
        if interrupt == 0 {
            return;
        }
        self.status |= interrupt;
        log::trace!(
            "IRQ requested: 0x{:04X}, IF=0x{:04X}",
            interrupt,
            self.status
        );
    }

    /// Acknowledge interrupt(s)
    ///
    /// Clears IF bits where the corresponding bit in `value` is 1.
    pub fn acknowledge(&mut self, value: u16) {
        self.status &= !value;
        log::trace!("IRQ acknowledged, IF=0x{:04X}", self.status);
    }

    /// Check if an interrupt should be taken by the CPU
    ///
    /// `true` if IME is set and any requested interrupt is enabled in IE.
    pub fn is_pending(&self) -> bool {
        self.master_enable && (self.status & self.enable) != 0
    }

    /// Read IF
    #[inline(always)]
    pub fn read_status(&self) -> u16 {
        self.status
    }

    /// Write IF (write-1-to-clear)
    pub fn write_status(&mut self, value: u16) {
        self.acknowledge(value);
    }

    /// Read IE
    #[inline(always)]
    pub fn read_enable(&self) -> u16 {
        self.enable
    }

    /// Write IE
    pub fn write_enable(&mut self, value: u16) {
        self.enable = value & 0x3FFF;
        log::debug!("IRQ enable set: 0x{:04X}", self.enable);
    }

    /// Read IME
    #[inline(always)]
    pub fn master_enable(&self) -> bool {
        self.master_enable
    }

    /// Write IME
    pub fn set_master_enable(&mut self, enabled: bool) {
        self.master_enable = enabled;
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
