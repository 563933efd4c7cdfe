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

//! I/O Device Trait
//!
//! Memory-mapped peripherals implement [`IODevice`] so an address decoder can
//! route guest accesses to them without knowing the device type.
//!
//! GBA I/O registers are byte-addressable, so devices implement the 8-bit
//! accessors and get 16-bit and 32-bit access composed from bytes. Wider
//! accesses are force-aligned and split into byte accesses in ascending
//! address order, matching how the hardware latches a 32-bit write to a
//! register pair.
//!
//! # Example
//!
//! ```
//! use gba_timer::core::memory::IODevice;
//! use gba_timer::core::error::{EmulatorError, Result};
//!
//! struct Scratch {
//!     base_addr: u32,
//!     bytes: [u8; 4],
//! }
//!
//! impl IODevice for Scratch {
//!     fn address_range(&self) -> (u32, u32) {
//!         (self.base_addr, self.base_addr + 3)
//!     }
//!
//!     fn read_register8(&self, offset: u32) -> Result<u8> {
//!         self.bytes
//!             .get(offset as usize)
//!             .copied()
//!             .ok_or(EmulatorError::InvalidMemoryAccess { address: self.base_addr + offset })
//!     }
//!
//!     fn write_register8(&mut self, offset: u32, value: u8) -> Result<()> {
//!         match self.bytes.get_mut(offset as usize) {
//!             Some(byte) => {
//!                 *byte = value;
//!                 Ok(())
//!             }
//!             None => Err(EmulatorError::InvalidMemoryAccess { address: self.base_addr + offset }),
//!         }
//!     }
//! }
//!
//! let mut dev = Scratch { base_addr: 0x0400_0000, bytes: [0; 4] };
//! dev.write_register(0, 0x1234_5678).unwrap();
//! assert_eq!(dev.read_register16(2).unwrap(), 0x1234);
//! ```

use crate::core::error::Result;

/// Trait for memory-mapped I/O devices
///
/// # Address Translation
///
/// The decoder translates absolute addresses to device-relative offsets
/// before calling trait methods. For example:
///
/// - Device address range: `0x04000100 - 0x0400010F`
/// - Absolute address: `0x04000106`
/// - Offset passed to device: `0x06`
pub trait IODevice {
    /// Get the address range this device responds to
    ///
    /// Returns `(start, end)`, both inclusive.
    fn address_range(&self) -> (u32, u32);

    /// Check if this device contains the given address
    fn contains(&self, addr: u32) -> bool {
        let (start, end) = self.address_range();
        addr >= start && addr <= end
    }

    /// Read an 8-bit value from a device register
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is outside this device.
    fn read_register8(&self, offset: u32) -> Result<u8>;

    /// Write an 8-bit value to a device register
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is outside this device.
    fn write_register8(&mut self, offset: u32, value: u8) -> Result<()>;

    /// Read a 16-bit value (little-endian, force-aligned)
    fn read_register16(&self, offset: u32) -> Result<u16> {
        let aligned = offset & !0x01;
        let lo = self.read_register8(aligned)?;
        let hi = self.read_register8(aligned + 1)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a 16-bit value (little-endian, force-aligned)
    fn write_register16(&mut self, offset: u32, value: u16) -> Result<()> {
        let aligned = offset & !0x01;
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_register8(aligned + i as u32, byte)?;
        }
        Ok(())
    }

    /// Read a 32-bit value (little-endian, force-aligned)
    fn read_register(&self, offset: u32) -> Result<u32> {
        let aligned = offset & !0x03;
        let lo = self.read_register16(aligned)? as u32;
        let hi = self.read_register16(aligned + 2)? as u32;
        Ok(lo | (hi << 16))
    }

    /// Write a 32-bit value (little-endian, force-aligned)
    fn write_register(&mut self, offset: u32, value: u32) -> Result<()> {
        let aligned = offset & !0x03;
        self.write_register16(aligned, value as u16)?;
        self.write_register16(aligned + 2, (value >> 16) as u16)
    }

    /// Device name for logging
    fn name(&self) -> &str {
        "Unknown Device"
    }
}
