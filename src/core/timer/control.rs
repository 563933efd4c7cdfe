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

//! Timer control register (TMxCNT_H low byte) definitions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Single-bit flags of the control byte
    ///
    /// The prescaler selector (bits 0-1) is a 2-bit field and lives in
    /// [`TimerControl::frequency`] instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ControlFlags: u8 {
        /// Count-up timing: tick once per overflow of the previous timer
        const CASCADE = 1 << 2;
        /// Raise an IRQ on overflow
        const IRQ = 1 << 6;
        /// Timer start/stop
        const ENABLE = 1 << 7;
    }
}

/// Prescaler shift per frequency code (1, 64, 256, 1024 cycles per tick)
pub const PRESCALER_SHIFT: [u32; 4] = [0, 6, 8, 10];

/// Leftover-cycle mask per frequency code
pub const PRESCALER_MASK: [u32; 4] = [0, 0x3F, 0xFF, 0x3FF];

/// Decoded timer control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerControl {
    /// Prescaler selector (bits 0-1)
    pub frequency: u8,

    /// Cascade / IRQ / enable bits
    pub flags: ControlFlags,
}

impl TimerControl {
    /// Decode a guest-written control byte
    ///
    /// Bits 3-5 are unused and dropped.
    pub fn from_byte(value: u8) -> Self {
        Self {
            frequency: value & 0x03,
            flags: ControlFlags::from_bits_truncate(value),
        }
    }

    /// Encode the control byte as the guest reads it back
    #[inline(always)]
    pub fn to_byte(self) -> u8 {
        self.frequency | self.flags.bits()
    }

    #[inline(always)]
    pub fn cascade(self) -> bool {
        self.flags.contains(ControlFlags::CASCADE)
    }

    #[inline(always)]
    pub fn interrupt(self) -> bool {
        self.flags.contains(ControlFlags::IRQ)
    }

    #[inline(always)]
    pub fn enabled(self) -> bool {
        self.flags.contains(ControlFlags::ENABLE)
    }

    /// Prescaler shift derived from `frequency`
    #[inline(always)]
    pub fn shift(self) -> u32 {
        PRESCALER_SHIFT[self.frequency as usize]
    }

    /// Leftover-cycle mask derived from `frequency`
    #[inline(always)]
    pub fn mask(self) -> u32 {
        PRESCALER_MASK[self.frequency as usize]
    }
}
