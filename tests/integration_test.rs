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

mod common;

use common::{assert_counters, configure};
use gba_timer::core::error::Result;
use gba_timer::core::interrupt::interrupts;
use gba_timer::core::system::System;
use gba_timer::core::timer::Timers;

#[test]
fn test_basic_initialization() -> Result<()> {
    let system = System::new();
    assert_eq!(system.total_cycles(), 0);
    assert_eq!(system.read32(0x0400_0100)?, 0);
    Ok(())
}

#[test]
fn test_system_reset() {
    let mut system = System::new();
    system.run(1000);
    system.reset();
    assert_eq!(system.total_cycles(), 0);
}

#[test]
fn test_32bit_counter_from_cascade_pair() {
    let mut timers = Timers::new();

    // Low half wraps every 0x100 ticks, high half counts those wraps
    configure(&mut timers, 1, 0, 0x84);
    configure(&mut timers, 0, 0xFF00, 0x80);

    for _ in 0..10 {
        timers.advance(0x100);
    }

    assert_counters(&timers, [0xFF00, 10, 0, 0]);
}

#[test]
fn test_audio_rate_timer() -> Result<()> {
    let mut system = System::new();

    // 32768 Hz sample timer: reload 0x10000 - 512 at prescaler 1
    system.write32(0x0400_0100, 0x00C0_FE00)?;
    system.write16(0x0400_0200, interrupts::TIMER0)?;
    system.write8(0x0400_0208, 1)?;

    // One 280896-cycle frame at odd scheduler batch sizes
    let mut samples = 0;
    let mut remaining = 280_896u32;
    for batch in [1u32, 7, 13, 97, 1231, 4093].iter().cycle() {
        if remaining == 0 {
            break;
        }
        let batch = (*batch).min(remaining);
        samples += system.run(batch).overflows[0];
        remaining -= batch;
    }

    assert_eq!(samples, 280_896 / 512);
    assert_eq!(system.timers().timer(0).counter(), 0xFE00 + (280_896 % 512) as u16);
    assert!(system.interrupts().is_pending());
    Ok(())
}
