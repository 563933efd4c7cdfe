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

//! Shared helpers for integration tests

use gba_timer::core::timer::{Timers, REG_CONTROL, REG_COUNTER_HI, REG_COUNTER_LO};

/// Program reload and then write the control byte
#[allow(dead_code)]
pub fn configure(timers: &mut Timers, id: usize, reload: u16, control: u8) {
    timers.write(id, REG_COUNTER_LO, reload as u8);
    timers.write(id, REG_COUNTER_HI, (reload >> 8) as u8);
    timers.write(id, REG_CONTROL, control);
}

/// Assert every timer's counter
#[allow(dead_code)]
pub fn assert_counters(timers: &Timers, expected: [u16; 4]) {
    for (id, &want) in expected.iter().enumerate() {
        let got = timers.timer(id).counter();
        assert_eq!(
            got, want,
            "TM{} counter mismatch: expected 0x{:04X}, got 0x{:04X}",
            id, want, got
        );
    }
}
