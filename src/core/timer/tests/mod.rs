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

//! Timer test modules
//!
//! - `basic`: reset state, free-running counting
//! - `registers`: byte-granular read/write contract and enable-edge reload
//! - `timing`: batched advance, multi-overflow batches, prescaler carry
//! - `cascade`: count-up chaining between neighbouring timers
//! - `interrupts`: IRQ bits raised on overflow


use super::*;

/// Program reload, then enable with the given control byte
///
/// The enable edge copies reload into the counter, which is the only way
/// guest software can position a counter.
fn start(timers: &mut Timers, id: usize, reload: u16, control: u8) {
    timers.write(id, REG_COUNTER_LO, reload as u8);
    timers.write(id, REG_COUNTER_HI, (reload >> 8) as u8);
    timers.write(id, REG_CONTROL, control);
}

/// Set reload without touching a running counter
fn set_reload(timers: &mut Timers, id: usize, reload: u16) {
    timers.write(id, REG_COUNTER_LO, reload as u8);
    timers.write(id, REG_COUNTER_HI, (reload >> 8) as u8);
}
