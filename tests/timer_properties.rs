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

//! Property tests: batched advance against a cycle-by-cycle reference
//!
//! The reference model below ticks the hardware one cycle at a time with a
//! per-timer prescaler phase, independent of the closed-form arithmetic in
//! `Timers::advance`.

mod common;

use common::configure;
use gba_timer::core::timer::{Timers, TIMER_COUNT};
use proptest::prelude::*;

const IRQ_BASE: u16 = 3;

#[derive(Debug, Clone, Copy)]
struct Setup {
    reload: u16,
    frequency: u8,
    cascade: bool,
    irq: bool,
    enable: bool,
}

impl Setup {
    fn control(&self) -> u8 {
        self.frequency
            | if self.cascade { 0x04 } else { 0 }
            | if self.irq { 0x40 } else { 0 }
            | if self.enable { 0x80 } else { 0 }
    }
}

/// One timer of the reference model
struct RefTimer {
    setup: Setup,
    counter: u16,
    phase: u32,
}

struct RefModel {
    timers: Vec<RefTimer>,
    irq: u16,
    overflows: [u64; TIMER_COUNT],
}

impl RefModel {
    fn new(setups: &[Setup]) -> Self {
        let timers = setups
            .iter()
            .map(|&setup| RefTimer {
                setup,
                counter: if setup.enable { setup.reload } else { 0 },
                phase: 0,
            })
            .collect();
        Self {
            timers,
            irq: 0,
            overflows: [0; TIMER_COUNT],
        }
    }

    fn cycle(&mut self) {
        let mut prev_wrapped = false;

        for (id, timer) in self.timers.iter_mut().enumerate() {
            let setup = timer.setup;
            let mut wrapped = false;

            if setup.enable {
                let tick = if setup.cascade {
                    id > 0 && prev_wrapped
                } else {
                    timer.phase += 1;
                    if timer.phase == 1 << [0, 6, 8, 10][setup.frequency as usize] {
                        timer.phase = 0;
                        true
                    } else {
                        false
                    }
                };

                if tick {
                    if timer.counter == 0xFFFF {
                        timer.counter = setup.reload;
                        wrapped = true;
                    } else {
                        timer.counter += 1;
                    }
                }
            }

            if wrapped {
                self.overflows[id] += 1;
                if setup.irq {
                    self.irq |= 1 << (IRQ_BASE + id as u16);
                }
            }
            prev_wrapped = wrapped;
        }
    }

    fn counters(&self) -> Vec<u16> {
        self.timers.iter().map(|t| t.counter).collect()
    }
}

fn build(setups: &[Setup]) -> Timers {
    let mut timers = Timers::new();
    for (id, setup) in setups.iter().enumerate() {
        configure(&mut timers, id, setup.reload, setup.control());
    }
    timers
}

fn counters(timers: &Timers) -> Vec<u16> {
    (0..TIMER_COUNT).map(|id| timers.timer(id).counter()).collect()
}

fn reload_strategy() -> impl Strategy<Value = u16> {
    // Mostly short periods so wraps actually happen
    prop_oneof![
        3 => 0xFFC0u16..=0xFFFF,
        1 => any::<u16>(),
    ]
}

fn setup_strategy(allow_cascade: bool) -> impl Strategy<Value = Setup> {
    (
        reload_strategy(),
        0u8..4,
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.8),
    )
        .prop_map(move |(reload, frequency, cascade, irq, enable)| Setup {
            reload,
            frequency,
            cascade: cascade && allow_cascade,
            irq,
            enable,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Free-running timers give the same result for any batch split
    #[test]
    fn batched_matches_reference(
        setups in prop::collection::vec(setup_strategy(false), TIMER_COUNT),
        batches in prop::collection::vec(0u32..3000, 1..16),
    ) {
        let mut timers = build(&setups);
        let mut reference = RefModel::new(&setups);
        let mut irq = 0;
        let mut overflows = [0u64; TIMER_COUNT];

        for &batch in &batches {
            let step = timers.advance(batch);
            irq |= step.irq;
            for id in 0..TIMER_COUNT {
                overflows[id] += step.overflows[id];
            }
            for _ in 0..batch {
                reference.cycle();
            }
            prop_assert_eq!(counters(&timers), reference.counters());
        }

        prop_assert_eq!(irq, reference.irq);
        prop_assert_eq!(overflows, reference.overflows);
        for id in 0..TIMER_COUNT {
            prop_assert!(timers.timer(id).cycles() <= timers.timer(id).mask());
        }
    }

    /// Single-cycle stepping with cascades matches the reference exactly
    #[test]
    fn single_cycle_cascade_matches_reference(
        setups in prop::collection::vec(setup_strategy(true), TIMER_COUNT),
        total in 0u32..20_000,
    ) {
        let mut timers = build(&setups);
        let mut reference = RefModel::new(&setups);
        let mut irq = 0;
        let mut overflows = [0u64; TIMER_COUNT];

        for _ in 0..total {
            let step = timers.advance(1);
            irq |= step.irq;
            for id in 0..TIMER_COUNT {
                overflows[id] += step.overflows[id];
            }
            reference.cycle();
        }

        prop_assert_eq!(counters(&timers), reference.counters());
        prop_assert_eq!(irq, reference.irq);
        prop_assert_eq!(overflows, reference.overflows);
    }

    /// Control byte reads back with bits 3-5 cleared
    #[test]
    fn control_read_back(id in 0usize..TIMER_COUNT, value in any::<u8>()) {
        let mut timers = Timers::new();
        timers.write(id, 2, value);
        prop_assert_eq!(timers.read(id, 2), value & 0xC7);
    }
}
