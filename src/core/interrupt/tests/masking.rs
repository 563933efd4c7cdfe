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

//! IE / IME masking tests

use super::super::*;

#[test]
fn test_requested_but_not_enabled() {
    let mut ic = InterruptController::new();

    ic.request(interrupts::TIMER0);
    ic.set_master_enable(true);

    assert!(!ic.is_pending());
}

#[test]
fn test_master_enable_gates_everything() {
    let mut ic = InterruptController::new();

    ic.request(interrupts::TIMER0);
    ic.write_enable(interrupts::TIMER0);
    assert!(!ic.is_pending());

    ic.set_master_enable(true);
    assert!(ic.is_pending());

    ic.set_master_enable(false);
    assert!(!ic.is_pending());
}

#[test]
fn test_partial_masking() {
    let mut ic = InterruptController::new();
    ic.set_master_enable(true);

    ic.request(interrupts::VBLANK | interrupts::TIMER0);

    ic.write_enable(interrupts::TIMER1);
    assert!(!ic.is_pending());

    ic.write_enable(interrupts::TIMER0);
    assert!(ic.is_pending());
}

#[test]
fn test_enable_ignores_unused_bits() {
    let mut ic = InterruptController::new();

    ic.write_enable(0xFFFF);
    assert_eq!(ic.read_enable(), 0x3FFF);
}
