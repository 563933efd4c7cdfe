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

//! Game Boy Advance timer emulation library
//!
//! Cycle-accurate model of the four GBA hardware timers: prescaled
//! free-running counting, cascade (count-up) chaining, overflow reload and
//! overflow interrupts, with cycles delivered in batches of any size.
//!
//! # Example
//!
//! ```
//! use gba_timer::core::timer::Timers;
//!
//! let mut timers = Timers::new();
//!
//! // TM0: prescaler 64, enable
//! timers.write(0, 2, 0x81);
//!
//! // Batch size does not matter
//! timers.advance(100);
//! timers.advance(28);
//! assert_eq!(timers.timer(0).counter(), 2);
//! ```

pub mod core;
