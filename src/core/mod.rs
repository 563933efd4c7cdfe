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

//! Core emulation components
//!
//! This module contains the timer block and the pieces it talks to:
//! - Timer (4 prescaled / cascading 16-bit counters)
//! - Interrupt controller (owner of the IF word)
//! - Memory-mapped I/O device contract
//! - System integration (address decoding, cycle delivery)
//! - Configuration and scripted traces

pub mod config;
pub mod error;
pub mod interrupt;
pub mod memory;
pub mod system;
pub mod timer;
pub mod trace;

// Re-export commonly used types
pub use config::Config;
pub use error::{EmulatorError, Result};
pub use interrupt::InterruptController;
pub use memory::IODevice;
pub use system::System;
pub use timer::{TimerStep, Timers};
