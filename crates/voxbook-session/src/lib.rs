// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session state for live voice calls.

pub mod registry;
pub mod summary;

pub use registry::SessionRegistry;
pub use summary::{SummaryScheduler, summarize};
