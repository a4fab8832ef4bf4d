// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! so they can be held as trait objects.

pub mod adapter;
pub mod storage;
pub mod voice;

pub use adapter::PluginAdapter;
pub use storage::StorageAdapter;
pub use voice::VoiceProvider;
