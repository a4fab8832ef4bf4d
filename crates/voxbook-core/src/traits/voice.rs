// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound voice-call provider trait.

use async_trait::async_trait;

use crate::error::VoxbookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CallBrief;

/// A hosted voice-agent platform that can place calls on our behalf.
#[async_trait]
pub trait VoiceProvider: PluginAdapter {
    /// Whether credentials are present. Unconfigured providers still accept
    /// call briefs but never reach the network.
    fn is_configured(&self) -> bool;

    /// Ask the provider to start a call for `brief`.
    ///
    /// Returns [`VoxbookError::ExternalService`] when the provider rejects the
    /// request or cannot be reached.
    async fn launch_call(&self, brief: &CallBrief) -> Result<(), VoxbookError>;
}
