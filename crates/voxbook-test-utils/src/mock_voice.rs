// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock voice provider for deterministic testing.

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use voxbook_core::{
    AdapterType, CallBrief, HealthStatus, PluginAdapter, VoiceProvider, VoxbookError,
};

/// A voice provider that records every launched brief.
pub struct MockVoiceProvider {
    configured: bool,
    fail: bool,
    launched: Mutex<Vec<CallBrief>>,
    notify: Notify,
}

impl MockVoiceProvider {
    /// A configured provider whose launches succeed.
    pub fn new() -> Self {
        Self::with(true, false)
    }

    /// A provider without credentials.
    pub fn unconfigured() -> Self {
        Self::with(false, false)
    }

    /// A configured provider whose launches fail.
    pub fn failing() -> Self {
        Self::with(true, true)
    }

    fn with(configured: bool, fail: bool) -> Self {
        Self {
            configured,
            fail,
            launched: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }

    /// Briefs launched so far.
    pub async fn launched(&self) -> Vec<CallBrief> {
        self.launched.lock().await.clone()
    }

    /// Wait until at least `count` launches were attempted.
    pub async fn wait_for_launches(&self, count: usize) -> Vec<CallBrief> {
        loop {
            let notified = self.notify.notified();
            {
                let launched = self.launched.lock().await;
                if launched.len() >= count {
                    return launched.clone();
                }
            }
            notified.await;
        }
    }
}

impl Default for MockVoiceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockVoiceProvider {
    fn name(&self) -> &str {
        "mock-voice"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Voice
    }

    async fn health_check(&self) -> Result<HealthStatus, VoxbookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VoxbookError> {
        Ok(())
    }
}

#[async_trait]
impl VoiceProvider for MockVoiceProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn launch_call(&self, brief: &CallBrief) -> Result<(), VoxbookError> {
        self.launched.lock().await.push(brief.clone());
        self.notify.notify_waiters();
        if self.fail {
            return Err(VoxbookError::ExternalService {
                message: "mock launch failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxbook_core::CallType;

    fn brief() -> CallBrief {
        CallBrief {
            session_id: "s-1".into(),
            call_type: CallType::Outreach,
            target_contact: None,
            objective: None,
            notes: None,
            venue_id: None,
        }
    }

    #[tokio::test]
    async fn records_launches() {
        let mock = MockVoiceProvider::new();
        mock.launch_call(&brief()).await.unwrap();
        assert_eq!(mock.launched().await.len(), 1);
        assert_eq!(mock.wait_for_launches(1).await[0].session_id, "s-1");
    }

    #[tokio::test]
    async fn failing_still_records() {
        let mock = MockVoiceProvider::failing();
        assert!(mock.launch_call(&brief()).await.is_err());
        assert_eq!(mock.launched().await.len(), 1);
    }

    #[test]
    fn unconfigured_flag() {
        assert!(!MockVoiceProvider::unconfigured().is_configured());
    }
}
