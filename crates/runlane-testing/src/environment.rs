use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use runlane_analytics::Environment;

use crate::fixtures;

/// Deterministic [`Environment`] for tests.
///
/// Versions default to the reference fixture values, so a session wired
/// with this fake serializes byte-for-byte against
/// [`fixtures`](crate::fixtures). CI and opt-out flags start off and can be
/// flipped mid-test; individual fact resolvers can be switched to fail.
pub struct FakeEnvironment {
    tool_version: String,
    runtime_version: String,
    os_version: String,
    ide_version: String,
    oauth_app_name: Option<String>,
    ci: AtomicBool,
    opted_out: AtomicBool,
    failing_fact: Mutex<Option<String>>,
}

impl Default for FakeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::with_versions(
            fixtures::TOOL_VERSION,
            fixtures::RUNTIME_VERSION,
            fixtures::OS_VERSION,
            fixtures::IDE_VERSION,
        )
    }

    pub fn with_versions(
        tool_version: impl Into<String>,
        runtime_version: impl Into<String>,
        os_version: impl Into<String>,
        ide_version: impl Into<String>,
    ) -> Self {
        Self {
            tool_version: tool_version.into(),
            runtime_version: runtime_version.into(),
            os_version: os_version.into(),
            ide_version: ide_version.into(),
            oauth_app_name: Some(fixtures::OAUTH_APP_NAME.to_string()),
            ci: AtomicBool::new(false),
            opted_out: AtomicBool::new(false),
            failing_fact: Mutex::new(None),
        }
    }

    pub fn without_oauth_app_name(mut self) -> Self {
        self.oauth_app_name = None;
        self
    }

    pub fn set_ci(&self, value: bool) {
        self.ci.store(value, Ordering::Relaxed);
    }

    pub fn set_opted_out(&self, value: bool) {
        self.opted_out.store(value, Ordering::Relaxed);
    }

    /// Make one fact resolver fail until [`clear_failure`](Self::clear_failure).
    ///
    /// `fact` is one of `tool_version`, `runtime_version`, `os_version`,
    /// `ide_version`.
    pub fn fail_fact(&self, fact: impl Into<String>) {
        *self.failing_fact.lock() = Some(fact.into());
    }

    pub fn clear_failure(&self) {
        *self.failing_fact.lock() = None;
    }

    fn resolve(&self, fact: &str, value: &str) -> anyhow::Result<String> {
        if self.failing_fact.lock().as_deref() == Some(fact) {
            anyhow::bail!("{} unavailable in this environment", fact);
        }
        Ok(value.to_string())
    }
}

impl Environment for FakeEnvironment {
    fn tool_version(&self) -> anyhow::Result<String> {
        self.resolve("tool_version", &self.tool_version)
    }

    fn runtime_version(&self) -> anyhow::Result<String> {
        self.resolve("runtime_version", &self.runtime_version)
    }

    fn os_version(&self) -> anyhow::Result<String> {
        self.resolve("os_version", &self.os_version)
    }

    fn ide_version(&self) -> anyhow::Result<String> {
        self.resolve("ide_version", &self.ide_version)
    }

    fn is_ci(&self) -> bool {
        self.ci.load(Ordering::Relaxed)
    }

    fn is_opted_out(&self) -> bool {
        self.opted_out.load(Ordering::Relaxed)
    }

    fn oauth_app_name(&self) -> Option<String> {
        self.oauth_app_name.clone()
    }
}
