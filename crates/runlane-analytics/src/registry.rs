use std::sync::Arc;

use parking_lot::Mutex;

use crate::environment::Environment;
use crate::session::AnalyticsSession;

/// Holder for the current [`AnalyticsSession`].
///
/// The host owns one registry and passes it to its action-dispatch layer;
/// there is no process-global state. `reset` starts a logically new
/// collection window (independent test runs, or independent tool
/// invocations inside one long-lived process).
///
/// All three operations take the same lock, so a reader never observes a
/// half-replaced session.
pub struct SessionRegistry {
    env: Arc<dyn Environment>,
    current: Mutex<Option<Arc<AnalyticsSession>>>,
}

impl SessionRegistry {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            current: Mutex::new(None),
        }
    }

    /// The current session, created lazily on first access.
    pub fn current(&self) -> Arc<AnalyticsSession> {
        let mut current = self.current.lock();
        current
            .get_or_insert_with(|| Arc::new(AnalyticsSession::new(self.env.clone())))
            .clone()
    }

    /// Discard the current session. The next [`current`](Self::current) call
    /// creates a fresh session with a fresh identifier.
    pub fn reset(&self) {
        *self.current.lock() = None;
    }

    /// Install a preconfigured session (custom clock, preset identifier).
    pub fn replace(&self, session: Arc<AnalyticsSession>) {
        *self.current.lock() = Some(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullEnvironment;

    impl Environment for NullEnvironment {
        fn tool_version(&self) -> anyhow::Result<String> {
            Ok("2.5.0".to_string())
        }

        fn runtime_version(&self) -> anyhow::Result<String> {
            Ok("2.4.0".to_string())
        }

        fn os_version(&self) -> anyhow::Result<String> {
            Ok("10.12".to_string())
        }

        fn ide_version(&self) -> anyhow::Result<String> {
            Ok("Xcode 9".to_string())
        }

        fn is_ci(&self) -> bool {
            false
        }

        fn is_opted_out(&self) -> bool {
            false
        }

        fn oauth_app_name(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_current_returns_the_same_session() {
        let registry = SessionRegistry::new(Arc::new(NullEnvironment));
        let a = registry.current();
        let b = registry.current();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_reset_forces_a_fresh_session() {
        let registry = SessionRegistry::new(Arc::new(NullEnvironment));
        let before = registry.current();
        registry.reset();
        let after = registry.current();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_replace_installs_the_given_session() {
        let registry = SessionRegistry::new(Arc::new(NullEnvironment));
        let custom = Arc::new(AnalyticsSession::new(Arc::new(NullEnvironment)));
        custom.set_session_id("s0m3s3ss10n1D");

        registry.replace(custom.clone());

        let current = registry.current();
        assert!(Arc::ptr_eq(&custom, &current));
        assert_eq!(current.session_id(), "s0m3s3ss10n1D");
    }
}
