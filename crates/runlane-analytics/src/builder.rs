use runlane_types::{
    ACTOR_NAME, ActionCompletionContext, ActionLaunchContext, ActionRecord, Actor, AnalyticsEvent,
    EventKind, EventSource, PRODUCT_NAME, Target,
};

use crate::clock::Clock;
use crate::environment::Environment;
use crate::error::{Error, Result};

/// The four per-session environment facts, resolved once and memoized on the
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFacts {
    pub tool_version: String,
    pub runtime_version: String,
    pub os_version: String,
    pub ide_version: String,
}

impl EnvFacts {
    /// Resolve all four facts through the environment seam.
    ///
    /// Fails on the first unresolvable fact; the caller memoizes nothing in
    /// that case and a later launch retries.
    pub fn resolve(env: &dyn Environment) -> Result<Self> {
        Ok(Self {
            tool_version: env
                .tool_version()
                .map_err(|e| Error::resolution("tool version", e))?,
            runtime_version: env
                .runtime_version()
                .map_err(|e| Error::resolution("runtime version", e))?,
            os_version: env
                .os_version()
                .map_err(|e| Error::resolution("OS version", e))?,
            ide_version: env
                .ide_version()
                .map_err(|e| Error::resolution("IDE version", e))?,
        })
    }
}

/// Pure constructor for schema-compliant events.
///
/// Borrows the session metadata it stamps into each record and never touches
/// session state; the session decides what gets appended.
pub struct EventBuilder<'a> {
    session_id: &'a str,
    oauth_app_name: Option<&'a str>,
    clock: &'a dyn Clock,
}

impl<'a> EventBuilder<'a> {
    pub fn new(session_id: &'a str, oauth_app_name: Option<&'a str>, clock: &'a dyn Clock) -> Self {
        Self {
            session_id,
            oauth_app_name,
            clock,
        }
    }

    /// One `action_launched` record, followed by the four environment-fact
    /// records (in fixed order: tool, runtime, OS, IDE) when `facts` is
    /// supplied. `facts` is supplied only for the session's first launch.
    pub fn launch_events(
        &self,
        context: &ActionLaunchContext,
        facts: Option<&EnvFacts>,
    ) -> Vec<AnalyticsEvent> {
        let mut events = Vec::with_capacity(if facts.is_some() { 5 } else { 1 });

        let mut launched = self.envelope(
            context.action_name(),
            EventKind::ActionLaunched,
            context.action_name(),
        );
        launched.primary_target = context.project_hash().map(|hash| Target::new(hash.as_str()));
        launched.secondary_target = context.platform().map(Target::new);
        events.push(launched);

        if let Some(facts) = facts {
            events.push(self.fact_event(EventKind::ToolVersion, &facts.tool_version));
            events.push(self.fact_event(EventKind::RuntimeVersion, &facts.runtime_version));
            events.push(self.fact_event(EventKind::OsVersion, &facts.os_version));
            events.push(self.fact_event(EventKind::IdeVersion, &facts.ide_version));
        }

        events
    }

    /// Exactly one `action_completed` record. The status rides in
    /// `primary_target`, the project hash (when present) in
    /// `secondary_target`.
    pub fn completion_event(&self, context: &ActionCompletionContext) -> AnalyticsEvent {
        let mut completed = self.envelope(
            context.action_name(),
            EventKind::ActionCompleted,
            context.action_name(),
        );
        completed.primary_target = Some(Target::new(context.status().as_str()));
        completed.secondary_target = context.project_hash().map(|hash| Target::new(hash.as_str()));
        completed
    }

    /// Environment-fact records carry the session id as actor detail; they
    /// describe the run, not a single action.
    fn fact_event(&self, kind: EventKind, version: &str) -> AnalyticsEvent {
        self.envelope(self.session_id, kind, version)
    }

    fn envelope(&self, actor_detail: &str, kind: EventKind, detail: &str) -> AnalyticsEvent {
        // One clock reading per record.
        let now = self.clock.millis_since_epoch();
        AnalyticsEvent {
            event_source: EventSource {
                oauth_app_name: self.oauth_app_name.map(str::to_string),
                product: PRODUCT_NAME.to_string(),
                timestamp_millis: now,
            },
            actor: Actor {
                name: ACTOR_NAME.to_string(),
                detail: actor_detail.to_string(),
            },
            action: ActionRecord {
                name: kind,
                detail: detail.to_string(),
            },
            primary_target: None,
            secondary_target: None,
            millis_since_epoch: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlane_types::{CompletionStatus, ProjectHash};
    use std::sync::atomic::{AtomicI64, Ordering};

    struct TestClock(AtomicI64);

    impl Clock for TestClock {
        fn millis_since_epoch(&self) -> i64 {
            self.0.fetch_add(1, Ordering::Relaxed)
        }
    }

    fn facts() -> EnvFacts {
        EnvFacts {
            tool_version: "2.5.0".to_string(),
            runtime_version: "2.4.0".to_string(),
            os_version: "10.12".to_string(),
            ide_version: "Xcode 9".to_string(),
        }
    }

    #[test]
    fn test_first_launch_produces_five_records_in_fixed_order() {
        let clock = TestClock(AtomicI64::new(100));
        let builder = EventBuilder::new("s0m3s3ss10n1D", Some("runlane-tests"), &clock);
        let context = ActionLaunchContext::new("some_action")
            .unwrap()
            .with_project_hash(ProjectHash::new("some.phash.value"))
            .with_platform("ios");

        let events = builder.launch_events(&context, Some(&facts()));

        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ActionLaunched,
                EventKind::ToolVersion,
                EventKind::RuntimeVersion,
                EventKind::OsVersion,
                EventKind::IdeVersion,
            ]
        );

        assert_eq!(events[0].actor.detail, "some_action");
        assert_eq!(events[0].action.detail, "some_action");
        assert_eq!(
            events[0].primary_target.as_ref().unwrap().detail,
            "some.phash.value"
        );
        assert_eq!(events[0].secondary_target.as_ref().unwrap().detail, "ios");

        assert_eq!(events[1].action.detail, "2.5.0");
        assert_eq!(events[2].action.detail, "2.4.0");
        assert_eq!(events[3].action.detail, "10.12");
        assert_eq!(events[4].action.detail, "Xcode 9");
        for fact in &events[1..] {
            assert_eq!(fact.actor.detail, "s0m3s3ss10n1D");
            assert!(fact.primary_target.is_none());
            assert!(fact.secondary_target.is_none());
        }
    }

    #[test]
    fn test_later_launch_produces_single_record() {
        let clock = TestClock(AtomicI64::new(100));
        let builder = EventBuilder::new("s0m3s3ss10n1D", None, &clock);
        let context = ActionLaunchContext::new("some_action").unwrap();

        let events = builder.launch_events(&context, None);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::ActionLaunched);
        assert!(events[0].primary_target.is_none());
        assert!(events[0].secondary_target.is_none());
        assert!(events[0].event_source.oauth_app_name.is_none());
    }

    #[test]
    fn test_completion_record_carries_status_and_hash() {
        let clock = TestClock(AtomicI64::new(100));
        let builder = EventBuilder::new("s0m3s3ss10n1D", Some("runlane-tests"), &clock);
        let context = ActionCompletionContext::new("some_action", CompletionStatus::Error)
            .unwrap()
            .with_project_hash(ProjectHash::new("some.phash.value"));

        let event = builder.completion_event(&context);

        assert_eq!(event.kind(), EventKind::ActionCompleted);
        assert_eq!(event.actor.detail, "some_action");
        assert_eq!(event.action.detail, "some_action");
        assert_eq!(event.primary_target.as_ref().unwrap().detail, "error");
        assert_eq!(
            event.secondary_target.as_ref().unwrap().detail,
            "some.phash.value"
        );
    }

    #[test]
    fn test_every_record_captures_its_own_timestamp() {
        let clock = TestClock(AtomicI64::new(1_000));
        let builder = EventBuilder::new("s0m3s3ss10n1D", None, &clock);
        let context = ActionLaunchContext::new("some_action").unwrap();

        let events = builder.launch_events(&context, Some(&facts()));

        let stamps: Vec<i64> = events.iter().map(|e| e.millis_since_epoch).collect();
        assert_eq!(stamps, vec![1_000, 1_001, 1_002, 1_003, 1_004]);
        for event in &events {
            assert_eq!(event.event_source.timestamp_millis, event.millis_since_epoch);
        }
    }
}
