//! Reference payloads the wire schema is pinned against.
//!
//! These JSON values are the authoritative shape of each record kind; the
//! integration suites compare produced events against them byte-for-byte
//! (via `serde_json::Value` equality on the parsed form).

use std::sync::Arc;

use serde_json::{Value, json};

use runlane_analytics::AnalyticsSession;
use runlane_types::{
    ActionCompletionContext, ActionLaunchContext, CompletionStatus, ProjectHash,
};

use crate::clock::FixedClock;
use crate::environment::FakeEnvironment;

pub const SESSION_ID: &str = "s0m3s3ss10n1D";
pub const TIMESTAMP_MILLIS: i64 = 1_507_142_046;
pub const PROJECT_HASH: &str = "some.phash.value";
pub const PLATFORM: &str = "ios";
pub const OAUTH_APP_NAME: &str = "runlane-tests";
pub const TOOL_VERSION: &str = "2.5.0";
pub const RUNTIME_VERSION: &str = "2.4.0";
pub const OS_VERSION: &str = "10.12";
pub const IDE_VERSION: &str = "Xcode 9";

/// A session wired to deterministic fakes: fixed clock, preset identifier,
/// the fixture versions. Everything it records reproduces the reference
/// payloads exactly.
pub struct FixtureSession {
    pub env: Arc<FakeEnvironment>,
    pub session: AnalyticsSession,
}

pub fn fixture_session() -> FixtureSession {
    let env = Arc::new(FakeEnvironment::new());
    let session =
        AnalyticsSession::with_clock(env.clone(), Box::new(FixedClock(TIMESTAMP_MILLIS)));
    session.set_session_id(SESSION_ID);
    FixtureSession { env, session }
}

/// Launch context carrying the fixture project hash and platform.
pub fn launch_context(action_name: &str) -> ActionLaunchContext {
    ActionLaunchContext::new(action_name)
        .expect("fixture action name is non-empty")
        .with_project_hash(ProjectHash::new(PROJECT_HASH))
        .with_platform(PLATFORM)
}

/// Completion context carrying the fixture project hash.
pub fn completion_context(action_name: &str, status: CompletionStatus) -> ActionCompletionContext {
    ActionCompletionContext::new(action_name, status)
        .expect("fixture action name is non-empty")
        .with_project_hash(ProjectHash::new(PROJECT_HASH))
}

fn event_source() -> Value {
    json!({
        "oauth_app_name": OAUTH_APP_NAME,
        "product": "runlane",
        "timestamp_millis": TIMESTAMP_MILLIS,
    })
}

/// The five records a first launch of `action_name` produces, in order:
/// the launch record, then tool/runtime/OS/IDE version facts.
pub fn launched_fixture(action_name: &str) -> Vec<Value> {
    let mut records = vec![json!({
        "event_source": event_source(),
        "actor": { "name": "user", "detail": action_name },
        "action": { "name": "action_launched", "detail": action_name },
        "primary_target": { "detail": PROJECT_HASH },
        "secondary_target": { "detail": PLATFORM },
        "millis_since_epoch": TIMESTAMP_MILLIS,
    })];

    for (kind, version) in [
        ("tool_version", TOOL_VERSION),
        ("runtime_version", RUNTIME_VERSION),
        ("os_version", OS_VERSION),
        ("ide_version", IDE_VERSION),
    ] {
        records.push(json!({
            "event_source": event_source(),
            "actor": { "name": "user", "detail": SESSION_ID },
            "action": { "name": kind, "detail": version },
            "millis_since_epoch": TIMESTAMP_MILLIS,
        }));
    }

    records
}

/// The single record a launch after the first produces.
pub fn relaunched_fixture(action_name: &str) -> Value {
    launched_fixture(action_name)
        .into_iter()
        .next()
        .expect("launched fixture has records")
}

/// The completion record for `action_name` with the given status string.
pub fn completed_fixture(action_name: &str, status: &str) -> Value {
    json!({
        "event_source": event_source(),
        "actor": { "name": "user", "detail": action_name },
        "action": { "name": "action_completed", "detail": action_name },
        "primary_target": { "detail": status },
        "secondary_target": { "detail": PROJECT_HASH },
        "millis_since_epoch": TIMESTAMP_MILLIS,
    })
}
