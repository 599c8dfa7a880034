use serde::{Deserialize, Serialize};

// NOTE: Schema Design Goals
//
// 1. Fixed envelope: every record shares the same five-part shape
//    (event_source / actor / action / optional targets / timestamp) so the
//    backend can ingest all kinds through one path.
// 2. Flat values: fields are strings or integers only; no nesting beyond
//    the envelope.
// 3. Omission over null: absent optional fields are dropped from the
//    serialized record entirely. The reference payloads in
//    `runlane-testing::fixtures` are byte-exact; key order follows struct
//    declaration order.

/// Product identifier stamped into every record's `event_source.product`.
pub const PRODUCT_NAME: &str = "runlane";

/// Fixed tag carried in `actor.name` for every record.
pub const ACTOR_NAME: &str = "user";

/// Closed set of record kinds accepted by the analytics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An action began executing.
    ActionLaunched,
    /// An action finished executing (with a status in `primary_target`).
    ActionCompleted,
    /// Version of the runlane tool itself (first launch only).
    ToolVersion,
    /// Version of the underlying runtime (first launch only).
    RuntimeVersion,
    /// Host operating system version (first launch only).
    OsVersion,
    /// Detected IDE version (first launch only).
    IdeVersion,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ActionLaunched => "action_launched",
            EventKind::ActionCompleted => "action_completed",
            EventKind::ToolVersion => "tool_version",
            EventKind::RuntimeVersion => "runtime_version",
            EventKind::OsVersion => "os_version",
            EventKind::IdeVersion => "ide_version",
        }
    }

    /// Whether this kind is one of the four per-session environment facts.
    pub fn is_environment_fact(&self) -> bool {
        matches!(
            self,
            EventKind::ToolVersion
                | EventKind::RuntimeVersion
                | EventKind::OsVersion
                | EventKind::IdeVersion
        )
    }
}

/// Origin metadata shared by every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    /// OAuth application the delivery layer authenticates as, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_app_name: Option<String>,
    /// Always [`PRODUCT_NAME`].
    pub product: String,
    /// Per-record capture of "now", identical to `millis_since_epoch`.
    pub timestamp_millis: i64,
}

/// Who the record is about.
///
/// `name` is always [`ACTOR_NAME`]; `detail` carries the action name for
/// launch/completion records and the session identifier for environment-fact
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub detail: String,
}

/// What happened: a kind from the closed set plus kind-specific detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: EventKind,
    pub detail: String,
}

/// Auxiliary value attached to some record kinds (completion status,
/// project hash, platform). Single `detail` key on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub detail: String,
}

impl Target {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One schema-compliant analytics record.
///
/// Immutable once appended to a session's sequence; owned exclusively by the
/// session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event_source: EventSource,
    pub actor: Actor,
    pub action: ActionRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_target: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_target: Option<Target>,
    pub millis_since_epoch: i64,
}

impl AnalyticsEvent {
    pub fn kind(&self) -> EventKind {
        self.action.name
    }
}
