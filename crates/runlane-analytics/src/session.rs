use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use uuid::Uuid;

use runlane_types::{ActionCompletionContext, ActionLaunchContext, AnalyticsEvent};

use crate::builder::{EnvFacts, EventBuilder};
use crate::clock::{Clock, SystemClock};
use crate::environment::Environment;
use crate::error::Result;

/// Append-only recorder for one tool invocation's analytics.
///
/// The session owns an ordered sequence of [`AnalyticsEvent`]; insertion
/// order is transmission order and events are never reordered or mutated
/// after being appended. When the environment reports CI, or the user opted
/// out of usage collection, `action_launched` / `action_completed` are
/// silent no-ops.
///
/// The session identifier is generated lazily on first use and is stable
/// for the rest of the process. The four environment facts (tool, runtime,
/// OS and IDE versions) are resolved at most once, on the first launch whose
/// resolution succeeds, and emitted immediately after that launch's record.
pub struct AnalyticsSession {
    env: Arc<dyn Environment>,
    clock: Box<dyn Clock>,
    session_id: OnceCell<String>,
    is_lanefile: AtomicBool,
    state: Mutex<SessionState>,
}

/// Event list and fact memo share one lock so a batch append and the
/// first-resolution check stay atomic with respect to each other.
#[derive(Default)]
struct SessionState {
    events: Vec<AnalyticsEvent>,
    env_facts: Option<EnvFacts>,
}

impl AnalyticsSession {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self::with_clock(env, Box::new(SystemClock))
    }

    pub fn with_clock(env: Arc<dyn Environment>, clock: Box<dyn Clock>) -> Self {
        Self {
            env,
            clock,
            session_id: OnceCell::new(),
            is_lanefile: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Lazily generated identifier, stable for the session's lifetime.
    pub fn session_id(&self) -> &str {
        self.session_id
            .get_or_init(|| Uuid::new_v4().to_string())
    }

    /// Preset the identifier before first use. Ignored once generated.
    pub fn set_session_id(&self, session_id: impl Into<String>) {
        let _ = self.session_id.set(session_id.into());
    }

    /// Whether this run originates from Lanefile execution.
    pub fn is_lanefile(&self) -> bool {
        self.is_lanefile.load(Ordering::Relaxed)
    }

    pub fn set_is_lanefile(&self, value: bool) {
        self.is_lanefile.store(value, Ordering::Relaxed);
    }

    /// Record the start of an action.
    ///
    /// Appends the `action_launched` record, followed on the session's first
    /// launch by the four environment-fact records. All records of one call
    /// are appended together; when fact resolution fails the sequence is
    /// left untouched and the error propagates.
    pub fn action_launched(&self, context: &ActionLaunchContext) -> Result<()> {
        if self.suppressed() {
            return Ok(());
        }

        let session_id = self.session_id().to_string();
        let oauth_app_name = self.env.oauth_app_name();

        let mut state = self.state.lock();
        let facts = if state.env_facts.is_none() {
            let facts = EnvFacts::resolve(self.env.as_ref())?;
            state.env_facts = Some(facts.clone());
            Some(facts)
        } else {
            None
        };

        let builder = EventBuilder::new(&session_id, oauth_app_name.as_deref(), self.clock.as_ref());
        let batch = builder.launch_events(context, facts.as_ref());
        state.events.extend(batch);
        Ok(())
    }

    /// Record the end of an action with its completion status.
    pub fn action_completed(&self, context: &ActionCompletionContext) -> Result<()> {
        if self.suppressed() {
            return Ok(());
        }

        let session_id = self.session_id().to_string();
        let oauth_app_name = self.env.oauth_app_name();

        let builder = EventBuilder::new(&session_id, oauth_app_name.as_deref(), self.clock.as_ref());
        let event = builder.completion_event(context);
        self.state.lock().events.push(event);
        Ok(())
    }

    /// Snapshot of the ordered event sequence accumulated so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.state.lock().events.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// JSON body the delivery layer submits in a single network call.
    pub fn request_body(&self) -> serde_json::Value {
        serde_json::json!({ "analytics": self.events() })
    }

    // Consulted once per launch/completion call.
    fn suppressed(&self) -> bool {
        self.env.is_ci() || self.env.is_opted_out()
    }
}
