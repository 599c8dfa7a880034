use chrono::Utc;

/// Wall clock consumed by the event builder.
///
/// Every produced event captures its own reading; a session-level timestamp
/// is never reused across events.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn millis_since_epoch(&self) -> i64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn millis_since_epoch(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
