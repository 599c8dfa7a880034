//! runlane-analytics: in-process usage analytics for the runlane CLI.
//!
//! Records "action launched" / "action completed" events during a single
//! run, shapes them into the fixed wire schema defined in `runlane-types`,
//! and exposes the ordered, immutable event sequence for the delivery layer
//! to submit. Collection is suppressed entirely on CI and for users who
//! opted out; suppression is silent, never an error.
//!
//! # Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use runlane_analytics::{HostEnvironment, SessionRegistry};
//! use runlane_analytics::{ActionCompletionContext, ActionLaunchContext, CompletionStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = Arc::new(
//!     HostEnvironment::builder()
//!         .tool_version(env!("CARGO_PKG_VERSION"))
//!         .runtime_version("5.4.6")
//!         .os_version("14.2")
//!         .ide_version("Xcode 15.1")
//!         .build(),
//! );
//!
//! let registry = SessionRegistry::new(env);
//! let session = registry.current();
//!
//! session.action_launched(&ActionLaunchContext::new("build")?.with_platform("ios"))?;
//! session.action_completed(&ActionCompletionContext::new("build", CompletionStatus::Success)?)?;
//!
//! // The delivery layer drains `session.request_body()` when the run ends.
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod clock;
pub mod environment;
pub mod error;
pub mod registry;
pub mod session;

pub use builder::{EnvFacts, EventBuilder};
pub use clock::{Clock, SystemClock};
pub use environment::{Environment, HostEnvironment, HostEnvironmentBuilder, detect_ci, detect_opt_out};
pub use error::{Error, Result};
pub use registry::SessionRegistry;
pub use session::AnalyticsSession;

// Re-export the schema and context types so hosts depend on one crate.
pub use runlane_types::{
    ActionCompletionContext, ActionLaunchContext, AnalyticsEvent, CompletionStatus, EventKind,
    ProjectHash, project_hash_from_root,
};
