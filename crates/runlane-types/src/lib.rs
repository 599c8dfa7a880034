pub mod context;
pub mod error;
pub mod event;
pub mod project;

pub use context::*;
pub use error::{Error, Result};
pub use event::*;
pub use project::*;
