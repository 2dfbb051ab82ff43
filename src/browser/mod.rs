//! Browser session management
//!
//! A [`BrowserSession`] is a scoped handle on one Chrome/Chromium instance:
//! acquired at the start of a run, released on every exit path when dropped.
//! Nothing browser-related outlives the run.

pub mod session;

pub use session::{BrowserSession, SessionOptions};
