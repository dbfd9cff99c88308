//! Publishes demo data for the profile dashboard.
//!
//! Real profile data comes from an instrumented run; this crate instead
//! writes an embedded fixture set into a log directory so the dashboard has
//! something to show.

pub mod app;
pub mod domain;
pub mod io;
pub mod prelude;
pub mod publisher;
