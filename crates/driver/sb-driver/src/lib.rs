//! Checking sessions over the region and coherence engines.
//!
//! A [`Session`] holds what the queries of one compilation unit share: the
//! [`SessionConfig`] limits, the free region ordering and the set of local
//! items. Queries record their failures in [`Diagnostics`]; user-facing
//! errors and internal errors are kept apart and handed back together by
//! [`Session::finish`].
//!
//! The library emits `tracing` events but never installs a subscriber.

mod config;
mod diagnostics;
mod session;

pub use config::SessionConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Report};
pub use session::Session;
