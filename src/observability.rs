//! `tracing` macros for the row filter.
//!
//! Every event goes to the `rowfilter` target and carries `component`
//! (`"filter"`) and `event` fields. Predicate compilation logs at debug, a
//! finished pass logs its [`crate::FilterStats`] at info, and a cancelled pass
//! warns. Rows themselves are never logged. Installing a subscriber is left to
//! the application.

/// Target shared by every event this crate emits.
pub(crate) const ROWFILTER_TARGET: &str = "rowfilter";

/// Info event on the `rowfilter` target, e.g. the per-pass summary.
macro_rules! log_info {
    ($($field:tt)*) => {
        ::tracing::info!(target: $crate::observability::ROWFILTER_TARGET, $($field)*)
    };
}

/// Debug event, used for compiled predicate metadata.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::ROWFILTER_TARGET, $($field)*)
    };
}

/// Warn event, used when a pass is cancelled.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::ROWFILTER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
