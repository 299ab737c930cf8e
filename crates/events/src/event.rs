use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are immutable facts, versioned for schema evolution, and meant to be
/// appended to an audit trail rather than rewritten.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "parties.party.disabled").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
