//! Entity trait: records identified by id rather than by their contents.

/// A record with a stable identity; two snapshots with the same id are the same
/// record at different points in time.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
