//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every record the report layer reads (moves, locations, products, shipments)
/// is an entity: two snapshots with the same id describe the same record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
