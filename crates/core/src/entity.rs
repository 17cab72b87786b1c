//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Inventory artifacts are identified by object, not by name: two medicines
/// called "Paracetamol" are different entities unless they share an id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
