//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Row-shaped domain types implement this so generic storage (e.g. the
/// in-memory tables) can key them without knowing the concrete type.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
