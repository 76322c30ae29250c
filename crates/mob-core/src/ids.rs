//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so hosts
//! can bridge to their own entity handles (`id.0 as usize` into a slot map),
//! but callers should prefer the `.index()` helper for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Host-assigned handle for one enemy agent.  The library never inspects
    /// it beyond passing it back through [`AgentWorld`][crate::AgentWorld].
    pub struct AgentId(u32);
}

typed_id! {
    /// A coordinated group of agents (a drone cluster or crawler swarm).
    pub struct GroupId(u16);
}

typed_id! {
    /// An assignable spatial region agents wander in and relocate between.
    pub struct ZoneId(u16);
}

typed_id! {
    /// A host-defined animation/audio cue.  Fired through
    /// [`AgentWorld::play_cue`][crate::AgentWorld::play_cue]; the library
    /// never interprets the value.
    pub struct CueId(u16);
}
