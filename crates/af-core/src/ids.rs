//! Strongly typed identifiers.
//!
//! `AgentId` is a generational slot-map key: a handle to a removed agent never
//! aliases a newer agent that reuses the slot, so stale handles simply miss.
//! `SpeciesId` and `WorldId` are small `Copy + Ord + Hash` index wrappers for
//! direct use as `Vec` indices via `.index()`.

use std::fmt;

use slotmap::{Key, new_key_type};

new_key_type! {
    /// Stable handle for a live agent in the registry arena.
    pub struct AgentId;
}

impl AgentId {
    /// Opaque 64-bit form of the handle, useful for log lines.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({:#x})", self.as_u64())
    }
}

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a species in the `SpeciesCatalog`.
    pub struct SpeciesId(u16);
}

typed_id! {
    /// A world partition (dimension / level).  Agents only see neighbors in
    /// the same partition.
    pub struct WorldId(u16);
}

impl WorldId {
    /// The default (overworld) partition.
    pub const OVERWORLD: WorldId = WorldId(0);
}
