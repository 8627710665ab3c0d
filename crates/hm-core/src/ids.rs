//! Typed ids for agents and buildings.
//!
//! Both are plain `u32` slots that are never reused, so ordering by id is
//! ordering by creation and a stale id simply resolves to "gone".

use std::fmt;

/// Newtype over an integer slot with an `INVALID` sentinel.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Position in the owning store's `Vec`s.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
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
    /// Index of an agent (worker) in SoA storage.  Never reused after death.
    pub struct AgentId(u32);
}

typed_id! {
    /// Slot of a building in the building registry.  Never reused after
    /// demolition, so a stale id simply resolves to "gone".
    pub struct BuildingId(u32);
}
