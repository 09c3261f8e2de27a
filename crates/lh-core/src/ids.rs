//! Typed identifiers for road-network graph elements.
//!
//! Node ids index one specific `RoadNetwork`; an id from the pedestrian
//! network means nothing in the vehicular one.  The wrappers keep them from
//! being mixed up with plain integers, not with each other's networks; that
//! is the resolver's job.

use std::fmt;

/// Generate a typed index wrapper around `u32`.
macro_rules! graph_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "unset"; never produced by a network builder.
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an id from a `Vec` position.  Positions are bounded by
            /// the builder, which never exceeds `u32::MAX - 1` elements.
            #[inline(always)]
            pub fn from_index(i: usize) -> Self {
                $name(i as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

graph_id! {
    /// Index of a node in one `RoadNetwork`.
    pub struct NodeId;
}

graph_id! {
    /// Index of a directed edge in one `RoadNetwork`'s CSR arrays.
    pub struct EdgeId;
}
