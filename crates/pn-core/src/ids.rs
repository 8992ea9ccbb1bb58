//! Positional ids.
//!
//! Distributors are numbered in declaration order within a network and
//! assemblies in declaration order within their distributor. The two kinds
//! are separate types so one cannot stand in for the other.

use core::fmt;
use core::num::NonZeroU32;

macro_rules! position_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Id of the object at 0-based `position`.
            pub fn from_index(position: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(position))
            }

            pub fn from_usize(position: usize) -> Self {
                Self::from_index(u32::try_from(position).unwrap_or(u32::MAX - 1))
            }

            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            pub fn as_usize(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

position_id!(
    /// Position of an energy distributor within its network.
    DistributorId,
    "distributor"
);

position_id!(
    /// Position of a propulsor assembly within its distributor.
    AssemblyId,
    "assembly"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_round_trip() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            assert_eq!(DistributorId::from_index(i).index(), i);
            assert_eq!(AssemblyId::from_index(i).index(), i);
        }
        assert_eq!(AssemblyId::from_usize(7).as_usize(), 7);
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", DistributorId::from_index(2)), "distributor#2");
        assert_eq!(format!("{:?}", AssemblyId::from_index(0)), "assembly#0");
    }

    #[test]
    fn optional_id_costs_nothing() {
        assert_eq!(
            core::mem::size_of::<AssemblyId>(),
            core::mem::size_of::<Option<AssemblyId>>()
        );
    }
}
