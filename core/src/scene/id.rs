//! Arena identifiers

use std::fmt;

/// Define a macro that generates a typed index into one of the scene's
/// object arenas.
macro_rules! arena_id {
    ($name: ident, $label: literal) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the index into the arena.
            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(i: usize) -> Self {
                Self(i as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

arena_id!(ShapeId, "shape");
arena_id!(BsdfId, "bsdf");
arena_id!(LightId, "light");
arena_id!(MediumId, "medium");
