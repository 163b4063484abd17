//! Index types for registry storage.
//!
//! Using `NonZeroU32` enables `Option<T>` niche optimization (no extra space).

use core::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create from a raw index (1-based).
            #[must_use]
            pub const fn from_raw(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Create from a 0-based index.
            ///
            /// Returns `None` once the index no longer fits in a `u32`.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                let raw = u32::try_from(index.checked_add(1)?).ok()?;
                Self::from_raw(raw)
            }

            /// Get the raw value (1-based).
            #[must_use]
            pub const fn to_raw(self) -> u32 {
                self.0.get()
            }

            /// Get the 0-based index.
            #[must_use]
            pub const fn to_index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }
    };
}

define_id!(
    /// Attribute type definition identifier.
    AttributeTypeId
);

define_id!(
    /// Object class definition identifier.
    ObjectClassId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_zero() {
        assert!(AttributeTypeId::from_raw(0).is_none());
    }

    #[test]
    fn test_index_round_trip() {
        let id = ObjectClassId::from_index(41).unwrap();
        assert_eq!(id.to_raw(), 42);
        assert_eq!(id.to_index(), 41);
    }

    #[test]
    fn test_index_overflow() {
        assert!(AttributeTypeId::from_index(u32::MAX as usize).is_none());
    }

    #[test]
    fn test_option_niche() {
        assert_eq!(
            core::mem::size_of::<Option<AttributeTypeId>>(),
            core::mem::size_of::<AttributeTypeId>()
        );
    }
}
