use num_traits::{One, PrimInt};

/// Implemented by flag enums whose discriminant is a bit index.
///
/// The backing integer is chosen per enum through `Storage`; input flags fit in a `u8`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bit set keyed by a [`FlagBitmask`] enum.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    /// Raise or lower one flag, as on a key-down / key-up edge.
    pub fn set<U: FlagBitmask<Storage = T>>(&mut self, tag: U, on: bool) {
        if on {
            self.add(tag);
        } else {
            self.remove(tag);
        }
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// ```text
/// define_bitmask_flags!(IntentFlag, u8, {
///     Forward,
///     Backward,
///     Jump,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_bitmask_flags!(Probe, u16, { A, B, C });

    #[test]
    fn variants_map_to_consecutive_bits() {
        assert_eq!(Probe::A.mask(), 0b001);
        assert_eq!(Probe::B.mask(), 0b010);
        assert_eq!(Probe::C.mask(), 0b100);
    }

    #[test]
    fn set_follows_key_edges() {
        let mut flags = BitmaskFlags::<u16>::default();
        assert!(flags.is_empty());

        flags.set(Probe::B, true);
        assert!(flags.has(Probe::B));
        assert!(!flags.has(Probe::A));

        // Repeated press is idempotent.
        flags.set(Probe::B, true);
        assert_eq!(flags.bits, 0b010);

        flags.set(Probe::B, false);
        assert!(flags.is_empty());
    }

    #[test]
    fn has_any_of_empty_slice_is_false() {
        let flags = BitmaskFlags::new(0b111u16);
        assert!(!flags.has_any::<Probe>(&[]));
        assert!(flags.has_any(&[Probe::C]));
    }
}
