//! Bit-field packing helpers for register words

/// Mask covering the low `width` bits
#[inline]
pub(crate) const fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Extract `width` bits starting at `shift`
#[inline]
pub(crate) const fn field(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & mask(width)
}

/// Replace `width` bits starting at `shift`; excess bits of `value` are
/// discarded
#[inline]
pub(crate) const fn with_field(word: u32, shift: u32, width: u32, value: u32) -> u32 {
    let m = mask(width) << shift;
    (word & !m) | ((value << shift) & m)
}

/// Declares a transparent `u32` register word
macro_rules! register_word {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }
        }

        impl From<$name> for u32 {
            fn from(word: $name) -> u32 {
                word.0
            }
        }
    };
}

/// Getter/setter pair for one field of a register word
macro_rules! bitfield {
    ($(#[$meta:meta])* $get:ident, $set:ident: $shift:expr, $width:expr) => {
        $(#[$meta])*
        #[inline]
        pub const fn $get(self) -> u32 {
            $crate::bits::field(self.0, $shift, $width)
        }

        #[inline]
        pub fn $set(&mut self, value: u32) {
            self.0 = $crate::bits::with_field(self.0, $shift, $width, value);
        }
    };
}

pub(crate) use bitfield;
pub(crate) use register_word;
