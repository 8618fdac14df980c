//! In-band value encoding.
//!
//! The arena never hands out references into its buffer. Values are
//! copied in and out through the [`Element`] trait, which fixes the byte
//! width of one element and how it is laid out in a payload.

/// A value type that can be stored in arena payloads.
///
/// `SIZE` is the byte width of one element and is the unit in which
/// `allocate` requests are counted. It must be nonzero.
///
/// Implementations must round-trip: `read_bytes` of the output of
/// `write_bytes` yields an equal value. Both methods receive a slice of at
/// least `SIZE` bytes and must touch only the first `SIZE`.
pub trait Element: Sized {
    /// Byte width of one encoded element.
    const SIZE: usize;

    /// Encode `self` into the first `SIZE` bytes of `out`.
    fn write_bytes(&self, out: &mut [u8]);

    /// Decode an element from the first `SIZE` bytes of `bytes`.
    fn read_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_element_for_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn write_bytes(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }

                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_ne_bytes(buf)
                }
            }
        )*
    };
}

impl_element_for_primitive!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<T: Element, const K: usize> Element for [T; K] {
    const SIZE: usize = T::SIZE * K;

    fn write_bytes(&self, out: &mut [u8]) {
        for (item, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            item.write_bytes(chunk);
        }
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        std::array::from_fn(|i| T::read_bytes(&bytes[i * T::SIZE..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_sizes_match_native_widths() {
        assert_eq!(<i32 as Element>::SIZE, 4);
        assert_eq!(<f64 as Element>::SIZE, 8);
        assert_eq!(<u8 as Element>::SIZE, 1);
    }

    #[test]
    fn write_touches_only_leading_bytes() {
        let mut buf = [0xAAu8; 8];
        7i32.write_bytes(&mut buf);
        assert_eq!(&buf[4..], &[0xAA; 4]);
        assert_eq!(i32::read_bytes(&buf), 7);
    }

    #[test]
    fn array_element_is_packed() {
        assert_eq!(<[u16; 3] as Element>::SIZE, 6);
        let mut buf = [0u8; 6];
        [1u16, 2, 3].write_bytes(&mut buf);
        assert_eq!(<[u16; 3]>::read_bytes(&buf), [1, 2, 3]);
    }

    mod proptests {
        use crate::element::Element;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn f64_bits_survive_encoding(v in any::<f64>()) {
                let mut buf = [0u8; 8];
                v.write_bytes(&mut buf);
                prop_assert_eq!(f64::read_bytes(&buf).to_bits(), v.to_bits());
            }
        }
    }
}
