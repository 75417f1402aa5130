//! Byte-sequence types used to pass keys and values across the tree boundary.
//!
//! Two shapes: [`Slice`], a non-owning view over a contiguous byte buffer, and
//! [`OwnedSlice`], an owning buffer with value-copy semantics. Keys enter the
//! tree as views and are copied into leaves; values are moved in as owned
//! buffers and handed back out as views.

use std::fmt;
use std::fmt::Write;

use bytes::Bytes;
use num_traits::{ToBytes, Unsigned};

/// Non-owning view over a contiguous run of bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slice<'a> {
    data: &'a [u8],
}

impl<'a> Slice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[inline(always)]
    pub fn at(&self, pos: usize) -> u8 {
        self.data[pos]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Copies the viewed bytes into an owning buffer.
    pub fn to_owned(&self) -> OwnedSlice {
        OwnedSlice::copy_from(self.data)
    }

    pub fn to_hex(&self) -> String {
        to_hex(self.data)
    }

    /// Lossy UTF-8 rendering, for display of keys that are known to be text.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.data).into_owned()
    }
}

impl fmt::Debug for Slice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slice({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Slice<'_> {
    fn as_ref(&self) -> &[u8] {
        self.data
    }
}

impl std::ops::Index<usize> for Slice<'_> {
    type Output = u8;

    fn index(&self, pos: usize) -> &u8 {
        &self.data[pos]
    }
}

impl<'a> From<&'a [u8]> for Slice<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Slice<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a str> for Slice<'a> {
    fn from(data: &'a str) -> Self {
        Self::new(data.as_bytes())
    }
}

impl<'a> From<&'a Vec<u8>> for Slice<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Self::new(data.as_slice())
    }
}

/// Owning, immutable byte buffer. Clones are value-copies as far as any
/// observer is concerned; the backing storage is shared and never mutated.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct OwnedSlice {
    data: Bytes,
}

impl OwnedSlice {
    pub fn copy_from(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Big-endian encoding of an unsigned integer, so that numeric order and
    /// byte order agree.
    pub fn from_unsigned<T: Unsigned + ToBytes>(un: T) -> Self {
        Self::copy_from(un.to_be_bytes().as_ref())
    }

    #[inline(always)]
    pub fn at(&self, pos: usize) -> u8 {
        self.data[pos]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_slice(&self) -> Slice<'_> {
        Slice::new(&self.data)
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.data)
    }
}

impl fmt::Debug for OwnedSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedSlice({})", self.to_hex())
    }
}

impl AsRef<[u8]> for OwnedSlice {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for OwnedSlice {
    fn from(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }
}

impl From<Bytes> for OwnedSlice {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

impl From<&[u8]> for OwnedSlice {
    fn from(data: &[u8]) -> Self {
        Self::copy_from(data)
    }
}

impl<const N: usize> From<&[u8; N]> for OwnedSlice {
    fn from(data: &[u8; N]) -> Self {
        Self::copy_from(data)
    }
}

impl From<String> for OwnedSlice {
    fn from(data: String) -> Self {
        Self {
            data: data.into_bytes().into(),
        }
    }
}

impl From<&str> for OwnedSlice {
    fn from(data: &str) -> Self {
        Self::copy_from(data.as_bytes())
    }
}

impl From<Slice<'_>> for OwnedSlice {
    fn from(data: Slice<'_>) -> Self {
        data.to_owned()
    }
}

macro_rules! impl_from_unsigned {
    ( $($t:ty),* ) => {
    $(
    impl From<$t> for OwnedSlice {
        fn from(data: $t) -> Self {
            Self::from_unsigned(data)
        }
    }
    ) *
    }
}
impl_from_unsigned!(u8, u16, u32, u64, u128);

fn to_hex(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for b in data {
        write!(s, "{:02x}", b).expect("writing to a String cannot fail");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::{OwnedSlice, Slice};

    #[test]
    fn view_basics() {
        let s: Slice = "abc".into();
        assert_eq!(s.len(), 3);
        assert_eq!(s.at(1), b'b');
        assert_eq!(s[2], b'c');
        assert_eq!(s.as_bytes(), b"abc");
        assert_eq!(s.to_hex(), "616263");
        assert_eq!(s.to_string_lossy(), "abc");
    }

    #[test]
    fn owned_copies() {
        let o = OwnedSlice::from(vec![0xde, 0xad]);
        let copy = o.clone();
        assert_eq!(o, copy);
        assert_eq!(copy.to_hex(), "dead");
        assert_eq!(copy.as_slice().as_bytes(), &[0xde, 0xad]);
    }

    #[test]
    fn view_to_owned_round_trip() {
        let s: Slice = b"hello".into();
        let o = s.to_owned();
        assert_eq!(o.as_bytes(), b"hello");
        assert_eq!(o.as_slice(), s);
    }

    #[test]
    fn unsigned_keys_sort_bytewise() {
        let a = OwnedSlice::from(1u64);
        let b = OwnedSlice::from(256u64);
        let c = OwnedSlice::from(u64::MAX);
        assert_eq!(a.len(), 8);
        assert!(a < b);
        assert!(b < c);
    }
}
