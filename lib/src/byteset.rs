use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use bitvec::array::BitArray;
use bitvec::order::Lsb0;
use itertools::Itertools;

/// A set of byte values.
///
/// The set is a 256-bit bitmap where the N-th bit is set if byte N is part
/// of the set. Values are unique and iterated in ascending order.
#[derive(Clone, Copy, Default)]
pub struct ByteSet(BitArray<[u64; 4], Lsb0>);

impl ByteSet {
    /// Creates an empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set with all the 256 byte values.
    pub fn all() -> Self {
        Self(BitArray::new([u64::MAX; 4]))
    }

    /// Creates a set with a single value.
    pub fn single(value: u8) -> Self {
        let mut set = Self::empty();
        set.insert(value);
        set
    }

    /// Creates a set with the values between `start` and `end`, both
    /// inclusive. The bounds can be in any order.
    pub fn range(start: u8, end: u8) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let mut set = Self::empty();
        set.0[start as usize..=end as usize].fill(true);
        set
    }

    /// Creates a set with the bytes that have all the bits in `mask` set.
    pub fn all_bitmask(mask: u8) -> Self {
        Self::from_predicate(|b| b & mask == mask)
    }

    /// Creates a set with the bytes that have at least one of the bits in
    /// `mask` set.
    pub fn any_bitmask(mask: u8) -> Self {
        Self::from_predicate(|b| b & mask != 0)
    }

    /// Creates a set with the bytes for which `f` returns true.
    pub fn from_predicate<F: Fn(u8) -> bool>(f: F) -> Self {
        let mut set = Self::empty();
        for b in 0..=255_u8 {
            if f(b) {
                set.insert(b);
            }
        }
        set
    }

    /// Adds a value to the set. Returns false if it was already there.
    #[inline]
    pub fn insert(&mut self, value: u8) -> bool {
        !self.0.replace(value as usize, true)
    }

    /// Returns true if the set contains `value`.
    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        self.0[value as usize]
    }

    /// Number of values in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// Returns true if the set contains the 256 possible values.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.0.all()
    }

    /// Returns the union of this set and `other`.
    pub fn union(&self, other: &ByteSet) -> ByteSet {
        let mut data = self.0.data;
        for (a, b) in data.iter_mut().zip(other.0.data) {
            *a |= b;
        }
        Self(BitArray::new(data))
    }

    /// Returns the values that are not in this set.
    pub fn complement(&self) -> ByteSet {
        Self(BitArray::new(self.0.data.map(|chunk| !chunk)))
    }

    /// Returns the values in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter_ones().map(|b| b as u8)
    }

    /// Returns the maximal runs of consecutive values in the set, in
    /// ascending order. For instance, `[01 02 03 07]` produces `01..=03`
    /// and `07..=07`.
    pub fn ranges(&self) -> Vec<RangeInclusive<u8>> {
        let mut ranges: Vec<RangeInclusive<u8>> = Vec::new();
        for b in self.iter() {
            match ranges.last_mut() {
                Some(last) if last.end().checked_add(1) == Some(b) => {
                    *last = *last.start()..=b;
                }
                _ => ranges.push(b..=b),
            }
        }
        ranges
    }
}

impl PartialEq for ByteSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.data == other.0.data
    }
}

impl Eq for ByteSet {}

impl Hash for ByteSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.data.hash(state)
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::empty();
        for b in iter {
            set.insert(b);
        }
        set
    }
}

/// Prints the set in pattern syntax. A single value is printed as a byte,
/// a full set as `.`, and anything else as a set with ranges for runs of
/// consecutive values, like `[00-1f 7f]`.
impl Display for ByteSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_full() {
            return write!(f, ".");
        }
        if self.len() == 1 {
            if let Some(b) = self.iter().next() {
                return write!(f, "{:02x}", b);
            }
        }
        let ranges = self.ranges().into_iter().map(|r| {
            if r.start() == r.end() {
                format!("{:02x}", r.start())
            } else {
                format!("{:02x}-{:02x}", r.start(), r.end())
            }
        });
        write!(f, "[{}]", ranges.format(" "))
    }
}

impl Debug for ByteSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteSet({})", self)
    }
}
