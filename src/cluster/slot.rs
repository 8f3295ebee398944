use std::fmt;

/// Total number of hash slots a cluster partitions its key space into.
pub const TOTAL_SLOTS: u16 = 16384;

/// An inclusive `[start, end]` range of hash slots, the atomic unit of slot assignment.
///
/// Equality, hashing and ordering are all structural over `(start, end)`; ranges are
/// compared as opaque units, never intersected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotRange {
    pub start: u16,
    pub end: u16,
}

impl SlotRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, slot: u16) -> bool {
        self.start <= slot && slot <= self.end
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Maps a key to its owning hash slot in `[0, 16384)`.
///
/// If the key contains a hash tag (a `{...}` substring with a non-empty body), the slot is
/// computed over the tag alone so multi-key operations can colocate on the same master. A
/// `{` with no matching `}` is not a tag: the whole original key is hashed.
pub fn hash_slot(key: &str) -> u16 {
    if key.is_empty() {
        return 0;
    }

    let effective_key = match key.find('{') {
        Some(start) => match key[start + 1..].find('}') {
            Some(offset) if offset != 0 => &key[start + 1..start + 1 + offset],
            _ => key,
        },
        None => key,
    };

    crc16(effective_key) % TOTAL_SLOTS
}

fn crc16(key: &str) -> u16 {
    crc16::State::<crc16::XMODEM>::calculate(key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{hash_slot, SlotRange};

    #[test]
    fn slot_is_always_in_range() {
        for key in ["", "a", "foo", "user:1000", "{tag}rest", "😀emoji"] {
            let slot = hash_slot(key);
            assert!(slot < 16384, "slot {slot} out of range for key {key:?}");
        }
    }

    #[test]
    fn empty_key_hashes_to_slot_zero() {
        assert_eq!(0, hash_slot(""));
    }

    #[test]
    fn hash_tag_overrides_full_key() {
        assert_eq!(hash_slot("x"), hash_slot("{x}"));
        assert_eq!(hash_slot("x"), hash_slot("foo{x}bar"));
        assert_ne!(hash_slot("x"), hash_slot("y"));
    }

    #[test]
    fn hash_tag_without_closing_brace_falls_back_to_whole_key() {
        assert_eq!(hash_slot("foo{bar"), hash_slot("foo{bar"));
        assert_ne!(hash_slot("foo{bar"), hash_slot("bar"));
    }

    #[test]
    fn empty_hash_tag_falls_back_to_whole_key() {
        assert_eq!(hash_slot("{}foo"), hash_slot("{}foo"));
        assert_ne!(hash_slot("{}foo"), hash_slot("foo"));
    }

    #[test]
    fn slot_range_parses_single_and_double_bounds() {
        assert_eq!(SlotRange::new(0, 0), SlotRange::new(0, 0));
        assert_eq!(SlotRange::new(5460, 10922).start, 5460);
        assert_eq!(SlotRange::new(5460, 10922).end, 10922);
    }

    #[test]
    fn slot_range_display_collapses_single_slot() {
        assert_eq!("0", SlotRange::new(0, 0).to_string());
        assert_eq!("5460-10922", SlotRange::new(5460, 10922).to_string());
    }
}
