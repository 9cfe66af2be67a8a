/// A reaction's precedence level: the longest dependency chain reaching it
/// from any reaction with no predecessors. A reaction at level `L` may only
/// execute after every reaction at levels `< L` at the same tag has
/// completed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level(pub usize);

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<usize> for Level {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl std::ops::Add<usize> for Level {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl std::ops::AddAssign<usize> for Level {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}

/// Bits of [`Index`] dedicated to the precedence/deadline sub-key, low bits
/// first. The remaining high bits encode the [`Level`].
const PRECEDENCE_BITS: u32 = 48;
const PRECEDENCE_MASK: u64 = (1 << PRECEDENCE_BITS) - 1;

/// A reaction's total-order dispatch key.
///
/// The high bits encode the [`Level`] (coarse, causal ordering across
/// levels); the low bits encode a deadline/precedence sub-key (fine-grained
/// ordering *within* a level, smaller is earlier/higher priority). Ordering
/// on the raw `u64` therefore orders first by level, then by precedence,
/// which is exactly the order the scheduler's priority queues need: they
/// never compare across levels because each level has its own queue, but
/// packing both into one key keeps a single comparable handle around for
/// diagnostics and lets [`Index::level`] extract the level in O(1).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index(u64);

impl Index {
    /// Build an index from a level and a precedence sub-key.
    ///
    /// # Panics
    /// Panics if `precedence` does not fit in [`PRECEDENCE_BITS`] bits.
    pub fn new(level: Level, precedence: u64) -> Self {
        assert!(
            precedence <= PRECEDENCE_MASK,
            "precedence {precedence} exceeds {PRECEDENCE_BITS}-bit range"
        );
        Self(((level.0 as u64) << PRECEDENCE_BITS) | precedence)
    }

    /// The `LEVEL(index)` projection: extract the level encoded in the high
    /// bits.
    pub fn level(&self) -> Level {
        Level((self.0 >> PRECEDENCE_BITS) as usize)
    }

    pub fn precedence(&self) -> u64 {
        self.0 & PRECEDENCE_MASK
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Index({}, p={})", self.level(), self.precedence())
    }
}
