//! Identity types for EmoSense

use std::fmt;

/// Tick identity - sequence number of one perception cycle
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickId(pub u64);

impl TickId {
    pub const ZERO: TickId = TickId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        TickId(id)
    }

    #[inline]
    pub fn next(self) -> Self {
        TickId(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
