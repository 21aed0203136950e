use core::fmt;
use core::num::NonZeroU32;

/// Position of a turbine in its map's input order.
///
/// Stored off by one in a `NonZeroU32` so `Option<TurbineId>` stays the
/// size of the id itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurbineId(NonZeroU32);

impl TurbineId {
    /// # Panics
    /// If `index` does not fit in a `u32`.
    pub fn from_usize(index: usize) -> Self {
        let stored = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .expect("turbine index fits in u32");
        Self(stored)
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TurbineId({})", self.index())
    }
}

impl fmt::Display for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.index())
    }
}
