use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Key of one person record. Positive integer, unique within a model,
/// exactly as persisted in the JSON node data.
///
/// Wraps `NonZeroU32` so zero is rejected at the serde boundary and
/// `Option<PersonKey>` stays four bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonKey(NonZeroU32);

impl PersonKey {
    /// The smallest valid key; the key counter is seeded here.
    pub const MIN: PersonKey = PersonKey(NonZeroU32::MIN);

    /// Build a key from a raw integer; `None` for zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(PersonKey)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Next-larger key, used by linear probing. Saturates at `u32::MAX`.
    pub(crate) fn succ(self) -> Self {
        PersonKey(self.0.saturating_add(1))
    }
}

impl fmt::Debug for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonKey({})", self.0)
    }
}

impl fmt::Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
