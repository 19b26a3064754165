//! Stack growth for documents nested deeper than the thread stack allows.

use serde::{Deserialize, Deserializer};

/// Grow before less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;
/// Size of each freshly allocated stack segment.
const SEGMENT: usize = 2 * 1024 * 1024;

pub(crate) fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

/// `deserialize_with` target for fields that nest the model inside itself.
pub(crate) fn nested<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    grow(|| T::deserialize(deserializer))
}
