// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Error, Result};

/// Controls whether and how a [`StreamBuffer`][crate::StreamBuffer] grows its storage.
///
/// * `block_size` is the step by which capacity grows when a write does not fit. Zero means
///   the buffer is fixed-size: its capacity never changes and a write that does not fit fails.
/// * `max_size` is a hard ceiling on capacity. Zero means no ceiling.
///
/// The default policy is fixed-size with no ceiling.
///
/// # Example
///
/// ```
/// use streambuf::GrowthPolicy;
///
/// let policy = GrowthPolicy::growable(1024).with_max_size(64 * 1024);
///
/// assert_eq!(policy.block_size(), 1024);
/// assert_eq!(policy.max_size(), 64 * 1024);
/// assert!(!policy.is_fixed());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrowthPolicy {
    block_size: usize,
    max_size: usize,
}

impl GrowthPolicy {
    /// A policy for a buffer whose capacity never changes.
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            block_size: 0,
            max_size: 0,
        }
    }

    /// A policy for a buffer that grows in steps of `block_size` bytes, without a ceiling.
    ///
    /// A `block_size` of zero is the same as [`fixed()`][Self::fixed].
    #[must_use]
    pub const fn growable(block_size: usize) -> Self {
        Self { block_size, max_size: 0 }
    }

    /// Limits the capacity of the buffer to `max_size` bytes. Zero removes the limit.
    #[must_use]
    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// The step by which capacity grows. Zero for a fixed-size buffer.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// The capacity ceiling. Zero if there is none.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether a buffer under this policy keeps its initial capacity forever.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.block_size == 0
    }

    /// Whether `capacity` is permitted by the ceiling of this policy.
    #[must_use]
    pub const fn admits(&self, capacity: usize) -> bool {
        self.max_size == 0 || capacity <= self.max_size
    }

    /// Calculates the capacity a buffer with `capacity` bytes must grow to in order to hold
    /// `needed` bytes.
    ///
    /// Capacity grows by the smallest whole number of `block_size` steps that covers `needed`,
    /// capped at `max_size` if one is set. Returns `capacity` unchanged if it already suffices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferFull`] if the policy is fixed-size and `needed` exceeds
    /// `capacity`, or if even `max_size` cannot hold `needed` bytes.
    pub fn grow_target(&self, capacity: usize, needed: usize) -> Result<usize> {
        if needed <= capacity {
            return Ok(capacity);
        }

        if self.is_fixed() {
            return Err(Error::BufferFull {
                requested: needed,
                max: capacity,
            });
        }

        let steps = (needed - capacity).div_ceil(self.block_size);
        let mut target = capacity.saturating_add(steps.saturating_mul(self.block_size));

        if self.max_size != 0 && target > self.max_size {
            target = self.max_size;
        }

        if target < needed {
            return Err(Error::BufferFull {
                requested: needed,
                max: self.max_size,
            });
        }

        Ok(target)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed() {
        let policy = GrowthPolicy::default();

        assert_eq!(policy, GrowthPolicy::fixed());
        assert!(policy.is_fixed());
        assert_eq!(policy.max_size(), 0);
    }

    #[test]
    fn no_growth_when_capacity_suffices() {
        let policy = GrowthPolicy::growable(4);

        assert_eq!(policy.grow_target(8, 8).unwrap(), 8);
        assert_eq!(policy.grow_target(8, 3).unwrap(), 8);
        assert_eq!(GrowthPolicy::fixed().grow_target(8, 8).unwrap(), 8);
    }

    #[test]
    fn grows_by_whole_blocks() {
        let policy = GrowthPolicy::growable(4);

        assert_eq!(policy.grow_target(0, 1).unwrap(), 4);
        assert_eq!(policy.grow_target(0, 4).unwrap(), 4);
        assert_eq!(policy.grow_target(4, 6).unwrap(), 8);
        assert_eq!(policy.grow_target(4, 13).unwrap(), 16);

        // Growth is measured from the current capacity, which need not be a block multiple.
        assert_eq!(policy.grow_target(10, 11).unwrap(), 14);
    }

    #[test]
    fn fixed_rejects_growth() {
        let result = GrowthPolicy::fixed().grow_target(10, 11);

        assert_eq!(result, Err(Error::BufferFull { requested: 11, max: 10 }));
    }

    #[test]
    fn growth_is_capped_at_max_size() {
        let policy = GrowthPolicy::growable(4).with_max_size(10);

        assert_eq!(policy.grow_target(8, 9).unwrap(), 10);
        assert_eq!(policy.grow_target(8, 10).unwrap(), 10);
    }

    #[test]
    fn growth_beyond_max_size_fails() {
        let policy = GrowthPolicy::growable(4).with_max_size(10);

        assert_eq!(
            policy.grow_target(8, 11),
            Err(Error::BufferFull { requested: 11, max: 10 })
        );
    }

    #[test]
    fn huge_block_size_saturates() {
        let policy = GrowthPolicy::growable(usize::MAX);

        assert_eq!(policy.grow_target(1, 2).unwrap(), usize::MAX);
    }

    #[test]
    fn admits_respects_ceiling() {
        assert!(GrowthPolicy::fixed().admits(usize::MAX));
        assert!(GrowthPolicy::growable(1).with_max_size(10).admits(10));
        assert!(!GrowthPolicy::growable(1).with_max_size(10).admits(11));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_from_configuration() {
        let policy: GrowthPolicy = serde_json::from_str(r#"{ "block_size": 4096, "max_size": 1048576 }"#).unwrap();
        assert_eq!(policy, GrowthPolicy::growable(4096).with_max_size(1_048_576));

        // Missing fields fall back to the fixed-size defaults.
        let policy: GrowthPolicy = serde_json::from_str(r#"{ "block_size": 64 }"#).unwrap();
        assert_eq!(policy, GrowthPolicy::growable(64));

        let json = serde_json::to_string(&GrowthPolicy::fixed()).unwrap();
        assert_eq!(json, r#"{"block_size":0,"max_size":0}"#);
    }
}
