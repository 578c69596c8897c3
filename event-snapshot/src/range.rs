use std::fmt::{self, Display};
use std::iter;
use std::num::NonZeroU64;

use error_stack::{ensure, Result};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    #[error("the number of blocks must be greater than zero")]
    ZeroBlocks,
}

/// Inclusive block range. A range whose lower bound lies above its upper bound
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    from: u64,
    to: u64,
}

impl BlockRange {
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    /// Resolves the requested bounds against the chain tip.
    ///
    /// Without explicit bounds the range covers the last `blocks` blocks up to
    /// `tip`. A missing upper bound defaults to `tip`, a missing lower bound to
    /// `blocks` blocks below the upper bound. Inverted bounds are swapped.
    pub fn resolve(
        from: Option<u64>,
        to: Option<u64>,
        blocks: u64,
        tip: u64,
    ) -> Result<Self, RangeError> {
        ensure!(blocks > 0, RangeError::ZeroBlocks);

        let to = to.unwrap_or(tip);
        let from = from.unwrap_or_else(|| to.saturating_sub(blocks.saturating_sub(1)));

        if from > to {
            warn!(from, to, "block range is inverted, swapping bounds");
            return Ok(Self::new(to, from));
        }

        Ok(Self::new(from, to))
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Caps the upper bound at the observed chain head. The lower bound is
    /// kept, so a range starting above the head becomes empty.
    pub fn clamp_to(self, head: u64) -> Self {
        Self::new(self.from, self.to.min(head))
    }

    /// Splits the range into consecutive sub-ranges of at most `span` blocks.
    pub fn chunks(self, span: NonZeroU64) -> impl Iterator<Item = BlockRange> {
        let last = self.to;
        let width = span.get().saturating_sub(1);
        let mut next = (!self.is_empty()).then_some(self.from);

        iter::from_fn(move || {
            let from = next?;
            let to = from.saturating_add(width).min(last);
            next = to.checked_add(1).filter(|n| *n <= last);

            Some(BlockRange::new(from, to))
        })
    }
}

impl Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn no_bounds_should_cover_the_last_blocks() {
        let range = BlockRange::resolve(None, None, 200, 1000).unwrap();

        assert_eq!(range, BlockRange::new(801, 1000));
    }

    #[test]
    fn lower_bound_should_saturate_at_genesis() {
        let range = BlockRange::resolve(None, None, 200, 50).unwrap();

        assert_eq!(range, BlockRange::new(0, 50));
    }

    #[test]
    fn single_block_window_should_cover_only_the_tip() {
        assert_eq!(
            BlockRange::resolve(None, None, 1, 1000).unwrap(),
            BlockRange::new(1000, 1000)
        );
    }

    #[test]
    fn missing_upper_bound_should_default_to_tip() {
        let range = BlockRange::resolve(Some(10), None, 200, 1000).unwrap();

        assert_eq!(range, BlockRange::new(10, 1000));
    }

    #[test]
    fn missing_lower_bound_should_count_back_from_upper_bound() {
        let range = BlockRange::resolve(None, Some(500), 100, 1000).unwrap();

        assert_eq!(range, BlockRange::new(401, 500));
    }

    #[test]
    fn explicit_bounds_should_ignore_blocks_and_tip() {
        let range = BlockRange::resolve(Some(5), Some(2000), 1, 1000).unwrap();

        assert_eq!(range, BlockRange::new(5, 2000));
    }

    #[test]
    fn inverted_bounds_should_be_swapped() {
        let range = BlockRange::resolve(Some(900), Some(100), 200, 1000).unwrap();

        assert_eq!(range, BlockRange::new(100, 900));
    }

    #[test]
    fn zero_blocks_should_be_rejected() {
        let result = BlockRange::resolve(None, None, 0, 1000);

        assert_eq!(result.unwrap_err().current_context(), &RangeError::ZeroBlocks);
    }

    #[test]
    fn clamp_should_cap_the_upper_bound() {
        assert_eq!(
            BlockRange::new(10, 2000).clamp_to(1000),
            BlockRange::new(10, 1000)
        );
        assert_eq!(
            BlockRange::new(10, 20).clamp_to(1000),
            BlockRange::new(10, 20)
        );
    }

    #[test]
    fn range_above_head_should_become_empty() {
        let range = BlockRange::new(1500, 2000).clamp_to(1000);

        assert!(range.is_empty());
        assert_eq!(range.from(), 1500);
        assert_eq!(range.to(), 1000);
        assert_eq!(range.chunks(span(10)).count(), 0);
    }

    #[test]
    fn chunks_should_cover_the_range_exactly() {
        let chunks: Vec<_> = BlockRange::new(0, 24).chunks(span(10)).collect();

        assert_eq!(
            chunks,
            vec![
                BlockRange::new(0, 9),
                BlockRange::new(10, 19),
                BlockRange::new(20, 24)
            ]
        );
    }

    #[test]
    fn chunks_of_a_small_range_should_be_the_range_itself() {
        let chunks: Vec<_> = BlockRange::new(7, 7).chunks(span(10_000)).collect();

        assert_eq!(chunks, vec![BlockRange::new(7, 7)]);
    }

    #[test]
    fn chunks_should_stop_at_the_largest_block_number() {
        let chunks: Vec<_> = BlockRange::new(u64::MAX - 2, u64::MAX)
            .chunks(span(2))
            .collect();

        assert_eq!(
            chunks,
            vec![
                BlockRange::new(u64::MAX - 2, u64::MAX - 1),
                BlockRange::new(u64::MAX, u64::MAX)
            ]
        );
    }

    #[test]
    fn display_should_show_inclusive_bounds() {
        assert_eq!(BlockRange::new(3, 9).to_string(), "[3, 9]");
    }
}
