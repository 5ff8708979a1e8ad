use bitflags::bitflags;
use tracing::trace;

use crate::error::{Result, SequenceError, structural};
use crate::traits::Sequence;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Characteristics: u32 {
        /// Elements are visited in index order.
        const ORDERED = 0x0010;
        /// `estimate_size` is exact.
        const SIZED = 0x0040;
        /// Every split is `SIZED` as well.
        const SUBSIZED = 0x4000;
    }
}

/// Late-binding, splittable traversal over `[position, fence)` of a sequence.
///
/// Nothing is captured at construction. The fence (`len()`) and the counter snapshot
/// are taken on the first `try_advance`, `for_each_remaining`, `try_split` or
/// `estimate_size`, so the spliter can be created before the sequence is fully built.
///
/// `try_split` hands out the lower half and keeps the upper one; consuming splits in the
/// order they were produced, followed by the remainder, visits elements in index order.
pub struct Spliter<'a, S: Sequence> {
    seq: &'a S,
    position: usize,
    fence: Option<usize>,
    expected: u64,
}

impl<'a, S: Sequence> Spliter<'a, S> {
    pub(crate) fn new(seq: &'a S) -> Self {
        Self {
            seq,
            position: 0,
            fence: None,
            expected: 0,
        }
    }

    fn fence(&mut self) -> usize {
        match self.fence {
            Some(fence) => fence,
            None => {
                self.expected = self.seq.mod_count();
                let fence = self.seq.len();
                self.fence = Some(fence);
                fence
            }
        }
    }

    pub fn is_bound(&self) -> bool {
        self.fence.is_some()
    }

    pub fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED | Characteristics::SIZED | Characteristics::SUBSIZED
    }

    pub fn estimate_size(&mut self) -> usize {
        self.fence().saturating_sub(self.position)
    }

    /// Splits off `[position, mid)`; `None` once fewer than two elements remain.
    pub fn try_split(&mut self) -> Option<Self> {
        let hi = self.fence();
        let lo = self.position;
        let mid = (lo + hi) >> 1;
        if lo >= mid {
            return None;
        }
        self.position = mid;
        Some(Self {
            seq: self.seq,
            position: lo,
            fence: Some(mid),
            expected: self.expected,
        })
    }

    /// Feeds the next element to `action`; `Ok(false)` when exhausted.
    pub fn try_advance<F>(&mut self, action: F) -> Result<bool>
    where
        F: FnOnce(S::Item),
    {
        let hi = self.fence();
        let index = self.position;
        if index >= hi {
            return Ok(false);
        }
        self.position = index + 1;
        action(self.get(index)?);
        self.check_for_comodification()?;
        Ok(true)
    }

    /// Feeds every remaining element to `action`, checking the counter once at the end.
    pub fn for_each_remaining<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(S::Item),
    {
        let hi = self.fence();
        let lo = self.position;
        self.position = hi;
        for index in lo..hi {
            action(self.get(index)?);
        }
        self.check_for_comodification()
    }

    pub fn try_for_each_remaining<E, F>(&mut self, mut action: F) -> std::result::Result<(), E>
    where
        E: From<SequenceError>,
        F: FnMut(S::Item) -> std::result::Result<(), E>,
    {
        let hi = self.fence();
        let lo = self.position;
        self.position = hi;
        for index in lo..hi {
            action(self.get(index)?)?;
        }
        self.check_for_comodification()?;
        Ok(())
    }

    fn get(&self, index: usize) -> Result<S::Item> {
        self.seq.get(index).map_err(structural)
    }

    fn check_for_comodification(&self) -> Result<()> {
        let live = self.seq.mod_count();
        if live != self.expected {
            trace!(expected = self.expected, live, "spliter observed a structural modification");
            return Err(SequenceError::ConcurrentModification);
        }
        Ok(())
    }
}
