use std::iter::FusedIterator;

use tracing::trace;

use crate::error::{Result, SequenceError, structural};
use crate::traits::Sequence;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Forward,
    Backward,
    Mutated,
}

/// Fail-fast bidirectional cursor.
///
/// The cursor sits between elements: `next_index()` is the element `next()` returns.
/// `remove` and `set` act on the element last returned by `next`/`previous`; they are
/// rejected with `IllegalState` before any move and right after `remove` or `add`.
///
/// Every move compares a snapshot of the root's mutation counter with its live value.
/// Mutations made through the cursor refresh the snapshot; any other structural change
/// surfaces as `ConcurrentModification`.
pub struct Cursor<'a, S: Sequence> {
    seq: &'a S,
    position: usize,
    expected: u64,
    state: State,
}

#[allow(clippy::should_implement_trait)]
impl<'a, S: Sequence> Cursor<'a, S> {
    pub(crate) fn new(seq: &'a S, position: usize) -> Self {
        Self {
            seq,
            position,
            expected: seq.mod_count(),
            state: State::Fresh,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position != self.seq.len()
    }

    pub fn has_previous(&self) -> bool {
        self.position != 0
    }

    pub fn next_index(&self) -> usize {
        self.position
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    pub fn next(&mut self) -> Result<S::Item> {
        self.check_for_comodification()?;
        let index = self.position;
        if index == self.seq.len() {
            return Err(SequenceError::NoSuchElement);
        }
        let value = self.seq.get(index).map_err(structural)?;
        self.position = index + 1;
        self.state = State::Forward;
        Ok(value)
    }

    pub fn previous(&mut self) -> Result<S::Item> {
        self.check_for_comodification()?;
        let Some(index) = self.position.checked_sub(1) else {
            return Err(SequenceError::NoSuchElement);
        };
        let value = self.seq.get(index).map_err(structural)?;
        self.position = index;
        self.state = State::Backward;
        Ok(value)
    }

    /// Removes the element last returned by `next` or `previous`.
    pub fn remove(&mut self) -> Result<S::Item> {
        let index = self.last_returned()?;
        self.check_for_comodification()?;
        let value = self.seq.remove_at(index).map_err(structural)?;
        self.position = index;
        self.expected = self.seq.mod_count();
        self.state = State::Mutated;
        Ok(value)
    }

    /// Replaces the element last returned by `next` or `previous`.
    ///
    /// Does not consume the last-returned element: `set` may be repeated, or followed
    /// by `remove`.
    pub fn set(&mut self, value: S::Item) -> Result<S::Item> {
        let index = self.last_returned()?;
        self.check_for_comodification()?;
        let old = self.seq.set(index, value).map_err(structural)?;
        self.expected = self.seq.mod_count();
        Ok(old)
    }

    /// Inserts before the element `next` would return; a following `next` is unaffected.
    pub fn add(&mut self, value: S::Item) -> Result<()> {
        self.check_for_comodification()?;
        self.seq.insert(self.position, value).map_err(structural)?;
        self.position += 1;
        self.expected = self.seq.mod_count();
        self.state = State::Mutated;
        Ok(())
    }

    pub fn for_each_remaining<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(S::Item),
    {
        while self.has_next() {
            action(self.next()?);
        }
        Ok(())
    }

    pub fn try_for_each_remaining<E, F>(&mut self, mut action: F) -> std::result::Result<(), E>
    where
        E: From<SequenceError>,
        F: FnMut(S::Item) -> std::result::Result<(), E>,
    {
        while self.has_next() {
            action(self.next()?)?;
        }
        Ok(())
    }

    fn last_returned(&self) -> Result<usize> {
        match self.state {
            State::Forward => Ok(self.position - 1),
            State::Backward => Ok(self.position),
            State::Fresh | State::Mutated => Err(SequenceError::IllegalState),
        }
    }

    fn check_for_comodification(&self) -> Result<()> {
        let live = self.seq.mod_count();
        if live != self.expected {
            trace!(expected = self.expected, live, "cursor observed a structural modification");
            return Err(SequenceError::ConcurrentModification);
        }
        Ok(())
    }
}

/// `Iterator` over a [`Cursor`], yielding each element as a `Result`.
///
/// Fuses after the first error.
pub struct Iter<'a, S: Sequence> {
    cursor: Cursor<'a, S>,
    failed: bool,
}

impl<'a, S: Sequence> Iter<'a, S> {
    pub(crate) fn new(cursor: Cursor<'a, S>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }
}

impl<S: Sequence> Iterator for Iter<'_, S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.cursor.has_next() {
            return None;
        }
        let item = self.cursor.next();
        self.failed = item.is_err();
        Some(item)
    }
}

impl<S: Sequence> FusedIterator for Iter<'_, S> {}
