use std::cell::Cell;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{Result, SequenceError, check_index, check_position, check_range};
use crate::traits::Sequence;

/// Contiguous window over a root sequence.
///
/// Views form a tree: every view keeps the root it delegates to and the view it was
/// taken from, if any. `offset` is always in root coordinates, so a view of a view
/// composes offsets instead of stacking translations.
///
/// A length-changing edit made through a view resizes the view and every ancestor view
/// and refreshes their counter snapshots. Any other structural change to the root,
/// including one made through a sibling view, is reported as `ConcurrentModification`
/// on the view's next use.
pub struct View<'a, R: Sequence> {
    root: &'a R,
    parent: Option<&'a View<'a, R>>,
    offset: usize,
    len: Cell<usize>,
    expected: Cell<u64>,
}

impl<'a, R: Sequence> View<'a, R> {
    pub(crate) fn of_root(root: &'a R, from: usize, to: usize) -> Result<Self> {
        check_range(from, to, root.len())?;
        Ok(Self::new(root, None, from, to - from))
    }

    fn new(root: &'a R, parent: Option<&'a View<'a, R>>, offset: usize, len: usize) -> Self {
        trace!(offset, len, nested = parent.is_some(), "view created");
        Self {
            root,
            parent,
            offset,
            len: Cell::new(len),
            expected: Cell::new(root.mod_count()),
        }
    }

    pub fn root(&self) -> &'a R {
        self.root
    }

    pub fn parent(&self) -> Option<&'a View<'a, R>> {
        self.parent
    }

    /// Root index of this view's index 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the root has seen no structural change this view did not make itself.
    pub fn is_valid(&self) -> bool {
        self.root.mod_count() == self.expected.get()
    }

    fn check_for_comodification(&self) -> Result<()> {
        let live = self.root.mod_count();
        let expected = self.expected.get();
        if live != expected {
            debug!(offset = self.offset, expected, live, "stale view");
            return Err(SequenceError::ConcurrentModification);
        }
        Ok(())
    }

    /// Applies `delta` to this view and each ancestor, re-snapshotting the counter.
    fn update_size_and_mod_count(&self, delta: isize) {
        let live = self.root.mod_count();
        trace!(offset = self.offset, delta, live, "propagating size change");
        let mut current = Some(self);
        while let Some(view) = current {
            view.len.set(view.len.get().wrapping_add_signed(delta));
            view.expected.set(live);
            current = view.parent;
        }
    }
}

impl<'a, R: Sequence> Sequence for View<'a, R> {
    type Item = R::Item;
    type Root = R;

    fn len(&self) -> usize {
        self.len.get()
    }

    fn mod_count(&self) -> u64 {
        self.root.mod_count()
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        self.check_for_comodification()?;
        check_index(index, self.len.get())?;
        self.root.get(self.offset + index)
    }

    fn set(&self, index: usize, value: Self::Item) -> Result<Self::Item> {
        self.check_for_comodification()?;
        check_index(index, self.len.get())?;
        self.root.set(self.offset + index, value)
    }

    fn insert(&self, index: usize, value: Self::Item) -> Result<()> {
        self.check_for_comodification()?;
        check_position(index, self.len.get())?;
        self.root.insert(self.offset + index, value)?;
        self.update_size_and_mod_count(1);
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<Self::Item> {
        self.check_for_comodification()?;
        check_index(index, self.len.get())?;
        let value = self.root.remove_at(self.offset + index)?;
        self.update_size_and_mod_count(-1);
        Ok(value)
    }

    fn view(&self, from: usize, to: usize) -> Result<View<'_, R>> {
        self.check_for_comodification()?;
        check_range(from, to, self.len.get())?;
        Ok(View::new(self.root, Some(self), self.offset + from, to - from))
    }

    fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        self.check_for_comodification()?;
        check_range(from, to, self.len.get())?;
        if from == to {
            return Ok(());
        }
        self.root.remove_range(self.offset + from, self.offset + to)?;
        self.update_size_and_mod_count(-((to - from) as isize));
        Ok(())
    }

    fn add_all<I>(&self, index: usize, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = Self::Item>,
    {
        self.check_for_comodification()?;
        check_position(index, self.len.get())?;
        let values: Vec<_> = values.into_iter().collect();
        let count = values.len();
        if count == 0 {
            return Ok(false);
        }
        self.root.add_all(self.offset + index, values)?;
        self.update_size_and_mod_count(count as isize);
        Ok(true)
    }
}

impl<R: Sequence> fmt::Debug for View<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("offset", &self.offset)
            .field("len", &self.len.get())
            .field("nested", &self.parent.is_some())
            .field("valid", &self.is_valid())
            .finish()
    }
}
