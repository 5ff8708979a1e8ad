use std::cmp::Ordering;

use crate::cursor::{Cursor, Iter};
use crate::error::{Result, check_position, check_range};
use crate::sort;
use crate::spliter::Spliter;
use crate::view::View;

/// Random-access ordered sequence.
///
/// Implementors provide four primitives (`get`, `set`, `insert`, `remove_at`) plus `len`
/// and the mutation counter; everything else is derived from them.
///
/// - All methods take `&self`. Backings keep their storage behind interior mutability so
///   cursors and views can alias one store; the borrow checker keeps them from outliving it.
/// - `mod_count` is the counter of the root store. It moves exactly once per structural
///   (length-changing) primitive and never on `set`.
/// - Items are handed out by value, hence `Item: Clone`.
pub trait Sequence: Sized {
    type Item: Clone;
    /// The store at the base of any view taken from this sequence.
    type Root: Sequence<Item = Self::Item>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mod_count(&self) -> u64;

    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Replaces the element at `index`, returning the old one.
    fn set(&self, index: usize, value: Self::Item) -> Result<Self::Item>;

    /// Inserts at `index`, `0 <= index <= len`.
    fn insert(&self, index: usize, value: Self::Item) -> Result<()>;

    fn remove_at(&self, index: usize) -> Result<Self::Item>;

    /// Window `[from, to)` over this sequence, addressed in root coordinates.
    fn view(&self, from: usize, to: usize) -> Result<View<'_, Self::Root>>;

    fn push(&self, value: Self::Item) -> Result<()> {
        self.insert(self.len(), value)
    }

    fn cursor(&self) -> Cursor<'_, Self> {
        Cursor::new(self, 0)
    }

    fn cursor_at(&self, index: usize) -> Result<Cursor<'_, Self>> {
        check_position(index, self.len())?;
        Ok(Cursor::new(self, index))
    }

    fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self.cursor())
    }

    fn spliter(&self) -> Spliter<'_, Self> {
        Spliter::new(self)
    }

    fn index_of(&self, value: &Self::Item) -> Result<Option<usize>>
    where
        Self::Item: PartialEq,
    {
        let mut cursor = self.cursor();
        while cursor.has_next() {
            if cursor.next()? == *value {
                return Ok(cursor.previous_index());
            }
        }
        Ok(None)
    }

    fn last_index_of(&self, value: &Self::Item) -> Result<Option<usize>>
    where
        Self::Item: PartialEq,
    {
        let mut cursor = self.cursor_at(self.len())?;
        while cursor.has_previous() {
            if cursor.previous()? == *value {
                return Ok(Some(cursor.next_index()));
            }
        }
        Ok(None)
    }

    fn contains(&self, value: &Self::Item) -> Result<bool>
    where
        Self::Item: PartialEq,
    {
        Ok(self.index_of(value)?.is_some())
    }

    /// Removes `[from, to)`.
    ///
    /// The default walks a cursor and removes one element at a time; contiguous
    /// backings override it.
    fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.len())?;
        let mut cursor = self.cursor_at(from)?;
        for _ in from..to {
            cursor.next()?;
            cursor.remove()?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.remove_range(0, self.len())
    }

    /// Inserts `values` starting at `index`, keeping their iteration order.
    ///
    /// Returns whether anything was inserted.
    fn add_all<I>(&self, index: usize, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = Self::Item>,
    {
        check_position(index, self.len())?;
        let mut index = index;
        let mut modified = false;
        for value in values {
            self.insert(index, value)?;
            index += 1;
            modified = true;
        }
        Ok(modified)
    }

    /// Replaces every element with `f(element)`, in ascending index order.
    fn replace_all<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(Self::Item) -> Self::Item,
    {
        let mut cursor = self.cursor();
        while cursor.has_next() {
            let value = cursor.next()?;
            cursor.set(f(value))?;
        }
        Ok(())
    }

    fn sort(&self) -> Result<()>
    where
        Self::Item: Ord,
    {
        self.sort_by(Ord::cmp)
    }

    fn sort_by_key<K, F>(&self, mut f: F) -> Result<()>
    where
        K: Ord,
        F: FnMut(&Self::Item) -> K,
    {
        self.sort_by(|a, b| f(a).cmp(&f(b)))
    }

    /// Stable sort: copies out, sorts the buffer, writes back through a cursor.
    fn sort_by<F>(&self, mut compare: F) -> Result<()>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        let mut buffer = self.to_vec()?;
        sort::merge_sort_by(&mut buffer, &mut compare);

        let mut cursor = self.cursor();
        for value in buffer {
            cursor.next()?;
            cursor.set(value)?;
        }
        Ok(())
    }

    fn to_vec(&self) -> Result<Vec<Self::Item>> {
        self.iter().collect()
    }

    /// Structural equality: same length and pairwise-equal elements in order.
    fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: Sequence<Item = Self::Item>,
        Self::Item: PartialEq,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        let mut left = self.cursor();
        let mut right = other.cursor();
        while left.has_next() && right.has_next() {
            if left.next()? != right.next()? {
                return Ok(false);
            }
        }
        Ok(!(left.has_next() || right.has_next()))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SequenceError;
    use crate::impls::{ArraySequence, FixedSequence, LinkedSequence};

    use super::Sequence;

    #[test]
    fn stable_sort_keeps_relative_order() {
        let array: ArraySequence<(i32, &str)> = vec![(1, "a"), (1, "b"), (0, "c")].into();
        array.sort_by_key(|&(key, _)| key).unwrap();
        assert_eq!(array.to_vec().unwrap(), vec![(0, "c"), (1, "a"), (1, "b")]);

        let linked: LinkedSequence<(i32, &str)> = vec![(1, "a"), (1, "b"), (0, "c")].into();
        linked.sort_by(|a, b| a.0.cmp(&b.0)).unwrap();
        assert_eq!(linked.to_vec().unwrap(), vec![(0, "c"), (1, "a"), (1, "b")]);
    }

    #[test]
    fn sort_writes_back_without_structural_change() {
        let seq: ArraySequence<i64> = vec![5, 3, 9, 1].into();
        let before = seq.mod_count();
        seq.sort().unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![1, 3, 5, 9]);
        assert_eq!(seq.mod_count(), before);
    }

    #[test]
    fn sort_through_view_only_touches_window() {
        let seq: ArraySequence<i64> = vec![9, 4, 3, 2, 0].into();
        let view = seq.view(1, 4).unwrap();
        view.sort().unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![9, 2, 3, 4, 0]);
    }

    #[test]
    fn fixed_sequence_sorts_in_place() {
        let seq: FixedSequence<i64> = vec![3, 1, 2].into();
        seq.sort().unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn index_of_and_last_index_of() {
        let seq: LinkedSequence<i64> = vec![1, 2, 3, 2, 1].into();
        assert_eq!(seq.index_of(&2), Ok(Some(1)));
        assert_eq!(seq.last_index_of(&2), Ok(Some(3)));
        assert_eq!(seq.index_of(&7), Ok(None));
        assert_eq!(seq.last_index_of(&7), Ok(None));
        assert_eq!(seq.contains(&3), Ok(true));

        let view = seq.view(2, 5).unwrap();
        assert_eq!(view.index_of(&1), Ok(Some(2)));
        assert_eq!(view.last_index_of(&2), Ok(Some(1)));
    }

    #[test]
    fn replace_all_visits_in_order() {
        let seq: ArraySequence<i64> = vec![1, 2, 3].into();
        let mut seen = Vec::new();
        seq.replace_all(|x| {
            seen.push(x);
            x * 10
        })
        .unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(seq.to_vec().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn add_all_preserves_order_and_checks_index() {
        let seq: LinkedSequence<i64> = vec![1, 5].into();
        assert_eq!(seq.add_all(1, [2, 3, 4]), Ok(true));
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(seq.add_all(2, []), Ok(false));
        assert_eq!(
            seq.add_all(9, [0]),
            Err(SequenceError::IndexOutOfBounds { index: 9, len: 5 })
        );
    }

    #[test]
    fn remove_range_and_clear() {
        let seq: LinkedSequence<i64> = (0..8).collect();
        seq.remove_range(2, 5).unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![0, 1, 5, 6, 7]);
        assert_eq!(
            seq.remove_range(3, 2),
            Err(SequenceError::InvalidRange { from: 3, to: 2 })
        );
        seq.clear().unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn content_eq_across_backings() {
        let array: ArraySequence<i64> = (0..6).collect();
        let linked: LinkedSequence<i64> = (0..6).collect();
        assert_eq!(array.content_eq(&linked), Ok(true));

        linked.set(3, 42).unwrap();
        assert_eq!(array.content_eq(&linked), Ok(false));

        let window = array.view(1, 3).unwrap();
        let other: FixedSequence<i64> = vec![1, 2].into();
        assert_eq!(window.content_eq(&other), Ok(true));
    }

    #[test]
    fn iter_stops_at_first_error() {
        let seq: ArraySequence<i64> = (0..4).collect();
        let mut iter = seq.iter();
        assert_eq!(iter.next(), Some(Ok(0)));
        seq.push(4).unwrap();
        assert_eq!(iter.next(), Some(Err(SequenceError::ConcurrentModification)));
        assert_eq!(iter.next(), None);
    }
}
