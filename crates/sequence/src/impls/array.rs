use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::error::{Result, check_index, check_position, check_range};
use crate::traits::Sequence;
use crate::view::View;

/// Contiguous `Vec`-backed sequence.
///
/// Bulk edits (`remove_range`, `add_all`, and `clear` through them) are a single drain or
/// splice and move the mutation counter once.
pub struct ArraySequence<T> {
    items: RefCell<Vec<T>>,
    mod_count: Cell<u64>,
}

impl<T> ArraySequence<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            mod_count: Cell::new(0),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_inner()
    }

    fn bump(&self) {
        self.mod_count.set(self.mod_count.get().wrapping_add(1));
    }
}

impl<T: Clone> Sequence for ArraySequence<T> {
    type Item = T;
    type Root = Self;

    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn mod_count(&self) -> u64 {
        self.mod_count.get()
    }

    fn get(&self, index: usize) -> Result<T> {
        let items = self.items.borrow();
        check_index(index, items.len())?;
        Ok(items[index].clone())
    }

    fn set(&self, index: usize, value: T) -> Result<T> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(std::mem::replace(&mut items[index], value))
    }

    fn insert(&self, index: usize, value: T) -> Result<()> {
        {
            let mut items = self.items.borrow_mut();
            check_position(index, items.len())?;
            items.insert(index, value);
        }
        self.bump();
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        let value = {
            let mut items = self.items.borrow_mut();
            check_index(index, items.len())?;
            items.remove(index)
        };
        self.bump();
        Ok(value)
    }

    fn view(&self, from: usize, to: usize) -> Result<View<'_, Self>> {
        View::of_root(self, from, to)
    }

    fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        let removed: Vec<T> = {
            let mut items = self.items.borrow_mut();
            check_range(from, to, items.len())?;
            items.drain(from..to).collect()
        };
        trace!(from, to, "drained range");
        self.bump();
        // Elements drop after the borrow is released.
        drop(removed);
        Ok(())
    }

    fn add_all<I>(&self, index: usize, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        check_position(index, self.len())?;
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Ok(false);
        }
        {
            let mut items = self.items.borrow_mut();
            check_position(index, items.len())?;
            trace!(index, count = values.len(), "splicing values");
            items.splice(index..index, values);
        }
        self.bump();
        Ok(true)
    }

    fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.items.borrow().clone())
    }
}

impl<T> Default for ArraySequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArraySequence<T> {
    /// Copies the contents into an independent store with a fresh counter.
    fn clone(&self) -> Self {
        Self::from_vec(self.items.borrow().clone())
    }
}

impl<T> From<Vec<T>> for ArraySequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for ArraySequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for ArraySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArraySequence<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.items.borrow() == *other.items.borrow()
    }
}

impl<T: Eq> Eq for ArraySequence<T> {}

impl<T: Hash> Hash for ArraySequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.borrow().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::ArraySequence;
    use crate::error::SequenceError;
    use crate::traits::Sequence;

    #[test]
    fn primitives_and_bounds() {
        let seq = ArraySequence::with_capacity(4);
        assert_eq!(seq.insert(1, 5), Err(SequenceError::IndexOutOfBounds { index: 1, len: 0 }));
        seq.insert(0, 5).unwrap();
        seq.insert(0, 4).unwrap();
        seq.push(6).unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![4, 5, 6]);
        assert_eq!(seq.get(3), Err(SequenceError::IndexOutOfBounds { index: 3, len: 3 }));
        assert_eq!(seq.set(1, 50), Ok(5));
        assert_eq!(seq.remove_at(0), Ok(4));
        assert_eq!(seq.remove_at(2), Err(SequenceError::IndexOutOfBounds { index: 2, len: 2 }));
        assert_eq!(seq.into_vec(), vec![50, 6]);
    }

    #[test]
    fn counter_moves_once_per_structural_call() {
        let seq: ArraySequence<i64> = (0..10).collect();
        assert_eq!(seq.mod_count(), 0);
        seq.set(0, 1).unwrap();
        assert_eq!(seq.mod_count(), 0);
        seq.insert(0, 1).unwrap();
        seq.remove_at(0).unwrap();
        assert_eq!(seq.mod_count(), 2);
        seq.remove_range(2, 6).unwrap();
        assert_eq!(seq.mod_count(), 3);
        seq.add_all(1, [7, 7, 7]).unwrap();
        assert_eq!(seq.mod_count(), 4);
        seq.clear().unwrap();
        assert_eq!(seq.mod_count(), 5);
        assert!(seq.is_empty());

        // Failed calls leave the counter alone.
        assert!(seq.remove_at(0).is_err());
        assert!(seq.remove_range(0, 1).is_err());
        assert_eq!(seq.mod_count(), 5);
    }

    #[test]
    fn clone_is_independent() {
        let seq: ArraySequence<i64> = vec![1, 2, 3].into();
        let copy = seq.clone();
        copy.push(4).unwrap();
        assert_eq!(seq.len(), 3);
        assert_ne!(seq, copy);
        assert_eq!(format!("{seq:?}"), "[1, 2, 3]");
    }
}
