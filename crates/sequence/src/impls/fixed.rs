use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, SequenceError, check_index, check_range};
use crate::traits::Sequence;
use crate::view::View;

/// Fixed-size sequence over a boxed slice.
///
/// Elements can be replaced in place; every length-changing call fails with
/// `UnsupportedMutation`, so the mutation counter stays at zero.
pub struct FixedSequence<T> {
    items: RefCell<Box<[T]>>,
}

impl<T> FixedSequence<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_inner().into_vec()
    }
}

impl<T: Clone> Sequence for FixedSequence<T> {
    type Item = T;
    type Root = Self;

    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn mod_count(&self) -> u64 {
        0
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

    fn insert(&self, _index: usize, _value: T) -> Result<()> {
        Err(SequenceError::UnsupportedMutation { operation: "insert" })
    }

    fn remove_at(&self, _index: usize) -> Result<T> {
        Err(SequenceError::UnsupportedMutation { operation: "remove_at" })
    }

    fn view(&self, from: usize, to: usize) -> Result<View<'_, Self>> {
        View::of_root(self, from, to)
    }

    fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.len())?;
        if from == to {
            return Ok(());
        }
        Err(SequenceError::UnsupportedMutation { operation: "remove_range" })
    }

    fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.items.borrow().to_vec())
    }
}

impl<T: Clone> Clone for FixedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            items: RefCell::new(self.items.borrow().clone()),
        }
    }
}

impl<T> From<Vec<T>> for FixedSequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items.into_boxed_slice()),
        }
    }
}

impl<T> FromIterator<T> for FixedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<T> Default for FixedSequence<T> {
    fn default() -> Self {
        Vec::new().into()
    }
}

impl<T: fmt::Debug> fmt::Debug for FixedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for FixedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.items.borrow() == *other.items.borrow()
    }
}

impl<T: Eq> Eq for FixedSequence<T> {}

impl<T: Hash> Hash for FixedSequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.borrow().hash(state);
    }
}
