use std::cell::RefCell;

use crate::error::{Result, check_index, check_position};
use crate::traits::Sequence;
use crate::view::View;

/// Backing whose counter never moves, so a length change is only visible as a failed
/// bounds check inside the primitive.
pub(crate) struct Uncounted {
    items: RefCell<Vec<i64>>,
}

impl Uncounted {
    pub(crate) fn new(items: Vec<i64>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    pub(crate) fn truncate(&self, len: usize) {
        self.items.borrow_mut().truncate(len);
    }
}

impl Sequence for Uncounted {
    type Item = i64;
    type Root = Self;

    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn mod_count(&self) -> u64 {
        0
    }

    fn get(&self, index: usize) -> Result<i64> {
        let items = self.items.borrow();
        check_index(index, items.len())?;
        Ok(items[index])
    }

    fn set(&self, index: usize, value: i64) -> Result<i64> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(std::mem::replace(&mut items[index], value))
    }

    fn insert(&self, index: usize, value: i64) -> Result<()> {
        let mut items = self.items.borrow_mut();
        check_position(index, items.len())?;
        items.insert(index, value);
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<i64> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(items.remove(index))
    }

    fn view(&self, from: usize, to: usize) -> Result<View<'_, Self>> {
        View::of_root(self, from, to)
    }
}
