use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::TUNED_PARAMS;
use crate::error::{Result, check_index, check_position};
use crate::traits::Sequence;
use crate::view::View;

const NONE: usize = usize::MAX;

struct Node<T> {
    value: T,
    prev: usize,
    next: usize,
}

/// Doubly linked list whose nodes live in a dense arena.
///
/// Removal swaps the last arena slot into the hole and relinks it, so the arena never
/// holds dead slots and `nodes.len()` is the list length.
struct Links<T> {
    nodes: Vec<Node<T>>,
    head: usize,
    tail: usize,
}

impl<T> Links<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NONE,
            tail: NONE,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Arena slot of the node at list position `index < len`, walking from the nearer end.
    fn node_at(&self, index: usize) -> usize {
        let len = self.len();
        debug_assert!(index < len);
        if index < len / 2 {
            let mut id = self.head;
            for _ in 0..index {
                id = self.nodes[id].next;
            }
            id
        } else {
            let mut id = self.tail;
            for _ in 0..(len - 1 - index) {
                id = self.nodes[id].prev;
            }
            id
        }
    }

    fn insert(&mut self, index: usize, value: T) {
        let id = self.len();
        let (prev, next) = if index == id {
            (self.tail, NONE)
        } else {
            let next = self.node_at(index);
            (self.nodes[next].prev, next)
        };
        self.nodes.push(Node { value, prev, next });
        self.relink(id, prev, next);
    }

    fn remove(&mut self, index: usize) -> T {
        let id = self.node_at(index);
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        if prev == NONE {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NONE {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        let node = self.nodes.swap_remove(id);
        if id < self.nodes.len() {
            let (moved_prev, moved_next) = (self.nodes[id].prev, self.nodes[id].next);
            self.relink(id, moved_prev, moved_next);
        }
        node.value
    }

    /// Points the neighbours of slot `id` (or head/tail) at `id`.
    fn relink(&mut self, id: usize, prev: usize, next: usize) {
        if prev == NONE {
            self.head = id;
        } else {
            self.nodes[prev].next = id;
        }
        if next == NONE {
            self.tail = id;
        } else {
            self.nodes[next].prev = id;
        }
    }

    fn values(&self) -> impl Iterator<Item = &T> + '_ {
        let mut id = self.head;
        std::iter::from_fn(move || {
            if id == NONE {
                return None;
            }
            let node = &self.nodes[id];
            id = node.next;
            Some(&node.value)
        })
    }
}

/// Arena-backed doubly linked sequence.
///
/// Positional access costs O(min(i, n - i)); it relies entirely on the derived
/// operations of [`Sequence`].
pub struct LinkedSequence<T> {
    links: RefCell<Links<T>>,
    mod_count: Cell<u64>,
}

impl<T> LinkedSequence<T> {
    pub fn new() -> Self {
        Self::with_capacity(TUNED_PARAMS.linked_initial_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: RefCell::new(Links::with_capacity(capacity)),
            mod_count: Cell::new(0),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut links = self.links.into_inner();
        let len = links.len();
        (0..len).map(|_| links.remove(0)).collect()
    }

    fn bump(&self) {
        self.mod_count.set(self.mod_count.get().wrapping_add(1));
    }
}

impl<T: Clone> Sequence for LinkedSequence<T> {
    type Item = T;
    type Root = Self;

    fn len(&self) -> usize {
        self.links.borrow().len()
    }

    fn mod_count(&self) -> u64 {
        self.mod_count.get()
    }

    fn get(&self, index: usize) -> Result<T> {
        let links = self.links.borrow();
        check_index(index, links.len())?;
        let id = links.node_at(index);
        Ok(links.nodes[id].value.clone())
    }

    fn set(&self, index: usize, value: T) -> Result<T> {
        let mut links = self.links.borrow_mut();
        check_index(index, links.len())?;
        let id = links.node_at(index);
        Ok(std::mem::replace(&mut links.nodes[id].value, value))
    }

    fn insert(&self, index: usize, value: T) -> Result<()> {
        {
            let mut links = self.links.borrow_mut();
            check_position(index, links.len())?;
            links.insert(index, value);
        }
        self.bump();
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        let value = {
            let mut links = self.links.borrow_mut();
            check_index(index, links.len())?;
            links.remove(index)
        };
        self.bump();
        Ok(value)
    }

    fn view(&self, from: usize, to: usize) -> Result<View<'_, Self>> {
        View::of_root(self, from, to)
    }
}

impl<T> Default for LinkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedSequence<T> {
    fn clone(&self) -> Self {
        self.links.borrow().values().cloned().collect()
    }
}

impl<T> From<Vec<T>> for LinkedSequence<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> FromIterator<T> for LinkedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let seq = Self::with_capacity(iter.size_hint().0.max(TUNED_PARAMS.linked_initial_capacity));
        {
            let mut links = seq.links.borrow_mut();
            for value in iter {
                let len = links.len();
                links.insert(len, value);
            }
        }
        seq
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.links.borrow().values()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        let left = self.links.borrow();
        let right = other.links.borrow();
        left.len() == right.len() && left.values().eq(right.values())
    }
}

impl<T: Eq> Eq for LinkedSequence<T> {}

impl<T: Hash> Hash for LinkedSequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let links = self.links.borrow();
        state.write_usize(links.len());
        for value in links.values() {
            value.hash(state);
        }
    }
}
