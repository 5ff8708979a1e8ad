mod cursor;
mod error;
mod sort;
mod spliter;
mod traits;
mod view;

#[cfg(test)]
mod testing;

pub mod impls;

pub use cursor::{Cursor, Iter};
pub use error::{Result, SequenceError};
pub use impls::{ArraySequence, FixedSequence, LinkedSequence};
pub use spliter::{Characteristics, Spliter};
pub use traits::Sequence;
pub use view::View;

#[derive(Clone, Copy, Debug)]
pub struct TunedParams {
    /// Runs at or below this length are finished by insertion sort.
    pub insertion_threshold: usize,
    pub linked_initial_capacity: usize,
}

pub const TUNED_PARAMS: TunedParams = TunedParams {
    insertion_threshold: 24,
    linked_initial_capacity: 16,
};
