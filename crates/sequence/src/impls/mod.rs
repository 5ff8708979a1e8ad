mod array;
mod fixed;
mod linked;

pub use array::ArraySequence;
pub use fixed::FixedSequence;
pub use linked::LinkedSequence;
