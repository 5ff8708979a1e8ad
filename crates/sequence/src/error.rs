use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("from index {from} is greater than to index {to}")]
    InvalidRange { from: usize, to: usize },
    #[error("cursor has no element to mutate")]
    IllegalState,
    #[error("sequence does not support {operation}")]
    UnsupportedMutation { operation: &'static str },
    #[error("sequence was structurally modified during traversal")]
    ConcurrentModification,
    #[error("no element in the requested direction")]
    NoSuchElement,
}

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Bounds check for positional access, `index < len`.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfBounds { index, len })
    }
}

/// Bounds check for insertion points, `index <= len`.
#[inline]
pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfBounds { index, len })
    }
}

/// Validates a half-open range `[from, to)` against `len`.
///
/// `to` is bounds-checked first; with `to <= len`, `from > to` is the only way `from` can
/// be out of range and is reported as `InvalidRange`.
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    check_position(to, len)?;
    if from > to {
        return Err(SequenceError::InvalidRange { from, to });
    }
    Ok(())
}

/// A bounds failure after a passed counter check means the structure changed underneath
/// the caller.
pub(crate) fn structural(err: SequenceError) -> SequenceError {
    match err {
        SequenceError::IndexOutOfBounds { .. } => SequenceError::ConcurrentModification,
        other => other,
    }
}
