use thiserror::Error as ThisError;

use crate::limits::Field;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by [`Directory`](crate::Directory) operations.
///
/// A missing name or number is not an error; lookups report it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("{field} must not be empty")]
    Empty { field: Field },

    #[error("{field} is {len} bytes, capacity is {capacity}")]
    CapacityExceeded { field: Field, len: usize, capacity: usize },

    #[error("cannot allocate another slot in the {arena} arena")]
    AllocationFailure { arena: &'static str },
}
