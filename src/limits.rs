use core::fmt;

use crate::error::{Error, Result};

/// Default byte capacity of a name.
pub const DEFAULT_NAME_CAPACITY: usize = 4;

/// Default byte capacity of a number.
pub const DEFAULT_NUMBER_CAPACITY: usize = 10;

/// Which input of an operation was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    Name,
    Number,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Number => "number",
        })
    }
}

/// Byte capacities of the name and number fields.
///
/// Inputs longer than a capacity, or empty, are rejected before the directory is
/// touched; nothing is ever truncated.
///
/// # Examples
///
/// ```
/// use phone_tree::{Directory, Error, Field, Limits};
///
/// let mut directory = Directory::with_limits(Limits::new(8, 15));
/// directory.insert("operator", "+44700900123").unwrap();
///
/// assert_eq!(
///     directory.insert("switchboard", "0"),
///     Err(Error::CapacityExceeded { field: Field::Name, len: 11, capacity: 8 }),
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Limits {
    name_capacity: usize,
    number_capacity: usize,
}

impl Limits {
    /// Creates limits with the given byte capacities.
    #[must_use]
    pub const fn new(name_capacity: usize, number_capacity: usize) -> Self {
        Self {
            name_capacity,
            number_capacity,
        }
    }

    /// Longest accepted name, in bytes.
    #[must_use]
    pub const fn name_capacity(&self) -> usize {
        self.name_capacity
    }

    /// Longest accepted number, in bytes.
    #[must_use]
    pub const fn number_capacity(&self) -> usize {
        self.number_capacity
    }

    pub(crate) fn check_name(&self, name: &str) -> Result<()> {
        check(Field::Name, name, self.name_capacity)
    }

    pub(crate) fn check_number(&self, number: &str) -> Result<()> {
        check(Field::Number, number, self.number_capacity)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_CAPACITY, DEFAULT_NUMBER_CAPACITY)
    }
}

fn check(field: Field, value: &str, capacity: usize) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Empty { field });
    }
    if value.len() > capacity {
        return Err(Error::CapacityExceeded {
            field,
            len: value.len(),
            capacity,
        });
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn default_capacities() {
        let limits = Limits::default();
        assert_eq!(limits.name_capacity(), DEFAULT_NAME_CAPACITY);
        assert_eq!(limits.number_capacity(), DEFAULT_NUMBER_CAPACITY);
    }

    #[test]
    fn capacity_is_inclusive() {
        let limits = Limits::new(3, 10);
        assert_eq!(limits.check_name("abc"), Ok(()));
        assert_eq!(limits.check_number("1234567890"), Ok(()));
        assert_eq!(
            limits.check_name("abcd"),
            Err(Error::CapacityExceeded {
                field: Field::Name,
                len: 4,
                capacity: 3
            })
        );
    }

    #[test]
    fn capacity_counts_bytes() {
        // Two characters, four bytes.
        assert_eq!(
            Limits::new(3, 10).check_name("\u{e9}\u{e9}"),
            Err(Error::CapacityExceeded {
                field: Field::Name,
                len: 4,
                capacity: 3
            })
        );
    }

    #[test]
    fn empty_values_are_rejected() {
        let limits = Limits::default();
        assert_eq!(limits.check_name(""), Err(Error::Empty { field: Field::Name }));
        assert_eq!(limits.check_number(""), Err(Error::Empty { field: Field::Number }));
    }

    #[test]
    fn error_messages() {
        assert_eq!(Error::Empty { field: Field::Number }.to_string(), "number must not be empty");
        assert_eq!(
            Error::CapacityExceeded {
                field: Field::Name,
                len: 5,
                capacity: 4
            }
            .to_string(),
            "name is 5 bytes, capacity is 4"
        );
        assert_eq!(
            Error::AllocationFailure { arena: "nodes" }.to_string(),
            "cannot allocate another slot in the nodes arena"
        );
    }
}
