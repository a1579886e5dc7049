use super::Directory;
use crate::limits::Limits;
use crate::raw::RawDirectory;

impl Directory {
    /// Creates an empty directory with room for at least `capacity` entries, and as many
    /// distinct names, before its storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use phone_tree::Directory;
    ///
    /// let directory = Directory::with_capacity(32);
    /// assert!(directory.is_empty());
    /// assert!(directory.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Directory {
            raw: RawDirectory::with_capacity(capacity),
            limits: Limits::default(),
        }
    }

    /// Returns how many entries the directory can hold without reallocating.
    ///
    /// Slots freed by [`remove`](Directory::remove) are reused before this is exceeded.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries and names.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }
}
