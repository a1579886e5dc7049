use core::fmt;
use core::marker::PhantomData;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a slot in an [`Arena<T>`](super::arena::Arena).
///
/// The type parameter ties a handle to the arena it came from, so a tree-node handle
/// cannot be used to index the entry arena.
#[repr(transparent)]
pub(crate) struct Handle<T> {
    raw: NonZero<RawHandle>,
    _slot: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Largest index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is never zero and never overflows.
        #[allow(clippy::cast_possible_truncation)]
        let raw = NonZero::new((index + 1) as RawHandle).unwrap();
        Self {
            raw,
            _slot: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.raw.get() - 1) as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.to_index())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Tree links are stored as `Option<Handle<_>>`; the niche keeps them one word.
    assert_eq_size!(Handle<u8>, Option<Handle<u8>>);
    assert_eq_size!(Handle<u8>, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::<u8>::from_index(Handle::<u8>::MAX + 1);
    }

    #[test]
    fn debug_shows_index() {
        assert_eq!(alloc::format!("{:?}", Handle::<u8>::from_index(7)), "Handle(7)");
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::<u8>::MAX) {
            let handle = Handle::<u8>::from_index(index);
            prop_assert_eq!(handle.to_index(), index);
        }
    }
}
