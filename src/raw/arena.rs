use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::{Error, Result};

/// Slot storage for tree records, addressed by [`Handle`].
///
/// Freed slots go on a free list and are reused before the slot vector grows. The free
/// list is reserved in step with the slots so that releasing a slot never allocates.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    label: &'static str,
    slots: Vec<Option<T>>,
    free: Vec<Handle<T>>,
}

impl<T> Arena<T> {
    pub(crate) const fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `element` and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if every handle is in use or the slot vector
    /// cannot grow. `element` is dropped in that case and the arena is unchanged.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle<T>> {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            return Ok(handle);
        }

        // Slot indices run from 0 to `Handle::MAX` inclusive.
        if self.slots.len() > Handle::<T>::MAX {
            return Err(Error::AllocationFailure { arena: self.label });
        }
        let label = self.label;
        let failed = |_| Error::AllocationFailure { arena: label };
        self.slots.try_reserve(1).map_err(failed)?;
        let wanted = (self.slots.len() + 1).saturating_sub(self.free.len());
        self.free.try_reserve(wanted).map_err(failed)?;

        self.slots.push(Some(element));
        Ok(Handle::from_index(self.slots.len() - 1))
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle<T>) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle<T>) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.free.reserve(self.slots.capacity().saturating_sub(self.free.len()));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity("test", 10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut arena: Arena<u32> = Arena::new("test");
        let first = arena.try_alloc(1).unwrap();
        let second = arena.try_alloc(2).unwrap();
        assert_eq!(arena.take(first), 1);
        let third = arena.try_alloc(3).unwrap();
        assert_eq!(third, first);
        assert_eq!(*arena.get(second), 2);
        assert_eq!(*arena.get(third), 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn full_arena_reports_allocation_failure() {
        let mut arena: Arena<()> = Arena::new("units");
        for _ in 0..=Handle::<()>::MAX {
            arena.try_alloc(()).unwrap();
        }
        assert_eq!(arena.try_alloc(()), Err(Error::AllocationFailure { arena: "units" }));
        assert_eq!(arena.len(), Handle::<()>::MAX + 1);

        // Releasing one slot makes room again.
        let _ = arena.take(Handle::from_index(42));
        assert_eq!(arena.try_alloc(()), Ok(Handle::from_index(42)));
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn stale_handle_panics() {
        let mut arena: Arena<u32> = Arena::new("test");
        let handle = arena.try_alloc(7).unwrap();
        arena.take(handle);
        let _ = arena.get(handle);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle<u32>, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new("test");

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.try_alloc(value).unwrap();
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            8 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
