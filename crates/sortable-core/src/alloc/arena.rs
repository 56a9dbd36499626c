use crate::profiling::profile_function;
use std::num::NonZeroU64;

/// Generational handle into an [`Arena`].
///
/// A handle stays valid until its slot is removed; after that every lookup
/// with it returns `None`, even once the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(NonZeroU64);

impl Handle {
    /// Largest slot index a handle can address. The low half stores
    /// `index + 1`, so `u32::MAX` itself would carry into the generation.
    pub const MAX_INDEX: u32 = u32::MAX - 1;

    /// # Panics
    /// If `index` is greater than [`Handle::MAX_INDEX`].
    pub fn new(generation: u32, index: u32) -> Self {
        assert!(index <= Self::MAX_INDEX, "handle index {index} out of range");
        let raw = ((generation as u64) << 32) | (index as u64 + 1);
        // The low half stores index + 1, so it is never zero.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        (self.0.get() & u32::MAX as u64) as u32 - 1
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with generation-checked handles.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> Handle {
        self.insert_with(|_| value)
    }

    /// Insert a value that needs to know its own handle.
    pub fn insert_with(&mut self, make: impl FnOnce(Handle) -> T) -> Handle {
        profile_function!();
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let handle = Handle::new(slot.generation, index);
            slot.value = Some(make(handle));
            handle
        } else {
            assert!(self.slots.len() <= Handle::MAX_INDEX as usize, "arena is full");
            let index = self.slots.len() as u32;
            let handle = Handle::new(0, index);
            self.slots.push(Slot {
                generation: 0,
                value: Some(make(handle)),
            });
            handle
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Remove a value, invalidating its handle.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        profile_function!();
        let index = handle.index();
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(slot.generation, index as u32), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Handle::new(generation, index as u32), value))
        })
    }
}

static_assertions::assert_eq_size!(Handle, Option<Handle>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_insert() {
        let mut arena = Arena::<u8>::new();
        let handle = arena.insert(15);
        assert_eq!(handle.generation(), 0);
        assert_eq!(handle.index(), 0);
        assert_eq!(arena.get(handle), Some(&15));
    }

    #[test]
    fn test_arena_stale_handle() {
        let mut arena = Arena::<u8>::new();
        let _ = arena.insert(15);
        let stale = Handle::new(1, 0);
        assert_eq!(arena.get(stale), None);
    }

    #[test]
    fn test_arena_insert_with_sees_own_handle() {
        let mut arena = Arena::new();
        let handle = arena.insert_with(|h| h);
        assert_eq!(arena.get(handle), Some(&handle));
    }

    #[test]
    fn test_handle_max_index_keeps_generation() {
        let handle = Handle::new(7, Handle::MAX_INDEX);
        assert_eq!(handle.index(), Handle::MAX_INDEX);
        assert_eq!(handle.generation(), 7);
    }

    #[test]
    #[should_panic]
    fn test_handle_index_out_of_range() {
        let _ = Handle::new(0, u32::MAX);
    }
}
