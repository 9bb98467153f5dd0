//! Generational slot arena for particles.
//!
//! Constraints refer to particles by [`ParticleId`]: a slot index plus the
//! generation the slot had when the particle was inserted. Removing a particle
//! bumps the slot generation, so every id still held by a spring, stick or
//! pointer tether stops resolving instead of dangling. Freed slots are reused.

use alloc::vec::Vec as AllocVec;

/// Handle to an arena slot. Cheap to copy, compare and store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId {
    index: u32,
    generation: u32,
}

impl ParticleId {
    /// Slot position inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation counter of the slot when this id was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with generation-checked lookups.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: AllocVec<Slot<T>>,
    free: AllocVec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena { slots: AllocVec::new(), free: AllocVec::new(), len: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena { slots: AllocVec::with_capacity(capacity), free: AllocVec::new(), len: 0 }
    }

    /// Store `value`, reusing a freed slot when one exists.
    pub fn insert(&mut self, value: T) -> ParticleId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return ParticleId { index, generation: slot.generation };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, value: Some(value) });
        ParticleId { index, generation: 0 }
    }

    /// Remove the value behind `id`. Stale ids return `None` and change nothing.
    pub fn remove(&mut self, id: ParticleId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ParticleId) -> Option<&T> {
        let slot = self.slots.get(id.index())?;
        if slot.generation == id.generation { slot.value.as_ref() } else { None }
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation == id.generation { slot.value.as_mut() } else { None }
    }

    /// Mutable access to two distinct live values at once.
    ///
    /// Returns `None` if either id is stale or both name the same slot.
    pub fn get_pair_mut(&mut self, a: ParticleId, b: ParticleId) -> Option<(&mut T, &mut T)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].value.as_mut()?;
        let second = tail[0].value.as_mut()?;
        if swapped { Some((second, first)) } else { Some((first, second)) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every value. Outstanding ids become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|v| {
                (ParticleId { index: index as u32, generation: slot.generation }, v)
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(|v| (ParticleId { index: index as u32, generation }, v))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    /// Ids of all live values, in slot order.
    pub fn ids(&self) -> AllocVec<ParticleId> {
        self.iter().map(|(id, _)| id).collect()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
