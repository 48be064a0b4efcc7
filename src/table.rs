//! HashTable: the open-addressing engine behind `HashMap` and `HashSet`.
//!
//! Values live inline in a power-of-two slot array. Each slot is Empty,
//! a Tombstone, or Occupied. Lookups walk the probe sequence of the
//! table's [`ProbePolicy`] from `hash(key) mod capacity`, skip Tombstones
//! and stop at the first Empty slot. Inserts land in the first Empty slot
//! of that walk; Tombstones are never reused and are only reclaimed when
//! the array is rebuilt.
//!
//! Two counters drive resizing: `size` counts live values and `cells`
//! counts Occupied plus Tombstone slots. An insert that would push
//! `cells / capacity` above [`MAX_LOAD_FACTOR`] first rebuilds the array:
//! at twice the bucket count, or at the same bucket count when at least
//! half of the cells are Tombstones.
//!
//! Positions are `(index, generation)` pairs. The generation changes
//! whenever the slot array is replaced, so a position taken before a
//! rehash resolves to nothing afterwards instead of to whatever moved
//! into its index.

use crate::policy::{LinearProbing, ProbePolicy};
use crate::projection::{DefaultEq, KeyEq, KeyProjection};
use crate::reentrancy::DebugReentrancy;
use crate::slot::{empty_slots, Slot};
use crate::TableError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};

/// Smallest slot array a table ever allocates.
pub const MIN_CAPACITY: usize = 8;

/// Upper bound on `cells / capacity` after any insert.
pub const MAX_LOAD_FACTOR: f32 = 0.5;

/// A slot index tagged with the generation of the array it was taken from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    index: usize,
    generation: u64,
}

impl Position {
    /// Slot index; `bucket_count()` for the end position.
    pub fn index(&self) -> usize {
        self.index
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

#[derive(Clone)]
struct KeyOps<X, S, E> {
    projection: X,
    hasher: S,
    eq: E,
}

impl<X, S, E> KeyOps<X, S, E> {
    #[inline]
    fn hash_of<T>(&self, value: &T) -> u64
    where
        X: KeyProjection<T>,
        X::Key: Hash,
        S: BuildHasher,
    {
        self.hasher.hash_one(self.projection.key(value))
    }

    #[inline]
    fn matches<T, Q>(&self, stored: &T, q: &Q) -> bool
    where
        X: KeyProjection<T>,
        X::Key: Borrow<Q>,
        Q: ?Sized,
        E: KeyEq<Q>,
    {
        self.eq
            .key_eq(Borrow::<Q>::borrow(self.projection.key(stored)), q)
    }
}

/// Slot array plus its counters. Knows nothing about keys except through
/// the `KeyOps` handed to each call.
struct RawTable<T, P> {
    slots: Box<[Slot<T>]>,
    size: usize,
    cells: usize,
    generation: u64,
    _policy: PhantomData<fn() -> P>,
}

impl<T: Clone, P> Clone for RawTable<T, P> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            size: self.size,
            cells: self.cells,
            generation: self.generation,
            _policy: PhantomData,
        }
    }
}

impl<T, P> RawTable<T, P> {
    fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two() && capacity >= MIN_CAPACITY);
        Self {
            slots: empty_slots(capacity),
            size: 0,
            cells: 0,
            generation: 0,
            _policy: PhantomData,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// One more cell still keeps `cells / capacity <= MAX_LOAD_FACTOR`.
    #[inline]
    fn has_room(&self) -> bool {
        self.cells < self.capacity() / 2
    }

    #[inline]
    fn position(&self, index: usize) -> Position {
        Position {
            index,
            generation: self.generation,
        }
    }

    fn end(&self) -> Position {
        self.position(self.capacity())
    }

    /// Index of a live value named by `pos`, if it still names one.
    fn resolve(&self, pos: Position) -> Option<usize> {
        if pos.generation != self.generation {
            return None;
        }
        self.slots
            .get(pos.index)
            .filter(|s| s.is_occupied())
            .map(|_| pos.index)
    }

    /// First Occupied index at or after `from`, or `capacity()`.
    fn next_occupied(&self, from: usize) -> usize {
        let cap = self.capacity();
        (from.min(cap)..cap)
            .find(|&i| self.slots[i].is_occupied())
            .unwrap_or(cap)
    }

    fn occupied_mut(&mut self, index: usize) -> &mut T {
        match self.slots[index].value_mut() {
            Some(v) => v,
            None => unreachable!("slot {index} is not occupied"),
        }
    }

    fn doubled(&self) -> usize {
        self.capacity()
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow())
    }

    /// Bury the value at `index`, if any. `cells` is unchanged.
    fn take_index(&mut self, index: usize) -> Option<T> {
        let value = self.slots[index].bury()?;
        self.size -= 1;
        Some(value)
    }

    fn place(&mut self, index: usize, value: T) {
        debug_assert!(self.slots[index].is_empty());
        self.slots[index] = Slot::Occupied(value);
        self.size += 1;
        self.cells += 1;
    }

    /// Swap in a fresh all-Empty array, returning the old one and its
    /// live count.
    fn detach(&mut self, capacity: usize) -> (Box<[Slot<T>]>, usize) {
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        let live = self.size;
        self.size = 0;
        self.cells = 0;
        self.generation = self.generation.wrapping_add(1);
        (old, live)
    }
}

impl<T, P: ProbePolicy> RawTable<T, P> {
    #[inline]
    fn start(&self, hash: u64) -> P {
        let cap = self.capacity();
        P::new(cap, (hash % cap as u64) as usize)
    }

    /// Walk at most `capacity` candidates looking for `q`.
    fn probe<X, S, E, Q>(&self, ops: &KeyOps<X, S, E>, hash: u64, q: &Q) -> Probe
    where
        X: KeyProjection<T>,
        X::Key: Borrow<Q>,
        Q: ?Sized,
        E: KeyEq<Q>,
    {
        let mut seq = self.start(hash);
        for _ in 0..self.capacity() {
            let i = seq.index();
            match &self.slots[i] {
                Slot::Empty => return Probe::Vacant(i),
                Slot::Tombstone => {}
                Slot::Occupied(v) => {
                    if ops.matches(v, q) {
                        return Probe::Found(i);
                    }
                }
            }
            seq.advance();
        }
        Probe::Exhausted
    }

    /// First Empty candidate for `hash`, ignoring what the other slots hold.
    fn vacant_for(&self, hash: u64) -> Option<usize> {
        let mut seq = self.start(hash);
        for _ in 0..self.capacity() {
            let i = seq.index();
            if self.slots[i].is_empty() {
                return Some(i);
            }
            seq.advance();
        }
        None
    }

    /// Bucket count for the rebuild forced by a full load bound. Mostly
    /// dead cells are reclaimed in place; otherwise the table doubles.
    fn load_target(&self) -> usize {
        let tombstones = self.cells - self.size;
        if tombstones * 2 >= self.cells {
            let needed = self
                .size
                .checked_add(1)
                .and_then(capacity_for)
                .unwrap_or_else(|| capacity_overflow());
            needed.max(self.capacity())
        } else {
            self.doubled()
        }
    }

    /// Make room for one new key hashing to `hash` and return its slot.
    /// Rebuilds first if the load bound would be crossed, and grows for as
    /// long as the probe sequence cannot reach an Empty slot.
    fn claim_vacant<X, S, E>(&mut self, ops: &KeyOps<X, S, E>, hash: u64) -> usize
    where
        X: KeyProjection<T>,
        X::Key: Hash,
        S: BuildHasher,
    {
        if !self.has_room() {
            let target = self.load_target();
            self.rebuild(ops, target);
        }
        loop {
            if let Some(i) = self.vacant_for(hash) {
                return i;
            }
            trace!(
                "probe sequence exhausted at {} buckets; growing",
                self.capacity()
            );
            let target = self.doubled();
            self.rebuild(ops, target);
        }
    }

    /// Move every live value into a fresh array of `capacity` slots.
    /// Tombstones are dropped, so afterwards `cells == size`.
    fn rebuild<X, S, E>(&mut self, ops: &KeyOps<X, S, E>, capacity: usize)
    where
        X: KeyProjection<T>,
        X::Key: Hash,
        S: BuildHasher,
    {
        let old_capacity = self.capacity();
        let reclaimed = self.cells - self.size;
        let (old, live) = self.detach(capacity);
        let mut pending: Vec<T> = Vec::with_capacity(live);
        pending.extend(old.into_vec().into_iter().filter_map(Slot::into_value));

        while let Some(value) = pending.pop() {
            let hash = ops.hash_of(&value);
            match self.vacant_for(hash) {
                Some(i) => self.place(i, value),
                None => {
                    pending.push(value);
                    let bigger = self.doubled();
                    trace!(
                        "probe sequence exhausted while rebuilding at {} buckets; retrying at {}",
                        self.capacity(),
                        bigger
                    );
                    let (partial, _) = self.detach(bigger);
                    pending.extend(partial.into_vec().into_iter().filter_map(Slot::into_value));
                }
            }
        }
        debug!(
            "rehash {} -> {} buckets ({} live, {} tombstones reclaimed)",
            old_capacity,
            self.capacity(),
            self.size,
            reclaimed
        );
    }
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

/// Open-addressing hash table storing values of type `T`, keyed by the
/// projection `X`.
///
/// - `P` chooses the probe sequence ([`LinearProbing`] by default).
/// - `S` hashes projected keys.
/// - `E` compares projected keys; it must agree with `S`.
pub struct HashTable<T, X, P = LinearProbing, S = DefaultHashBuilder, E = DefaultEq> {
    raw: RawTable<T, P>,
    ops: KeyOps<X, S, E>,
    reentrancy: DebugReentrancy,
}

/// Slot array length for a table expected to hold `live` values.
fn capacity_for(live: usize) -> Option<usize> {
    live.checked_mul(2)?
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
}

impl<T, X> HashTable<T, X>
where
    X: KeyProjection<T>,
{
    pub fn new(projection: X) -> Self {
        Self::with_hint(projection, 1)
    }

    /// Table sized for `expected` values without rehashing.
    pub fn with_hint(projection: X, expected: usize) -> Self {
        Self::with_hint_and_hasher(projection, expected, DefaultHashBuilder::default())
    }

    /// Bulk construction: insert every value in order, keeping the first
    /// of any duplicate keys.
    pub fn from_values<I>(projection: X, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        X::Key: Hash + Eq,
    {
        let values = values.into_iter();
        let mut table = Self::with_hint(projection, values.size_hint().0);
        table.extend(values);
        table
    }
}

impl<T, X, P, S, E> HashTable<T, X, P, S, E> {
    pub fn with_hint_and_hasher(projection: X, expected: usize, hasher: S) -> Self
    where
        E: Default,
    {
        Self::with_parts(projection, expected, hasher, E::default())
    }

    /// Panics with "capacity overflow" if `expected` values cannot be
    /// addressed.
    pub fn with_parts(projection: X, expected: usize, hasher: S, eq: E) -> Self {
        let capacity = capacity_for(expected)
            .filter(|&c| c <= Self::max_bucket_count_for())
            .unwrap_or_else(|| capacity_overflow());
        Self {
            raw: RawTable::with_capacity(capacity),
            ops: KeyOps {
                projection,
                hasher,
                eq,
            },
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.size
    }

    pub fn is_empty(&self) -> bool {
        self.raw.size == 0
    }

    /// Occupied plus Tombstone slots.
    pub fn cells(&self) -> usize {
        self.raw.cells
    }

    pub fn tombstones(&self) -> usize {
        self.raw.cells - self.raw.size
    }

    pub fn bucket_count(&self) -> usize {
        self.raw.capacity()
    }

    fn max_bucket_count_for() -> usize {
        let per_slot = core::mem::size_of::<Slot<T>>().max(1);
        let limit = isize::MAX as usize / per_slot;
        1usize << (usize::BITS - 1 - limit.leading_zeros())
    }

    /// Largest power-of-two slot array this element type can address.
    pub fn max_bucket_count(&self) -> usize {
        Self::max_bucket_count_for()
    }

    /// Live values per slot. Tombstones are not counted here even though
    /// they count toward the resize threshold.
    pub fn load_factor(&self) -> f32 {
        self.raw.size as f32 / self.raw.capacity() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        MAX_LOAD_FACTOR
    }

    pub fn hasher(&self) -> &S {
        &self.ops.hasher
    }

    pub fn projection(&self) -> &X {
        &self.ops.projection
    }

    /// Drop every value and shrink back to `MIN_CAPACITY` slots.
    pub fn clear(&mut self) {
        let (old, live) = self.raw.detach(MIN_CAPACITY);
        debug!("clear: dropped {} values, {} buckets released", live, old.len());
        drop(old);
    }

    /// Move every value out, keeping the current bucket count.
    pub fn drain(&mut self) -> IntoIter<T> {
        let capacity = self.raw.capacity();
        let (old, live) = self.raw.detach(capacity);
        IntoIter::new(old, live)
    }

    /// Keep only the values for which `keep` returns true. `keep` must not
    /// change a value's key.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        for slot in self.raw.slots.iter_mut() {
            if let Slot::Occupied(v) = slot {
                if !keep(v) {
                    let dead = slot.bury();
                    self.raw.size -= 1;
                    drop(dead);
                }
            }
        }
    }

    /// Position of the first live value in slot order, or `end()`.
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.next_occupied(0))
    }

    /// One past the last slot.
    pub fn end(&self) -> Position {
        self.raw.end()
    }

    /// Position of the next live value after `pos`. Stale positions
    /// advance straight to `end()`.
    pub fn advance(&self, pos: Position) -> Position {
        if pos.generation != self.raw.generation || pos.index >= self.raw.capacity() {
            return self.end();
        }
        self.raw.position(self.raw.next_occupied(pos.index + 1))
    }

    pub fn value_at(&self, pos: Position) -> Option<&T> {
        self.raw.resolve(pos).and_then(|i| self.raw.slots[i].value())
    }

    /// Mutable access by position. The key of the value must not change.
    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut T> {
        let i = self.raw.resolve(pos)?;
        self.raw.slots[i].value_mut()
    }

    /// Remove the value at `pos`, leaving a Tombstone. Returns the value
    /// and the position of the next live value (or `end()`), so callers
    /// can erase while walking. `None` if `pos` is stale or does not name
    /// a live value.
    pub fn erase_at(&mut self, pos: Position) -> Option<(T, Position)> {
        let i = self.raw.resolve(pos)?;
        let value = self.raw.take_index(i)?;
        let next = self.raw.position(self.raw.next_occupied(i + 1));
        Some((value, next))
    }

    /// Remove every live value from `from` up to but not including `to`,
    /// in slot order, and return `to`. `from` need not name a live value.
    /// `None`, with nothing removed, if either position is stale or
    /// `from` comes after `to`.
    pub fn erase_range(&mut self, from: Position, to: Position) -> Option<Position> {
        let generation = self.raw.generation;
        if from.generation != generation
            || to.generation != generation
            || from.index > to.index
            || to.index > self.raw.capacity()
        {
            return None;
        }
        for i in from.index..to.index {
            drop(self.raw.take_index(i));
        }
        Some(to)
    }

    /// Exchange the full contents of two tables. Positions taken from
    /// either table before the swap no longer resolve.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
        let generation = self
            .raw
            .generation
            .max(other.raw.generation)
            .wrapping_add(1);
        self.raw.generation = generation;
        other.raw.generation = generation;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.raw.slots.iter(),
            remaining: self.raw.size,
        }
    }

    /// Mutable iteration. Keys must not change.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.raw.slots.iter_mut(),
            remaining: self.raw.size,
        }
    }

    /// Live values paired with their positions, in slot order.
    pub fn positions(&self) -> Positions<'_, T> {
        Positions {
            slots: self.raw.slots.iter().enumerate(),
            generation: self.raw.generation,
            remaining: self.raw.size,
        }
    }
}

impl<T, X, P, S, E> HashTable<T, X, P, S, E>
where
    X: KeyProjection<T>,
    X::Key: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<X::Key>,
{
    /// Insert `value` unless its key is already present. Returns the
    /// position holding the key and whether `value` was stored; on a
    /// duplicate `value` is dropped and the table is unchanged.
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        let _g = self.reentrancy.enter();
        let key = self.ops.projection.key(&value);
        let hash = self.ops.hasher.hash_one(key);
        let index = match self.raw.probe(&self.ops, hash, key) {
            Probe::Found(i) => return (self.raw.position(i), false),
            Probe::Vacant(i) if self.raw.has_room() => i,
            _ => self.raw.claim_vacant(&self.ops, hash),
        };
        self.raw.place(index, value);
        (self.raw.position(index), true)
    }

    /// Like `insert`, but the value is only built (from `arg`) when its key
    /// is absent. `make` must produce a value whose key equals `arg`.
    pub fn emplace_with<A, F>(&mut self, arg: A, make: F) -> (Position, bool)
    where
        A: Borrow<X::Key>,
        F: FnOnce(A) -> T,
    {
        let (index, inserted) = self.emplace_index(arg, make);
        (self.raw.position(index), inserted)
    }

    /// `emplace_with` returning the stored value.
    pub fn get_or_insert_with<A, F>(&mut self, arg: A, make: F) -> &mut T
    where
        A: Borrow<X::Key>,
        F: FnOnce(A) -> T,
    {
        let (index, _) = self.emplace_index(arg, make);
        self.raw.occupied_mut(index)
    }

    fn emplace_index<A, F>(&mut self, arg: A, make: F) -> (usize, bool)
    where
        A: Borrow<X::Key>,
        F: FnOnce(A) -> T,
    {
        let _g = self.reentrancy.enter();
        let key = <A as Borrow<X::Key>>::borrow(&arg);
        let hash = self.ops.hasher.hash_one(key);
        let index = match self.raw.probe(&self.ops, hash, key) {
            Probe::Found(i) => return (i, false),
            Probe::Vacant(i) if self.raw.has_room() => i,
            _ => self.raw.claim_vacant(&self.ops, hash),
        };
        let value = make(arg);
        debug_assert_eq!(
            self.ops.hash_of(&value),
            hash,
            "emplaced value projects to a different key"
        );
        self.raw.place(index, value);
        (index, true)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Position>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.find_index(q).map(|i| self.raw.position(i))
    }

    fn find_index<Q>(&self, q: &Q) -> Option<usize>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        let _g = self.reentrancy.enter();
        let hash = self.ops.hasher.hash_one(q);
        match self.raw.probe(&self.ops, hash, q) {
            Probe::Found(i) => Some(i),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.find_index(q).and_then(|i| self.raw.slots[i].value())
    }

    /// Mutable lookup. The key of the value must not change.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut T>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        let i = self.find_index(q)?;
        self.raw.slots[i].value_mut()
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.find_index(q).is_some()
    }

    /// 0 or 1: keys are unique.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        usize::from(self.contains(q))
    }

    /// All values whose key equals `q`; at most one.
    pub fn equal_range<Q>(&self, q: &Q) -> core::option::IntoIter<&T>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.get(q).into_iter()
    }

    /// Slot index currently holding `q`.
    pub fn bucket<Q>(&self, q: &Q) -> Option<usize>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.find_index(q)
    }

    /// Remove the value keyed by `q`.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<T>
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        let i = self.find_index(q)?;
        self.raw.take_index(i)
    }

    /// Remove every value keyed by `q` and return how many went.
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        let mut removed = 0;
        while self.remove(q).is_some() {
            removed += 1;
        }
        removed
    }

    /// Rebuild with at least `buckets` slots, rounded up to a power of two
    /// that also keeps the live values within `MAX_LOAD_FACTOR`. Always
    /// rebuilds, so Tombstones are reclaimed even when the bucket count
    /// stays the same. Panics with "capacity overflow" past
    /// `max_bucket_count`.
    pub fn rehash(&mut self, buckets: usize) {
        if let Err(e) = self.try_rehash(buckets) {
            panic!("{e}");
        }
    }

    fn try_rehash(&mut self, buckets: usize) -> Result<(), TableError> {
        let capacity = self
            .raw
            .size
            .checked_mul(2)
            .map(|floor| floor.max(buckets).max(MIN_CAPACITY))
            .and_then(usize::checked_next_power_of_two)
            .filter(|&c| c <= self.max_bucket_count())
            .ok_or(TableError::CapacityOverflow { requested: buckets })?;
        let _g = self.reentrancy.enter();
        self.raw.rebuild(&self.ops, capacity);
        Ok(())
    }

    /// Size the table for `n` live values without further rehashing.
    /// Never shrinks.
    pub fn reserve(&mut self, n: usize) {
        if let Err(e) = self.try_reserve(n) {
            panic!("{e}");
        }
    }

    pub fn try_reserve(&mut self, n: usize) -> Result<(), TableError> {
        let wanted = capacity_for(n)
            .filter(|&c| c <= self.max_bucket_count())
            .ok_or(TableError::CapacityOverflow { requested: n })?;
        if wanted > self.bucket_count() {
            self.try_rehash(wanted)?;
        }
        Ok(())
    }

    /// Rebuild at the smallest bucket count that holds the live values.
    pub fn shrink_to_fit(&mut self) {
        self.rehash(0);
    }
}

impl<T, X, P, S, E> Clone for HashTable<T, X, P, S, E>
where
    T: Clone,
    X: Clone,
    S: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            ops: self.ops.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<T: fmt::Debug, X, P, S, E> fmt::Debug for HashTable<T, X, P, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Order-independent: equal sizes and every value of `self` is found by
/// key in `other` and compares equal there.
impl<T, X, P, S, E> PartialEq for HashTable<T, X, P, S, E>
where
    T: PartialEq,
    X: KeyProjection<T>,
    X::Key: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<X::Key>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|v| {
                other
                    .get(self.ops.projection.key(v))
                    .is_some_and(|w| v == w)
            })
    }
}

impl<T, X, P, S, E> Eq for HashTable<T, X, P, S, E>
where
    T: Eq,
    X: KeyProjection<T>,
    X::Key: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<X::Key>,
{
}

impl<T, X, P, S, E> Extend<T> for HashTable<T, X, P, S, E>
where
    X: KeyProjection<T>,
    X::Key: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<X::Key>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, X, P, S, E> FromIterator<T> for HashTable<T, X, P, S, E>
where
    X: KeyProjection<T> + Default,
    X::Key: Hash,
    P: ProbePolicy,
    S: BuildHasher + Default,
    E: KeyEq<X::Key> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = Self::with_parts(
            X::default(),
            iter.size_hint().0,
            S::default(),
            E::default(),
        );
        table.extend(iter);
        table
    }
}

impl<'a, T, X, P, S, E> IntoIterator for &'a HashTable<T, X, P, S, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, X, P, S, E> IntoIterator for &'a mut HashTable<T, X, P, S, E> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, X, P, S, E> IntoIterator for HashTable<T, X, P, S, E> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.raw.slots, self.raw.size)
    }
}

/// Live values in slot order.
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let v = self.slots.by_ref().find_map(Slot::value)?;
        self.remaining -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable live values in slot order.
pub struct IterMut<'a, T> {
    slots: core::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let v = self.slots.by_ref().find_map(Slot::value_mut)?;
        self.remaining -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owned live values, from `into_iter` or `drain`.
pub struct IntoIter<T> {
    slots: std::vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    fn new(slots: Box<[Slot<T>]>, remaining: usize) -> Self {
        Self {
            slots: slots.into_vec().into_iter(),
            remaining,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let v = self.slots.by_ref().find_map(Slot::into_value)?;
        self.remaining -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

/// `(Position, &T)` for every live value, in slot order.
pub struct Positions<'a, T> {
    slots: core::iter::Enumerate<core::slice::Iter<'a, Slot<T>>>,
    generation: u64,
    remaining: usize,
}

impl<'a, T> Iterator for Positions<'a, T> {
    type Item = (Position, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let generation = self.generation;
        let item = self
            .slots
            .by_ref()
            .find_map(|(index, s)| s.value().map(|v| (Position { index, generation }, v)))?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Positions<'_, T> {}
