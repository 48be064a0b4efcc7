//! HashSet: key-only façade over `HashTable<T, Identity>`.

use crate::error::TableError;
use crate::policy::{LinearProbing, ProbePolicy};
use crate::projection::{DefaultEq, Identity, KeyEq};
use crate::table::{self, HashTable, Position};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

const DEFAULT_HINT: usize = 4;

pub struct HashSet<T, P = LinearProbing, S = DefaultHashBuilder, E = DefaultEq> {
    table: HashTable<T, Identity, P, S, E>,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HINT)
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self::with_capacity_and_hasher(expected, DefaultHashBuilder::default())
    }
}

impl<T> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, S, E> HashSet<T, P, S, E> {
    pub fn with_hasher(hasher: S) -> Self
    where
        E: Default,
    {
        Self::with_capacity_and_hasher(DEFAULT_HINT, hasher)
    }

    pub fn with_capacity_and_hasher(expected: usize, hasher: S) -> Self
    where
        E: Default,
    {
        Self::with_parts(expected, hasher, E::default())
    }

    pub fn with_parts(expected: usize, hasher: S, eq: E) -> Self {
        Self {
            table: HashTable::with_parts(Identity, expected, hasher, eq),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn max_bucket_count(&self) -> usize {
        self.table.max_bucket_count()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn iter(&self) -> table::Iter<'_, T> {
        self.table.iter()
    }

    pub fn drain(&mut self) -> table::IntoIter<T> {
        self.table.drain()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.table.retain(|v| keep(v))
    }

    pub fn begin(&self) -> Position {
        self.table.begin()
    }

    pub fn end(&self) -> Position {
        self.table.end()
    }

    pub fn advance(&self, pos: Position) -> Position {
        self.table.advance(pos)
    }

    pub fn value_at(&self, pos: Position) -> Option<&T> {
        self.table.value_at(pos)
    }

    pub fn erase_at(&mut self, pos: Position) -> Option<(T, Position)> {
        self.table.erase_at(pos)
    }

    /// Remove the live entries in `[from, to)`; see [`HashTable::erase_range`].
    pub fn erase_range(&mut self, from: Position, to: Position) -> Option<Position> {
        self.table.erase_range(from, to)
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.table.swap(&mut other.table)
    }
}

impl<T, P, S, E> HashSet<T, P, S, E>
where
    T: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<T>,
{
    /// Insert unless an equal value is present; a duplicate is dropped.
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        self.table.insert(value)
    }

    pub fn find<Q>(&self, value: &Q) -> Option<Position>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.find(value)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.get(value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.contains(value)
    }

    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.count(value)
    }

    pub fn equal_range<Q>(&self, value: &Q) -> core::option::IntoIter<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.equal_range(value)
    }

    pub fn bucket<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.bucket(value)
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.remove(value).is_some()
    }

    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.remove(value)
    }

    pub fn erase<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.erase(value)
    }

    pub fn rehash(&mut self, buckets: usize) {
        self.table.rehash(buckets)
    }

    pub fn reserve(&mut self, n: usize) {
        self.table.reserve(n)
    }

    pub fn try_reserve(&mut self, n: usize) -> Result<(), TableError> {
        self.table.try_reserve(n)
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit()
    }
}

impl<T: Clone, P, S: Clone, E: Clone> Clone for HashSet<T, P, S, E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<T: fmt::Debug, P, S, E> fmt::Debug for HashSet<T, P, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<T, P, S, E> PartialEq for HashSet<T, P, S, E>
where
    T: Hash + PartialEq,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<T, P, S, E> Eq for HashSet<T, P, S, E>
where
    T: Hash + Eq,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<T>,
{
}

impl<T, P, S, E> Extend<T> for HashSet<T, P, S, E>
where
    T: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.table.extend(iter)
    }
}

impl<T, P, S, E> FromIterator<T> for HashSet<T, P, S, E>
where
    T: Hash,
    P: ProbePolicy,
    S: BuildHasher + Default,
    E: KeyEq<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            table: HashTable::from_iter(iter),
        }
    }
}

impl<'a, T, P, S, E> IntoIterator for &'a HashSet<T, P, S, E> {
    type Item = &'a T;
    type IntoIter = table::Iter<'a, T>;

    fn into_iter(self) -> table::Iter<'a, T> {
        self.iter()
    }
}

impl<T, P, S, E> IntoIterator for HashSet<T, P, S, E> {
    type Item = T;
    type IntoIter = table::IntoIter<T>;

    fn into_iter(self) -> table::IntoIter<T> {
        self.table.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::QuadraticProbing;

    #[test]
    fn insert_reports_duplicates() {
        let mut s = HashSet::new();
        assert!(s.insert("a").1);
        assert!(!s.insert("a").1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn take_returns_stored_value() {
        let mut s: HashSet<String> = ["x", "y"].iter().map(|v| v.to_string()).collect();
        assert_eq!(s.take("x"), Some("x".to_string()));
        assert!(!s.remove("x"));
        assert!(s.remove("y"));
        assert!(s.is_empty());
    }

    #[test]
    fn quadratic_set_holds_many_values() {
        let mut s: HashSet<u32, QuadraticProbing> =
            HashSet::with_capacity_and_hasher(0, DefaultHashBuilder::default());
        s.extend(0..500);
        assert_eq!(s.len(), 500);
        assert!((0..500).all(|v| s.contains(&v)));
        assert!(s.load_factor() <= 0.5);
    }

    #[test]
    fn equality_is_order_independent() {
        let a: HashSet<u32> = [1, 2, 3].into_iter().collect();
        let b: HashSet<u32> = [3, 1, 2].into_iter().collect();
        let c: HashSet<u32> = [1, 2].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn retain_drops_rejected_values() {
        let mut s: HashSet<u32> = (0..10).collect();
        s.retain(|v| *v < 3);
        let mut left: Vec<u32> = s.iter().copied().collect();
        left.sort_unstable();
        assert_eq!(left, vec![0, 1, 2]);
    }
}
