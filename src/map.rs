//! HashMap: key/value façade over `HashTable<(K, V), First>`.
//!
//! Every operation forwards to the engine. `insert_or_assign` and the
//! default-constructing accessor are built from `find` and `insert`;
//! there is no map-specific probing.

use crate::error::TableError;
use crate::policy::{LinearProbing, ProbePolicy};
use crate::projection::{DefaultEq, First, KeyEq};
use crate::table::{self, HashTable, Position};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;

/// Expected size used by `new`: four entries fit without a rehash.
const DEFAULT_HINT: usize = 4;

pub struct HashMap<K, V, P = LinearProbing, S = DefaultHashBuilder, E = DefaultEq> {
    table: HashTable<(K, V), First, P, S, E>,
}

impl<K, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HINT)
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self::with_capacity_and_hasher(expected, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P, S, E> HashMap<K, V, P, S, E> {
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
            table: HashTable::with_parts(First, expected, hasher, eq),
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

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|(_, v)| v)
    }

    pub fn drain(&mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.drain(),
        }
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|(k, v)| keep(k, v))
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

    pub fn entry_at(&self, pos: Position) -> Option<(&K, &V)> {
        self.table.value_at(pos).map(|(k, v)| (k, v))
    }

    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
        self.table.value_at_mut(pos).map(|(_, v)| v)
    }

    /// Remove the entry at `pos`; see [`HashTable::erase_at`].
    pub fn erase_at(&mut self, pos: Position) -> Option<((K, V), Position)> {
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

impl<K, V, P, S, E> HashMap<K, V, P, S, E>
where
    K: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<K>,
{
    /// Insert unless `key` is present; an existing value is left alone.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.table.insert((key, value))
    }

    /// Insert, or overwrite the value of an existing key.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        if let Some(pos) = self.table.find(&key) {
            if let Some((_, slot)) = self.table.value_at_mut(pos) {
                *slot = value;
            }
            return (pos, false);
        }
        self.table.insert((key, value))
    }

    /// Insert `make()` only if `key` is absent; `make` never runs for a
    /// present key.
    pub fn try_emplace<F>(&mut self, key: K, make: F) -> (Position, bool)
    where
        F: FnOnce() -> V,
    {
        self.table.emplace_with(key, |k| (k, make()))
    }

    /// Value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        &mut self.table.get_or_insert_with(key, |k| (k, V::default())).1
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        &mut self.table.get_or_insert_with(key, |k| (k, make())).1
    }

    pub fn find<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.find(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.get(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.get(key).map(|(k, v)| (k, v))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.get_mut(key).map(|(_, v)| v)
    }

    /// Value for a key that must exist.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.get(key).ok_or(TableError::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.get_mut(key).ok_or(TableError::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.contains(key)
    }

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.count(key)
    }

    pub fn equal_range<Q>(&self, key: &Q) -> impl Iterator<Item = (&K, &V)> + '_
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.equal_range(key).map(|(k, v)| (k, v))
    }

    pub fn bucket<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.bucket(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.remove(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.remove(key)
    }

    /// Number of entries removed (0 or 1).
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
        E: KeyEq<Q>,
    {
        self.table.erase(key)
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

impl<K, V, P, S, E> Clone for HashMap<K, V, P, S, E>
where
    K: Clone,
    V: Clone,
    S: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, P, S, E> fmt::Debug for HashMap<K, V, P, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, P, S, E> PartialEq for HashMap<K, V, P, S, E>
where
    K: Hash + PartialEq,
    V: PartialEq,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<K, V, P, S, E> Eq for HashMap<K, V, P, S, E>
where
    K: Hash + Eq,
    V: Eq,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<K>,
{
}

/// Panics if `key` is absent; [`HashMap::at`] reports it instead.
impl<K, Q, V, P, S, E> Index<&Q> for HashMap<K, V, P, S, E>
where
    K: Hash + Borrow<Q>,
    Q: ?Sized + Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<K> + KeyEq<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("{}", TableError::KeyNotFound),
        }
    }
}

impl<K, V, P, S, E> Extend<(K, V)> for HashMap<K, V, P, S, E>
where
    K: Hash,
    P: ProbePolicy,
    S: BuildHasher,
    E: KeyEq<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.table.extend(iter)
    }
}

impl<K, V, P, S, E> FromIterator<(K, V)> for HashMap<K, V, P, S, E>
where
    K: Hash,
    P: ProbePolicy,
    S: BuildHasher + Default,
    E: KeyEq<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            table: HashTable::from_iter(iter),
        }
    }
}

impl<'a, K, V, P, S, E> IntoIterator for &'a HashMap<K, V, P, S, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, P, S, E> IntoIterator for &'a mut HashMap<K, V, P, S, E> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, P, S, E> IntoIterator for HashMap<K, V, P, S, E> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

pub struct Iter<'a, K, V> {
    inner: table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct IterMut<'a, K, V> {
    inner: table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

pub struct IntoIter<K, V> {
    inner: table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
