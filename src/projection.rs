//! Key projection and key equality: the two user-supplied functions that
//! let one engine serve both set-like and map-like storage.

/// Extracts the comparison key from a stored value.
///
/// The projection must be pure: the key of a stored value may not change
/// while the value lives in a table.
pub trait KeyProjection<T> {
    type Key: ?Sized;

    fn key<'a>(&self, value: &'a T) -> &'a Self::Key;
}

/// The stored value is its own key (set storage).
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl<T> KeyProjection<T> for Identity {
    type Key = T;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// The key is the first field of a `(key, value)` pair (map storage).
#[derive(Copy, Clone, Debug, Default)]
pub struct First;

impl<K, V> KeyProjection<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

/// Plain function pointers work as projections, e.g.
/// `(|r: &Record| &r.id) as fn(&Record) -> &u64`.
impl<T, K: ?Sized> KeyProjection<T> for fn(&T) -> &K {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a K {
        (self)(value)
    }
}

/// Key equality predicate. Must agree with the table's hasher: keys that
/// compare equal must hash equal.
pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, stored: &K, probe: &K) -> bool;
}

/// Equality through `Eq`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEq;

impl<K: ?Sized + Eq> KeyEq<K> for DefaultEq {
    #[inline]
    fn key_eq(&self, stored: &K, probe: &K) -> bool {
        stored == probe
    }
}

/// Equality through a caller-supplied closure.
#[derive(Copy, Clone, Debug, Default)]
pub struct FnEq<F>(pub F);

impl<K: ?Sized, F> KeyEq<K> for FnEq<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, stored: &K, probe: &K) -> bool {
        (self.0)(stored, probe)
    }
}
