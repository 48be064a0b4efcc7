//! Storage cell of the slot array.

/// One cell of the table: never used, deleted, or holding a value inline.
#[derive(Clone, Debug)]
pub(crate) enum Slot<T> {
    Empty,
    Tombstone,
    Occupied(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<T> Slot<T> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }

    /// Occupied -> Tombstone, handing the value back. Other states are
    /// left untouched and yield `None`.
    pub(crate) fn bury(&mut self) -> Option<T> {
        if !self.is_occupied() {
            return None;
        }
        match core::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_value(self) -> Option<T> {
        match self {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }
}

/// Allocate `capacity` Empty slots.
pub(crate) fn empty_slots<T>(capacity: usize) -> Box<[Slot<T>]> {
    core::iter::repeat_with(|| Slot::Empty)
        .take(capacity)
        .collect()
}
