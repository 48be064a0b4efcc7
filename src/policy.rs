//! Probing policies: pure generators of candidate slot indices.
//!
//! A policy is created for one probe walk from `(capacity, start)` and
//! yields `start`, then successive candidates, each reduced modulo
//! `capacity`. Policies never look at slot state; the table decides when
//! a walk ends.

/// A deterministic probe sequence over a table of `capacity` slots.
pub trait ProbePolicy {
    /// Begin a walk at `start` (already reduced modulo `capacity`).
    fn new(capacity: usize, start: usize) -> Self;

    /// Current candidate slot index, always `< capacity`.
    fn index(&self) -> usize;

    /// Move to the next candidate.
    fn advance(&mut self);
}

/// `candidate(i) = (start + i) mod capacity`.
///
/// Visits every slot exactly once in `capacity` steps.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LinearProbing {
    capacity: usize,
    start: usize,
    step: usize,
}

impl ProbePolicy for LinearProbing {
    #[inline]
    fn new(capacity: usize, start: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            start,
            step: 0,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.start.wrapping_add(self.step) % self.capacity
    }

    #[inline]
    fn advance(&mut self) {
        self.step = self.step.wrapping_add(1);
    }
}

/// `candidate(i) = (start + i²) mod capacity`.
///
/// Known limitation: tables always have a power-of-two capacity, and the
/// squares modulo a power of two cover well under half of the residues.
/// A walk may therefore never reach an Empty slot that exists elsewhere
/// in the table. The table bounds every walk to `capacity` candidates and
/// grows instead of looping when an insert runs out of candidates; prefer
/// [`LinearProbing`] when full coverage matters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QuadraticProbing {
    capacity: usize,
    start: usize,
    base: usize,
}

impl ProbePolicy for QuadraticProbing {
    #[inline]
    fn new(capacity: usize, start: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            start,
            base: 0,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        let offset = self.base.wrapping_mul(self.base);
        self.start.wrapping_add(offset) % self.capacity
    }

    #[inline]
    fn advance(&mut self) {
        self.base = self.base.wrapping_add(1);
    }
}
