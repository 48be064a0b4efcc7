//! probe-table: an open-addressing hash table with pluggable probing,
//! tombstone deletion and power-of-two resizing, plus map and set
//! adapters built on it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one engine, `HashTable<T, X, P, S, E>`, that stores values
//!   inline in a flat slot array and finds them by a key projected out of
//!   each value. `HashMap` and `HashSet` only fix the projection.
//! - Layers:
//!   - `policy`: probe sequences (`LinearProbing`, `QuadraticProbing`).
//!   - `slot`: the Empty / Tombstone / Occupied cell.
//!   - `projection`: key projection (`Identity`, `First`, fn pointers)
//!     and key equality (`DefaultEq`, `FnEq`).
//!   - `table`: slot array, counters, probing, rehash, positions,
//!     iteration, equality.
//!   - `map`, `set`: façades forwarding to `table`.
//!
//! Constraints
//! - Single-threaded: no atomics, no locks. The table is `Send` when its
//!   parts are, but not `Sync`.
//! - Capacity is always a power of two and at least 8.
//! - `cells` (Occupied + Tombstone) stays at or below half the capacity
//!   after every insert; the check runs before a new key is placed.
//! - Unique keys: inserting a present key changes nothing.
//!
//! Deletion
//! - Erase turns a slot into a Tombstone. Lookups walk past Tombstones;
//!   inserts never reuse them. Tombstones still count toward the load
//!   bound and disappear only when the array is rebuilt.
//!
//! Probing
//! - Linear probing visits every slot within `capacity` steps.
//! - Quadratic probing over a power-of-two array reaches only some
//!   slots. Every walk is capped at `capacity` candidates; a lookup that
//!   runs out reports a miss and an insert that runs out grows the table
//!   and tries again.
//!
//! Positions
//! - `Position` = slot index + array generation. Rehash and clear bump
//!   the generation; erase only invalidates the erased position. Stale
//!   positions resolve to `None` rather than to another value.
//!
//! Reentrancy
//! - Probing runs user code (`Hash`, key equality, projection). Each
//!   engine entry point holds a debug-only guard so a callback that
//!   reaches back into the same table panics instead of seeing a
//!   half-built slot array.
//!
//! Logging
//! - Rehashes and clears are reported at `debug` level through the `log`
//!   facade; forced growth after an exhausted probe at `trace`.

mod error;
pub mod map;
pub mod policy;
pub mod projection;
mod reentrancy;
pub mod set;
mod slot;
pub mod table;
#[cfg(test)]
mod table_proptest;

// Public surface
pub use error::TableError;
pub use map::HashMap;
pub use policy::{LinearProbing, ProbePolicy, QuadraticProbing};
pub use projection::{DefaultEq, First, FnEq, Identity, KeyEq, KeyProjection};
pub use set::HashSet;
pub use table::{HashTable, Position, MAX_LOAD_FACTOR, MIN_CAPACITY};
