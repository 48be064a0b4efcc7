#![cfg(test)]

// State-machine property tests for HashTable, kept inside the crate so they
// can run the engine directly with every probe policy and hasher.

use crate::policy::{LinearProbing, ProbePolicy, QuadraticProbing};
use crate::projection::{First, Identity};
use crate::table::{HashTable, Position, MIN_CAPACITY};
use hashbrown::hash_map::DefaultHashBuilder;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

type Entry = (u8, i32);
type Table<P, S> = HashTable<Entry, First, P, S>;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, i32),
    Emplace(u8, i32),
    Erase(u8),
    Find(u8),
    Mutate(u8, i32),
    Rehash(usize),
    Reserve(usize),
    EraseFirst,
    Clear,
}

// Small key space so erase and re-insert of the same key is common.
fn arb_op() -> impl Strategy<Value = Op> {
    let key = 0u8..24;
    prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Emplace(k, v)),
        3 => key.clone().prop_map(Op::Erase),
        2 => key.clone().prop_map(Op::Find),
        1 => (key, any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
        1 => (0usize..200).prop_map(Op::Rehash),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => Just(Op::EraseFirst),
        1 => Just(Op::Clear),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (0usize..20, proptest::collection::vec(arb_op(), 1..80))
}

// Every key lands on the same start slot.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

fn contents<P, S>(t: &Table<P, S>) -> BTreeMap<u8, i32> {
    t.iter().copied().collect()
}

// Post-conditions checked after every operation:
// - size parity with the model, and the iterated contents equal the model
// - each key is yielded once (iteration count equals len)
// - capacity is a power of two, at least MIN_CAPACITY
// - cells never exceed half the capacity and never drop below len
// - every live position resolves to the value iteration reports for it
// - positions of erased values or of replaced arrays never resolve
fn check<P, S>(
    t: &Table<P, S>,
    model: &HashMap<u8, i32>,
    stale: &[Position],
) -> Result<(), TestCaseError>
where
    P: ProbePolicy,
    S: BuildHasher,
{
    prop_assert_eq!(t.len(), model.len());
    prop_assert_eq!(t.is_empty(), model.is_empty());
    prop_assert_eq!(t.iter().count(), t.len());
    let expected: BTreeMap<u8, i32> = model.iter().map(|(&k, &v)| (k, v)).collect();
    prop_assert_eq!(contents(t), expected);

    let cap = t.bucket_count();
    prop_assert!(cap.is_power_of_two() && cap >= MIN_CAPACITY, "capacity {}", cap);
    prop_assert!(t.cells() * 2 <= cap, "cells {} over load bound at {}", t.cells(), cap);
    prop_assert!(t.cells() >= t.len());
    prop_assert_eq!(t.tombstones(), t.cells() - t.len());

    for (pos, v) in t.positions() {
        prop_assert_eq!(t.value_at(pos), Some(v));
        prop_assert_eq!(t.bucket(&v.0), Some(pos.index()));
    }
    for &pos in stale {
        prop_assert!(t.value_at(pos).is_none(), "stale position {:?} resolved", pos);
    }
    Ok(())
}

fn run<P, S>(mut t: Table<P, S>, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    P: ProbePolicy,
    S: BuildHasher,
{
    let mut model: HashMap<u8, i32> = HashMap::new();
    let mut stale: Vec<Position> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let absent = !model.contains_key(&k);
                let (pos, inserted) = t.insert((k, v));
                prop_assert_eq!(inserted, absent);
                if inserted {
                    model.insert(k, v);
                }
                prop_assert_eq!(t.value_at(pos).map(|e| e.0), Some(k));

                // A second insert of the same key changes nothing.
                let cells = t.cells();
                let cap = t.bucket_count();
                let (again, inserted) = t.insert((k, v.wrapping_add(1)));
                prop_assert!(!inserted);
                prop_assert_eq!(again, pos);
                prop_assert_eq!(t.cells(), cells);
                prop_assert_eq!(t.bucket_count(), cap);
            }
            Op::Emplace(k, v) => {
                let absent = !model.contains_key(&k);
                let mut calls = 0;
                let (_, inserted) = t.emplace_with(k, |k| {
                    calls += 1;
                    (k, v)
                });
                prop_assert_eq!(inserted, absent);
                prop_assert_eq!(calls, usize::from(absent));
                if inserted {
                    model.insert(k, v);
                }
            }
            Op::Erase(k) => {
                let pos = t.find(&k);
                let removed = t.erase(&k);
                prop_assert_eq!(removed, usize::from(model.remove(&k).is_some()));
                prop_assert!(!t.contains(&k));
                stale.extend(pos);
            }
            Op::Find(k) => {
                prop_assert_eq!(t.get(&k).map(|e| e.1), model.get(&k).copied());
                prop_assert_eq!(t.count(&k), usize::from(model.contains_key(&k)));
            }
            Op::Mutate(k, d) => {
                if let Some(e) = t.get_mut(&k) {
                    e.1 = e.1.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::Rehash(n) => {
                let before = contents(&t);
                stale.extend(t.positions().map(|(p, _)| p));
                t.rehash(n);
                prop_assert!(t.bucket_count() >= n);
                prop_assert_eq!(t.cells(), t.len());
                prop_assert_eq!(contents(&t), before);
            }
            Op::Reserve(n) => {
                let cap = t.bucket_count();
                t.reserve(n);
                prop_assert!(t.bucket_count() >= cap);
                prop_assert!(n * 2 <= t.bucket_count());
            }
            Op::EraseFirst => {
                let pos = t.begin();
                if pos == t.end() {
                    prop_assert!(model.is_empty());
                } else {
                    let (v, next) = match t.erase_at(pos) {
                        Some(r) => r,
                        None => return Err(TestCaseError::fail("begin() did not resolve")),
                    };
                    prop_assert_eq!(model.remove(&v.0), Some(v.1));
                    prop_assert_eq!(next, t.advance(pos));
                    stale.push(pos);
                }
            }
            Op::Clear => {
                stale.extend(t.positions().map(|(p, _)| p));
                t.clear();
                model.clear();
                prop_assert_eq!(t.bucket_count(), MIN_CAPACITY);
                prop_assert_eq!(t.cells(), 0);
            }
        }
        check(&t, &model, &stale)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_linear((hint, ops) in arb_scenario()) {
        let t: Table<LinearProbing, DefaultHashBuilder> =
            HashTable::with_hint_and_hasher(First, hint, DefaultHashBuilder::default());
        run(t, ops)?;
    }

    // Worst-case collisions: every lookup walks the whole cluster.
    #[test]
    fn prop_linear_with_collisions((hint, ops) in arb_scenario()) {
        let t: Table<LinearProbing, ConstBuildHasher> =
            HashTable::with_hint_and_hasher(First, hint, ConstBuildHasher);
        run(t, ops)?;
    }

    #[test]
    fn prop_quadratic((hint, ops) in arb_scenario()) {
        let t: Table<QuadraticProbing, DefaultHashBuilder> =
            HashTable::with_hint_and_hasher(First, hint, DefaultHashBuilder::default());
        run(t, ops)?;
    }

    // Quadratic walks from one start slot reach only the quadratic
    // residues, so inserts keep forcing growth.
    #[test]
    fn prop_quadratic_with_collisions((hint, ops) in arb_scenario()) {
        let t: Table<QuadraticProbing, ConstBuildHasher> =
            HashTable::with_hint_and_hasher(First, hint, ConstBuildHasher);
        run(t, ops)?;
    }

    // Bulk construction keeps one copy of each distinct value.
    #[test]
    fn prop_from_values_dedups(values in proptest::collection::vec(any::<u16>(), 0..200)) {
        let t: HashTable<u16, Identity> = HashTable::from_values(Identity, values.iter().copied());
        let expected: BTreeSet<u16> = values.iter().copied().collect();
        prop_assert_eq!(t.len(), expected.len());
        prop_assert_eq!(t.into_iter().collect::<BTreeSet<u16>>(), expected);
    }
}
