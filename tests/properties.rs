//! Property-based tests using proptest.
//!
//! These tests generate random sequences of operations and verify
//! that the heap invariants are always maintained.

use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use pairing_pq::{BinaryQueue, Compare, Error, Handle, PairingHeap, PriorityQueue, SortedQueue};

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    Update(usize, i32),
    Mutate(usize, i32),
    Rebuild,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1000i32..1000).prop_map(Op::Push),
        2 => Just(Op::Pop),
        3 => (0usize..64, 0i32..500).prop_map(|(idx, by)| Op::Update(idx, by)),
        1 => (0usize..64, -1000i32..1000).prop_map(|(idx, val)| Op::Mutate(idx, val)),
        1 => Just(Op::Rebuild),
    ]
}

/// Runs the operations against a heap and a plain model keyed by insertion order.
fn run_ops(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap = PairingHeap::new();
    let mut handles: Vec<Handle> = Vec::new();
    let mut model: Vec<Option<i32>> = Vec::new();
    let mut dirty = false;

    for op in ops {
        match op {
            Op::Push(val) => {
                handles.push(heap.add_node(val));
                model.push(Some(val));
            }
            Op::Pop => {
                if dirty {
                    heap.update_priorities();
                    dirty = false;
                }
                let expected = model.iter().flatten().max().copied();
                let popped = heap.pop();
                prop_assert_eq!(popped, expected);
                if let Some(val) = popped {
                    let idx = handles
                        .iter()
                        .zip(model.iter())
                        .position(|(&handle, slot)| *slot == Some(val) && !heap.contains(handle));
                    prop_assert!(idx.is_some(), "popped element has no dead handle");
                    if let Some(idx) = idx {
                        model[idx] = None;
                    }
                }
            }
            Op::Update(idx, by) if idx < handles.len() && !dirty => {
                let handle = handles[idx];
                match model[idx] {
                    Some(old) => {
                        let new = old + by;
                        let result = heap.update(handle, new);
                        if by > 0 {
                            prop_assert_eq!(result, Ok(()));
                            model[idx] = Some(new);
                        } else {
                            prop_assert_eq!(result, Err(Error::NotMoreExtreme));
                        }
                    }
                    None => {
                        prop_assert_eq!(heap.update(handle, 0), Err(Error::StaleHandle));
                    }
                }
            }
            Op::Mutate(idx, val) if idx < handles.len() => {
                if let Some(elem) = heap.get_mut(handles[idx]) {
                    *elem = val;
                    model[idx] = Some(val);
                    dirty = true;
                }
            }
            Op::Rebuild => {
                heap.update_priorities();
                dirty = false;
            }
            _ => (),
        }

        let live = model.iter().flatten().count();
        prop_assert_eq!(heap.len(), live);
        prop_assert_eq!(heap.is_empty(), live == 0);
        if !dirty {
            prop_assert!(heap.is_valid());
            prop_assert_eq!(heap.top().copied(), model.iter().flatten().max().copied());
        }
        for (&handle, slot) in handles.iter().zip(model.iter()) {
            prop_assert_eq!(heap.get(handle).copied(), *slot);
        }
    }

    Ok(())
}

proptest! {
    #[test]
    fn pairing_heap_operations(ops in prop::collection::vec(op(), 0..200)) {
        run_ops(ops)?;
    }

    #[test]
    fn pairing_heap_extraction_order(values in prop::collection::vec(-100i32..100, 0..200)) {
        let mut expected = values.clone();
        expected.sort_by(|a, b| b.cmp(a));
        let heap = values.into_iter().collect::<PairingHeap<_>>();
        prop_assert_eq!(heap.drain_ordered().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn pairing_heap_rebuild_is_idempotent(
        values in prop::collection::vec(-100i32..100, 0..200),
        pops in 0usize..50,
    ) {
        let mut heap = values.into_iter().collect::<PairingHeap<_>>();
        for _ in 0..pops {
            heap.pop();
        }
        let expected = heap.clone().drain_ordered().collect::<Vec<_>>();
        heap.update_priorities();
        prop_assert!(heap.is_valid());
        heap.update_priorities();
        prop_assert_eq!(heap.drain_ordered().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn pairing_heap_clone_is_deep(
        values in prop::collection::vec(-100i32..100, 1..100),
        extra in prop::collection::vec(-100i32..100, 0..20),
    ) {
        let original = values.iter().cloned().collect::<PairingHeap<_>>();
        let expected = original.clone().drain_ordered().collect::<Vec<_>>();

        let mut copy = original.clone();
        copy.extend(extra);
        copy.pop();
        copy.update_priorities();

        prop_assert_eq!(original.len(), values.len());
        prop_assert_eq!(original.drain_ordered().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn binary_and_sorted_rebuild(values in prop::collection::vec(-100i32..100, 0..100), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut binary = values.iter().cloned().collect::<BinaryQueue<_>>();
        let mut sorted = values.iter().cloned().collect::<SortedQueue<_>>();
        for elem in binary.iter_mut().chain(sorted.iter_mut()) {
            *elem = rng.gen_range(-100..100);
        }
        binary.update_priorities();
        sorted.update_priorities();
        prop_assert!(binary.is_valid());
        prop_assert!(sorted.is_valid());
        prop_assert_eq!(binary.len(), values.len());
        prop_assert_eq!(sorted.len(), values.len());
    }
}

#[test]
fn random_updates_keep_heap_order() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut heap = PairingHeap::with_comparator(pairing_pq::natural().rev());
    let mut handles = (0..500)
        .map(|_| heap.add_node(rng.gen_range(0..10_000)))
        .collect::<Vec<_>>();

    for round in 0..2_000 {
        let idx = rng.gen_range(0..handles.len());
        let cur = heap[handles[idx]];
        if cur > 0 {
            assert_eq!(heap.update(handles[idx], rng.gen_range(0..cur)), Ok(()));
        }
        if round % 10 == 0 {
            let top = heap.pop();
            let popped = handles.iter().position(|&handle| !heap.contains(handle));
            assert!(top.is_some());
            if let Some(pos) = popped {
                handles.swap_remove(pos);
            }
        }
        if round % 100 == 0 {
            assert!(heap.is_valid());
        }
    }
    assert!(heap.is_valid());

    let drained = heap.drain_ordered().collect::<Vec<_>>();
    assert!(drained.windows(2).all(|pair| pair[0] <= pair[1]));
}
