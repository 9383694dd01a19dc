//! An addressable pairing heap.
//!
//! All nodes live within a `Stash` and refer to each other by their slot in it.
//! Every node knows its parent, the head of its child list and its next sibling.
//! Every mutating operation is built from detaching nodes and melding them.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use compare::{natural, Compare, Natural};
use log::{debug, trace};
use stash::Stash;
use unreachable::UncheckedOptionExt;

use crate::{Error, PriorityQueue, Result};

/// Source of generation stamps shared by all heaps of the process.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(0);

#[inline]
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Position of a node within the `Stash` of its heap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct Slot(usize);

impl From<usize> for Slot {
    #[inline]
    fn from(val: usize) -> Slot {
        Slot(val)
    }
}

impl From<Slot> for usize {
    #[inline]
    fn from(slot: Slot) -> usize {
        slot.0
    }
}

/// A handle to access stored elements within a `PairingHeap`.
///
/// A handle stays valid until its element is popped. Slots of popped elements
/// are reused by later insertions but every node is stamped with a generation
/// that is unique within the process, so a stale handle never resolves to another element.
/// Handles of one heap do not resolve in unrelated heaps either, only in its clones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: Slot,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Node<T> {
    elem: T,
    generation: u64,
    parent: Option<Slot>,
    child: Option<Slot>,
    sibling: Option<Slot>,
}

impl<T> Node<T> {
    #[inline]
    fn new_root(elem: T, generation: u64) -> Self {
        Node {
            elem,
            generation,
            parent: None,
            child: None,
            sibling: None,
        }
    }

    /// Returns true if this node is the root of its own tree.
    #[inline]
    fn is_detached(&self) -> bool {
        self.parent.is_none() && self.sibling.is_none()
    }
}

/// An addressable pairing heap implementation.
///
/// The heap is a single heap-ordered tree whose root holds the most extreme element
/// according to the comparator `C`. With the default `Natural` comparator this is
/// a max-heap.
///
/// Inserting elements with `add_node` provides the caller with handles that make
/// accessing the elements possible - this is called "addressable".
/// Handles are always local to the associated pairing heap instance (and its clones)
/// and thus should not be exchanged throughout various instances of pairing heaps.
///
/// A special feature of addressable pairing heaps is the possibility to make an
/// already stored element more extreme with the `update` operation which moves it
/// towards the root without removing and reinserting it.
///
/// Cloning a heap deep copies all of its nodes.
#[derive(Clone)]
pub struct PairingHeap<T, C = Natural<T>> {
    /// The root node which holds the most extreme element.
    root: Option<Slot>,

    /// All nodes of the heap. Its length is the number of stored elements.
    nodes: Stash<Node<T>, Slot>,

    cmp: C,
}

impl<T: Ord> PairingHeap<T> {
    /// Creates a new instance of a `PairingHeap` ordered by the natural order of its elements.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> Default for PairingHeap<T, C>
where
    C: Compare<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> PairingHeap<T, C> {
    /// Returns a reference to the `Node` that is associated with the given slot.
    /// Note that this won't fail on usage for a correct implementation of `PairingHeap`.
    #[inline]
    fn node(&self, slot: Slot) -> &Node<T> {
        unsafe { self.nodes.get_unchecked(slot) }
    }

    /// Returns a mutable reference to the `Node` that is associated with the given slot.
    /// Note that this won't fail on usage for a correct implementation of `PairingHeap`.
    #[inline]
    fn node_mut(&mut self, slot: Slot) -> &mut Node<T> {
        unsafe { self.nodes.get_unchecked_mut(slot) }
    }

    /// Returns the slot of the live node the handle refers to.
    #[inline]
    fn resolve(&self, handle: Handle) -> Option<Slot> {
        self.nodes
            .get(handle.slot)
            .filter(|node| node.generation == handle.generation)
            .map(|_| handle.slot)
    }

    /// Iterates over the child list of the given parent node from its head.
    #[inline]
    fn children(&self, parent: Slot) -> Siblings<'_, T, C> {
        Siblings {
            heap: self,
            next: self.node(parent).child,
        }
    }

    /// Returns the comparator that orders this heap.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns true if the given handle refers to an element of this heap.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Returns a reference to the element associated with the given handle.
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.resolve(handle).map(|slot| &self.node(slot).elem)
    }

    /// Returns a mutable reference to the element associated with the given handle.
    ///
    /// Changing the ordering of the element through this reference breaks the heap
    /// order until `update_priorities` is called. Use `update` to make an element
    /// more extreme without a full rebuild.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.resolve(handle) {
            Some(slot) => Some(&mut self.node_mut(slot).elem),
            None => None,
        }
    }

    /// Returns a reference to the most extreme element.
    ///
    /// Does not check for emptiness so use it carefully!
    #[inline]
    pub unsafe fn top_unchecked(&self) -> &T {
        &self.node(self.root.unchecked_unwrap()).elem
    }

    /// Iterate over the elements in this `PairingHeap` by reference in unspecified order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.values().map(|node| &node.elem)
    }

    /// Iterate over the elements in this `PairingHeap` by mutable reference in unspecified order.
    ///
    /// Changing the ordering of elements requires a call to `update_priorities` afterwards.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.nodes.values_mut().map(|node| &mut node.elem)
    }

    /// Removes all elements. Handles to them become stale.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }
}

impl<T, C> PairingHeap<T, C>
where
    C: Compare<T>,
{
    /// Creates a new empty `PairingHeap` ordered by the given comparator.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        PairingHeap {
            root: None,
            nodes: Stash::default(),
            cmp,
        }
    }

    /// Creates a `PairingHeap` holding all elements of the given iterator
    /// and ordered by the given comparator.
    pub fn from_iter_with_comparator<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut heap = Self::with_comparator(cmp);
        heap.extend(iter);
        heap
    }

    /// Melds the two given trees into one and returns its root.
    ///
    /// Whichever root does not compare less than the other stays on top and the
    /// other one becomes the new head of its child list.
    /// Both given nodes must be detached roots of their own trees.
    fn meld(&mut self, fst: Slot, snd: Slot) -> Slot {
        debug_assert!(fst != snd, "cannot meld a tree with itself!");
        debug_assert!(
            self.node(fst).is_detached() && self.node(snd).is_detached(),
            "cannot meld a node that still has a parent or sibling!"
        );

        let (upper, lower) = if self.cmp.compares_lt(&self.node(fst).elem, &self.node(snd).elem) {
            (snd, fst)
        } else {
            (fst, snd)
        };
        let head = self.node_mut(upper).child.replace(lower);
        let lower_node = self.node_mut(lower);
        lower_node.parent = Some(upper);
        lower_node.sibling = head;
        upper
    }

    /// Cuts the given node out of the child list of its parent.
    ///
    /// The node keeps its own children and is a detached root afterwards.
    fn detach(&mut self, slot: Slot) {
        let node = self.node_mut(slot);
        let sibling = node.sibling.take();
        let parent = match node.parent.take() {
            Some(parent) => parent,
            None => return,
        };
        if self.node(parent).child == Some(slot) {
            self.node_mut(parent).child = sibling;
            return;
        }
        let prev = self
            .children(parent)
            .find(|&child| self.node(child).sibling == Some(slot));
        if let Some(prev) = prev {
            self.node_mut(prev).sibling = sibling;
        }
    }

    /// Detaches all children of the given node and combines them into a single tree.
    ///
    /// Children are melded pairwise from the front of the list and every melded
    /// tree is queued at its back until only one tree is left.
    fn combine_children(&mut self, parent: Slot) -> Option<Slot> {
        let mut pending = self.children(parent).collect::<VecDeque<_>>();
        self.node_mut(parent).child = None;
        for &child in pending.iter() {
            let node = self.node_mut(child);
            node.parent = None;
            node.sibling = None;
        }
        loop {
            match (pending.pop_front(), pending.pop_front()) {
                (Some(fst), Some(snd)) => {
                    let melded = self.meld(fst, snd);
                    pending.push_back(melded);
                }
                (last, _) => return last,
            }
        }
    }

    /// Inserts the given element into the `PairingHeap` and returns a `Handle`
    /// to it that allows to directly address it.
    ///
    /// The handle is for example required in order to use methods like `update`.
    pub fn add_node(&mut self, elem: T) -> Handle {
        let generation = next_generation();
        let slot = self.nodes.put(Node::new_root(elem, generation));
        self.root = Some(match self.root {
            None => slot,
            Some(root) => self.meld(root, slot),
        });
        Handle { slot, generation }
    }

    /// Replaces the element associated with the given `handle` by a more extreme one.
    ///
    /// The node keeps its identity, so the handle remains valid. Returns an error
    /// and leaves the heap untouched if the handle is stale or if the new element
    /// does not compare greater than the old one.
    pub fn update(&mut self, handle: Handle, elem: T) -> Result<()> {
        let slot = self.resolve(handle).ok_or(Error::StaleHandle)?;
        if !self.cmp.compares_gt(&elem, &self.node(slot).elem) {
            debug!("rejected update of {:?}: new element is not more extreme", handle);
            return Err(Error::NotMoreExtreme);
        }

        self.node_mut(slot).elem = elem;
        match self.root {
            Some(root) if root != slot => {
                self.detach(slot);
                self.root = Some(self.meld(root, slot));
            }
            _ => (),
        }
        Ok(())
    }

    /// Removes the most extreme element within this `PairingHeap` without
    /// checking for emptiness and returns it.
    ///
    /// So use this method carefully!
    pub unsafe fn pop_unchecked(&mut self) -> T {
        let root = self.root.unchecked_unwrap();
        self.root = self.combine_children(root);
        self.nodes.take_unchecked(root).elem
    }
}

impl<T, C> PriorityQueue for PairingHeap<T, C>
where
    C: Compare<T>,
{
    type Item = T;

    #[inline]
    fn push(&mut self, elem: T) {
        self.add_node(elem);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        match self.is_empty() {
            true => None,
            _ => unsafe { Some(self.pop_unchecked()) },
        }
    }

    #[inline]
    fn top(&self) -> Option<&T> {
        self.root.map(|root| &self.node(root).elem)
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Strips every node down to a single node tree and melds them all together again.
    ///
    /// No node is allocated or freed so all handles stay valid.
    fn update_priorities(&mut self) {
        trace!("rebuilding pairing heap of {} nodes", self.len());
        let mut pending = self.root.take().into_iter().collect::<VecDeque<_>>();
        let mut rebuilt = None;
        while let Some(slot) = pending.pop_front() {
            let node = self.node_mut(slot);
            pending.extend(node.child.take());
            pending.extend(node.sibling.take());
            node.parent = None;
            rebuilt = Some(match rebuilt {
                None => slot,
                Some(acc) => self.meld(acc, slot),
            });
        }
        self.root = rebuilt;
    }

    fn is_valid(&self) -> bool {
        let root = match self.root {
            None => return self.nodes.is_empty(),
            Some(root) => root,
        };
        match self.nodes.get(root) {
            Some(node) if node.is_detached() => (),
            _ => return false,
        }

        let mut seen = 1;
        let mut pending = vec![root];
        while let Some(parent) = pending.pop() {
            let parent_elem = &self.node(parent).elem;
            let mut next = self.node(parent).child;
            while let Some(slot) = next {
                let node = match self.nodes.get(slot) {
                    Some(node) => node,
                    None => return false,
                };
                if node.parent != Some(parent) || self.cmp.compares_lt(parent_elem, &node.elem) {
                    return false;
                }
                seen += 1;
                if seen > self.len() {
                    return false;
                }
                pending.push(slot);
                next = node.sibling;
            }
        }
        seen == self.len()
    }
}

/// Iterator over the slots of a child list.
struct Siblings<'a, T, C> {
    heap: &'a PairingHeap<T, C>,
    next: Option<Slot>,
}

impl<'a, T, C> Iterator for Siblings<'a, T, C> {
    type Item = Slot;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.next = self.heap.node(cur).sibling;
        Some(cur)
    }
}

impl<T, C> Index<Handle> for PairingHeap<T, C> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("no element found for given handle")
    }
}

impl<T, C> IndexMut<Handle> for PairingHeap<T, C> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("no element found for given handle")
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PairingHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C> FromIterator<T> for PairingHeap<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_comparator(iter, C::default())
    }
}

impl<T, C> Extend<T> for PairingHeap<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.add_node(elem);
        }
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use super::*;
    use rand::{seq::SliceRandom, thread_rng};
    use std::collections::BinaryHeap;
    use test::{black_box, Bencher};

    fn setup_sample() -> Vec<i64> {
        let mut sample = (1..100_000).collect::<Vec<i64>>();
        sample.shuffle(&mut thread_rng());
        sample
    }

    #[bench]
    fn pairing_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut ph = PairingHeap::new();
            for &elem in sample.iter() {
                black_box(ph.add_node(elem));
            }
        });
    }

    #[bench]
    fn binary_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut bh = BinaryHeap::new();
            for &elem in sample.iter() {
                black_box(bh.push(elem));
            }
        });
    }

    #[bench]
    fn pairing_heap_pop(bencher: &mut Bencher) {
        let ph = setup_sample().into_iter().collect::<PairingHeap<_>>();
        bencher.iter(|| {
            let mut ph = ph.clone();
            while let Some(_) = black_box(ph.pop()) {}
        });
    }

    #[bench]
    fn binary_heap_pop(bencher: &mut Bencher) {
        let bh = setup_sample().into_iter().collect::<BinaryHeap<_>>();
        bencher.iter(|| {
            let mut bh = bh.clone();
            while let Some(_) = black_box(bh.pop()) {}
        });
    }

    #[bench]
    fn pairing_heap_update_priorities(bencher: &mut Bencher) {
        let mut ph = setup_sample().into_iter().collect::<PairingHeap<_>>();
        bencher.iter(|| {
            ph.update_priorities();
            black_box(ph.top());
        });
    }

    #[bench]
    fn pairing_heap_clone(bencher: &mut Bencher) {
        let ph = setup_sample().into_iter().collect::<PairingHeap<_>>();
        bencher.iter(|| {
            black_box(&ph.clone());
        });
    }
}
