#![deny(unused_imports)]
#![deny(missing_docs)]
#![cfg_attr(all(feature = "bench", test), feature(test))]

//! Interchangeable priority queues sharing one contract, with an addressable
//! pairing heap at its core.
//!
//! Every queue in this crate implements `PriorityQueue`: it can `push` elements,
//! look at the most extreme one with `top`, remove it with `pop` and restore its
//! ordering with `update_priorities` after elements were mutated behind its back.
//! Which element counts as the most extreme one is decided by a comparator from
//! the `compare` crate that is given at construction. The default `Natural`
//! comparator yields a max-queue, `natural().rev()` yields a min-queue.
//!
//! The variants only differ in their costs:
//!
//! - `UnorderedQueue`: O(1) `push`, O(n) `top` and `pop`.
//! - `SortedQueue`: O(n) `push`, O(1) `top` and `pop`.
//! - `BinaryQueue`: O(log n) `push` and `pop`, O(1) `top`.
//! - `PairingHeap`: O(1) `push`, amortized O(log n) `pop`, O(1) `top`.
//!
//! The `PairingHeap` is also addressable: inserting with `add_node` returns a
//! `Handle` to the stored element which stays valid until that element is popped.
//! Handles allow to read and edit elements and to `update` their priority in place.
//!
//! This implementation stores pairing heap nodes within a `Stash` that allocates
//! them densely within an array.

#[cfg(all(feature = "bench", test))]
extern crate test;

pub use compare::{natural, Compare, Natural};

mod binary_queue;
mod pairing_heap;
mod sorted_queue;
mod unordered_queue;

pub use binary_queue::BinaryQueue;
pub use pairing_heap::{Handle, PairingHeap};
pub use sorted_queue::SortedQueue;
pub use unordered_queue::UnorderedQueue;

/// Errors that can be caused while using `PairingHeap`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Caused when using `update` with a value that is not more extreme than the old one.
    #[error("new value is not more extreme than the current one")]
    NotMoreExtreme,

    /// Caused when using a handle whose element has already been popped.
    #[error("handle does not refer to a live element")]
    StaleHandle,
}

/// Generic `Result` type for `PairingHeap` methods.
pub type Result<T> = ::std::result::Result<T, Error>;

/// The contract shared by every priority queue in this crate.
///
/// The most extreme element is the one that no other element compares greater
/// than under the comparator of the queue.
pub trait PriorityQueue {
    /// The type of the stored elements.
    type Item;

    /// Inserts the given element.
    fn push(&mut self, elem: Self::Item);

    /// Removes the most extreme element and returns it, or `None` if empty.
    fn pop(&mut self) -> Option<Self::Item>;

    /// Returns a reference to the most extreme element, or `None` if empty.
    fn top(&self) -> Option<&Self::Item>;

    /// Returns the number of stored elements.
    fn len(&self) -> usize;

    /// Returns true if no elements are stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restores the ordering of the queue after any number of its elements
    /// were mutated without the queue knowing about it.
    fn update_priorities(&mut self);

    /// Returns true if the internal ordering invariant holds for every element.
    ///
    /// This walks the whole queue and is meant for tests and debug assertions.
    fn is_valid(&self) -> bool;

    /// Iterate over the stored elements from the most to the least extreme one. Drains the queue.
    #[inline]
    fn drain_ordered(self) -> DrainOrdered<Self>
    where
        Self: Sized,
    {
        DrainOrdered { queue: self }
    }
}

/// Iterator over elements of a `PriorityQueue` from the most to the least extreme one.
#[derive(Debug, Clone)]
pub struct DrainOrdered<Q> {
    queue: Q,
}

impl<Q> Iterator for DrainOrdered<Q>
where
    Q: PriorityQueue,
{
    type Item = Q::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<Q> ExactSizeIterator for DrainOrdered<Q> where Q: PriorityQueue {}
