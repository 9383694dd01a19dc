//! A binary heap stored within a `Vec`.

use std::fmt;
use std::iter::FromIterator;

use compare::{natural, Compare, Natural};

use crate::PriorityQueue;

/// A priority queue implemented as a binary heap.
///
/// The element at index `i` is never less extreme than the elements at
/// `2 * i + 1` and `2 * i + 2`, so the most extreme element is at index `0`.
#[derive(Clone)]
pub struct BinaryQueue<T, C = Natural<T>> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> BinaryQueue<T> {
    /// Creates a new empty `BinaryQueue` ordered by the natural order of its elements.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> Default for BinaryQueue<T, C>
where
    C: Compare<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> BinaryQueue<T, C> {
    /// Returns the comparator that orders this queue.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Iterate over the elements in this `BinaryQueue` by reference in unspecified order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate over the elements in this `BinaryQueue` by mutable reference in unspecified order.
    ///
    /// Changing the ordering of elements requires a call to `update_priorities` afterwards.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Removes all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T, C> BinaryQueue<T, C>
where
    C: Compare<T>,
{
    /// Creates a new empty `BinaryQueue` ordered by the given comparator.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        BinaryQueue {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates a `BinaryQueue` holding all elements of the given iterator
    /// and ordered by the given comparator.
    ///
    /// The elements are collected first and then heapified in linear time.
    pub fn from_iter_with_comparator<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut queue = BinaryQueue {
            data: iter.into_iter().collect(),
            cmp,
        };
        queue.heapify();
        queue
    }

    /// Returns true if the element at `fst` is less extreme than the one at `snd`.
    #[inline]
    fn less(&self, fst: usize, snd: usize) -> bool {
        self.cmp.compares_lt(&self.data[fst], &self.data[snd])
    }

    /// Moves the element at `pos` towards the root until its parent is not less extreme.
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(parent, pos) {
                break;
            }
            self.data.swap(parent, pos);
            pos = parent;
        }
    }

    /// Moves the element at `pos` towards the leaves until no child is more extreme.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let mut child = 2 * pos + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && self.less(child, child + 1) {
                child += 1;
            }
            if !self.less(pos, child) {
                break;
            }
            self.data.swap(pos, child);
            pos = child;
        }
    }

    /// Restores the heap order of the whole vector bottom-up.
    fn heapify(&mut self) {
        for pos in (0..self.data.len() / 2).rev() {
            self.sift_down(pos);
        }
    }
}

impl<T, C> PriorityQueue for BinaryQueue<T, C>
where
    C: Compare<T>,
{
    type Item = T;

    #[inline]
    fn push(&mut self, elem: T) {
        self.data.push(elem);
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let elem = self.data.swap_remove(0);
        self.sift_down(0);
        Some(elem)
    }

    #[inline]
    fn top(&self) -> Option<&T> {
        self.data.first()
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn update_priorities(&mut self) {
        self.heapify();
    }

    fn is_valid(&self) -> bool {
        (1..self.data.len()).all(|pos| !self.less((pos - 1) / 2, pos))
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinaryQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T, C> FromIterator<T> for BinaryQueue<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_comparator(iter, C::default())
    }
}

impl<T, C> Extend<T> for BinaryQueue<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.data.reserve(lower);
        for elem in iter {
            self.push(elem);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop() {
        let mut bq = BinaryQueue::new();
        bq.push(3);
        bq.push(4);
        assert_eq!(2, bq.len());
        assert_eq!(Some(&4), bq.top());
        assert_eq!(Some(4), bq.pop());
        assert_eq!(Some(&3), bq.top());
        assert!(!bq.is_empty());
        assert_eq!(Some(3), bq.pop());
        assert!(bq.is_empty());
        assert_eq!(None, bq.pop());
    }

    #[test]
    fn heapify_on_construction() {
        let bq = vec![7, 3, 8, 55, 2, 13, 21].into_iter().collect::<BinaryQueue<_>>();
        assert!(bq.is_valid());
        assert_eq!(Some(&55), bq.top());
        assert_eq!(bq.drain_ordered().collect::<Vec<_>>(), vec![55, 21, 13, 8, 7, 3, 2]);
    }

    #[test]
    fn min_order() {
        let mut bq = BinaryQueue::with_comparator(natural().rev());
        bq.extend(vec![5, 1, 4, 1, 3]);
        assert!(bq.is_valid());
        assert_eq!(bq.drain_ordered().collect::<Vec<_>>(), vec![1, 1, 3, 4, 5]);
    }

    #[test]
    fn rebuild_after_mutation() {
        let mut bq = BinaryQueue::from_iter_with_comparator(vec![1, 5, 10, 7], natural());
        for elem in bq.iter_mut().filter(|elem| **elem == 10) {
            *elem = 3;
        }
        bq.update_priorities();
        assert!(bq.is_valid());
        assert_eq!(bq.drain_ordered().collect::<Vec<_>>(), vec![7, 5, 3, 1]);
    }
}
