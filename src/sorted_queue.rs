//! A priority queue stored as a sorted `Vec`.

use std::fmt;
use std::iter::FromIterator;

use compare::{natural, Compare, Natural};

use crate::PriorityQueue;

/// A priority queue that keeps its elements sorted from the least to the most extreme one.
///
/// Pushing is linear because of the shifting insertion, popping is constant.
#[derive(Clone)]
pub struct SortedQueue<T, C = Natural<T>> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> SortedQueue<T> {
    /// Creates a new empty `SortedQueue` ordered by the natural order of its elements.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> Default for SortedQueue<T, C>
where
    C: Compare<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> SortedQueue<T, C> {
    /// Returns the comparator that orders this queue.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Iterate over the elements in this `SortedQueue` from the least to the most extreme one.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate over the elements in this `SortedQueue` by mutable reference.
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

impl<T, C> SortedQueue<T, C>
where
    C: Compare<T>,
{
    /// Creates a new empty `SortedQueue` ordered by the given comparator.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        SortedQueue {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates a `SortedQueue` holding all elements of the given iterator
    /// and ordered by the given comparator.
    pub fn from_iter_with_comparator<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut queue = SortedQueue {
            data: iter.into_iter().collect(),
            cmp,
        };
        queue.update_priorities();
        queue
    }
}

impl<T, C> PriorityQueue for SortedQueue<T, C>
where
    C: Compare<T>,
{
    type Item = T;

    /// Inserts in front of all equal elements, so equal elements pop in insertion order.
    fn push(&mut self, elem: T) {
        let cmp = &self.cmp;
        let pos = self.data.partition_point(|probe| cmp.compares_lt(probe, &elem));
        self.data.insert(pos, elem);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    #[inline]
    fn top(&self) -> Option<&T> {
        self.data.last()
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    fn update_priorities(&mut self) {
        let cmp = &self.cmp;
        self.data.sort_by(|lhs, rhs| cmp.compare(lhs, rhs));
    }

    fn is_valid(&self) -> bool {
        self.data
            .windows(2)
            .all(|pair| self.cmp.compares_le(&pair[0], &pair[1]))
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T, C> FromIterator<T> for SortedQueue<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_comparator(iter, C::default())
    }
}

impl<T, C> Extend<T> for SortedQueue<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push(elem);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_elements_sorted() {
        let mut sq = SortedQueue::new();
        sq.extend(vec![5, 2, 9, 2, 7]);
        assert!(sq.is_valid());
        assert_eq!(sq.iter().cloned().collect::<Vec<_>>(), vec![2, 2, 5, 7, 9]);
        assert_eq!(Some(&9), sq.top());
        assert_eq!(Some(9), sq.pop());
        assert_eq!(Some(&7), sq.top());
    }

    #[test]
    fn equal_elements_pop_in_insertion_order() {
        let mut sq = SortedQueue::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
        sq.push((1, 'a'));
        sq.push((1, 'b'));
        sq.push((0, 'c'));
        assert_eq!(Some((1, 'a')), sq.pop());
        assert_eq!(Some((1, 'b')), sq.pop());
        assert_eq!(Some((0, 'c')), sq.pop());
        assert_eq!(None, sq.pop());
    }

    #[test]
    fn rebuild_after_mutation() {
        let mut sq = vec![1, 5, 10, 7].into_iter().collect::<SortedQueue<_>>();
        for elem in sq.iter_mut().filter(|elem| **elem == 10) {
            *elem = 3;
        }
        assert!(!sq.is_valid());
        sq.update_priorities();
        assert!(sq.is_valid());
        assert_eq!(sq.drain_ordered().collect::<Vec<_>>(), vec![7, 5, 3, 1]);
    }
}
