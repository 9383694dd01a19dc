//! A priority queue that searches its elements on demand.

use std::fmt;
use std::iter::FromIterator;

use compare::{natural, Compare, Natural};
use itertools::Itertools;

use crate::PriorityQueue;

/// A priority queue that stores its elements in insertion order and scans
/// them to find the most extreme one.
///
/// Since nothing about the order is cached, mutating elements is always allowed
/// and `update_priorities` has nothing to do.
#[derive(Clone)]
pub struct UnorderedQueue<T, C = Natural<T>> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> UnorderedQueue<T> {
    /// Creates a new empty `UnorderedQueue` ordered by the natural order of its elements.
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> Default for UnorderedQueue<T, C>
where
    C: Compare<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> UnorderedQueue<T, C> {
    /// Returns the comparator that orders this queue.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Iterate over the elements in this `UnorderedQueue` in insertion order,
    /// disturbed by previous pops.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate over the elements in this `UnorderedQueue` by mutable reference.
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

impl<T, C> UnorderedQueue<T, C>
where
    C: Compare<T>,
{
    /// Creates a new empty `UnorderedQueue` ordered by the given comparator.
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        UnorderedQueue {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates an `UnorderedQueue` holding all elements of the given iterator
    /// and ordered by the given comparator.
    pub fn from_iter_with_comparator<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        UnorderedQueue {
            data: iter.into_iter().collect(),
            cmp,
        }
    }

    /// Returns the index of the most extreme element.
    ///
    /// On ties the last one in storage order wins.
    #[inline]
    fn position_of_top(&self) -> Option<usize> {
        let cmp = &self.cmp;
        self.data.iter().position_max_by(|lhs, rhs| cmp.compare(lhs, rhs))
    }
}

impl<T, C> PriorityQueue for UnorderedQueue<T, C>
where
    C: Compare<T>,
{
    type Item = T;

    #[inline]
    fn push(&mut self, elem: T) {
        self.data.push(elem);
    }

    fn pop(&mut self) -> Option<T> {
        self.position_of_top().map(|pos| self.data.swap_remove(pos))
    }

    fn top(&self) -> Option<&T> {
        self.position_of_top().map(|pos| &self.data[pos])
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn update_priorities(&mut self) {}

    #[inline]
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T: fmt::Debug, C> fmt::Debug for UnorderedQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T, C> FromIterator<T> for UnorderedQueue<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_comparator(iter, C::default())
    }
}

impl<T, C> Extend<T> for UnorderedQueue<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_for_top() {
        let mut uq = UnorderedQueue::new();
        uq.extend(vec![3, 9, 1, 9, 4]);
        assert_eq!(Some(&9), uq.top());
        assert_eq!(Some(9), uq.pop());
        assert_eq!(Some(9), uq.pop());
        assert_eq!(Some(&4), uq.top());
        assert_eq!(uq.len(), 3);
    }

    #[test]
    fn mutation_needs_no_rebuild() {
        let mut uq = UnorderedQueue::with_comparator(natural().rev());
        uq.extend(vec![4, 8, 15]);
        for elem in uq.iter_mut().filter(|elem| **elem == 15) {
            *elem = 0;
        }
        assert_eq!(Some(&0), uq.top());
        assert_eq!(uq.drain_ordered().collect::<Vec<_>>(), vec![0, 4, 8]);
    }
}
