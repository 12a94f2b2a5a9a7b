mod iter;
mod sort;

use core::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    ptr::NonNull,
};

use vessel_log::{trace, warn};

use crate::{
    Allocator,
    GlobalAlloc,
    Comparator,
    ContainerError::{AllocFailed, Empty, IndexOutOfBounds, ComparatorNotSet},
    Result,
};

pub use iter::{Iter, IterMut, IntoIter};

struct Node<T> {
    prev: Option<NonNull<Node<T>>>,
    next: Option<NonNull<Node<T>>>,
    value: T,
}

/// Doubly linked sequence of individually allocated nodes.
///
/// Pushing and popping at either end is O(1). Positional access walks from
/// the front and is O(n), so visiting every element through [`at`](Self::at)
/// is O(n²); iterate with [`iter`](Self::iter) instead.
///
/// Ordered operations ([`sort`](Self::sort), [`add_ordered`](Self::add_ordered),
/// [`contains`](Self::contains)) use the comparator installed with
/// [`set_comparator`](Self::set_comparator).
///
/// Each node owns its successor; `prev` is a back-link that never owns. A
/// reference returned by `at`, `front` or `back` cannot outlive the next
/// structural mutation:
///
/// ```compile_fail
/// let mut seq = vessel_mem::LinkedSeq::new();
/// seq.push_back(1).unwrap();
/// let first = seq.front().unwrap();
/// seq.pop_front().unwrap();
/// assert_eq!(*first, 1);
/// ```
pub struct LinkedSeq<T, Alloc: Allocator = GlobalAlloc> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    comparator: Option<Box<dyn Comparator<T>>>,
    alloc: Alloc,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T> LinkedSeq<T> {

    #[inline(always)]
    pub fn new() -> Self {
        Self::new_in(GlobalAlloc)
    }
}

impl<T> Default for LinkedSeq<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Alloc: Allocator> LinkedSeq<T, Alloc> {

    #[inline(always)]
    pub fn new_in(alloc: Alloc) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            comparator: None,
            alloc,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn allocator(&self) -> &Alloc {
        &self.alloc
    }

    fn alloc_node(&self, value: T) -> Result<NonNull<Node<T>>> {
        let Some(node) = (unsafe { self.alloc.allocate_uninit::<Node<T>>(1) }) else {
            warn!("failed to allocate node {} of {}", self.len, core::any::type_name::<T>());
            return Err(AllocFailed { new_capacity: self.len + 1 })
        };
        unsafe {
            node.write(Node {
                prev: None,
                next: None,
                value,
            });
        }
        Ok(node)
    }

    /// Links a detached `node` in front of `at`, or at the back if `at` is `None`.
    unsafe fn link_before(&mut self, node: NonNull<Node<T>>, at: Option<NonNull<Node<T>>>) {
        unsafe {
            let prev = match at {
                Some(at) => (*at.as_ptr()).prev,
                None => self.tail,
            };
            (*node.as_ptr()).prev = prev;
            (*node.as_ptr()).next = at;
            match prev {
                Some(prev) => (*prev.as_ptr()).next = Some(node),
                None => self.head = Some(node),
            }
            match at {
                Some(at) => (*at.as_ptr()).prev = Some(node),
                None => self.tail = Some(node),
            }
        }
        self.len += 1;
    }

    /// Detaches `node` from the chain, frees it and returns its value.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        let Node { prev, next, value } = unsafe { node.read() };
        unsafe {
            match prev {
                Some(prev) => (*prev.as_ptr()).next = next,
                None => self.head = next,
            }
            match next {
                Some(next) => (*next.as_ptr()).prev = prev,
                None => self.tail = prev,
            }
            self.alloc.free_uninit(node, 1);
        }
        self.len -= 1;
        value
    }

    fn node_at(&self, index: usize) -> Result<NonNull<Node<T>>> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        let mut node = self.head;
        for _ in 0..index {
            node = node.and_then(|n| unsafe { (*n.as_ptr()).next });
        }
        node.ok_or(IndexOutOfBounds { index, len: self.len })
    }

    /// Appends `value`. On error the sequence is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        let node = self.alloc_node(value)?;
        unsafe {
            self.link_before(node, None);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    /// Prepends `value`. On error the sequence is unchanged.
    pub fn push_front(&mut self, value: T) -> Result<&mut T> {
        let node = self.alloc_node(value)?;
        unsafe {
            self.link_before(node, self.head);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    /// Inserts `value` so that it ends up at `index`. O(index).
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        if index > self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        let at = if index == self.len { None } else { Some(self.node_at(index)?) };
        let node = self.alloc_node(value)?;
        unsafe {
            self.link_before(node, at);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    pub fn pop_front(&mut self) -> Result<T> {
        let head = self.head.ok_or(Empty)?;
        Ok(unsafe { self.unlink(head) })
    }

    pub fn pop_back(&mut self) -> Result<T> {
        let tail = self.tail.ok_or(Empty)?;
        Ok(unsafe { self.unlink(tail) })
    }

    /// Removes and returns the element at `index`. O(index).
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let node = self.node_at(index)?;
        Ok(unsafe { self.unlink(node) })
    }

    #[inline(always)]
    pub fn front(&self) -> Result<&T> {
        self.head
            .map(|node| unsafe { &(*node.as_ptr()).value })
            .ok_or(Empty)
    }

    #[inline(always)]
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.head
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
            .ok_or(Empty)
    }

    #[inline(always)]
    pub fn back(&self) -> Result<&T> {
        self.tail
            .map(|node| unsafe { &(*node.as_ptr()).value })
            .ok_or(Empty)
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.tail
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
            .ok_or(Empty)
    }

    /// Walks from the front to `index`. O(index).
    pub fn at(&self, index: usize) -> Result<&T> {
        let node = self.node_at(index)?;
        Ok(unsafe { &(*node.as_ptr()).value })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let node = self.node_at(index)?;
        Ok(unsafe { &mut (*node.as_ptr()).value })
    }

    /// Installs the total order used by `sort`, `add_ordered` and `contains`,
    /// replacing any previous one.
    pub fn set_comparator<C>(&mut self, comparator: C)
        where
            C: Comparator<T> + 'static,
    {
        self.comparator = Some(Box::new(comparator));
    }

    pub fn clear_comparator(&mut self) {
        self.comparator = None;
    }

    #[inline(always)]
    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }

    /// Inserts `value` before the first element that compares greater, keeping
    /// an ascending sequence sorted. Equal elements keep insertion order.
    pub fn add_ordered(&mut self, value: T) -> Result<&mut T> {
        let Some(comparator) = self.comparator.as_deref() else {
            return Err(ComparatorNotSet)
        };
        let mut at = self.head;
        while let Some(node) = at {
            let node = unsafe { &*node.as_ptr() };
            if comparator.compare(&node.value, &value) == Ordering::Greater {
                break
            }
            at = node.next;
        }
        let node = self.alloc_node(value)?;
        unsafe {
            self.link_before(node, at);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    /// Whether any element compares equal to `value` under the installed comparator.
    pub fn contains(&self, value: &T) -> Result<bool> {
        let comparator = self.comparator.as_deref().ok_or(ComparatorNotSet)?;
        Ok(self.iter().any(|item| comparator.compare(item, value) == Ordering::Equal))
    }

    /// Stable sort with the installed comparator.
    ///
    /// O(n log n) comparisons, no recursion and no allocation; nodes are
    /// relinked in place, so sorting never fails once a comparator is set.
    /// If the comparator panics the sequence keeps every element, in an
    /// unspecified order.
    pub fn sort(&mut self) -> Result<()> {
        let comparator = self.comparator.as_deref().ok_or(ComparatorNotSet)?;
        if self.len < 2 {
            return Ok(())
        }
        unsafe {
            sort::merge_sort(&mut self.head, &mut self.tail, |a, b| comparator.compare(a, b));
        }
        trace!("sorted {} nodes", self.len);
        Ok(())
    }

    /// Stable sort with an explicit comparator, ignoring the installed one.
    pub fn sort_by<F>(&mut self, compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
    {
        if self.len < 2 {
            return
        }
        unsafe { sort::merge_sort(&mut self.head, &mut self.tail, compare) }
    }

    /// Frees every node. The comparator stays installed.
    pub fn clear(&mut self) {
        let mut node = self.head;
        while let Some(current) = node {
            unsafe {
                let Node { next, value, .. } = current.read();
                drop(value);
                self.alloc.free_uninit(current, 1);
                node = next;
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Appends every item of `iter`, stopping at the first failed push.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
        where
            I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.tail, self.len)
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head, self.tail, self.len)
    }
}

impl<T, Alloc: Allocator> Drop for LinkedSeq<T, Alloc> {

    fn drop(&mut self) {
        self.clear()
    }
}

impl<'seq, T, Alloc: Allocator> IntoIterator for &'seq LinkedSeq<T, Alloc> {

    type Item = &'seq T;
    type IntoIter = Iter<'seq, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'seq, T, Alloc: Allocator> IntoIterator for &'seq mut LinkedSeq<T, Alloc> {

    type Item = &'seq mut T;
    type IntoIter = IterMut<'seq, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, Alloc: Allocator> IntoIterator for LinkedSeq<T, Alloc> {

    type Item = T;
    type IntoIter = IntoIter<T, Alloc>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { seq: self }
    }
}

impl<T: Debug, Alloc: Allocator> Debug for LinkedSeq<T, Alloc> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use std::{
        cell::Cell,
        panic::{self, AssertUnwindSafe},
    };

    use crate::{BudgetAlloc, Natural, Reverse};

    fn collect<T: Clone, A: Allocator>(seq: &LinkedSeq<T, A>) -> Vec<T> {
        seq.iter().cloned().collect()
    }

    /// Walks both directions and checks every link against `len`.
    fn assert_links<T, A: Allocator>(seq: &LinkedSeq<T, A>) {
        assert_eq!(seq.head.is_none(), seq.len == 0);
        assert_eq!(seq.tail.is_none(), seq.len == 0);
        let mut count = 0;
        let mut prev = None;
        let mut node = seq.head;
        while let Some(current) = node {
            unsafe {
                assert_eq!((*current.as_ptr()).prev, prev);
                prev = Some(current);
                node = (*current.as_ptr()).next;
            }
            count += 1;
        }
        assert_eq!(count, seq.len);
        assert_eq!(prev, seq.tail);
        assert_eq!(seq.iter().rev().count(), seq.len);
    }

    #[test]
    fn push_and_pop_both_ends() {
        let mut seq = LinkedSeq::new();
        seq.push_back(2).unwrap();
        seq.push_front(1).unwrap();
        seq.push_back(3).unwrap();
        assert_links(&seq);
        assert_eq!(collect(&seq), [1, 2, 3]);
        assert_eq!(seq.front(), Ok(&1));
        assert_eq!(seq.back(), Ok(&3));
        assert_eq!(seq.pop_back(), Ok(3));
        assert_eq!(seq.pop_front(), Ok(1));
        assert_links(&seq);
        assert_eq!(seq.pop_front(), Ok(2));
        assert_links(&seq);
        assert_eq!(seq.pop_front(), Err(Empty));
        assert_eq!(seq.pop_back(), Err(Empty));
        assert_eq!(seq.front(), Err(Empty));
    }

    #[test]
    fn positional_access() {
        let mut seq = LinkedSeq::new();
        seq.try_extend([10, 20, 40]).unwrap();
        seq.insert(2, 30).unwrap();
        seq.insert(0, 0).unwrap();
        seq.insert(5, 50).unwrap();
        assert_links(&seq);
        assert_eq!(collect(&seq), [0, 10, 20, 30, 40, 50]);
        assert_eq!(seq.at(3), Ok(&30));
        assert_eq!(seq.at(6), Err(IndexOutOfBounds { index: 6, len: 6 }));
        assert_eq!(seq.insert(7, 1), Err(IndexOutOfBounds { index: 7, len: 6 }));
        *seq.at_mut(1).unwrap() = 11;
        assert_eq!(seq.remove(1), Ok(11));
        assert_eq!(seq.remove(4), Ok(50));
        assert_links(&seq);
        assert_eq!(collect(&seq), [0, 20, 30, 40]);
    }

    #[test]
    fn ordered_operations_need_a_comparator() {
        let mut seq = LinkedSeq::new();
        seq.try_extend([3, 1, 2]).unwrap();
        assert_eq!(seq.sort(), Err(ComparatorNotSet));
        assert_eq!(seq.contains(&1), Err(ComparatorNotSet));
        assert_eq!(seq.add_ordered(4), Err(ComparatorNotSet));
        assert_eq!(collect(&seq), [3, 1, 2]);
        seq.set_comparator(Natural);
        assert_eq!(seq.contains(&1), Ok(true));
        assert_eq!(seq.contains(&7), Ok(false));
        seq.clear_comparator();
        assert!(!seq.has_comparator());
    }

    #[test]
    fn sorts_example_sequence() {
        let mut seq = LinkedSeq::new();
        seq.try_extend([5, 3, 8, 1, 9, 2]).unwrap();
        seq.set_comparator(Natural);
        seq.sort().unwrap();
        assert_links(&seq);
        assert_eq!(collect(&seq), [1, 2, 3, 5, 8, 9]);
        seq.set_comparator(Reverse(Natural));
        seq.sort().unwrap();
        assert_links(&seq);
        assert_eq!(collect(&seq), [9, 8, 5, 3, 2, 1]);
    }

    #[test]
    fn sort_is_stable() {
        let mut seq = LinkedSeq::new();
        seq.try_extend([(1, 'a'), (1, 'b'), (0, 'c')]).unwrap();
        seq.set_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        seq.sort().unwrap();
        assert_eq!(collect(&seq), [(0, 'c'), (1, 'a'), (1, 'b')]);
    }

    #[test]
    fn sort_trivial_lengths() {
        let mut seq: LinkedSeq<u8> = LinkedSeq::new();
        seq.set_comparator(Natural);
        seq.sort().unwrap();
        assert_links(&seq);
        seq.push_back(4).unwrap();
        seq.sort().unwrap();
        assert_links(&seq);
        assert_eq!(collect(&seq), [4]);
    }

    #[test]
    fn sort_by_ignores_installed_comparator() {
        let mut seq = LinkedSeq::new();
        seq.try_extend(["pear", "fig", "banana", "kiwi"]).unwrap();
        seq.sort_by(|a, b| a.len().cmp(&b.len()));
        assert_links(&seq);
        assert_eq!(collect(&seq), ["fig", "pear", "kiwi", "banana"]);
    }

    #[test]
    fn panicking_comparator_keeps_every_node() {
        for panic_at in [1, 6, 20, 60, 88] {
            let mut seq = LinkedSeq::new();
            seq.try_extend((0..37u32).rev()).unwrap();
            let calls = Cell::new(0);
            seq.set_comparator(move |a: &u32, b: &u32| {
                calls.set(calls.get() + 1);
                if calls.get() == panic_at {
                    panic!("comparator gave up");
                }
                a.cmp(b)
            });
            let result = panic::catch_unwind(AssertUnwindSafe(|| seq.sort()));
            assert!(result.is_err());
            assert_links(&seq);
            assert_eq!(seq.len(), 37);
            let mut values = collect(&seq);
            values.sort();
            assert_eq!(values, (0..37).collect::<Vec<_>>());
            seq.set_comparator(Natural);
            seq.sort().unwrap();
            assert_links(&seq);
            assert!(seq.iter().copied().eq(0..37));
            assert_eq!(seq.pop_back(), Ok(36));
            assert_eq!(seq.pop_front(), Ok(0));
            assert_links(&seq);
        }
    }

    #[test]
    fn panicking_sort_by_keeps_every_node() {
        let mut seq = LinkedSeq::new();
        seq.try_extend(["d", "a", "c", "b", "e"]).unwrap();
        let mut calls = 0;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            seq.sort_by(|a, b| {
                calls += 1;
                if calls == 4 {
                    panic!("comparator gave up");
                }
                a.cmp(b)
            })
        }));
        assert!(result.is_err());
        assert_links(&seq);
        let mut values = collect(&seq);
        values.sort();
        assert_eq!(values, ["a", "b", "c", "d", "e"]);
        seq.clear();
        assert_links(&seq);
    }

    #[test]
    fn add_ordered_places_ties_after_equals() {
        let mut seq = LinkedSeq::new();
        seq.set_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
        for item in [(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (0, 'e'), (3, 'f'), (4, 'g')] {
            seq.add_ordered(item).unwrap();
        }
        assert_links(&seq);
        assert_eq!(
            collect(&seq),
            [(0, 'e'), (1, 'b'), (2, 'd'), (3, 'a'), (3, 'c'), (3, 'f'), (4, 'g')],
        );
    }

    #[test]
    fn iterators_walk_both_directions() {
        let mut seq = LinkedSeq::new();
        seq.try_extend(1..=5).unwrap();
        for value in &mut seq {
            *value *= 10;
        }
        let mut iter = seq.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&10));
        assert_eq!(iter.next_back(), Some(&50));
        assert_eq!(iter.collect::<Vec<_>>(), [&20, &30, &40]);
        assert_eq!(seq.into_iter().rev().collect::<Vec<_>>(), [50, 40, 30, 20, 10]);
    }

    #[test]
    fn failed_node_allocation_leaves_sequence_untouched() {
        let alloc = BudgetAlloc::new(2 * size_of::<Node<u64>>());
        let mut seq: LinkedSeq<u64, &BudgetAlloc> = LinkedSeq::new_in(&alloc);
        seq.push_back(1).unwrap();
        seq.push_back(2).unwrap();
        assert_eq!(seq.push_back(0), Err(AllocFailed { new_capacity: 3 }));
        assert_eq!(seq.push_front(0), Err(AllocFailed { new_capacity: 3 }));
        assert_eq!(seq.insert(1, 0), Err(AllocFailed { new_capacity: 3 }));
        seq.set_comparator(Natural);
        assert_eq!(seq.add_ordered(0), Err(AllocFailed { new_capacity: 3 }));
        assert_links(&seq);
        assert_eq!(collect(&seq), [1, 2]);
        seq.clear();
        assert_eq!(alloc.used(), 0);
        assert!(seq.has_comparator());
    }

    #[test]
    fn drop_releases_every_node() {
        let alloc = BudgetAlloc::new(usize::MAX);
        {
            let mut seq: LinkedSeq<String, &BudgetAlloc> = LinkedSeq::new_in(&alloc);
            for i in 0..100 {
                seq.push_back(i.to_string()).unwrap();
            }
            assert!(alloc.used() > 0);
        }
        assert_eq!(alloc.used(), 0);
    }
}
