use core::{
    cmp::Ordering,
    iter,
    ptr::NonNull,
};

use super::Node;

type Link<T> = Option<NonNull<Node<T>>>;

/// Accumulator slots of the binary-counter merge. Slot `i` holds a run of
/// about `2^i` nodes, so 32 slots cover any list that fits in memory; the last
/// slot absorbs anything beyond.
const SORT_SLOTS: usize = 32;

/// In-progress merge. Dropping it splices whatever is left of both runs after
/// the last emitted node, so the output chain holds every node even if the
/// comparator unwinds.
struct Merge<T> {
    cursor: *mut Link<T>,
    first: Link<T>,
    second: Link<T>,
}

impl<T> Drop for Merge<T> {

    fn drop(&mut self) {
        unsafe {
            match (self.first.take(), self.second.take()) {
                (rest, None) | (None, rest) => *self.cursor = rest,
                (Some(first), Some(second)) => {
                    *self.cursor = Some(first);
                    let mut end = self.cursor;
                    while let Some(node) = *end {
                        end = &raw mut (*node.as_ptr()).next;
                    }
                    *end = Some(second);
                },
            }
        }
    }
}

/// Stable merge of two `next`-threaded runs into `out`. `first` must be the
/// run that was accumulated earlier, it wins ties.
///
/// `prev` links are left stale.
unsafe fn merge<T, F>(out: &mut Link<T>, first: Link<T>, second: Link<T>, compare: &mut F)
    where
        F: FnMut(&T, &T) -> Ordering,
{
    let mut merge = Merge {
        cursor: out,
        first,
        second,
    };
    while let (Some(a), Some(b)) = (merge.first, merge.second) {
        unsafe {
            if compare(&(*b.as_ptr()).value, &(*a.as_ptr()).value) == Ordering::Less {
                *merge.cursor = Some(b);
                merge.cursor = &raw mut (*b.as_ptr()).next;
                merge.second = *merge.cursor;
            }
            else {
                *merge.cursor = Some(a);
                merge.cursor = &raw mut (*a.as_ptr()).next;
                merge.first = *merge.cursor;
            }
        }
    }
}

/// Sort state. Every node is in exactly one of `run`, `slots` or `input`.
///
/// Dropping it threads them back into one chain, restores every `prev` and
/// writes the new ends to the list. After a completed sort only `run` is
/// non-empty; after an unwinding comparator the list keeps all its nodes in
/// some order.
struct Sorter<'a, T> {
    head: &'a mut Link<T>,
    tail: &'a mut Link<T>,
    run: Link<T>,
    slots: [Link<T>; SORT_SLOTS],
    input: Link<T>,
}

impl<'a, T> Drop for Sorter<'a, T> {

    fn drop(&mut self) {
        let mut head = None;
        let mut tail = None;
        let mut end: *mut Link<T> = &raw mut head;
        let runs = iter::once(self.run.take())
            .chain(self.slots.iter_mut().map(Option::take))
            .chain(iter::once(self.input.take()));
        for run in runs {
            let mut node = run;
            while let Some(current) = node {
                unsafe {
                    *end = Some(current);
                    (*current.as_ptr()).prev = tail;
                    end = &raw mut (*current.as_ptr()).next;
                    node = *end;
                }
                tail = Some(current);
            }
        }
        *self.head = head;
        *self.tail = tail;
    }
}

/// Sorts the chain between `head` and `tail` in place and updates both.
///
/// Iterative bottom-up merge sort: each node is fed in as a run of one and
/// carried through the slots like a binary counter, then the slots are merged
/// from smallest to largest. Nodes are relinked in place, no recursion and no
/// allocation. One final walk restores every `prev`.
pub(super) unsafe fn merge_sort<T, F>(head: &mut Link<T>, tail: &mut Link<T>, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
{
    let input = head.take();
    let mut sorter = Sorter {
        head,
        tail,
        run: None,
        slots: [None; SORT_SLOTS],
        input,
    };
    while let Some(node) = sorter.input {
        unsafe {
            sorter.input = (*node.as_ptr()).next;
            (*node.as_ptr()).next = None;
        }
        sorter.run = Some(node);
        let mut i = 0;
        while i < SORT_SLOTS && sorter.slots[i].is_some() {
            let run = sorter.run.take();
            unsafe { merge(&mut sorter.run, sorter.slots[i].take(), run, &mut compare) };
            i += 1;
        }
        if i == SORT_SLOTS {
            i -= 1;
        }
        sorter.slots[i] = sorter.run.take();
    }
    for i in 0..SORT_SLOTS {
        let run = sorter.run.take();
        unsafe { merge(&mut sorter.run, sorter.slots[i].take(), run, &mut compare) };
    }
}
