use core::{
    marker::PhantomData,
    ptr::NonNull,
};

use crate::Allocator;

use super::{LinkedSeq, Node};

pub struct Iter<'a, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {

    #[inline(always)]
    pub(super) fn new(head: Option<NonNull<Node<T>>>, tail: Option<NonNull<Node<T>>>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {

    fn clone(&self) -> Self {
        Self::new(self.head, self.tail, self.len)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {

    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.head.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.len -= 1;
            self.head = node.next;
            &node.value
        })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {

    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.tail.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.len -= 1;
            self.tail = node.prev;
            &node.value
        })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

pub struct IterMut<'a, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> IterMut<'a, T> {

    #[inline(always)]
    pub(super) fn new(head: Option<NonNull<Node<T>>>, tail: Option<NonNull<Node<T>>>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {

    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.head.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.len -= 1;
            self.head = node.next;
            &mut node.value
        })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {

    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        self.tail.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.len -= 1;
            self.tail = node.prev;
            &mut node.value
        })
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

pub struct IntoIter<T, Alloc: Allocator> {
    pub(super) seq: LinkedSeq<T, Alloc>,
}

impl<T, Alloc: Allocator> Iterator for IntoIter<T, Alloc> {

    type Item = T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.seq.pop_front().ok()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.seq.len(), Some(self.seq.len()))
    }
}

impl<T, Alloc: Allocator> DoubleEndedIterator for IntoIter<T, Alloc> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.seq.pop_back().ok()
    }
}

impl<T, Alloc: Allocator> ExactSizeIterator for IntoIter<T, Alloc> {}
