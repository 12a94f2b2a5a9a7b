use vessel_mem::{LinkedSeq, Result};

/// Double-ended queue, O(1) at both ends.
pub struct Deque<T> {
    items: LinkedSeq<T>,
}

impl<T> Deque<T> {

    #[inline(always)]
    pub fn new() -> Self {
        Self {
            items: LinkedSeq::new(),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline(always)]
    pub fn push_front(&mut self, value: T) -> Result<&mut T> {
        self.items.push_front(value)
    }

    #[inline(always)]
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        self.items.push_back(value)
    }

    #[inline(always)]
    pub fn pop_front(&mut self) -> Result<T> {
        self.items.pop_front()
    }

    #[inline(always)]
    pub fn pop_back(&mut self) -> Result<T> {
        self.items.pop_back()
    }

    #[inline(always)]
    pub fn peek_front(&self) -> Result<&T> {
        self.items.front()
    }

    #[inline(always)]
    pub fn peek_back(&self) -> Result<&T> {
        self.items.back()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline(always)]
    pub fn iter(&self) -> vessel_mem::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Deque<T> {

    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Deque<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.items, f)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use vessel_mem::ContainerError;

    #[test]
    fn both_ends() {
        let mut deque = Deque::new();
        deque.push_back(2).unwrap();
        deque.push_front(1).unwrap();
        deque.push_back(3).unwrap();
        assert_eq!(deque.peek_front(), Ok(&1));
        assert_eq!(deque.peek_back(), Ok(&3));
        assert!(deque.iter().eq(&[1, 2, 3]));
        assert_eq!(deque.pop_back(), Ok(3));
        assert_eq!(deque.pop_front(), Ok(1));
        assert_eq!(deque.pop_front(), Ok(2));
        assert_eq!(deque.pop_back(), Err(ContainerError::Empty));
        assert!(deque.is_empty());
    }
}
