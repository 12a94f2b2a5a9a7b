use vessel_mem::{LinkedSeq, Result};

/// First in, first out, backed by a [`LinkedSeq`].
pub struct Queue<T> {
    items: LinkedSeq<T>,
}

impl<T> Queue<T> {

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

    /// Enqueues at the back.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Result<&mut T> {
        self.items.push_back(value)
    }

    /// Dequeues from the front.
    #[inline(always)]
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop_front()
    }

    /// Next element to be dequeued.
    #[inline(always)]
    pub fn peek_front(&self) -> Result<&T> {
        self.items.front()
    }

    /// Most recently enqueued element.
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

impl<T> Default for Queue<T> {

    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Queue<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.items, f)
    }
}
