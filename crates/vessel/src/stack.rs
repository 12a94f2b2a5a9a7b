use vessel_mem::{DynArray, Result};

/// Last in, first out, backed by a [`DynArray`].
pub struct Stack<T> {
    items: DynArray<T>,
}

impl<T> Stack<T> {

    #[inline(always)]
    pub fn new() -> Result<Self> {
        Ok(Self {
            items: DynArray::new()?,
        })
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            items: DynArray::with_capacity(capacity)?,
        })
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
    pub fn push(&mut self, value: T) -> Result<&mut T> {
        self.items.push_back(value)
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop_back()
    }

    /// The most recently pushed element.
    #[inline(always)]
    pub fn peek(&self) -> Result<&T> {
        self.items.back()
    }

    #[inline(always)]
    pub fn peek_mut(&mut self) -> Result<&mut T> {
        self.items.back_mut()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bottom to top.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Stack<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
