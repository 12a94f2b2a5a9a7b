use core::ptr::NonNull;

use parking_lot::Mutex;

use crate::{Allocator, GLOBAL_ALLOC};

struct Budget {
    limit: usize,
    used: usize,
    failures: usize,
}

/// Global-heap allocator that refuses requests once `limit` bytes are live.
///
/// Useful for capping container memory and for forcing allocation failure
/// at an exact point.
pub struct BudgetAlloc {
    budget: Mutex<Budget>,
}

impl BudgetAlloc {

    pub fn new(limit: usize) -> Self {
        Self {
            budget: Mutex::new(Budget {
                limit,
                used: 0,
                failures: 0,
            }),
        }
    }

    #[inline(always)]
    pub fn limit(&self) -> usize {
        self.budget.lock().limit
    }

    #[inline(always)]
    pub fn set_limit(&self, limit: usize) {
        self.budget.lock().limit = limit;
    }

    #[inline(always)]
    pub fn used(&self) -> usize {
        self.budget.lock().used
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        let budget = self.budget.lock();
        budget.limit.saturating_sub(budget.used)
    }

    /// Number of requests refused so far.
    #[inline(always)]
    pub fn failures(&self) -> usize {
        self.budget.lock().failures
    }
}

impl Allocator for BudgetAlloc {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let mut budget = self.budget.lock();
        let fits = budget.used
            .checked_add(size)
            .is_some_and(|total| total <= budget.limit);
        if !fits {
            budget.failures += 1;
            return None
        }
        let ptr = unsafe { GLOBAL_ALLOC.allocate_raw(size, align) };
        match ptr {
            Some(_) => budget.used += size,
            None => budget.failures += 1,
        }
        ptr
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        let mut budget = self.budget.lock();
        unsafe { GLOBAL_ALLOC.free_raw(ptr, size, align) }
        budget.used = budget.used.saturating_sub(size);
    }
}
