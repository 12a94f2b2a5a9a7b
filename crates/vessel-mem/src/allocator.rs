use core::{
    alloc::Layout,
    ptr::NonNull,
};

/// Source of raw memory for the containers.
///
/// Returning `None` is how an allocator reports failure; the containers turn it
/// into [`ContainerError::AllocFailed`](crate::ContainerError::AllocFailed)
/// without touching their contents.
pub trait Allocator {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize);

    unsafe fn allocate_uninit<T>(&self, count: usize) -> Option<NonNull<T>> {
        let layout = Layout::array::<T>(count).ok()?;
        unsafe { self.allocate_raw(layout.size(), layout.align()).map(|ptr| ptr.cast::<T>()) }
    }

    unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Layout::array::<T>(count) else {
            return
        };
        unsafe { self.free_raw(ptr.cast::<u8>(), layout.size(), layout.align()) }
    }
}

impl<A: Allocator + ?Sized> Allocator for &A {

    #[inline(always)]
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        unsafe { (**self).allocate_raw(size, align) }
    }

    #[inline(always)]
    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        unsafe { (**self).free_raw(ptr, size, align) }
    }
}
