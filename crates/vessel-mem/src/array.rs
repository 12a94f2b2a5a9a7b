use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    mem::size_of,
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr::{self, NonNull},
    slice,
};

use vessel_log::{trace, warn};

use crate::{
    Allocator,
    GlobalAlloc,
    CapacityPolicy,
    Hysteresis,
    Comparator,
    ContainerError::{AllocFailed, FixedCapacity, Empty, IndexOutOfBounds, ZeroSizedElement},
    Result,
};

/// Contiguous, growable buffer of `T`.
///
/// Appending is amortized O(1): a full buffer doubles before the write.
/// Inserting or removing anywhere but the back shifts every later element and
/// costs O(n); [`LinkedSeq`](crate::LinkedSeq) is the O(1) alternative at the
/// front. Removals shrink the buffer once it is a quarter full, see
/// [`Hysteresis`].
///
/// Every reallocation moves all elements, so no reference into the array
/// survives a structural mutation. The borrow checker enforces this:
///
/// ```compile_fail
/// let mut arr = vessel_mem::DynArray::<u32>::new().unwrap();
/// arr.push_back(1).unwrap();
/// let first = arr.at(0).unwrap();
/// arr.push_back(2).unwrap();
/// assert_eq!(*first, 1);
/// ```
pub struct DynArray<T, Alloc = GlobalAlloc, CapacityPol = Hysteresis>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{
    data: NonNull<T>,
    capacity: usize,
    len: usize,
    alloc: Alloc,
    _markers: PhantomData<(T, CapacityPol)>,
}

unsafe impl<T, Alloc, CapacityPol> Send for DynArray<T, Alloc, CapacityPol>
    where
        T: Send,
        Alloc: Allocator + Send,
        CapacityPol: CapacityPolicy,
{}

unsafe impl<T, Alloc, CapacityPol> Sync for DynArray<T, Alloc, CapacityPol>
    where
        T: Sync,
        Alloc: Allocator + Sync,
        CapacityPol: CapacityPolicy,
{}

impl<T> DynArray<T> {

    #[inline(always)]
    pub fn new() -> Result<Self> {
        Self::with_capacity_in(0, GlobalAlloc)
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_in(capacity, GlobalAlloc)
    }

    pub fn from_slice(values: &[T]) -> Result<Self>
        where
            T: Clone,
    {
        let mut arr = Self::with_capacity(values.len())?;
        arr.extend_from_slice(values)?;
        Ok(arr)
    }
}

impl<T, Alloc, CapacityPol> DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    #[inline(always)]
    pub fn new_in(alloc: Alloc) -> Result<Self> {
        Self::with_capacity_in(0, alloc)
    }

    /// Creates an empty array holding at least `CapacityPol::MIN_CAPACITY` slots.
    pub fn with_capacity_in(capacity: usize, alloc: Alloc) -> Result<Self> {
        if size_of::<T>() == 0 {
            return Err(ZeroSizedElement)
        }
        let capacity = CapacityPol::initial(capacity);
        let data = unsafe { alloc.allocate_uninit::<T>(capacity) }
            .ok_or(AllocFailed { new_capacity: capacity })?;
        Ok(Self {
            data,
            capacity,
            len: 0,
            alloc,
            _markers: PhantomData,
        })
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
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn allocator(&self) -> &Alloc {
        &self.alloc
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline(always)]
    pub fn at(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { &*self.data.as_ptr().add(index) })
    }

    #[inline(always)]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { &mut *self.data.as_ptr().add(index) })
    }

    #[inline(always)]
    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Empty)
    }

    #[inline(always)]
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().first_mut().ok_or(Empty)
    }

    #[inline(always)]
    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Empty)
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().last_mut().ok_or(Empty)
    }

    /// Moves every element into a fresh buffer of `new_capacity` slots.
    ///
    /// On failure nothing has changed.
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(self.len <= new_capacity);
        let Some(tmp) = (unsafe { self.alloc.allocate_uninit::<T>(new_capacity) }) else {
            warn!(
                "failed to reallocate array of {} from capacity {} to {}",
                core::any::type_name::<T>(), self.capacity, new_capacity,
            );
            return Err(AllocFailed { new_capacity })
        };
        unsafe {
            ptr::copy_nonoverlapping(self.data.as_ptr(), tmp.as_ptr(), self.len);
            self.alloc.free_uninit(self.data, self.capacity);
        }
        trace!("array capacity {} -> {} with len {}", self.capacity, new_capacity, self.len);
        self.data = tmp;
        self.capacity = new_capacity;
        Ok(())
    }

    #[inline(always)]
    fn reserve_one(&mut self) -> Result<()> {
        if self.len < self.capacity {
            return Ok(())
        }
        if !CapacityPol::can_grow() {
            return Err(FixedCapacity { capacity: self.capacity })
        }
        let new_capacity = CapacityPol::grow(self.capacity)
            .ok_or(AllocFailed { new_capacity: usize::MAX })?;
        self.reallocate(new_capacity)
    }

    /// Runs after every removal. A failed shrink keeps the larger buffer, which
    /// still satisfies every invariant.
    #[inline(always)]
    fn shrink_if_sparse(&mut self) {
        if let Some(new_capacity) = CapacityPol::shrink(self.len, self.capacity) {
            let _ = self.reallocate(new_capacity);
        }
    }

    /// Appends `value`, doubling the buffer first if it is full.
    ///
    /// On error the array is unchanged and `value` is dropped.
    #[inline(always)]
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        self.reserve_one()?;
        unsafe {
            let ptr = self.data.as_ptr().add(self.len);
            ptr.write(value);
            self.len += 1;
            Ok(&mut *ptr)
        }
    }

    /// O(n): shifts every element one slot right.
    #[inline(always)]
    pub fn push_front(&mut self, value: T) -> Result<&mut T> {
        self.insert(0, value)
    }

    /// Inserts `value` before `index`, shifting the tail right. O(n - index).
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        if index > self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        self.reserve_one()?;
        unsafe {
            let ptr = self.data.as_ptr().add(index);
            ptr::copy(ptr, ptr.add(1), self.len - index);
            ptr.write(value);
            self.len += 1;
            Ok(&mut *ptr)
        }
    }

    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Empty)
        }
        self.len -= 1;
        let value = unsafe { self.data.as_ptr().add(self.len).read() };
        self.shrink_if_sparse();
        Ok(value)
    }

    /// O(n): shifts every remaining element one slot left.
    pub fn pop_front(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Empty)
        }
        self.erase(0)
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        let value = unsafe {
            let ptr = self.data.as_ptr().add(index);
            let value = ptr.read();
            ptr::copy(ptr.add(1), ptr, self.len - index - 1);
            value
        };
        self.len -= 1;
        self.shrink_if_sparse();
        Ok(value)
    }

    /// Reallocates to exactly `len` slots.
    ///
    /// Fails with [`Empty`](crate::ContainerError::Empty) on an empty array and with
    /// [`AllocFailed`](crate::ContainerError::AllocFailed) if the new buffer cannot be
    /// obtained; the array is unchanged in both cases.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if self.len == 0 {
            return Err(Empty)
        }
        if self.len == self.capacity {
            return Ok(())
        }
        self.reallocate(self.len)
    }

    /// Unstable in-place sort.
    pub fn sort<C>(&mut self, comparator: C)
        where
            C: Comparator<T>,
    {
        self.as_mut_slice().sort_unstable_by(|a, b| comparator.compare(a, b));
    }

    pub fn contains(&self, value: &T) -> bool
        where
            T: PartialEq,
    {
        self.as_slice().contains(value)
    }

    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data.as_ptr(), len));
        }
        self.shrink_if_sparse();
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

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()>
        where
            T: Clone,
    {
        self.try_extend(values.iter().cloned())
    }
}

impl<T, Alloc, CapacityPol> Drop for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data.as_ptr(), self.len));
            self.alloc.free_uninit(self.data, self.capacity);
        }
    }
}

impl<T, Alloc, CapacityPol> Index<usize> for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { &*self.data.as_ptr().add(index) }
    }
}

impl<T, Alloc, CapacityPol> IndexMut<usize> for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { &mut *self.data.as_ptr().add(index) }
    }
}

impl<T, Alloc, CapacityPol> Deref for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, Alloc, CapacityPol> DerefMut for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, Alloc, CapacityPol> AsRef<[T]> for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, Alloc, CapacityPol> AsMut<[T]> for DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'arr, T, Alloc, CapacityPol> IntoIterator for &'arr DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    type Item = &'arr T;
    type IntoIter = slice::Iter<'arr, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'arr, T, Alloc, CapacityPol> IntoIterator for &'arr mut DynArray<T, Alloc, CapacityPol>
    where
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    type Item = &'arr mut T;
    type IntoIter = slice::IterMut<'arr, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, Alloc, CapacityPol> Debug for DynArray<T, Alloc, CapacityPol>
    where
        T: Debug,
        Alloc: Allocator,
        CapacityPol: CapacityPolicy,
{

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::{BudgetAlloc, Fixed, Natural, Reverse};

    #[test]
    fn grows_and_shrinks_on_the_quarter_rule() {
        let mut arr = DynArray::<i32>::with_capacity(2).unwrap();
        arr.push_back(1).unwrap();
        arr.push_back(2).unwrap();
        assert_eq!(arr.capacity(), 2);
        arr.push_back(3).unwrap();
        assert_eq!(arr.capacity(), 4);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.as_slice(), &[1, 2, 3]);
        assert_eq!(arr.pop_back(), Ok(3));
        assert_eq!(arr.capacity(), 4);
        assert_eq!(arr.pop_back(), Ok(2));
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.capacity(), Hysteresis::MIN_CAPACITY);
    }

    #[test]
    fn creation_respects_minimum_capacity() {
        assert_eq!(DynArray::<u8>::new().unwrap().capacity(), 2);
        assert_eq!(DynArray::<u8>::with_capacity(1).unwrap().capacity(), 2);
        assert_eq!(DynArray::<u8>::with_capacity(33).unwrap().capacity(), 33);
        assert_eq!(DynArray::<()>::new().err(), Some(ZeroSizedElement));
    }

    #[test]
    fn insert_and_erase_shift_elements() {
        let mut arr = DynArray::from_slice(&[1, 2, 4]).unwrap();
        arr.insert(2, 3).unwrap();
        arr.push_front(0).unwrap();
        arr.insert(5, 5).unwrap();
        assert_eq!(arr.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(arr.insert(7, 9), Err(IndexOutOfBounds { index: 7, len: 6 }));
        assert_eq!(arr.erase(3), Ok(3));
        assert_eq!(arr.pop_front(), Ok(0));
        assert_eq!(arr.as_slice(), &[1, 2, 4, 5]);
        assert_eq!(arr.erase(4), Err(IndexOutOfBounds { index: 4, len: 4 }));
    }

    #[test]
    fn accessors_report_errors() {
        let mut arr = DynArray::<u16>::new().unwrap();
        assert_eq!(arr.front(), Err(Empty));
        assert_eq!(arr.back(), Err(Empty));
        assert_eq!(arr.pop_back(), Err(Empty));
        assert_eq!(arr.pop_front(), Err(Empty));
        assert_eq!(arr.at(0), Err(IndexOutOfBounds { index: 0, len: 0 }));
        arr.push_back(7).unwrap();
        arr.push_back(9).unwrap();
        *arr.at_mut(1).unwrap() += 1;
        assert_eq!(arr.front(), Ok(&7));
        assert_eq!(arr.back(), Ok(&10));
        assert_eq!(arr[1], 10);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let arr = DynArray::<u16>::new().unwrap();
        let _ = arr[0];
    }

    #[test]
    fn shrink_to_fit_matches_len() {
        let mut arr = DynArray::<u64>::with_capacity(16).unwrap();
        assert_eq!(arr.shrink_to_fit(), Err(Empty));
        assert_eq!(arr.capacity(), 16);
        arr.try_extend(0..5).unwrap();
        arr.shrink_to_fit().unwrap();
        assert_eq!(arr.capacity(), 5);
        arr.shrink_to_fit().unwrap();
        assert_eq!(arr.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn clear_drops_elements_and_shrinks() {
        let mut arr = DynArray::<String>::with_capacity(8).unwrap();
        for i in 0..20 {
            arr.push_back(i.to_string()).unwrap();
        }
        assert_eq!(arr.capacity(), 32);
        arr.clear();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), 8);
        arr.push_back("again".into()).unwrap();
        assert_eq!(arr.back().map(String::as_str), Ok("again"));
    }

    #[test]
    fn sorts_with_any_comparator() {
        let mut arr = DynArray::from_slice(&[5, 3, 8, 1, 9, 2]).unwrap();
        arr.sort(Natural);
        assert_eq!(arr.as_slice(), &[1, 2, 3, 5, 8, 9]);
        arr.sort(Reverse(Natural));
        assert_eq!(arr.as_slice(), &[9, 8, 5, 3, 2, 1]);
        arr.sort(|a: &i32, b: &i32| (a % 3).cmp(&(b % 3)).then(a.cmp(b)));
        assert_eq!(arr.as_slice(), &[3, 9, 1, 2, 5, 8]);
        assert!(arr.contains(&8));
        assert!(!arr.contains(&4));
    }

    #[test]
    fn failed_growth_leaves_array_untouched() {
        let alloc = BudgetAlloc::new(4 * size_of::<u32>());
        let mut arr: DynArray<u32, &BudgetAlloc> = DynArray::with_capacity_in(4, &alloc).unwrap();
        arr.try_extend([1, 2, 3, 4]).unwrap();
        assert_eq!(arr.push_back(5), Err(AllocFailed { new_capacity: 8 }));
        assert_eq!(arr.insert(0, 0), Err(AllocFailed { new_capacity: 8 }));
        assert_eq!(arr.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(arr.capacity(), 4);
        assert_eq!(alloc.failures(), 2);
        alloc.set_limit(usize::MAX);
        arr.push_back(5).unwrap();
        assert_eq!(arr.capacity(), 8);
        drop(arr);
        assert_eq!(alloc.used(), 0);
    }

    #[test]
    fn failed_shrink_keeps_larger_buffer() {
        let alloc = BudgetAlloc::new(usize::MAX);
        let mut arr: DynArray<u8, &BudgetAlloc> = DynArray::with_capacity_in(16, &alloc).unwrap();
        arr.try_extend(0..5).unwrap();
        alloc.set_limit(alloc.used());
        assert_eq!(arr.pop_back(), Ok(4));
        assert_eq!(arr.capacity(), 16);
        assert_eq!(arr.shrink_to_fit(), Err(AllocFailed { new_capacity: 4 }));
        assert_eq!(arr.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn fixed_policy_refuses_to_grow() {
        let mut arr: DynArray<u8, GlobalAlloc, Fixed> = DynArray::with_capacity_in(2, GlobalAlloc).unwrap();
        arr.push_back(1).unwrap();
        arr.push_back(2).unwrap();
        assert_eq!(arr.push_back(3), Err(FixedCapacity { capacity: 2 }));
        arr.clear();
        assert_eq!(arr.capacity(), 2);
    }
}
