/// Chooses how a [`DynArray`](crate::DynArray) sizes its buffer.
pub trait CapacityPolicy {

    /// Smallest capacity the array is ever created or shrunk to.
    const MIN_CAPACITY: usize;

    fn can_grow() -> bool;

    /// Capacity to allocate at creation for a caller hint of `requested`.
    #[inline(always)]
    fn initial(requested: usize) -> usize {
        requested.max(Self::MIN_CAPACITY)
    }

    /// Capacity to move to when a full buffer of `current` elements needs one more slot.
    fn grow(current: usize) -> Option<usize>;

    /// Capacity to move to after a removal left `len` elements in `capacity` slots,
    /// or `None` to keep the buffer.
    fn shrink(len: usize, capacity: usize) -> Option<usize>;
}

/// Doubles when full, shrinks to a quarter once three quarters sit unused.
///
/// The gap between the two thresholds keeps alternating push/pop at a
/// boundary from reallocating on every call.
pub struct Hysteresis {}

impl CapacityPolicy for Hysteresis {

    const MIN_CAPACITY: usize = 2;

    #[inline(always)]
    fn can_grow() -> bool {
        true
    }

    #[inline(always)]
    fn grow(current: usize) -> Option<usize> {
        current.max(1).checked_mul(2)
    }

    #[inline(always)]
    fn shrink(len: usize, capacity: usize) -> Option<usize> {
        if len > capacity / 4 {
            return None
        }
        let target = (capacity / 4).max(Self::MIN_CAPACITY);
        if target < capacity { Some(target) }
        else { None }
    }
}

/// Never reallocates after creation.
pub struct Fixed {}

impl CapacityPolicy for Fixed {

    const MIN_CAPACITY: usize = 1;

    #[inline(always)]
    fn can_grow() -> bool {
        false
    }

    #[inline(always)]
    fn grow(_: usize) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn shrink(_: usize, _: usize) -> Option<usize> {
        None
    }
}
