use core::cmp::Ordering;

/// Total order over elements, used for sorting, ordered insertion and search.
///
/// Implementations must be pure: the same pair always compares the same way.
pub trait Comparator<T: ?Sized> {

    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
    where
        F: Fn(&T, &T) -> Ordering,
{

    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Ascending order of an [`Ord`] type.
#[derive(Clone, Copy, Default, Debug)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {

    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses another comparator.
#[derive(Clone, Copy, Default, Debug)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {

    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}
