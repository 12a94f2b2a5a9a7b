//! Allocator-aware containers: [`DynArray`], a contiguous buffer with
//! amortized growth and quarter-full shrinking, and [`LinkedSeq`], a doubly
//! linked list with an iterative, stable merge sort.
//!
//! Both draw memory from an [`Allocator`] and report failure as
//! [`ContainerError`] instead of aborting, leaving the container as it was.

pub mod capacity_policy;

mod errors;
mod allocator;
mod global_alloc;
mod budget_alloc;
mod comparator;
mod array;
mod list;

pub use errors::ContainerError;
pub use allocator::Allocator;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use budget_alloc::BudgetAlloc;
pub use capacity_policy::{CapacityPolicy, Hysteresis, Fixed};
pub use comparator::{Comparator, Natural, Reverse};
pub use array::DynArray;
pub use list::{LinkedSeq, Iter, IterMut, IntoIter};

pub type Result<T> = core::result::Result<T, ContainerError>;
