//! Stack, queue and deque on top of the [`mem`] containers, plus the
//! [`log`] crate the containers report through.

mod error;
mod stack;
mod queue;
mod deque;

pub use vessel_mem as mem;
pub use vessel_log as log;

pub use error::Error;
pub use stack::Stack;
pub use queue::Queue;
pub use deque::Deque;
pub use mem::{
    DynArray,
    LinkedSeq,
    ContainerError,
    Natural,
    Reverse,
};
