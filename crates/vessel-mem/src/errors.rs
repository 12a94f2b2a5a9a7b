#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContainerError {
    AllocFailed {
        new_capacity: usize,
    },
    FixedCapacity {
        capacity: usize,
    },
    Empty,
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    ComparatorNotSet,
    ZeroSizedElement,
}

impl core::fmt::Display for ContainerError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed with new capacity {}", new_capacity)
            },
            Self::FixedCapacity { capacity } => {
                write!(f, "exceeded fixed capacity of {}", capacity)
            },
            Self::Empty => {
                write!(f, "container is empty")
            },
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {} was out of bounds of len {}", index, len)
            },
            Self::ComparatorNotSet => {
                write!(f, "no comparator installed")
            },
            Self::ZeroSizedElement => {
                write!(f, "size of element type is zero")
            },
        }
    }
}

impl core::error::Error for ContainerError {}
