use crate::{DragId, DropListId};

/// Errors returned by the registration and configuration API.
///
/// Pointer and scroll handling never fail; they ignore input they cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDropError {
    /// The item handle is stale or was never registered.
    UnknownItem(DragId),

    /// The list handle is stale or was never registered.
    UnknownList(DropListId),
}

impl std::fmt::Display for DragDropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragDropError::UnknownItem(id) => write!(f, "Unknown drag item: {}", id),
            DragDropError::UnknownList(id) => write!(f, "Unknown drop list: {}", id),
        }
    }
}

impl std::error::Error for DragDropError {}

pub type DragDropResult<T> = Result<T, DragDropError>;
