use thiserror::Error;

/// Which side of an element failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// Errors returned by the layout container and the packing optimizer.
///
/// None of these are fatal: the layout is left exactly as it was before the
/// failing call and can be fixed up and retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("element is already registered in this layout")]
    DuplicateElement,
    #[error("element is not registered in this layout")]
    NotFound,
    #[error("child {index} has a non-positive {axis} of {value}")]
    NonPositiveDimension { index: usize, axis: Axis, value: f64 },
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
