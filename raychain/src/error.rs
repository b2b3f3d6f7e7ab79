use thiserror::Error;

/// Reasons a boundary can't be created, added to, or edited in a
/// [`BoundarySet`](crate::BoundarySet).
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryError {
    /// Both endpoints are the same point, the boundary has no direction.
    #[error("boundary endpoints coincide")]
    DegenerateBoundary,

    #[error("boundary set is full (capacity: {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("no boundary at index {index} (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Only movable boundaries can have their endpoints edited.
    #[error("boundary {index} is static")]
    StaticBoundary { index: usize },

    #[error("boundary coordinates must be finite")]
    NonFinite,
}

/// Reasons a ray can't be created.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayError {
    /// The source and aim points coincide, or the direction vector is zero.
    #[error("ray direction must not be zero")]
    ZeroDirection,

    #[error("ray coordinates must be finite")]
    NonFinite,
}
