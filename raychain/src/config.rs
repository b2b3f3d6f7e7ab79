use super::Float;

/// Maximum number of hit resolutions performed by a single propagation pass.
pub const MAX_DEPTH: usize = 20;

/// Hits whose squared distance to the ray's origin is not greater than this
/// are ignored. This keeps a ray spawned on a boundary from hitting it again
/// at its own origin.
pub const MIN_HIT_DISTANCE_SQ: Float = 100.0;

/// Length of the probe vector returned by [`reflect`](crate::reflect),
/// which is also the length given to reflected rays.
pub const REFLECT_PROBE_LENGTH: Float = 300.0;

/// Length of the source ray built from the input state each frame.
pub const SOURCE_RAY_LENGTH: Float = 100.0;

/// Default number of boundaries a [`BoundarySet`](crate::BoundarySet) can hold.
pub const DEFAULT_CAPACITY: usize = 7;

/// Tunables of a propagation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub max_depth: usize,
    pub min_hit_distance_sq: Float,
    pub probe_length: Float,
    pub source_length: Float,
}

impl Default for SimulationConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            min_hit_distance_sq: MIN_HIT_DISTANCE_SQ,
            probe_length: REFLECT_PROBE_LENGTH,
            source_length: SOURCE_RAY_LENGTH,
        }
    }
}

impl SimulationConfig {
    #[inline]
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_source_length(mut self, source_length: Float) -> Self {
        self.source_length = source_length;
        self
    }
}
