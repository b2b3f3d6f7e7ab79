use super::*;

use alloc::vec::{self, Vec};
use core::{ops::Index, slice};

/// Where a ray is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RayStatus {
    /// Not yet tested against the boundaries.
    Active,
    /// Stopped at a reflecting boundary, where a successor was spawned.
    Reflected,
    /// Stopped at an absorbing boundary.
    Absorbed,
    /// Didn't hit anything, it keeps its full length.
    NoHit,
    /// The pass ran out of hit resolutions before this ray was tested.
    MaxDepth,
}

impl RayStatus {
    #[inline]
    #[must_use]
    pub fn is_terminated(self) -> bool {
        self != Self::Active
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySegment {
    pub ray: Ray,
    pub status: RayStatus,
    /// The hit that stopped this ray, if any.
    pub hit: Option<Hit>,
}

impl RaySegment {
    #[inline]
    #[must_use]
    pub const fn new(ray: Ray) -> Self {
        Self {
            ray,
            status: RayStatus::Active,
            hit: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn endpoints(&self) -> (Point, Point) {
        (self.ray.origin, self.ray.endpoint())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainState {
    Growing,
    Complete,
}

/// Every ray of a propagation pass, in the order they were spawned.
///
/// A chain is never empty: it starts with the pass' initial ray.
#[derive(Clone, Debug, PartialEq)]
pub struct RayChain {
    segments: Vec<RaySegment>,
    state: ChainState,
}

impl RayChain {
    #[inline]
    #[must_use]
    pub fn new(initial: Ray) -> Self {
        Self::with_capacity(initial, 1)
    }

    /// A chain with room for `capacity` rays, the initial one included.
    #[inline]
    #[must_use]
    pub fn with_capacity(initial: Ray, capacity: usize) -> Self {
        let mut segments = Vec::with_capacity(capacity.max(1));
        segments.push(RaySegment::new(initial));
        Self {
            segments,
            state: ChainState::Growing,
        }
    }

    /// Appends `ray` to the chain, returning its index.
    ///
    /// # Panics
    ///
    /// If the chain is complete.
    #[inline]
    pub fn push(&mut self, ray: Ray) -> usize {
        assert_eq!(self.state, ChainState::Growing, "can't grow a complete chain");
        self.segments.push(RaySegment::new(ray));
        self.segments.len() - 1
    }

    /// Stops the ray at `index` where `hit` happened.
    #[inline]
    pub(crate) fn stop_at(&mut self, index: usize, hit: Hit, status: RayStatus) {
        let segment = &mut self.segments[index];
        segment.ray.truncate_at(&hit.point);
        segment.hit = Some(hit);
        segment.status = status;
    }

    #[inline]
    pub(crate) fn set_status(&mut self, index: usize, status: RayStatus) {
        self.segments[index].status = status;
    }

    /// Marks the chain as complete. Rays still active from then on are
    /// marked [`RayStatus::MaxDepth`].
    #[inline]
    pub fn complete(&mut self) {
        self.segments
            .iter_mut()
            .filter(|s| s.status == RayStatus::Active)
            .for_each(|s| s.status = RayStatus::MaxDepth);
        self.state = ChainState::Complete;
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChainState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`, provided for consistency with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RaySegment> {
        self.segments.get(index)
    }

    #[inline]
    #[must_use]
    pub fn initial(&self) -> &RaySegment {
        &self.segments[0]
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> &RaySegment {
        &self.segments[self.segments.len() - 1]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, RaySegment> {
        self.segments.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[RaySegment] {
        &self.segments
    }

    /// The rays of this chain, in spawn order.
    #[inline]
    pub fn rays(&self) -> impl Iterator<Item = &Ray> + '_ {
        self.iter().map(|s| &s.ray)
    }

    /// The `(start, end)` pairs to draw, in spawn order.
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.iter().map(RaySegment::endpoints)
    }

    /// The hits that stopped rays of this chain, in spawn order.
    #[inline]
    pub fn resolved_hits(&self) -> impl Iterator<Item = &Hit> + '_ {
        self.iter().filter_map(|s| s.hit.as_ref())
    }
}

impl Index<usize> for RayChain {
    type Output = RaySegment;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.segments[index]
    }
}

impl<'a> IntoIterator for &'a RayChain {
    type Item = &'a RaySegment;
    type IntoIter = slice::Iter<'a, RaySegment>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for RayChain {
    type Item = RaySegment;
    type IntoIter = vec::IntoIter<RaySegment>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}
