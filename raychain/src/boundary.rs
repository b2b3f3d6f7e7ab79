use super::*;

use alloc::collections::BTreeSet;
use arrayvec::ArrayVec;
use core::{ops::Index, slice};

/// What happens to a ray hitting a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Response {
    Reflect,
    Absorb,
}

/// Whether the host is allowed to edit a boundary's endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mobility {
    Movable,
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    P1,
    P2,
}

/// A line segment rays can bump into.
///
/// The endpoints of a boundary are always finite and distinct.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    p1: Point,
    p2: Point,
    response: Response,
    mobility: Mobility,
    was_hit: bool,
}

impl Boundary {
    #[inline]
    pub fn try_new(
        p1: Point,
        p2: Point,
        response: Response,
        mobility: Mobility,
    ) -> Result<Self, BoundaryError> {
        check_endpoints(&p1, &p2)?;

        Ok(Self {
            p1,
            p2,
            response,
            mobility,
            was_hit: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn p1(&self) -> &Point {
        &self.p1
    }

    #[inline]
    #[must_use]
    pub const fn p2(&self) -> &Point {
        &self.p2
    }

    #[inline]
    #[must_use]
    pub const fn endpoint(&self, which: Endpoint) -> &Point {
        match which {
            Endpoint::P1 => &self.p1,
            Endpoint::P2 => &self.p2,
        }
    }

    #[inline]
    #[must_use]
    pub const fn response(&self) -> Response {
        self.response
    }

    #[inline]
    #[must_use]
    pub const fn mobility(&self) -> Mobility {
        self.mobility
    }

    #[inline]
    #[must_use]
    pub fn is_movable(&self) -> bool {
        self.mobility == Mobility::Movable
    }

    /// Whether this boundary produced a hit during the last recorded pass.
    #[inline]
    #[must_use]
    pub const fn was_hit(&self) -> bool {
        self.was_hit
    }

    /// `p2 - p1`
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Point {
        self.p2 - self.p1
    }

    /// A (non-unit) vector orthogonal to this boundary.
    #[inline]
    #[must_use]
    pub fn perpendicular(&self) -> Point {
        let d = self.direction();
        Point::new(d.y, -d.x)
    }

    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> Point {
        (self.p1 + self.p2) / 2.0
    }

    /// The unit normal of this boundary on `from`'s side, see [`facing_normal`].
    #[inline]
    #[must_use]
    pub fn normal_towards(&self, from: &Point) -> Option<Unit<Point>> {
        facing_normal(&self.p1, &self.p2, from)
    }

    fn set_endpoints(&mut self, p1: Point, p2: Point) -> Result<(), BoundaryError> {
        check_endpoints(&p1, &p2)?;
        self.p1 = p1;
        self.p2 = p2;
        Ok(())
    }
}

fn check_endpoints(p1: &Point, p2: &Point) -> Result<(), BoundaryError> {
    if !(is_finite(p1) && is_finite(p2)) {
        Err(BoundaryError::NonFinite)
    } else if p1 == p2 {
        Err(BoundaryError::DegenerateBoundary)
    } else {
        Ok(())
    }
}

/// The flat representation of a boundary, as found in layout files.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryRecord {
    pub x1: Float,
    pub y1: Float,
    pub x2: Float,
    pub y2: Float,
    pub response: Response,
    pub mobility: Mobility,
}

impl TryFrom<BoundaryRecord> for Boundary {
    type Error = BoundaryError;

    #[inline]
    fn try_from(r: BoundaryRecord) -> Result<Self, Self::Error> {
        Self::try_new(
            Point::new(r.x1, r.y1),
            Point::new(r.x2, r.y2),
            r.response,
            r.mobility,
        )
    }
}

impl From<&Boundary> for BoundaryRecord {
    #[inline]
    fn from(b: &Boundary) -> Self {
        Self {
            x1: b.p1.x,
            y1: b.p1.y,
            x2: b.p2.x,
            y2: b.p2.y,
            response: b.response,
            mobility: b.mobility,
        }
    }
}

/// How a frame ended, as far as the puzzle is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every reflecting boundary was hit, and no absorbing one was.
    Won,
    /// An absorbing boundary was hit.
    Lost,
    Playing,
}

/// A fixed-capacity collection of boundaries.
///
/// Boundaries are never removed, their indices are stable.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundarySet<const N: usize = DEFAULT_CAPACITY> {
    boundaries: ArrayVec<Boundary, N>,
}

impl<const N: usize> Default for BoundarySet<N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BoundarySet<N> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            boundaries: ArrayVec::new_const(),
        }
    }

    /// Builds a set from flat records, failing on the first invalid one.
    pub fn try_from_records(
        records: impl IntoIterator<Item = BoundaryRecord>,
    ) -> Result<Self, BoundaryError> {
        let mut set = Self::new();
        for record in records {
            set.push(record.try_into()?)?;
        }
        Ok(set)
    }

    /// Adds `boundary` to the set, returning its index.
    ///
    /// Its hit flag is cleared.
    #[inline]
    pub fn push(&mut self, mut boundary: Boundary) -> Result<usize, BoundaryError> {
        boundary.was_hit = false;
        let index = self.boundaries.len();

        self.boundaries.try_push(boundary).map_err(|_| {
            log::warn!("rejected boundary {index}: set is full");
            BoundaryError::CapacityExceeded { capacity: N }
        })?;

        Ok(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Boundary> {
        self.boundaries.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Boundary> {
        self.boundaries.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Boundary] {
        &self.boundaries
    }

    fn movable_mut(&mut self, index: usize) -> Result<&mut Boundary, BoundaryError> {
        let len = self.len();
        let boundary = self
            .boundaries
            .get_mut(index)
            .ok_or(BoundaryError::IndexOutOfRange { index, len })?;

        if boundary.is_movable() {
            Ok(boundary)
        } else {
            Err(BoundaryError::StaticBoundary { index })
        }
    }

    /// Replaces both endpoints of the movable boundary at `index`.
    ///
    /// Leaves the boundary untouched on error.
    pub fn set_endpoints(&mut self, index: usize, p1: Point, p2: Point) -> Result<(), BoundaryError> {
        self.movable_mut(index)?.set_endpoints(p1, p2).inspect_err(|e| {
            log::warn!("rejected edit of boundary {index}: {e}");
        })
    }

    /// Moves one endpoint of the movable boundary at `index` to `to`.
    pub fn move_endpoint(
        &mut self,
        index: usize,
        which: Endpoint,
        to: Point,
    ) -> Result<(), BoundaryError> {
        let b = self.movable_mut(index)?;
        let (p1, p2) = match which {
            Endpoint::P1 => (to, b.p2),
            Endpoint::P2 => (b.p1, to),
        };
        self.set_endpoints(index, p1, p2)
    }

    /// Moves the whole movable boundary at `index` by `delta`.
    pub fn translate(&mut self, index: usize, delta: &Point) -> Result<(), BoundaryError> {
        let b = self.movable_mut(index)?;
        let (p1, p2) = (b.p1 + delta, b.p2 + delta);
        self.set_endpoints(index, p1, p2)
    }

    /// Clears every boundary's hit flag. Done once at the start of a frame.
    #[inline]
    pub fn reset_hit_flags(&mut self) {
        self.boundaries.iter_mut().for_each(|b| b.was_hit = false);
    }

    /// Sets the hit flag of every boundary whose index is in `hits`.
    /// Out of range indices are ignored.
    #[inline]
    pub fn apply_hits(&mut self, hits: &BTreeSet<usize>) {
        for &i in hits {
            if let Some(b) = self.boundaries.get_mut(i) {
                b.was_hit = true;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn was_hit(&self, index: usize) -> bool {
        self.get(index).is_some_and(Boundary::was_hit)
    }

    #[inline]
    #[must_use]
    pub fn any_absorber_hit(&self) -> bool {
        self.iter()
            .any(|b| b.was_hit && b.response == Response::Absorb)
    }

    /// `true` if every reflecting boundary was hit. Vacuously true when
    /// there are none.
    #[inline]
    #[must_use]
    pub fn all_reflectors_hit(&self) -> bool {
        self.iter()
            .filter(|b| b.response == Response::Reflect)
            .all(|b| b.was_hit)
    }

    /// Win/lose state according to the current hit flags.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.any_absorber_hit() {
            Outcome::Lost
        } else if self.iter().any(|b| b.response == Response::Reflect) && self.all_reflectors_hit() {
            Outcome::Won
        } else {
            Outcome::Playing
        }
    }

    /// Runs one frame: clears the hit flags, builds the source ray going from
    /// `source` towards `aim`, propagates it, then records the hits.
    pub fn propagate_frame(
        &mut self,
        source: Point,
        aim: Point,
        config: &SimulationConfig,
    ) -> Result<Propagation, RayError> {
        self.reset_hit_flags();

        let initial = Ray::from_source(source, aim, config.source_length)?;
        let propagation = propagate_with(initial, self.as_slice(), config);

        self.apply_hits(&propagation.hits);
        Ok(propagation)
    }
}

impl<const N: usize> Index<usize> for BoundarySet<N> {
    type Output = Boundary;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.boundaries[index]
    }
}

impl<'a, const N: usize> IntoIterator for &'a BoundarySet<N> {
    type Item = &'a Boundary;
    type IntoIter = slice::Iter<'a, Boundary>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x1: Float, y1: Float, x2: Float, y2: Float, mobility: Mobility) -> BoundaryRecord {
        BoundaryRecord {
            x1,
            y1,
            x2,
            y2,
            response: Response::Reflect,
            mobility,
        }
    }

    #[test]
    fn degenerate_boundaries_are_rejected() {
        let p = Point::new(4.0, 2.0);
        assert_eq!(
            Boundary::try_new(p, p, Response::Absorb, Mobility::Static),
            Err(BoundaryError::DegenerateBoundary)
        );
        assert_eq!(
            Boundary::try_new(p, Point::new(Float::NAN, 0.0), Response::Absorb, Mobility::Static),
            Err(BoundaryError::NonFinite)
        );
    }

    #[test]
    fn pushing_past_capacity_fails() {
        let mut set = BoundarySet::<2>::new();
        for i in 0..2 {
            let b = record(0.0, i as Float, 10.0, i as Float, Mobility::Static);
            assert_eq!(set.push(b.try_into().unwrap()), Ok(i));
        }

        let b = record(0.0, 5.0, 10.0, 5.0, Mobility::Static);
        assert_eq!(
            set.push(b.try_into().unwrap()),
            Err(BoundaryError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(BoundarySet::<DEFAULT_CAPACITY>::new().capacity(), 7);
    }

    #[test]
    fn records_round_trip() {
        let r = BoundaryRecord {
            x1: 90.0,
            y1: 40.0,
            x2: 100.0,
            y2: 100.0,
            response: Response::Absorb,
            mobility: Mobility::Movable,
        };
        let b = Boundary::try_from(r).unwrap();
        assert_eq!(BoundaryRecord::from(&b), r);
    }

    #[test]
    fn bad_record_fails_the_whole_set() {
        let records = [
            record(0.0, 0.0, 1.0, 1.0, Mobility::Static),
            record(3.0, 3.0, 3.0, 3.0, Mobility::Static),
        ];
        assert_eq!(
            BoundarySet::<4>::try_from_records(records),
            Err(BoundaryError::DegenerateBoundary)
        );
    }

    #[test]
    fn only_movable_boundaries_can_be_edited() {
        let mut set = BoundarySet::<4>::try_from_records([
            record(0.0, 0.0, 10.0, 0.0, Mobility::Movable),
            record(0.0, 5.0, 10.0, 5.0, Mobility::Static),
        ])
        .unwrap();

        set.move_endpoint(0, Endpoint::P2, Point::new(20.0, 5.0)).unwrap();
        assert_eq!(set[0].p2(), &Point::new(20.0, 5.0));

        set.translate(0, &Point::new(1.0, 1.0)).unwrap();
        assert_eq!(set[0].p1(), &Point::new(1.0, 1.0));
        assert_eq!(set[0].p2(), &Point::new(21.0, 6.0));

        assert_eq!(
            set.translate(1, &Point::new(1.0, 1.0)),
            Err(BoundaryError::StaticBoundary { index: 1 })
        );
        assert_eq!(
            set.move_endpoint(2, Endpoint::P1, Point::zeros()),
            Err(BoundaryError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn edits_cant_make_a_boundary_degenerate() {
        let mut set =
            BoundarySet::<1>::try_from_records([record(0.0, 0.0, 10.0, 0.0, Mobility::Movable)])
                .unwrap();

        assert_eq!(
            set.move_endpoint(0, Endpoint::P1, Point::new(10.0, 0.0)),
            Err(BoundaryError::DegenerateBoundary)
        );
        assert_eq!(set[0].p1(), &Point::zeros());
    }

    #[test]
    fn hit_flags_and_outcome() {
        let mut set = BoundarySet::<3>::try_from_records([
            record(0.0, 0.0, 10.0, 0.0, Mobility::Static),
            record(0.0, 5.0, 10.0, 5.0, Mobility::Static),
            BoundaryRecord {
                response: Response::Absorb,
                ..record(0.0, 9.0, 10.0, 9.0, Mobility::Static)
            },
        ])
        .unwrap();

        assert_eq!(set.outcome(), Outcome::Playing);

        set.apply_hits(&BTreeSet::from([0, 1, 42]));
        assert!(set.was_hit(0) && set.was_hit(1) && !set.was_hit(2));
        assert_eq!(set.outcome(), Outcome::Won);

        set.apply_hits(&BTreeSet::from([2]));
        assert_eq!(set.outcome(), Outcome::Lost);

        set.reset_hit_flags();
        assert!(set.iter().all(|b| !b.was_hit()));
        assert_eq!(set.outcome(), Outcome::Playing);
    }

    #[test]
    fn pushed_boundaries_start_unhit() {
        let mut set = BoundarySet::<1>::new();
        let mut b = Boundary::try_from(record(0.0, 0.0, 1.0, 0.0, Mobility::Static)).unwrap();
        b.was_hit = true;
        set.push(b).unwrap();
        assert!(!set.was_hit(0));
    }
}
