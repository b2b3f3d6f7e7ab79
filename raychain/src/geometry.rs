use super::*;

/// Where two lines, each given by two points, meet.
///
/// `t` locates `point` on the first line (`0` at its first point, `1` at its
/// second), `u` does the same on the second line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineIntersection {
    pub t: Float,
    pub u: Float,
    pub point: Point,
}

impl LineIntersection {
    /// Whether `point` lies on both segments (not only on their lines).
    #[inline]
    #[must_use]
    pub fn within_segments(&self) -> bool {
        (0.0..=1.0).contains(&self.t) && (0.0..=1.0).contains(&self.u)
    }
}

/// Intersects the line through `a1` and `a2` with the line through `b1`
/// and `b2`.
///
/// Returns `None` if the lines are parallel (or collinear), or if the result
/// isn't finite, which happens when they are nearly so.
///
/// See <https://en.wikipedia.org/wiki/Line–line_intersection>
#[inline]
#[must_use]
pub fn line_intersection(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> Option<LineIntersection> {
    let [x1, y1] = [a1.x, a1.y];
    let [x2, y2] = [a2.x, a2.y];
    let [x3, y3] = [b1.x, b1.y];
    let [x4, y4] = [b2.x, b2.y];

    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);

    if den == 0.0 {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / den;
    let u = ((x1 - x3) * (y1 - y2) - (y1 - y3) * (x1 - x2)) / den;

    let point = Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1));

    (t.is_finite() && u.is_finite() && is_finite(&point)).then_some(LineIntersection { t, u, point })
}

/// Intersects the segment covered by `ray` with `boundary`.
///
/// Returns the intersection point if both segments cross (touching
/// endpoints included).
#[inline]
#[must_use]
pub fn intersect(ray: &Ray, boundary: &Boundary) -> Option<Point> {
    line_intersection(&ray.origin, &ray.endpoint(), boundary.p1(), boundary.p2())
        .filter(LineIntersection::within_segments)
        .map(|i| i.point)
}

/// Reflects `incident` w.r.t. the line orthogonal to `normal`, and returns
/// the result scaled to [`REFLECT_PROBE_LENGTH`].
///
/// Returns `None` if either vector is zero.
#[inline]
#[must_use]
pub fn reflect(incident: &Point, normal: &Point) -> Option<Point> {
    reflect_with_probe(incident, normal, REFLECT_PROBE_LENGTH)
}

/// Same as [`reflect`], but the returned vector is `probe_length` long.
#[inline]
#[must_use]
pub fn reflect_with_probe(incident: &Point, normal: &Point, probe_length: Float) -> Option<Point> {
    let n = Unit::try_new(*normal, 0.0)?;
    let n = n.as_ref();

    let p = incident.dot(n);
    let reflected = incident - n * (p + p);

    Unit::try_new(reflected, 0.0).map(|r| r.into_inner() * probe_length)
}

/// The unit normal of the line through `p1` and `p2` pointing towards the
/// half-plane containing `from`.
///
/// Returns `None` if the points coincide, or if `from` is on the line.
#[inline]
#[must_use]
pub fn facing_normal(p1: &Point, p2: &Point, from: &Point) -> Option<Unit<Point>> {
    let d = p2 - p1;
    let normal = Point::new(d.y, -d.x);

    // the sign of this is the side of the line `from` is on
    let side = normal.dot(&(from - p1));

    if side > 0.0 {
        Unit::try_new(normal, 0.0)
    } else if side < 0.0 {
        Unit::try_new(-normal, 0.0)
    } else {
        None
    }
}
