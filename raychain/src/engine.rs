use super::*;

use alloc::collections::BTreeSet;

/// A ray hitting a boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Index of the boundary that was hit.
    pub boundary: usize,
    pub point: Point,
    /// The boundary's unit normal on the side the ray came from, if the
    /// ray's origin isn't on the boundary's line.
    pub normal: Option<Unit<Point>>,
    /// Squared distance between the ray's origin and `point`.
    pub distance_sq: Float,
}

/// The result of a propagation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Propagation {
    pub chain: RayChain,
    /// Indices of the boundaries that stopped at least one ray.
    pub hits: BTreeSet<usize>,
}

impl Propagation {
    /// The number of hits resolved during the pass.
    #[inline]
    #[must_use]
    pub fn resolved_hits(&self) -> usize {
        self.chain.resolved_hits().count()
    }
}

/// Finds the hit closest to `ray`'s origin among `boundaries`.
///
/// Hits whose squared distance isn't greater than `min_distance_sq` are
/// discarded. On ties, the boundary with the lowest index wins.
#[must_use]
pub fn closest_hit(ray: &Ray, boundaries: &[Boundary], min_distance_sq: Float) -> Option<Hit> {
    let mut closest: Option<(usize, Point, Float)> = None;

    for (i, boundary) in boundaries.iter().enumerate() {
        let Some(point) = intersect(ray, boundary) else {
            continue;
        };

        let distance_sq = (point - ray.origin).norm_squared();

        if distance_sq > min_distance_sq && closest.map_or(true, |(_, _, d)| distance_sq < d) {
            closest = Some((i, point, distance_sq));
        }
    }

    closest.map(|(boundary, point, distance_sq)| Hit {
        boundary,
        point,
        normal: boundaries[boundary].normal_towards(&ray.origin),
        distance_sq,
    })
}

/// The ray leaving `boundary` after `ray` hit it at `hit`.
///
/// Returns `None` if the reflection is degenerate, which doesn't happen with
/// valid boundaries.
fn reflected_ray(ray: &Ray, boundary: &Boundary, hit: &Hit, probe_length: Float) -> Option<Ray> {
    // the sign of the normal doesn't change the reflection
    let normal = hit
        .normal
        .map_or_else(|| boundary.perpendicular(), Unit::into_inner);

    let probe = reflect_with_probe(ray.direction.as_ref(), &normal, probe_length)?;

    Ray::try_new(hit.point, probe, probe_length).ok()
}

/// Runs a propagation pass with the default [`SimulationConfig`].
#[inline]
#[must_use]
pub fn propagate<const N: usize>(initial: Ray, boundaries: &BoundarySet<N>) -> Propagation {
    propagate_with(initial, boundaries.as_slice(), &SimulationConfig::default())
}

/// Propagates `initial` through `boundaries`.
///
/// Rays are visited in spawn order. For each, the closest hit is resolved:
/// the ray is stopped there and, if the boundary reflects, the reflected ray
/// is appended to the chain. The pass ends when every ray has been visited,
/// or after `config.max_depth` hit resolutions, whichever comes first.
///
/// This function has no side effects. Use [`BoundarySet::apply_hits`] to
/// record the returned hits on the boundaries.
#[must_use]
pub fn propagate_with(initial: Ray, boundaries: &[Boundary], config: &SimulationConfig) -> Propagation {
    // every resolved hit adds at most one ray
    let mut chain = RayChain::with_capacity(initial, config.max_depth.saturating_add(1));
    let mut hits = BTreeSet::new();
    let mut resolved = 0;
    let mut cursor = 0;

    while resolved < config.max_depth {
        let Some(segment) = chain.get(cursor) else {
            break;
        };
        let ray = segment.ray;

        let Some(hit) = closest_hit(&ray, boundaries, config.min_hit_distance_sq) else {
            chain.set_status(cursor, RayStatus::NoHit);
            cursor += 1;
            continue;
        };

        resolved += 1;
        hits.insert(hit.boundary);

        let boundary = &boundaries[hit.boundary];

        log::trace!(
            "ray {cursor} hit boundary {} at ({}, {})",
            hit.boundary,
            hit.point.x,
            hit.point.y,
        );

        match boundary.response() {
            Response::Absorb => chain.stop_at(cursor, hit, RayStatus::Absorbed),
            Response::Reflect => match reflected_ray(&ray, boundary, &hit, config.probe_length) {
                Some(successor) => {
                    chain.stop_at(cursor, hit, RayStatus::Reflected);
                    chain.push(successor);
                }
                None => {
                    log::warn!(
                        "ray {cursor} couldn't be reflected by boundary {}, absorbing it",
                        hit.boundary
                    );
                    chain.stop_at(cursor, hit, RayStatus::Absorbed);
                }
            },
        }

        cursor += 1;
    }

    chain.complete();

    log::debug!(
        "propagation pass done: {} rays, {resolved} hits resolved, boundaries hit: {hits:?}",
        chain.len(),
    );

    Propagation { chain, hits }
}
