use proptest::prelude::*;
use raychain::*;

fn coord() -> impl Strategy<Value = Float> {
    -500.0..500.0
}

fn response() -> impl Strategy<Value = Response> {
    prop_oneof![Just(Response::Reflect), Just(Response::Absorb)]
}

fn boundary() -> impl Strategy<Value = Boundary> {
    (coord(), coord(), coord(), coord(), response()).prop_filter_map(
        "degenerate boundary",
        |(x1, y1, x2, y2, response)| {
            Boundary::try_new(
                Point::new(x1, y1),
                Point::new(x2, y2),
                response,
                Mobility::Static,
            )
            .ok()
        },
    )
}

fn boundary_set() -> impl Strategy<Value = BoundarySet> {
    prop::collection::vec(boundary(), 0..=DEFAULT_CAPACITY).prop_map(|boundaries| {
        let mut set = BoundarySet::new();
        for b in boundaries {
            set.push(b).unwrap();
        }
        set
    })
}

fn source_ray() -> impl Strategy<Value = Ray> {
    (coord(), coord(), coord(), coord(), 1.0..600.0).prop_filter_map(
        "source and aim coincide",
        |(x, y, ax, ay, length)| Ray::from_source(Point::new(x, y), Point::new(ax, ay), length).ok(),
    )
}

/// A closed square of mirrors centered on the origin.
fn mirror_box() -> BoundarySet {
    let corners = [
        Point::new(-100.0, -100.0),
        Point::new(100.0, -100.0),
        Point::new(100.0, 100.0),
        Point::new(-100.0, 100.0),
    ];

    let mut set = BoundarySet::new();
    for (i, p1) in corners.iter().enumerate() {
        let p2 = corners[(i + 1) % corners.len()];
        set.push(Boundary::try_new(*p1, p2, Response::Reflect, Mobility::Static).unwrap())
            .unwrap();
    }
    set
}

#[test]
fn trapped_ray_stops_after_max_depth() {
    let boundaries = mirror_box();
    let initial = Ray::from_source(Point::new(0.0, 0.0), Point::new(1.0, 2.0), 300.0).unwrap();

    let propagation = propagate(initial, &boundaries);

    assert_eq!(propagation.resolved_hits(), MAX_DEPTH);
    assert_eq!(propagation.chain.len(), MAX_DEPTH + 1);
    assert_eq!(propagation.chain.last().status, RayStatus::MaxDepth);
    assert_eq!(propagation.chain.state(), ChainState::Complete);
}

#[test]
fn every_ray_starts_where_the_previous_hit() {
    let boundaries = mirror_box();
    let initial = Ray::from_source(Point::new(10.0, -30.0), Point::new(-7.0, 5.0), 300.0).unwrap();

    let chain = propagate(initial, &boundaries).chain;

    for pair in chain.as_slice().windows(2) {
        let [prev, next] = pair else { unreachable!() };
        let hit = prev.hit.expect("a ray with a successor must have been stopped");
        assert_eq!(prev.status, RayStatus::Reflected);
        assert_eq!(next.ray.origin, hit.point);
        assert!((prev.ray.endpoint() - hit.point).norm() < 1e-9);
    }
}

#[test]
fn reflections_stay_inside_the_box() {
    let boundaries = mirror_box();
    let initial = Ray::from_source(Point::new(0.0, 0.0), Point::new(1.0, 2.0), 300.0).unwrap();

    for ray in propagate(initial, &boundaries).chain.rays() {
        let p = ray.origin;
        assert!(p.x.abs() <= 100.0 + 1e-9 && p.y.abs() <= 100.0 + 1e-9);
    }
}

#[test]
fn source_layout_of_the_demo() {
    let mut boundaries = BoundarySet::<4>::try_from_records(
        [
            [90.0, 40.0, 100.0, 100.0],
            [140.0, 100.0, 200.0, 160.0],
            [260.0, 100.0, 300.0, 180.0],
            [300.0, 100.0, 430.0, 100.0],
        ]
        .map(|[x1, y1, x2, y2]| BoundaryRecord {
            x1,
            y1,
            x2,
            y2,
            response: Response::Reflect,
            mobility: Mobility::Movable,
        }),
    )
    .unwrap();

    // straight down onto the horizontal mirror, straight back up
    let config = SimulationConfig::default();
    let propagation = boundaries
        .propagate_frame(Point::new(350.0, 50.0), Point::new(350.0, 150.0), &config)
        .unwrap();

    assert_eq!(propagation.chain.len(), 2);
    assert!(boundaries.was_hit(3));
    assert_eq!(boundaries.iter().filter(|b| b.was_hit()).count(), 1);

    let back = &propagation.chain[1].ray;
    assert!((back.direction.into_inner() - Point::new(0.0, -1.0)).norm() < 1e-9);
}

proptest! {
    #[test]
    fn hit_resolutions_are_bounded(boundaries in boundary_set(), initial in source_ray()) {
        let propagation = propagate(initial, &boundaries);

        prop_assert!(propagation.resolved_hits() <= MAX_DEPTH);
        prop_assert!(propagation.chain.len() <= MAX_DEPTH + 1);
        prop_assert!(propagation.hits.iter().all(|&i| i < boundaries.len()));
        prop_assert!(propagation.chain.iter().all(|s| s.status.is_terminated()));
    }

    #[test]
    fn propagation_is_reproducible(boundaries in boundary_set(), initial in source_ray()) {
        let a = propagate(initial, &boundaries);
        let b = propagate(initial, &boundaries);

        prop_assert_eq!(a, b);
    }

    #[test]
    fn chains_never_hold_non_finite_values(boundaries in boundary_set(), initial in source_ray()) {
        for segment in &propagate(initial, &boundaries).chain {
            let (start, end) = segment.endpoints();
            prop_assert!(start.iter().chain(end.iter()).all(|c| c.is_finite()));
        }
    }

    #[test]
    fn hits_respect_the_minimum_distance(boundaries in boundary_set(), initial in source_ray()) {
        for hit in propagate(initial, &boundaries).chain.resolved_hits() {
            prop_assert!(hit.distance_sq > MIN_HIT_DISTANCE_SQ);
        }
    }

    #[test]
    fn empty_set_leaves_the_ray_untouched(initial in source_ray()) {
        let propagation = propagate(initial, &BoundarySet::<DEFAULT_CAPACITY>::new());

        prop_assert_eq!(propagation.chain.len(), 1);
        prop_assert_eq!(propagation.chain[0].ray, initial);
    }

    #[test]
    fn rays_pointing_away_never_hit(
        x in 1.0..500.0,
        y in -500.0..500.0,
        dx in 0.01..1.0,
        dy in -1.0..1.0,
        length in 1.0..1000.0,
    ) {
        let b = Boundary::try_new(
            Point::new(0.0, -1000.0),
            Point::new(0.0, 1000.0),
            Response::Reflect,
            Mobility::Static,
        ).unwrap();
        let ray = Ray::try_new(Point::new(x, y), Point::new(dx, dy), length).unwrap();

        prop_assert_eq!(intersect(&ray, &b), None);
    }
}
