use raychain::*;

pub use rand;

/// Half the side of the square random points are taken from.
pub const MAX_COORD_MAG: Float = 300.0;

pub trait Random: Sized {
    /// Generate a random value of this type using the provided `rng`
    ///
    /// This method must not fail. If creating a value is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for Response {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        if rng.gen_bool(0.75) {
            Self::Reflect
        } else {
            Self::Absorb
        }
    }
}

impl Random for Mobility {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        if rng.gen() {
            Self::Movable
        } else {
            Self::Static
        }
    }
}

impl Random for Boundary {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let response = Response::random(rng);
        let mobility = Mobility::random(rng);

        loop {
            let p1 = rand_point(rng, MAX_COORD_MAG);
            let p2 = rand_point(rng, MAX_COORD_MAG);

            if let Ok(b) = Boundary::try_new(p1, p2, response, mobility) {
                break b;
            }
        }
    }
}

impl Random for Source {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let origin = rand_point(rng, MAX_COORD_MAG);

        let aim = loop {
            let aim = rand_point(rng, MAX_COORD_MAG);
            if aim != origin {
                break aim;
            }
        };

        Self::new(origin, aim)
    }
}

/// A set of `num_boundaries` random boundaries, capped to the capacity of the set.
pub fn random_boundaries<const N: usize>(
    rng: &mut (impl rand::Rng + ?Sized),
    num_boundaries: usize,
) -> BoundarySet<N> {
    let mut set = BoundarySet::new();
    for _ in 0..num_boundaries.min(N) {
        // can't fail, we stay within capacity
        let _ = set.push(Boundary::random(rng));
    }
    set
}

/// A random boundary set, filled to a random length, and a random source.
pub fn random_layout<const N: usize>(
    rng: &mut (impl rand::Rng + ?Sized),
) -> (BoundarySet<N>, Source) {
    let num_boundaries = rng.gen_range(0..=N);
    (random_boundaries(rng, num_boundaries), Source::random(rng))
}

pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Point {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    Point::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn points_stay_in_range() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..1000 {
            let p = rand_point(&mut rng, 10.0);
            assert!(p.x.abs() <= 10.0 && p.y.abs() <= 10.0);
        }
    }

    #[test]
    fn boundary_count_is_capped() {
        let mut rng = Pcg64::seed_from_u64(1);
        let set = random_boundaries::<4>(&mut rng, 10);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn random_layouts_propagate_within_bounds() {
        let mut rng = Pcg64::seed_from_u64(42);
        let config = SimulationConfig::default();

        for _ in 0..200 {
            let (mut boundaries, source) = random_layout::<DEFAULT_CAPACITY>(&mut rng);
            let propagation = boundaries
                .propagate_frame(source.origin, source.aim, &config)
                .unwrap();

            assert!(propagation.chain.len() <= config.max_depth + 1);
            for (i, b) in boundaries.iter().enumerate() {
                assert_eq!(b.was_hit(), propagation.hits.contains(&i));
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = random_layout::<DEFAULT_CAPACITY>(&mut Pcg64::seed_from_u64(3));
        let b = random_layout::<DEFAULT_CAPACITY>(&mut Pcg64::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
