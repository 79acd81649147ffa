//! Test helpers for common fixtures and generated rosters.
//!
//! Shared by unit tests, the integration tests under `tests/`, and the benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::driver::Driver;
use crate::location::Location;
use crate::rider::Rider;

/// The rider from the reference scenario: "Jim", (1, 1) -> (2, 3), patience 5.
///
/// # Panics
///
/// Never in practice; the fixture values are valid.
pub fn jim() -> Rider {
    Rider::new("Jim", Location::new(1, 1), Location::new(2, 3), 5)
        .expect("fixture rider should be valid")
}

/// An idle driver with speed 1 at `(x, y)`.
///
/// # Panics
///
/// Never in practice; speed 1 is valid.
pub fn driver_at(id: &str, x: i64, y: i64) -> Driver {
    Driver::new(id, Location::new(x, y), 1.0).expect("fixture driver should be valid")
}

/// A waiting rider with patience 5 going from `origin` to `destination`.
///
/// # Panics
///
/// Never in practice; patience 5 is valid.
pub fn rider_at(id: &str, origin: (i64, i64), destination: (i64, i64)) -> Rider {
    Rider::new(
        id,
        Location::new(origin.0, origin.1),
        Location::new(destination.0, destination.1),
        5,
    )
    .expect("fixture rider should be valid")
}

/// Deterministic pseudo-random drivers on a `grid_size` x `grid_size` grid with
/// speeds in `[0.5, 3.0]`. Ids are `driver-0`, `driver-1`, ...
pub fn random_drivers(seed: u64, count: usize, grid_size: i64) -> Vec<Driver> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let location = random_location(&mut rng, grid_size);
            let speed = rng.gen_range(0.5..=3.0);
            Driver::new(format!("driver-{index}"), location, speed)
                .expect("generated speed is always positive")
        })
        .collect()
}

/// Deterministic pseudo-random waiting riders. Ids are `rider-0`, `rider-1`, ...
pub fn random_riders(seed: u64, count: usize, grid_size: i64) -> Vec<Rider> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let origin = random_location(&mut rng, grid_size);
            let destination = random_location(&mut rng, grid_size);
            let patience = rng.gen_range(1..=30);
            Rider::new(format!("rider-{index}"), origin, destination, patience)
                .expect("generated patience is always positive")
        })
        .collect()
}

fn random_location<R: Rng>(rng: &mut R, grid_size: i64) -> Location {
    Location::new(rng.gen_range(0..grid_size), rng.gen_range(0..grid_size))
}
