use crate::driver::Driver;
use crate::location::Location;

use super::algorithm::DriverSelector;

/// Chooses the idle driver with the shortest travel time to the pickup.
///
/// Ties go to the driver registered first: a later driver only replaces the
/// current best when it is strictly faster. Busy drivers are never chosen, no
/// matter how close they are.
///
/// Time complexity: O(n) in the roster size.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestIdle;

impl DriverSelector for NearestIdle {
    fn select(&self, pickup: Location, roster: &[Driver]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, driver) in roster.iter().enumerate() {
            if !driver.is_idle() {
                continue;
            }

            let travel_time = driver.travel_time(pickup);
            match best {
                None => best = Some((index, travel_time)),
                Some((_, best_time)) if travel_time < best_time => {
                    best = Some((index, travel_time))
                }
                _ => {}
            }
        }

        best.map(|(index, _)| index)
    }

    fn name(&self) -> &'static str {
        "nearest_idle"
    }
}
