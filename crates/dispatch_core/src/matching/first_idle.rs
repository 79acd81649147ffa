use crate::driver::Driver;
use crate::location::Location;

use super::algorithm::DriverSelector;

/// Chooses the first idle driver in registration order, ignoring distance.
///
/// Useful as a baseline and wherever fairness by seniority matters more than
/// pickup time.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstIdle;

impl DriverSelector for FirstIdle {
    fn select(&self, _pickup: Location, roster: &[Driver]) -> Option<usize> {
        roster.iter().position(Driver::is_idle)
    }

    fn name(&self) -> &'static str {
        "first_idle"
    }
}
