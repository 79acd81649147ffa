use crate::driver::Driver;
use crate::location::Location;

/// Picks which driver on the roster should serve a pickup at a given location.
///
/// Implementations only choose; they never change driver state. The dispatcher
/// decides whether the choice is committed.
///
/// # Examples
///
/// ```rust
/// use dispatch_core::driver::Driver;
/// use dispatch_core::location::Location;
/// use dispatch_core::matching::{DriverSelector, NearestIdle};
///
/// let roster = vec![
///     Driver::new("Sam", Location::new(5, 5), 1.0).unwrap(),
///     Driver::new("Bob", Location::new(1, 1), 1.0).unwrap(),
/// ];
/// assert_eq!(NearestIdle.select(Location::new(1, 1), &roster), Some(1));
/// ```
pub trait DriverSelector: Send + Sync + std::fmt::Debug {
    /// Returns the roster index of the chosen driver, or `None` when no driver is
    /// eligible.
    ///
    /// # Arguments
    ///
    /// * `pickup` - Where the rider is waiting
    /// * `roster` - Every known driver, in registration order. Busy drivers are
    ///   included and must be skipped.
    fn select(&self, pickup: Location, roster: &[Driver]) -> Option<usize>;

    fn name(&self) -> &'static str;
}
