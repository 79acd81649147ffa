//! Matching core for a two-sided ride-sharing service.
//!
//! Riders ask the [`Dispatcher`](dispatcher::Dispatcher) for a driver, drivers ask
//! it for a rider, and the dispatcher decides who is matched with whom. Time,
//! transport and persistence belong to the caller.

pub mod config;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod location;
pub mod matching;
pub mod rider;
pub mod shared;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use config::{DispatchConfig, NoIdleDriverPolicy, SelectionStrategy};
pub use dispatcher::{Assignment, DispatchOutcome, Dispatcher};
pub use driver::{Driver, DriverId, DriverState};
pub use error::{DispatchError, Result};
pub use location::{manhattan_distance, Location};
pub use rider::{Rider, RiderId, RiderStatus};
pub use shared::SharedDispatcher;
