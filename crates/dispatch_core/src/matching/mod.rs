pub mod algorithm;
pub mod first_idle;
pub mod nearest_idle;

pub use algorithm::DriverSelector;
pub use first_idle::FirstIdle;
pub use nearest_idle::NearestIdle;
