//! Error type shared by every dispatch operation.
//!
//! Only precondition violations are errors. "Nothing matched" is always an empty
//! `Option`, never an `Err`.

use thiserror::Error;

use crate::driver::DriverId;
use crate::rider::{RiderId, RiderStatus};

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Travel time divides by speed, so it has to be finite and strictly positive.
    #[error("driver {driver} has invalid speed {speed}; speed must be finite and > 0")]
    InvalidSpeed { driver: DriverId, speed: f64 },

    #[error("rider {rider} has zero patience; patience must be a positive number of time units")]
    InvalidPatience { rider: RiderId },

    #[error("driver {driver} is already driving and cannot start another drive")]
    DriverBusy { driver: DriverId },

    #[error("driver {driver} has no active drive to end")]
    NoActiveDrive { driver: DriverId },

    #[error("driver {driver} has no rider on board")]
    NoActiveRide { driver: DriverId },

    #[error("rider {rider} is {status}, only waiting riders can do that")]
    RiderNotWaiting { rider: RiderId, status: RiderStatus },

    #[error("rider {0} is not on the wait list")]
    UnknownRider(RiderId),

    #[error("driver {0} is not on the roster")]
    UnknownDriver(DriverId),

    #[error("invalid location '{input}': expected \"x,y\" with integer coordinates")]
    InvalidLocation { input: String },

    #[error("invalid dispatch config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read dispatch config: {0}")]
    Io(#[from] std::io::Error),

    #[error("dispatcher lock was poisoned by a panicking holder")]
    LockPoisoned,
}
