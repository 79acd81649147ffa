use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(String);

impl RiderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RiderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RiderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a rider is in its lifecycle. `Cancelled` and `Satisfied` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderStatus {
    #[default]
    Waiting,
    Cancelled,
    Satisfied,
}

impl RiderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RiderStatus::Waiting)
    }
}

impl fmt::Display for RiderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiderStatus::Waiting => "waiting",
            RiderStatus::Cancelled => "cancelled",
            RiderStatus::Satisfied => "satisfied",
        };
        f.write_str(label)
    }
}

/// A passenger asking for a ride from `origin` to `destination`.
///
/// `patience` is how many time units the rider tolerates waiting. The dispatcher
/// stores it but never acts on it; whoever drives the clock decides when a rider
/// gives up and calls [`Dispatcher::cancel_ride`](crate::dispatcher::Dispatcher::cancel_ride).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    pub origin: Location,
    pub destination: Location,
    pub status: RiderStatus,
    pub patience: u32,
}

impl Rider {
    /// Creates a waiting rider. Zero patience is rejected.
    pub fn new(
        id: impl Into<RiderId>,
        origin: Location,
        destination: Location,
        patience: u32,
    ) -> Result<Self> {
        let id = id.into();
        if patience == 0 {
            return Err(DispatchError::InvalidPatience { rider: id });
        }
        Ok(Self {
            id,
            origin,
            destination,
            status: RiderStatus::Waiting,
            patience,
        })
    }

    pub fn with_status(mut self, status: RiderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_waiting(&self) -> bool {
        self.status == RiderStatus::Waiting
    }

    /// WAITING -> SATISFIED, once a driver has actually been assigned.
    pub fn mark_satisfied(&mut self) -> Result<()> {
        self.transition(RiderStatus::Satisfied)
    }

    /// WAITING -> CANCELLED.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        self.transition(RiderStatus::Cancelled)
    }

    fn transition(&mut self, next: RiderStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DispatchError::RiderNotWaiting {
                rider: self.id.clone(),
                status: self.status,
            });
        }
        self.status = next;
        Ok(())
    }
}

impl fmt::Display for Rider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
