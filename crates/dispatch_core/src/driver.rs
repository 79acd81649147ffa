use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::location::Location;
use crate::rider::{Rider, RiderId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DriverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Busy states carry their destination, so "has a destination" and "is not idle"
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DriverState {
    Idle,
    /// Driving empty, e.g. to a pickup point.
    Driving { destination: Location },
    /// Carrying `rider` to `destination`.
    Riding {
        destination: Location,
        rider: RiderId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    id: DriverId,
    location: Location,
    speed: f64,
    state: DriverState,
}

impl Driver {
    /// Creates an idle driver. `speed` must be finite and strictly positive.
    pub fn new(id: impl Into<DriverId>, location: Location, speed: f64) -> Result<Self> {
        let id = id.into();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(DispatchError::InvalidSpeed { driver: id, speed });
        }
        Ok(Self {
            id,
            location,
            speed,
            state: DriverState::Idle,
        })
    }

    pub fn id(&self) -> &DriverId {
        &self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DriverState::Idle)
    }

    pub fn destination(&self) -> Option<Location> {
        match &self.state {
            DriverState::Idle => None,
            DriverState::Driving { destination } | DriverState::Riding { destination, .. } => {
                Some(*destination)
            }
        }
    }

    /// The rider currently on board, if any.
    pub fn passenger(&self) -> Option<&RiderId> {
        match &self.state {
            DriverState::Riding { rider, .. } => Some(rider),
            _ => None,
        }
    }

    /// Manhattan distance to `destination` divided by speed. Not rounded.
    pub fn travel_time(&self, destination: Location) -> f64 {
        self.location.distance_to(&destination) as f64 / self.speed
    }

    /// Starts an empty drive to `location` and returns how long it will take.
    pub fn start_drive(&mut self, location: Location) -> Result<f64> {
        self.ensure_idle()?;
        self.state = DriverState::Driving {
            destination: location,
        };
        Ok(self.travel_time(location))
    }

    /// Arrives at the drive's destination and becomes idle there.
    pub fn end_drive(&mut self) -> Result<()> {
        let DriverState::Driving { destination } = self.state else {
            return Err(DispatchError::NoActiveDrive {
                driver: self.id.clone(),
            });
        };
        self.location = destination;
        self.state = DriverState::Idle;
        Ok(())
    }

    /// Picks up `rider` and starts driving to its destination. Returns the ride time.
    pub fn start_ride(&mut self, rider: &Rider) -> Result<f64> {
        self.ensure_idle()?;
        self.state = DriverState::Riding {
            destination: rider.destination,
            rider: rider.id.clone(),
        };
        Ok(self.travel_time(rider.destination))
    }

    /// Drops the rider off. The driver ends up idle at the ride's destination.
    /// Returns the id of the rider who got out.
    pub fn end_ride(&mut self) -> Result<RiderId> {
        let DriverState::Riding { destination, rider } = &self.state else {
            return Err(DispatchError::NoActiveRide {
                driver: self.id.clone(),
            });
        };
        let (destination, rider) = (*destination, rider.clone());
        self.location = destination;
        self.state = DriverState::Idle;
        Ok(rider)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(DispatchError::DriverBusy {
                driver: self.id.clone(),
            })
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
