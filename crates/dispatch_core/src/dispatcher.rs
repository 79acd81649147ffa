//! The dispatcher: wait list, driver roster, and matching in both directions.
//!
//! Two layers of API live here:
//!
//! - **Candidate selection** (`request_driver`, `request_rider`, `cancel_ride`):
//!   picks who would match without committing anything. Starting the drive,
//!   updating the rider's status and dequeueing are left to the caller.
//! - **Atomic commits** (`dispatch_rider`, `dispatch_driver`, `commit_match`):
//!   selection plus every state change in one call, so a matched driver or rider
//!   can never be handed out twice.
//!
//! The dispatcher owns its copies of riders and drivers. After a rider is queued or
//! a driver registered, the dispatcher's copy is authoritative; reach it through
//! [`Dispatcher::rider_mut`] and [`Dispatcher::driver_mut`].

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::config::{DispatchConfig, NoIdleDriverPolicy};
use crate::driver::{Driver, DriverId};
use crate::error::{DispatchError, Result};
use crate::location::Location;
use crate::matching::DriverSelector;
use crate::rider::{Rider, RiderId, RiderStatus};

/// A committed match: the driver is on the way to pick the rider up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// The rider, already marked satisfied and off the wait list.
    pub rider: Rider,
    pub driver_id: DriverId,
    /// Travel time from the driver's position to the rider's origin.
    pub pickup_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Assigned(Assignment),
    /// No driver was available; the rider now waits on the wait list.
    Queued,
    /// No driver was available and the no-idle-driver policy does not queue
    /// riders in this situation. The rider is handed back untouched.
    Unmatched(Rider),
}

#[derive(Debug)]
pub struct Dispatcher {
    config: DispatchConfig,
    selector: Box<dyn DriverSelector>,
    wait_list: VecDeque<Rider>,
    roster: Vec<Driver>,
    roster_index: HashMap<DriverId, usize>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            selector: config.selection.build(),
            wait_list: VecDeque::new(),
            roster: Vec::new(),
            roster_index: HashMap::new(),
        }
    }

    /// Replaces the selection strategy named in the config with a custom one.
    pub fn with_selector(mut self, selector: Box<dyn DriverSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn selector(&self) -> &dyn DriverSelector {
        self.selector.as_ref()
    }

    /// Riders in request order, oldest first. May hold stale entries whose status
    /// was changed through [`Dispatcher::rider_mut`].
    pub fn wait_list(&self) -> &VecDeque<Rider> {
        &self.wait_list
    }

    /// Drivers in registration order.
    pub fn drivers(&self) -> &[Driver] {
        &self.roster
    }

    pub fn rider(&self, id: &RiderId) -> Option<&Rider> {
        self.wait_list.iter().find(|rider| &rider.id == id)
    }

    pub fn rider_mut(&mut self, id: &RiderId) -> Option<&mut Rider> {
        self.wait_list.iter_mut().find(|rider| &rider.id == id)
    }

    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        let index = *self.roster_index.get(id)?;
        self.roster.get(index)
    }

    pub fn driver_mut(&mut self, id: &DriverId) -> Option<&mut Driver> {
        let index = *self.roster_index.get(id)?;
        self.roster.get_mut(index)
    }

    pub fn idle_driver_count(&self) -> usize {
        self.roster.iter().filter(|driver| driver.is_idle()).count()
    }

    /// Adds `driver` to the roster, or refreshes the entry registered under the
    /// same id. Returns `true` when the driver was new.
    ///
    /// The caller owns the drive and ride lifecycle, so the incoming copy is the
    /// current one: its location and state replace the roster entry in place.
    /// Roster order is kept. Callers that let the dispatcher commit a match
    /// should pick up the roster's copy through [`Dispatcher::driver`] before
    /// announcing the driver again.
    pub fn register_driver(&mut self, driver: &Driver) -> bool {
        if let Some(&index) = self.roster_index.get(driver.id()) {
            let entry = &mut self.roster[index];
            if *entry != *driver {
                if !entry.is_idle() && !driver.is_idle() && entry.state() != driver.state() {
                    log::warn!(
                        "[DISPATCH] Driver {} re-registered with a different trip ({:?} -> {:?})",
                        driver.id(),
                        entry.state(),
                        driver.state()
                    );
                } else {
                    log::debug!(
                        "[DISPATCH] Refreshed driver {} at {} ({:?})",
                        driver.id(),
                        driver.location(),
                        driver.state()
                    );
                }
                *entry = driver.clone();
            }
            return false;
        }

        self.roster_index
            .insert(driver.id().clone(), self.roster.len());
        self.roster.push(driver.clone());
        log::debug!(
            "[DISPATCH] Registered driver {} at {} ({} on roster)",
            driver.id(),
            driver.location(),
            self.roster.len()
        );
        true
    }

    /// Replaces the queued copy of `rider` with the caller's, e.g. after the
    /// caller marked it satisfied. Returns `false` when the rider is not queued.
    ///
    /// A refreshed entry that is no longer waiting is skipped by every matching
    /// operation until it is cancelled or purged.
    pub fn refresh_rider(&mut self, rider: &Rider) -> bool {
        let Some(queued) = self.rider_mut(&rider.id) else {
            return false;
        };
        *queued = rider.clone();
        log::debug!("[DISPATCH] Refreshed rider {} ({})", rider.id, rider.status);
        true
    }

    /// Returns the driver best placed to pick `rider` up, or `None`.
    ///
    /// When no driver is picked, the rider is set to waiting and appended to the
    /// wait list (once), as long as the [`NoIdleDriverPolicy`] allows it. An empty
    /// roster always queues the rider.
    ///
    /// Nothing else changes: the returned driver is not reserved and the rider
    /// is not dequeued. Use [`Dispatcher::dispatch_rider`] to commit.
    pub fn request_driver(&mut self, rider: &mut Rider) -> Result<Option<&Driver>> {
        self.ensure_waitable(rider)?;

        let choice = self.select_driver(rider.origin);
        if choice.is_none() && self.should_enqueue() {
            rider.status = RiderStatus::Waiting;
            self.enqueue(rider.clone());
        }

        Ok(choice.map(|index| &self.roster[index]))
    }

    /// Registers `driver` if it is new, then returns the earliest waiting rider.
    ///
    /// Entries whose status is no longer waiting are skipped. The rider stays on
    /// the wait list; use [`Dispatcher::dispatch_driver`] to commit.
    pub fn request_rider(&mut self, driver: &Driver) -> Option<&Rider> {
        self.register_driver(driver);
        self.wait_list.iter().find(|rider| rider.is_waiting())
    }

    /// Takes the rider with this id off the wait list and returns it.
    ///
    /// Only the first matching entry is removed and the order of the rest is
    /// kept. A removed rider that was still waiting comes back cancelled. An
    /// unknown id is not an error; the result is simply `None`.
    pub fn cancel_ride(&mut self, rider_id: &RiderId) -> Option<Rider> {
        let mut rider = self.remove_from_wait_list(rider_id)?;
        if rider.is_waiting() {
            rider.status = RiderStatus::Cancelled;
        }
        log::info!(
            "[DISPATCH] Rider {} cancelled ({} still waiting)",
            rider.id,
            self.wait_list.len()
        );
        Some(rider)
    }

    /// Matches `rider` to a driver and commits the match, or queues the rider.
    pub fn dispatch_rider(&mut self, mut rider: Rider) -> Result<DispatchOutcome> {
        self.ensure_waitable(&rider)?;

        match self.select_driver(rider.origin) {
            Some(index) => {
                self.check_assignable(index, &rider)?;
                self.remove_from_wait_list(&rider.id);
                Ok(DispatchOutcome::Assigned(self.assign(index, rider)?))
            }
            None if self.should_enqueue() => {
                rider.status = RiderStatus::Waiting;
                self.enqueue(rider);
                Ok(DispatchOutcome::Queued)
            }
            None => {
                log::debug!(
                    "[DISPATCH] Every driver is busy; rider {} was not queued",
                    rider.id
                );
                Ok(DispatchOutcome::Unmatched(rider))
            }
        }
    }

    /// Registers `driver` if it is new and, if its roster entry is idle, commits
    /// it to the earliest waiting rider.
    pub fn dispatch_driver(&mut self, driver: &Driver) -> Result<Option<Assignment>> {
        self.register_driver(driver);

        let Some(&driver_index) = self.roster_index.get(driver.id()) else {
            return Err(DispatchError::UnknownDriver(driver.id().clone()));
        };
        if !self.roster[driver_index].is_idle() {
            return Ok(None);
        }

        let Some(rider_index) = self.wait_list.iter().position(Rider::is_waiting) else {
            return Ok(None);
        };
        self.check_assignable(driver_index, &self.wait_list[rider_index])?;
        let Some(rider) = self.wait_list.remove(rider_index) else {
            return Ok(None);
        };

        self.assign(driver_index, rider).map(Some)
    }

    /// Commits a specific rider to a specific driver, e.g. one the caller chose
    /// through [`Dispatcher::request_driver`].
    ///
    /// Fails without changing anything when the rider is not waiting on the
    /// wait list or the driver is unknown or busy.
    pub fn commit_match(&mut self, rider_id: &RiderId, driver_id: &DriverId) -> Result<Assignment> {
        let rider = self
            .rider(rider_id)
            .ok_or_else(|| DispatchError::UnknownRider(rider_id.clone()))?;
        if !rider.is_waiting() {
            return Err(DispatchError::RiderNotWaiting {
                rider: rider_id.clone(),
                status: rider.status,
            });
        }

        let driver_index = *self
            .roster_index
            .get(driver_id)
            .ok_or_else(|| DispatchError::UnknownDriver(driver_id.clone()))?;
        if !self.roster[driver_index].is_idle() {
            log::warn!(
                "[DISPATCH] Refused to commit rider {} to busy driver {}",
                rider_id,
                driver_id
            );
            return Err(DispatchError::DriverBusy {
                driver: driver_id.clone(),
            });
        }

        let rider = self
            .remove_from_wait_list(rider_id)
            .ok_or_else(|| DispatchError::UnknownRider(rider_id.clone()))?;
        self.assign(driver_index, rider)
    }

    /// Removes every wait-list entry that is no longer waiting and returns them.
    pub fn purge_stale_riders(&mut self) -> Vec<Rider> {
        let (waiting, stale): (VecDeque<Rider>, VecDeque<Rider>) = self
            .wait_list
            .drain(..)
            .partition(|rider| rider.is_waiting());
        self.wait_list = waiting;
        if !stale.is_empty() {
            log::debug!("[DISPATCH] Purged {} stale wait-list entries", stale.len());
        }
        stale.into()
    }

    fn select_driver(&self, pickup: Location) -> Option<usize> {
        if self.roster.is_empty() {
            return None;
        }
        let choice = self.selector.select(pickup, &self.roster);
        log::debug!(
            "[DISPATCH] {} picked {:?} for pickup at {}",
            self.selector.name(),
            choice.map(|index| self.roster[index].id()),
            pickup
        );
        choice
    }

    fn should_enqueue(&self) -> bool {
        self.roster.is_empty()
            || self.config.no_idle_driver == NoIdleDriverPolicy::EnqueueWhenNoneIdle
    }

    fn enqueue(&mut self, rider: Rider) {
        if let Some(queued) = self.rider_mut(&rider.id) {
            log::debug!("[DISPATCH] Rider {} is already waiting", rider.id);
            *queued = rider;
            return;
        }
        log::debug!(
            "[DISPATCH] Rider {} queued at position {}",
            rider.id,
            self.wait_list.len()
        );
        self.wait_list.push_back(rider);
    }

    fn remove_from_wait_list(&mut self, rider_id: &RiderId) -> Option<Rider> {
        let index = self
            .wait_list
            .iter()
            .position(|rider| &rider.id == rider_id)?;
        self.wait_list.remove(index)
    }

    /// Both halves of a match must be free before either one is touched.
    fn check_assignable(&self, driver_index: usize, rider: &Rider) -> Result<()> {
        let driver = &self.roster[driver_index];
        if !driver.is_idle() {
            return Err(DispatchError::DriverBusy {
                driver: driver.id().clone(),
            });
        }
        if !rider.is_waiting() {
            return Err(DispatchError::RiderNotWaiting {
                rider: rider.id.clone(),
                status: rider.status,
            });
        }
        Ok(())
    }

    /// `rider` must already be off the wait list. Nothing changes unless both
    /// the driver and the rider are free.
    fn assign(&mut self, driver_index: usize, mut rider: Rider) -> Result<Assignment> {
        self.check_assignable(driver_index, &rider)?;
        rider.mark_satisfied()?;
        let driver = &mut self.roster[driver_index];
        let pickup_time = driver.start_drive(rider.origin)?;

        log::info!(
            "[DISPATCH] Driver {} assigned to rider {} (pickup in {:.2})",
            driver.id(),
            rider.id,
            pickup_time
        );

        Ok(Assignment {
            driver_id: driver.id().clone(),
            rider,
            pickup_time,
        })
    }

    fn ensure_waitable(&self, rider: &Rider) -> Result<()> {
        if rider.status.is_terminal() {
            log::warn!(
                "[DISPATCH] Rider {} is {} and cannot request a driver",
                rider.id,
                rider.status
            );
            return Err(DispatchError::RiderNotWaiting {
                rider: rider.id.clone(),
                status: rider.status,
            });
        }
        Ok(())
    }
}

fn join_ids<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dispatcher \nRiders Waiting: [{}] \nDrivers Waiting: [{}]",
            join_ids(self.wait_list.iter()),
            join_ids(self.roster.iter())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider(id: &str, origin: (i64, i64)) -> Rider {
        Rider::new(id, Location::new(origin.0, origin.1), Location::new(9, 9), 5).expect("rider")
    }

    fn driver(id: &str, at: (i64, i64)) -> Driver {
        Driver::new(id, Location::new(at.0, at.1), 1.0).expect("driver")
    }

    #[test]
    fn display_lists_waiting_riders_and_drivers() {
        let mut dispatcher = Dispatcher::default();
        assert_eq!(
            dispatcher.to_string(),
            "Dispatcher \nRiders Waiting: [] \nDrivers Waiting: []"
        );

        dispatcher
            .request_driver(&mut rider("Jim", (1, 1)))
            .expect("request");
        dispatcher.request_rider(&driver("Bob", (2, 3)));
        assert_eq!(
            dispatcher.to_string(),
            "Dispatcher \nRiders Waiting: [Jim] \nDrivers Waiting: [Bob]"
        );
    }

    #[test]
    fn registration_is_keyed_by_id() {
        let mut dispatcher = Dispatcher::default();
        assert!(dispatcher.register_driver(&driver("Bob", (0, 0))));
        assert!(dispatcher.register_driver(&driver("Sam", (3, 3))));
        assert!(!dispatcher.register_driver(&driver("Bob", (7, 7))));

        let ids: Vec<_> = dispatcher.drivers().iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, ["Bob", "Sam"]);
        // the latest copy replaces the entry in place
        assert_eq!(
            dispatcher.driver(&"Bob".into()).map(Driver::location),
            Some(Location::new(7, 7))
        );
    }

    #[test]
    fn failed_assignment_leaves_driver_and_rider_untouched() {
        let mut dispatcher = Dispatcher::default();
        let mut busy = driver("Busy", (0, 0));
        busy.start_drive(Location::new(4, 4)).expect("idle");
        dispatcher.register_driver(&busy);
        dispatcher.register_driver(&driver("Idle", (1, 1)));

        let err = dispatcher.assign(0, rider("Ann", (0, 0))).unwrap_err();
        assert!(matches!(err, DispatchError::DriverBusy { .. }));
        assert_eq!(dispatcher.drivers()[0], busy);

        let done = rider("Ann", (0, 0)).with_status(RiderStatus::Satisfied);
        let err = dispatcher.assign(1, done).unwrap_err();
        assert!(matches!(err, DispatchError::RiderNotWaiting { .. }));
        assert!(dispatcher.drivers()[1].is_idle());
    }

    #[test]
    fn refresh_rider_replaces_queued_copy_only() {
        let mut dispatcher = Dispatcher::default();
        let mut ann = rider("Ann", (0, 0));
        dispatcher.request_driver(&mut ann).expect("queue");

        ann.mark_satisfied().expect("waiting");
        assert!(dispatcher.refresh_rider(&ann));
        assert_eq!(
            dispatcher.rider(&ann.id).map(|r| r.status),
            Some(RiderStatus::Satisfied)
        );
        assert!(dispatcher.request_rider(&driver("Bob", (0, 0))).is_none());

        assert!(!dispatcher.refresh_rider(&rider("Zed", (0, 0))));
        assert_eq!(dispatcher.wait_list().len(), 1);
    }

    #[test]
    fn accessors_expose_config_and_selector() {
        let config = DispatchConfig::default().with_selection(crate::SelectionStrategy::FirstIdle);
        let dispatcher = Dispatcher::new(config);
        assert_eq!(dispatcher.config(), &config);
        assert_eq!(dispatcher.selector().name(), "first_idle");
    }

    #[test]
    fn terminal_riders_cannot_request() {
        let mut dispatcher = Dispatcher::default();
        let mut done = rider("Ann", (0, 0)).with_status(RiderStatus::Satisfied);
        let err = dispatcher.request_driver(&mut done).unwrap_err();
        assert!(matches!(err, DispatchError::RiderNotWaiting { .. }));
        assert!(dispatcher.wait_list().is_empty());
    }

    #[test]
    fn repeated_requests_queue_rider_once() {
        let mut dispatcher = Dispatcher::default();
        let mut jim = rider("Jim", (1, 1));
        dispatcher.request_driver(&mut jim).expect("first");
        dispatcher.request_driver(&mut jim).expect("second");
        assert_eq!(dispatcher.wait_list().len(), 1);
    }

    #[test]
    fn purge_drops_only_stale_entries() {
        let mut dispatcher = Dispatcher::default();
        for id in ["A", "B", "C"] {
            dispatcher
                .request_driver(&mut rider(id, (0, 0)))
                .expect("request");
        }
        dispatcher
            .rider_mut(&"B".into())
            .expect("B queued")
            .mark_satisfied()
            .expect("transition");

        let stale = dispatcher.purge_stale_riders();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].id.as_str(), "B");
        let remaining: Vec<_> = dispatcher.wait_list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(remaining, ["A", "C"]);
    }
}
