//! A cloneable, thread-safe handle around a single [`Dispatcher`].
//!
//! Every method takes the lock once and performs its whole scan-select-commit
//! sequence before releasing it, so concurrent callers can never be handed the
//! same idle driver or the same waiting rider.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::dispatcher::{Assignment, DispatchOutcome, Dispatcher};
use crate::driver::{Driver, DriverId};
use crate::error::{DispatchError, Result};
use crate::rider::{Rider, RiderId};

#[derive(Debug, Clone, Default)]
pub struct SharedDispatcher {
    inner: Arc<Mutex<Dispatcher>>,
}

impl SharedDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dispatcher)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dispatcher>> {
        self.inner.lock().map_err(|_| DispatchError::LockPoisoned)
    }

    /// Runs `f` with exclusive access. Anything done inside `f` is atomic with
    /// respect to every other call on this handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut Dispatcher) -> R) -> Result<R> {
        let mut dispatcher = self.lock()?;
        Ok(f(&mut dispatcher))
    }

    pub fn dispatch_rider(&self, rider: Rider) -> Result<DispatchOutcome> {
        self.lock()?.dispatch_rider(rider)
    }

    pub fn dispatch_driver(&self, driver: &Driver) -> Result<Option<Assignment>> {
        self.lock()?.dispatch_driver(driver)
    }

    pub fn commit_match(&self, rider_id: &RiderId, driver_id: &DriverId) -> Result<Assignment> {
        self.lock()?.commit_match(rider_id, driver_id)
    }

    pub fn cancel_ride(&self, rider_id: &RiderId) -> Result<Option<Rider>> {
        Ok(self.lock()?.cancel_ride(rider_id))
    }

    /// Candidate lookup only. The returned driver is a snapshot and is not
    /// reserved; commit with [`SharedDispatcher::commit_match`].
    pub fn request_driver(&self, rider: &mut Rider) -> Result<Option<Driver>> {
        Ok(self.lock()?.request_driver(rider)?.cloned())
    }

    /// Candidate lookup only. The returned rider is a snapshot and stays queued.
    pub fn request_rider(&self, driver: &Driver) -> Result<Option<Rider>> {
        Ok(self.lock()?.request_rider(driver).cloned())
    }

    pub fn waiting_count(&self) -> Result<usize> {
        self.with(|dispatcher| dispatcher.wait_list().len())
    }

    pub fn idle_driver_count(&self) -> Result<usize> {
        self.with(|dispatcher| dispatcher.idle_driver_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn clones_share_one_dispatcher() {
        let shared = SharedDispatcher::default();
        let other = shared.clone();

        let rider = Rider::new("Jim", Location::new(1, 1), Location::new(2, 3), 5).expect("rider");
        let outcome = shared.dispatch_rider(rider).expect("dispatch");
        assert_eq!(outcome, DispatchOutcome::Queued);
        assert_eq!(other.waiting_count().expect("count"), 1);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared = SharedDispatcher::default();
        let poisoner = shared.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().expect("lock");
            panic!("poison the dispatcher lock");
        })
        .join();

        assert!(matches!(
            shared.waiting_count(),
            Err(DispatchError::LockPoisoned)
        ));
    }
}
