mod support;

use dispatch_core::test_helpers::{driver_at, rider_at};
use dispatch_core::{DispatchError, Dispatcher, DriverId, DriverState, Location};

#[test]
fn driver_cycles_through_pickup_ride_and_back_to_idle() {
    support::init_logging();
    let mut dispatcher = Dispatcher::default();
    dispatcher
        .request_driver(&mut rider_at("Ann", (2, 1), (6, 4)))
        .expect("queue Ann");

    let bob = driver_at("Bob", 0, 0);
    let assignment = dispatcher
        .dispatch_driver(&bob)
        .expect("dispatch")
        .expect("Ann is waiting");
    assert_eq!(assignment.pickup_time, 3.0);

    let bob_id = DriverId::from("Bob");
    let driver = dispatcher.driver_mut(&bob_id).expect("registered");
    assert_eq!(driver.destination(), Some(Location::new(2, 1)));

    driver.end_drive().expect("arrive at pickup");
    assert_eq!(driver.location(), Location::new(2, 1));

    let ride_time = driver.start_ride(&assignment.rider).expect("pick up");
    assert_eq!(ride_time, 7.0);
    assert_eq!(driver.passenger().map(|id| id.as_str()), Some("Ann"));

    let dropped = driver.end_ride().expect("drop off");
    assert_eq!(dropped.as_str(), "Ann");
    assert_eq!(driver.state(), &DriverState::Idle);
    assert_eq!(driver.location(), Location::new(6, 4));

    assert_eq!(dispatcher.idle_driver_count(), 1);
}

#[test]
fn busy_roster_entry_is_skipped_until_it_finishes() {
    let mut dispatcher = Dispatcher::default();
    dispatcher.register_driver(&driver_at("Bob", 0, 0));
    dispatcher.register_driver(&driver_at("Sam", 9, 9));

    let bob_id = DriverId::from("Bob");
    dispatcher
        .driver_mut(&bob_id)
        .expect("registered")
        .start_drive(Location::new(3, 3))
        .expect("idle");

    let mut rider = rider_at("Jim", (0, 0), (1, 1));
    let picked = dispatcher.request_driver(&mut rider).expect("request");
    assert_eq!(picked.map(|d| d.id().as_str()), Some("Sam"));

    dispatcher
        .driver_mut(&bob_id)
        .expect("registered")
        .end_drive()
        .expect("driving");

    // Bob now sits at (3, 3), still closer to (0, 0) than Sam.
    let picked = dispatcher.request_driver(&mut rider).expect("request");
    assert_eq!(picked.map(|d| d.id().as_str()), Some("Bob"));
}

#[test]
fn overlapping_drives_are_rejected() {
    let mut bob = driver_at("Bob", 0, 0);
    bob.start_drive(Location::new(1, 1)).expect("idle");

    let err = bob.start_ride(&rider_at("Jim", (1, 1), (2, 3))).unwrap_err();
    assert!(matches!(err, DispatchError::DriverBusy { .. }));
    assert_eq!(bob.destination(), Some(Location::new(1, 1)));
}

#[test]
fn ending_without_an_active_trip_fails() {
    let mut bob = driver_at("Bob", 0, 0);
    assert!(matches!(
        bob.end_drive(),
        Err(DispatchError::NoActiveDrive { .. })
    ));
    assert!(matches!(
        bob.end_ride(),
        Err(DispatchError::NoActiveRide { .. })
    ));
    assert!(bob.is_idle());
}
