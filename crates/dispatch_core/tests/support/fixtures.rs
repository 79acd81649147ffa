use dispatch_core::{DispatchConfig, Dispatcher, Driver, RiderId};

/// A dispatcher whose roster holds `drivers`, registered in order through
/// `request_rider`, the same way real drivers announce themselves.
pub fn dispatcher_with_drivers(config: DispatchConfig, drivers: &[Driver]) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(config);
    for driver in drivers {
        dispatcher.request_rider(driver);
    }
    dispatcher
}

/// Wait-list ids, oldest first.
pub fn waiting_ids(dispatcher: &Dispatcher) -> Vec<String> {
    dispatcher
        .wait_list()
        .iter()
        .map(|rider| rider.id.to_string())
        .collect()
}

pub fn roster_ids(dispatcher: &Dispatcher) -> Vec<String> {
    dispatcher
        .drivers()
        .iter()
        .map(|driver| driver.id().to_string())
        .collect()
}

pub fn rider_id(id: &str) -> RiderId {
    RiderId::from(id)
}
