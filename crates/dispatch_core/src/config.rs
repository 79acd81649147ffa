//! Dispatcher configuration.
//!
//! Defaults describe the recommended behavior; every field can be overridden with
//! the `with_*` builders or loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matching::{DriverSelector, FirstIdle, NearestIdle};

/// What `request_driver` does with a rider when no driver can be matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoIdleDriverPolicy {
    /// Queue the rider whenever no idle driver exists, whether the roster is
    /// empty or every driver is busy.
    #[default]
    EnqueueWhenNoneIdle,
    /// Queue the rider only when the roster is empty. A rider who finds every
    /// driver busy is turned away without a wait-list slot.
    EnqueueOnEmptyRoster,
}

/// Which driver a rider gets when several are idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Shortest travel time to the pickup; earliest registration breaks ties.
    #[default]
    NearestIdle,
    /// Earliest registration, ignoring distance.
    FirstIdle,
}

impl SelectionStrategy {
    pub fn build(self) -> Box<dyn DriverSelector> {
        match self {
            SelectionStrategy::NearestIdle => Box::new(NearestIdle),
            SelectionStrategy::FirstIdle => Box::new(FirstIdle),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub no_idle_driver: NoIdleDriverPolicy,
    pub selection: SelectionStrategy,
}

impl DispatchConfig {
    pub fn with_no_idle_driver(mut self, policy: NoIdleDriverPolicy) -> Self {
        self.no_idle_driver = policy;
        self
    }

    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }

    /// Parses a JSON object; missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
