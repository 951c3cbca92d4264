//! Tracks which contract the map viewport is in.

use std::sync::Arc;

use bicycle_transit::{Contract, ContractProvider, Region};
use tracing::debug;

use crate::config::MIN_CONTRACT_ZOOM_LEVEL;

#[derive(Clone, Debug, PartialEq)]
pub enum ContractEvent {
    /// The viewport moved into a contract; stations should be loaded
    NewContract(Arc<Contract>),
    /// The viewport still overlaps the current contract
    SameContract,
    /// No contract covers the viewport, or the map is zoomed out too far
    OutOfAnyContract,
}

pub struct ContractTracker {
    provider: Arc<dyn ContractProvider>,
    current: Option<Arc<Contract>>,
}

impl ContractTracker {
    pub fn new(provider: Arc<dyn ContractProvider>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Arc<Contract>> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Update the current contract for a new viewport
    ///
    /// `zoom` is the viewport zoom level, `None` when it cannot be computed.
    pub fn on_region_changed(&mut self, region: &Region, zoom: Option<i32>) -> ContractEvent {
        if zoom.is_none_or(|level| level < MIN_CONTRACT_ZOOM_LEVEL) {
            debug!("zoom level {zoom:?} too low for contracts");
            self.current = None;
            return ContractEvent::OutOfAnyContract;
        }

        if let Some(current) = &self.current {
            if current.region().intersects(region) {
                return ContractEvent::SameContract;
            }
            debug!("left contract {}", current.name);
        }

        match self.provider.resolve(region.center) {
            Some(contract) => {
                debug!("entered contract {}", contract.name);
                self.current = Some(contract.clone());
                ContractEvent::NewContract(contract)
            }
            None => {
                self.current = None;
                ContractEvent::OutOfAnyContract
            }
        }
    }
}
