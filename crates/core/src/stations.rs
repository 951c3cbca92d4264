//! Station list cache, one entry per contract.
//!
//! Entries never expire on their own: callers refresh them, typically from
//! a [`StationPoller`](crate::poller::StationPoller).

use std::collections::HashMap;
use std::sync::Arc;

use bicycle_transit::{BikeShareError, Contract, ContractName, DataFetcher, Provider, Station};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::citybikes;
use crate::error::Result;

pub type Stations = Arc<Vec<Station>>;

pub struct StationCache<F> {
    fetcher: F,
    entries: RwLock<HashMap<ContractName, Stations>>,
}

impl<F: DataFetcher> StationCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Cached stations for `contract`, fetched on first use
    pub async fn get_stations(&self, contract: &Contract) -> Result<Stations> {
        if let Some(stations) = self.cached(&contract.name).await {
            debug!("find {} stations for contract: {}", stations.len(), contract.name);
            return Ok(stations);
        }
        self.refresh_stations(contract).await
    }

    /// Fetch stations for `contract` and replace its cache entry
    ///
    /// On failure the previous entry, if any, is kept.
    pub async fn refresh_stations(&self, contract: &Contract) -> Result<Stations> {
        if contract.provider != Provider::CityBikes {
            return Err(BikeShareError::UnsupportedProvider(contract.provider.tag().to_string()).into());
        }
        if contract.url.is_empty() {
            return Err(BikeShareError::MissingUrl(contract.name.clone()).into());
        }

        let stations = match self.fetch(contract).await {
            Ok(stations) => Arc::new(stations),
            Err(e) => {
                warn!("fail to reload stations for contract {}: {e}", contract.name);
                return Err(e);
            }
        };

        debug!("load {} stations for contract: {}", stations.len(), contract.name);
        self.entries
            .write()
            .await
            .insert(contract.name.clone(), stations.clone());

        Ok(stations)
    }

    pub async fn cached(&self, name: &ContractName) -> Option<Stations> {
        self.entries.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn fetch(&self, contract: &Contract) -> Result<Vec<Station>> {
        let body = self.fetcher.fetch(&citybikes::stations_url(contract)).await?;
        citybikes::decode_stations(&body)
    }
}
