//! Contract list repository.
//!
//! Contracts come from a versioned remote document or from a local snapshot
//! of the same document, and are held in memory for the session.

use std::path::Path;
use std::sync::Arc;

use bicycle_transit::{Contract, ContractProvider, DataFetcher, Provider, StaticContractProvider};
use chrono::Utc;
use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Endpoints, Preferences};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractDto {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub station_count: u32,
    #[serde(rename = "country", default)]
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ContractDto {
    pub fn into_contract(self) -> bicycle_transit::Result<Contract> {
        let provider = self
            .provider
            .as_deref()
            .map(Provider::from_tag)
            .unwrap_or_default();

        Contract::new(
            self.name.into(),
            Point::new(self.longitude, self.latitude),
            self.radius,
            self.url,
            provider,
            self.station_count,
            self.country_code.into(),
        )
    }
}

impl From<&Contract> for ContractDto {
    fn from(contract: &Contract) -> Self {
        Self {
            name: contract.name.to_string(),
            latitude: contract.center.y(),
            longitude: contract.center.x(),
            radius: contract.radius,
            url: contract.url.clone(),
            station_count: contract.station_count,
            country_code: contract.country_code.to_string(),
            provider: Some(contract.provider.tag().to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContractsDocument {
    pub version: Option<u32>,
    #[serde(default)]
    pub values: Vec<ContractDto>,
}

impl ContractsDocument {
    /// Valid contracts, in document order
    pub fn into_contracts(self) -> Vec<Contract> {
        self.values
            .into_iter()
            .filter_map(|dto| {
                dto.into_contract()
                    .inspect_err(|e| warn!("skipping contract: {e}"))
                    .ok()
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct ContractRepository {
    provider: StaticContractProvider,
    version: Option<u32>,
}

impl ContractRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contracts from a local copy of the contracts document
    pub fn from_snapshot(body: &[u8]) -> Result<Self> {
        let mut repository = Self::new();
        repository.load_snapshot(body)?;
        Ok(repository)
    }

    pub fn load_snapshot(&mut self, body: &[u8]) -> Result<usize> {
        let document: ContractsDocument = serde_json::from_slice(body)?;
        self.version = document.version;
        self.replace(document.into_contracts());
        info!("{} contracts loaded from snapshot", self.count());
        Ok(self.count())
    }

    /// Write the held contracts as a snapshot `from_snapshot` reads back
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        let document = ContractsDocument {
            version: self.version,
            values: self
                .all_contracts()
                .iter()
                .map(|contract| ContractDto::from(&**contract))
                .collect(),
        };
        tokio::fs::write(path, serde_json::to_vec_pretty(&document)?).await?;
        debug!("{} contracts saved to {}", self.count(), path.display());
        Ok(())
    }

    /// Version of the document the held contracts come from
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Check the remote contracts document and take it when it is newer
    ///
    /// An empty repository always takes the remote list. Returns the number
    /// of contracts held afterwards.
    pub async fn update<F: DataFetcher>(
        &mut self,
        fetcher: &F,
        endpoints: &Endpoints,
        preferences: &mut Preferences,
    ) -> Result<usize> {
        let body = fetcher.fetch(&endpoints.contracts_url()).await?;
        let document: ContractsDocument = serde_json::from_slice(&body)?;

        let remote_version = document.version;
        match remote_version {
            Some(version) if version > preferences.contracts_version || self.is_empty() => {
                let contracts = document.into_contracts();
                info!("{} contracts inserted (version {version})", contracts.len());
                self.replace(contracts);
                self.version = Some(version);
                preferences.contracts_version = version;
            }
            None if self.is_empty() => {
                self.replace(document.into_contracts());
                self.version = None;
            }
            _ => debug!("contracts are up-to-date"),
        }

        preferences.contracts_last_check = Some(Utc::now());
        info!("{} contracts loaded", self.count());
        Ok(self.count())
    }

    pub fn resolver(&self) -> &StaticContractProvider {
        &self.provider
    }

    pub fn resolve(&self, point: Point) -> Option<Arc<Contract>> {
        debug!("resolve contract at ({}, {})", point.y(), point.x());
        self.provider.resolve(point)
    }

    pub fn all_contracts(&self) -> Vec<Arc<Contract>> {
        self.provider.all_contracts()
    }

    pub fn count(&self) -> usize {
        self.provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_empty()
    }

    fn replace(&mut self, contracts: Vec<Contract>) {
        self.provider = StaticContractProvider::from_contracts(contracts);
    }
}
