//! Configuration: constants, remote endpoints, remote config and local
//! preferences.

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use bicycle_transit::DataFetcher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

pub const USER_AGENT: &str = concat!("bicycle/", env!("CARGO_PKG_VERSION"));

/// Request and resource timeout for every HTTP call
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Period of the station refresh while a contract is on screen
pub const TIME_BEFORE_REFRESH_DATA: Duration = Duration::from_secs(120);

/// Below this zoom level the map shows contracts, not stations
pub const MIN_CONTRACT_ZOOM_LEVEL: i32 = 10;

pub const STORAGE_ENDPOINT_ENV: &str = "BICYCLE_STORAGE_ENDPOINT";
pub const STORAGE_TOKEN_ENV: &str = "BICYCLE_STORAGE_TOKEN";

// ============================================================================
// Endpoints
// ============================================================================

/// Remote storage holding `config.json` and `contracts.json`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub storage: String,
    pub token: String,
}

impl Endpoints {
    pub fn new(storage: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            storage: storage.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let storage = std::env::var(STORAGE_ENDPOINT_ENV)
            .map_err(|_| CoreError::Config(STORAGE_ENDPOINT_ENV.to_string()))?;
        let token = std::env::var(STORAGE_TOKEN_ENV).unwrap_or_default();
        Ok(Self::new(storage, token))
    }

    pub fn config_url(&self) -> String {
        self.media_url("config.json")
    }

    pub fn contracts_url(&self) -> String {
        self.media_url("contracts.json")
    }

    fn media_url(&self, file: &str) -> String {
        format!("{}/{file}?alt=media&token={}", self.storage, self.token)
    }
}

// ============================================================================
// Remote config
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub apps: AppsConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AppsConfig {
    /// Days between two app version checks
    pub check_delay: Option<i64>,
    pub ios: Option<PlatformConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PlatformConfig {
    pub version: Option<String>,
    pub force_update: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ContractsConfig {
    /// Days between two contract list checks
    pub check_delay: Option<i64>,
}

/// Compare dotted versions component by component, numerically
///
/// Missing components count as zero and non-numeric ones are read up to
/// their first non-digit, so `1.10` is newer than `1.9` and `2.0` equals `2`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    fn components(version: &str) -> Vec<u64> {
        version
            .trim()
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    }

    let (a, b) = (components(a), components(b));
    (0..a.len().max(b.len()))
        .map(|i| a.get(i).unwrap_or(&0).cmp(b.get(i).unwrap_or(&0)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub async fn fetch_remote_config<F: DataFetcher>(fetcher: &F, endpoints: &Endpoints) -> Result<RemoteConfig> {
    let body = fetcher.fetch(&endpoints.config_url()).await?;
    Ok(serde_json::from_slice(&body)?)
}

// ============================================================================
// Preferences
// ============================================================================

/// Locally persisted settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub request_data_sending_permissions: bool,
    pub crash_data_sending_allowed: bool,
    pub use_data_sending_allowed: bool,
    pub app_check_delay: i64,
    pub contracts_check_delay: i64,
    pub contracts_version: u32,
    pub contracts_last_check: Option<DateTime<Utc>>,
    pub app_last_check: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            request_data_sending_permissions: true,
            crash_data_sending_allowed: true,
            use_data_sending_allowed: true,
            app_check_delay: 7,
            contracts_check_delay: 30,
            contracts_version: 0,
            contracts_last_check: None,
            app_last_check: None,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults when the file does not exist
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no preferences at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Copy the delays present in `config`
    pub fn apply(&mut self, config: &RemoteConfig) {
        if let Some(delay) = config.apps.check_delay {
            info!("app check delay: {delay}");
            self.app_check_delay = delay;
        }
        if let Some(delay) = config.contracts.check_delay {
            info!("contracts check delay: {delay}");
            self.contracts_check_delay = delay;
        }
    }

    pub fn contracts_check_due(&self, now: DateTime<Utc>) -> bool {
        delay_elapsed(self.contracts_last_check, now, self.contracts_check_delay)
    }

    pub fn app_check_due(&self, now: DateTime<Utc>) -> bool {
        delay_elapsed(self.app_last_check, now, self.app_check_delay)
    }

    /// Whether `config` forces an update of an app running `current_version`
    ///
    /// Checked at most every `app_check_delay` days. Only a remote version
    /// newer than `current_version` can force an update; any other answer
    /// stamps `app_last_check`.
    pub fn check_force_update(&mut self, config: &RemoteConfig, current_version: &str, now: DateTime<Utc>) -> bool {
        if !self.app_check_due(now) {
            debug!("no need to check app version again");
            return false;
        }
        let Some(ios) = &config.apps.ios else {
            debug!("no app version in remote config");
            return false;
        };

        let latest = ios.version.as_deref().unwrap_or_default();
        info!("latest version: {latest}, current version: {current_version}");
        if compare_versions(latest, current_version) == Ordering::Greater {
            return ios.force_update.unwrap_or(false);
        }

        debug!("no need to force update");
        self.app_last_check = Some(now);
        false
    }
}

/// More than `delay` whole days since `last`, or never checked
fn delay_elapsed(last: Option<DateTime<Utc>>, now: DateTime<Utc>, delay: i64) -> bool {
    match last {
        None => true,
        Some(last) => (now - last).num_days() > delay,
    }
}
