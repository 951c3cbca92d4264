use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use geo::Point;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod output;

use bicycle_core::config::{fetch_remote_config, TIME_BEFORE_REFRESH_DATA};
use bicycle_core::transit::spatial::zoom_level;
use bicycle_core::transit::{plan_ride, Place, Region, RideSearch, Station, StationIndex};
use bicycle_core::{ContractRepository, Endpoints, HttpFetcher, Preferences, StationCache, StationPoller};
use output::{print_contract, print_ride, print_stations};

#[derive(Parser, Debug)]
#[command(
    name = "bicycle",
    author,
    version,
    about = "Find bike-share contracts and stations",
    long_about = "Resolves which bike-share contract covers a coordinate, lists its stations \
                  with available bikes and free docks, and plans point-to-point rides.\n\n\
                  Contracts come from a local contracts.json snapshot (--contracts), or from \
                  the contracts cache refreshed every few weeks from the remote storage \
                  configured with BICYCLE_STORAGE_ENDPOINT and BICYCLE_STORAGE_TOKEN. \
                  Without a cache or a connection the bundled contracts are used."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct ContractSource {
    /// Local contracts snapshot (JSON document with "version" and "values")
    #[arg(short, long)]
    contracts: Option<PathBuf>,

    /// Preferences file, updated when contracts are fetched remotely
    #[arg(long, default_value = "bicycle-preferences.json")]
    preferences: PathBuf,

    /// Last contracts fetched remotely
    #[arg(long, default_value = "bicycle-contracts.json")]
    contracts_cache: PathBuf,
}

const BUNDLED_CONTRACTS: &[u8] = include_bytes!("../data/contracts.json");

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the contract covering a coordinate
    Resolve {
        #[command(flatten)]
        source: ContractSource,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// List the stations of the contract covering a coordinate
    Stations {
        #[command(flatten)]
        source: ContractSource,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Only stations within this many meters of the coordinate
        #[arg(long)]
        radius: Option<f64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Keep refreshing the stations of the contract covering a coordinate
    Watch {
        #[command(flatten)]
        source: ContractSource,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Seconds between refreshes
        #[arg(long, default_value_t = TIME_BEFORE_REFRESH_DATA.as_secs())]
        period: u64,
        /// Stop after this many refreshes
        #[arg(long, default_value_t = 3)]
        count: usize,
    },

    /// Plan a ride between two coordinates ("lat,lng")
    Ride {
        #[command(flatten)]
        source: ContractSource,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
        /// Bikes needed at the departure station
        #[arg(long, default_value_t = 1)]
        bikes: u32,
        /// Free docks needed at the arrival station
        #[arg(long, default_value_t = 1)]
        docks: u32,
    },

    /// Check whether two square regions ("lat,lng" plus side in meters) intersect
    Intersects {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        a: Point,
        #[arg(long)]
        a_size: f64,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        b: Point,
        #[arg(long)]
        b_size: f64,
    },

    /// Compute the zoom level of a map viewport
    Zoom {
        /// Visible longitude span in degrees
        #[arg(long)]
        longitude_delta: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long, default_value_t = 0.0)]
        heading: f64,
    },

    /// Fetch the remote config and store its delays in the preferences file
    Config {
        #[arg(long, default_value = "bicycle-preferences.json")]
        preferences: PathBuf,
    },
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {value:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    Ok(Point::new(lng, lat))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match cli.command {
        Command::Resolve { source, lat, lng } => {
            let repository = load_contracts(&source).await?;
            match repository.resolve(Point::new(lng, lat)) {
                Some(contract) => print_contract(&contract),
                None => log::info!("({lat}, {lng}) is out of any contract"),
            }
        }

        Command::Stations { source, lat, lng, radius, json } => {
            let repository = load_contracts(&source).await?;
            let point = Point::new(lng, lat);
            let Some(contract) = repository.resolve(point) else {
                bail!("({lat}, {lng}) is out of any contract");
            };

            let cache = StationCache::new(HttpFetcher::new()?);
            let stations = cache
                .get_stations(&contract)
                .await
                .with_context(|| format!("Failed to load stations for {}", contract.name))?;

            let stations: Vec<_> = match radius {
                Some(radius) => StationIndex::new(&stations)
                    .stations_near(point, radius)
                    .iter()
                    .map(|s| Station::clone(s))
                    .collect(),
                None => stations.to_vec(),
            };
            print_stations(&stations, json)?;
        }

        Command::Watch { source, lat, lng, period, count } => {
            let repository = load_contracts(&source).await?;
            let Some(contract) = repository.resolve(Point::new(lng, lat)) else {
                bail!("({lat}, {lng}) is out of any contract");
            };

            let cache = Arc::new(StationCache::new(HttpFetcher::new()?));
            let stations = cache.get_stations(&contract).await?;
            log::info!("{}: {} stations", contract.name, stations.len());

            let (tx, mut rx) = tokio::sync::mpsc::channel(1);
            let poller = StationPoller::start(cache, contract.clone(), Duration::from_secs(period), tx);

            for _ in 0..count {
                match rx.recv().await {
                    Some(Ok(stations)) => {
                        let bikes: u32 = stations.iter().filter_map(|s| s.bikes_count).sum();
                        log::info!("{}: {} stations, {} bikes", contract.name, stations.len(), bikes);
                    }
                    Some(Err(e)) => log::warn!("refresh failed, keeping previous stations: {e}"),
                    None => break,
                }
            }
            poller.stop();
        }

        Command::Ride { source, from, to, bikes, docks } => {
            let repository = load_contracts(&source).await?;
            let departure = Place {
                name: None,
                location: from,
                contract: repository.resolve(from),
            };
            let arrival = Place {
                name: None,
                location: to,
                contract: repository.resolve(to),
            };
            let Some(contract) = departure.contract.clone() else {
                bail!("Departure is out of any contract");
            };

            let search = RideSearch {
                departure: Some(departure),
                arrival: Some(arrival),
                bikes_count: bikes,
                free_slots_count: docks,
            };
            if !search.is_complete() {
                bail!("Departure and arrival must be in the same contract");
            }

            let cache = StationCache::new(HttpFetcher::new()?);
            let stations = cache.get_stations(&contract).await?;
            let ride = plan_ride(&search, &StationIndex::new(&stations))?;
            print_ride(&ride);
        }

        Command::Intersects { a, a_size, b, b_size } => {
            let a = Region::from_distance(a, a_size, a_size);
            let b = Region::from_distance(b, b_size, b_size);
            println!("{}", a.intersects(&b));
        }

        Command::Zoom { longitude_delta, width, height, heading } => {
            match zoom_level(longitude_delta, width, height, heading) {
                Some(level) => println!("{level}"),
                None => bail!("Degenerate viewport"),
            }
        }

        Command::Config { preferences } => {
            let endpoints = Endpoints::from_env()?;
            let fetcher = HttpFetcher::new()?;
            let config = fetch_remote_config(&fetcher, &endpoints)
                .await
                .context("Failed to fetch remote config")?;

            let mut prefs = Preferences::load(&preferences).await?;
            prefs.apply(&config);
            let force_update = prefs.check_force_update(&config, env!("CARGO_PKG_VERSION"), Utc::now());
            prefs.save(&preferences).await?;
            if force_update {
                log::warn!("A forced app update is required");
            }
        }
    }

    Ok(())
}

/// Contracts from the snapshot when given, from the local cache otherwise
///
/// The cache (or the bundled list when there is none) is checked against
/// remote storage once `contracts_check_delay` days have passed. A failed
/// check keeps the local contracts.
async fn load_contracts(source: &ContractSource) -> Result<ContractRepository> {
    if let Some(path) = &source.contracts {
        log::debug!("load contracts from file at {}", path.display());
        let body = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return ContractRepository::from_snapshot(&body).context("Failed to parse contracts snapshot");
    }

    let mut preferences = Preferences::load(&source.preferences).await?;
    let mut repository = match tokio::fs::read(&source.contracts_cache).await {
        Ok(body) => ContractRepository::from_snapshot(&body)
            .with_context(|| format!("Failed to parse {}", source.contracts_cache.display()))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no contracts cache, using bundled contracts");
            let repository = ContractRepository::from_snapshot(BUNDLED_CONTRACTS)?;
            // any remote list newer than the bundled one must replace it
            let bundled = repository.version().unwrap_or(0);
            preferences.contracts_version = preferences.contracts_version.min(bundled);
            repository
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", source.contracts_cache.display()));
        }
    };

    if !preferences.contracts_check_due(Utc::now()) {
        log::debug!("contracts are up-to-date");
        return Ok(repository);
    }

    let endpoints = match Endpoints::from_env() {
        Ok(endpoints) => endpoints,
        Err(e) => {
            log::warn!("Cannot check contracts ({e}), using local contracts");
            return Ok(repository);
        }
    };
    let fetcher = HttpFetcher::new()?;

    match repository.update(&fetcher, &endpoints, &mut preferences).await {
        Ok(_) => {
            repository.save_snapshot(&source.contracts_cache).await?;
            preferences.save(&source.preferences).await?;
        }
        Err(e) => log::warn!("Failed to update contracts, using local contracts: {e}"),
    }

    Ok(repository)
}
