//! Point-to-point ride search.
//!
//! A ride goes from a station with bikes near the departure to a station
//! with free docks near the arrival, inside a single contract.

use std::sync::Arc;

use geo::Point;

use crate::models::{contract::Contract, station::Station};
use crate::provider::station_index::StationIndex;
use crate::spatial::queries::haversine_distance;

/// Rides shorter than this are not worth a bike
pub const RIDE_MIN_DISTANCE_M: f64 = 250.0;

/// How far from a place a station may be
pub const STATION_SEARCH_MAX_RADIUS_M: f64 = 500.0;

/// A searched location, tagged with the contract covering it
#[derive(Clone, Debug)]
pub struct Place {
    pub name: Option<String>,
    pub location: Point,
    pub contract: Option<Arc<Contract>>,
}

#[derive(Clone, Debug)]
pub struct RideSearch {
    pub departure: Option<Place>,
    pub arrival: Option<Place>,
    pub bikes_count: u32,
    pub free_slots_count: u32,
}

impl Default for RideSearch {
    fn default() -> Self {
        Self {
            departure: None,
            arrival: None,
            bikes_count: 1,
            free_slots_count: 1,
        }
    }
}

impl RideSearch {
    pub fn is_search_enabled(&self) -> bool {
        self.departure.is_some() && self.arrival.is_some()
    }

    /// Both places are covered, by the same contract
    pub fn is_complete(&self) -> bool {
        match (&self.departure, &self.arrival) {
            (Some(departure), Some(arrival)) => match (&departure.contract, &arrival.contract) {
                (Some(from), Some(to)) => from == to,
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ride {
    pub departure: Arc<Station>,
    pub arrival: Arc<Station>,
    /// Straight distance between the two stations in meters
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RideError {
    #[error("Departure and arrival must be set inside the same contract")]
    Incomplete,

    #[error("Ride of {0:.0}m is too short")]
    TooShort(f64),

    #[error("No station with enough bikes near the departure")]
    NoDepartureStation,

    #[error("No station with enough free docks near the arrival")]
    NoArrivalStation,
}

pub fn plan_ride(search: &RideSearch, stations: &StationIndex) -> Result<Ride, RideError> {
    let (Some(departure), Some(arrival)) = (&search.departure, &search.arrival) else {
        return Err(RideError::Incomplete);
    };
    if !search.is_complete() {
        return Err(RideError::Incomplete);
    }

    let distance = haversine_distance(departure.location, arrival.location);
    if distance < RIDE_MIN_DISTANCE_M {
        return Err(RideError::TooShort(distance));
    }

    let from = stations
        .stations_near(departure.location, STATION_SEARCH_MAX_RADIUS_M)
        .into_iter()
        .find(|s| s.has_bikes(search.bikes_count))
        .ok_or(RideError::NoDepartureStation)?;

    let to = stations
        .stations_near(arrival.location, STATION_SEARCH_MAX_RADIUS_M)
        .into_iter()
        .find(|s| s.has_free_docks(search.free_slots_count))
        .ok_or(RideError::NoArrivalStation)?;

    Ok(Ride {
        distance_m: haversine_distance(from.location, to.location),
        departure: from,
        arrival: to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Provider;

    fn toulouse() -> Arc<Contract> {
        Arc::new(
            Contract::new(
                "Toulouse".into(),
                Point::new(1.444209, 43.604652),
                6000.0,
                "http://api.citybik.es/v2/networks/velo",
                Provider::CityBikes,
                278,
                "FR".into(),
            )
            .unwrap(),
        )
    }

    fn place(lon: f64, lat: f64, contract: Option<Arc<Contract>>) -> Place {
        Place {
            name: None,
            location: Point::new(lon, lat),
            contract,
        }
    }

    fn station(name: &str, lon: f64, lat: f64, bikes: u32, free: u32) -> Station {
        Station {
            name: Some(name.into()),
            location: Point::new(lon, lat),
            free_count: Some(free),
            bikes_count: Some(bikes),
        }
    }

    fn stations() -> StationIndex {
        StationIndex::new(&[
            station("Capitole", 1.4437, 43.6045, 0, 10),
            station("Esquirol", 1.4442, 43.6002, 4, 0),
            station("Matabiau", 1.4536, 43.6110, 2, 0),
            station("Jeanne d'Arc", 1.4490, 43.6110, 0, 6),
        ])
    }

    fn search(from: Place, to: Place) -> RideSearch {
        RideSearch {
            departure: Some(from),
            arrival: Some(to),
            ..RideSearch::default()
        }
    }

    #[test]
    fn test_search_state() {
        let mut s = RideSearch::default();
        assert!(!s.is_search_enabled());
        s.departure = Some(place(1.444, 43.604, Some(toulouse())));
        s.arrival = Some(place(1.453, 43.611, None));
        assert!(s.is_search_enabled());
        assert!(!s.is_complete());
        s.arrival = Some(place(1.453, 43.611, Some(toulouse())));
        assert!(s.is_complete());
    }

    #[test]
    fn test_plan_ride_skips_empty_stations() {
        let s = search(
            place(1.4440, 43.6040, Some(toulouse())),
            place(1.4530, 43.6105, Some(toulouse())),
        );

        let ride = plan_ride(&s, &stations()).unwrap();
        // Capitole is closer but has no bikes
        assert_eq!(ride.departure.display_name(), "Esquirol");
        // Matabiau is closer but has no docks
        assert_eq!(ride.arrival.display_name(), "Jeanne d'Arc");
        assert!(ride.distance_m > RIDE_MIN_DISTANCE_M);
    }

    #[test]
    fn test_plan_ride_too_short() {
        let s = search(
            place(1.4440, 43.6040, Some(toulouse())),
            place(1.4441, 43.6041, Some(toulouse())),
        );
        assert!(matches!(plan_ride(&s, &stations()), Err(RideError::TooShort(_))));
    }

    #[test]
    fn test_plan_ride_incomplete() {
        let s = search(place(1.4440, 43.6040, Some(toulouse())), place(1.4530, 43.6105, None));
        assert_eq!(plan_ride(&s, &stations()).unwrap_err(), RideError::Incomplete);
    }

    #[test]
    fn test_plan_ride_no_bikes_requested_count() {
        let mut s = search(
            place(1.4440, 43.6040, Some(toulouse())),
            place(1.4530, 43.6105, Some(toulouse())),
        );
        s.bikes_count = 5;
        assert_eq!(plan_ride(&s, &stations()).unwrap_err(), RideError::NoDepartureStation);
    }
}
