//! CityBikes station feed.
//!
//! `GET {contract.url}?fields=stations` returns
//! `{"network": {"stations": [...]}}`.

use bicycle_transit::{Contract, Station};
use geo::Point;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct NetworkResponseDto {
    network: NetworkDto,
}

#[derive(Debug, Deserialize)]
struct NetworkDto {
    #[serde(default)]
    stations: Option<Vec<StationDto>>,
}

#[derive(Debug, Deserialize)]
struct StationDto {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    empty_slots: Option<u32>,
    free_bikes: Option<u32>,
}

impl StationDto {
    fn into_station(self) -> Option<Station> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            debug!("skipping station without coordinates: {:?}", self.name);
            return None;
        };

        Some(Station {
            name: self.name,
            location: Point::new(longitude, latitude),
            free_count: self.empty_slots,
            bikes_count: self.free_bikes,
        })
    }
}

pub fn stations_url(contract: &Contract) -> String {
    format!("{}?fields=stations", contract.url)
}

pub fn decode_stations(body: &[u8]) -> Result<Vec<Station>> {
    let response: NetworkResponseDto = serde_json::from_slice(body)?;

    Ok(response
        .network
        .stations
        .unwrap_or_default()
        .into_iter()
        .filter_map(StationDto::into_station)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bicycle_transit::Provider;

    #[test]
    fn test_decode_stations() {
        let body = br#"{"network": {"stations": [
            {"name": "00003 - POMME", "latitude": 43.6026, "longitude": 1.4455,
             "empty_slots": 9, "free_bikes": 6, "id": "ab12"},
            {"name": "00004 - METZ", "latitude": 43.6001, "longitude": 1.4431,
             "empty_slots": null, "free_bikes": 2}
        ]}}"#;

        let stations = decode_stations(body).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].display_name(), "POMME");
        assert_eq!(stations[0].location, Point::new(1.4455, 43.6026));
        assert_eq!(stations[0].free_count, Some(9));
        assert_eq!(stations[0].bikes_count, Some(6));
        assert_eq!(stations[1].free_count, None);
    }

    #[test]
    fn test_decode_skips_stations_without_coordinates() {
        let body = br#"{"network": {"stations": [{"name": "ghost", "free_bikes": 1}]}}"#;
        assert!(decode_stations(body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_missing_station_list() {
        assert!(decode_stations(br#"{"network": {}}"#).unwrap().is_empty());
        assert!(decode_stations(br#"{"network": {"stations": null}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid_body() {
        assert!(decode_stations(b"<html>").is_err());
    }

    #[test]
    fn test_stations_url() {
        let contract = Contract::new(
            "Toulouse".into(),
            Point::new(1.444209, 43.604652),
            6000.0,
            "http://api.citybik.es/v2/networks/velo",
            Provider::CityBikes,
            278,
            "FR".into(),
        )
        .unwrap();
        assert_eq!(
            stations_url(&contract),
            "http://api.citybik.es/v2/networks/velo?fields=stations"
        );
    }
}
