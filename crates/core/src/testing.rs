//! In-memory fetcher for service tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bicycle_transit::{BikeShareError, Contract, DataFetcher, Provider};
use geo::Point;

/// Serves scripted responses per url and counts requests
#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<HashMap<String, VecDeque<Result<Vec<u8>, String>>>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn respond(&self, url: &str, body: &str) -> &Self {
        self.push(url, Ok(body.as_bytes().to_vec()))
    }

    pub fn fail(&self, url: &str, message: &str) -> &Self {
        self.push(url, Err(message.to_string()))
    }

    fn push(&self, url: &str, response: Result<Vec<u8>, String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataFetcher for FakeFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = bicycle_transit::Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let mut responses = self.responses.lock().unwrap();
            let queue = responses
                .get_mut(url)
                .ok_or_else(|| BikeShareError::Fetch(format!("404 {url}")))?;

            // The last scripted response repeats
            let next = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };
            match next {
                Some(Ok(body)) => Ok(body),
                Some(Err(message)) => Err(BikeShareError::Fetch(message)),
                None => Err(BikeShareError::Fetch(format!("404 {url}"))),
            }
        })
    }
}

pub const VELO_URL: &str = "http://api.citybik.es/v2/networks/velo";
pub const VELO_STATIONS_URL: &str = "http://api.citybik.es/v2/networks/velo?fields=stations";

pub const VELO_STATIONS: &str = r#"{"network": {"stations": [
    {"name": "00003 - POMME", "latitude": 43.6026, "longitude": 1.4455, "empty_slots": 9, "free_bikes": 6},
    {"name": "00004 - METZ", "latitude": 43.6001, "longitude": 1.4431, "empty_slots": 1, "free_bikes": 2}
]}}"#;

pub fn toulouse() -> Contract {
    Contract::new(
        "Toulouse".into(),
        Point::new(1.444209, 43.604652),
        6000.0,
        VELO_URL,
        Provider::CityBikes,
        278,
        "FR".into(),
    )
    .unwrap()
}
