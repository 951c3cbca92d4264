use anyhow::Result;
use bicycle_core::transit::{Contract, Ride, Station};

pub fn print_contract(contract: &Contract) {
    println!(
        "{} ({}) center=({:.6}, {:.6}) radius={}m stations={} provider={}",
        contract.name,
        contract.country_code,
        contract.center.y(),
        contract.center.x(),
        contract.radius,
        contract.station_count,
        contract.provider.tag(),
    );
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn print_stations(stations: &[Station], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stations)?);
        return Ok(());
    }

    println!("{:<40} {:>6} {:>6}", "station", "bikes", "docks");
    for station in stations {
        println!(
            "{:<40} {:>6} {:>6}",
            station.display_name(),
            count(station.bikes_count),
            count(station.free_count),
        );
    }
    log::info!("{} stations", stations.len());
    Ok(())
}

pub fn print_ride(ride: &Ride) {
    println!(
        "take a bike at {} ({} bikes)",
        ride.departure.display_name(),
        count(ride.departure.bikes_count)
    );
    println!(
        "drop it at {} ({} docks)",
        ride.arrival.display_name(),
        count(ride.arrival.free_count)
    );
    println!("straight distance: {:.0}m", ride.distance_m);
}
