//! Seeded soak run with live pod degradation.
use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Scenario;
use loopstation_core::{Pod, Station, StationConfig, Track};

const POD_COUNT: usize = 40;
const RIDERS: usize = 120;

pub fn soak_scenario() -> Scenario {
    Scenario::new(
        "malfunction-soak",
        "Malfunction Soak",
        "Random traffic with live degradation keeps tracks and counts consistent",
        soak_expectation,
    )
}

fn soak_expectation(seed: u64) -> Result<()> {
    let cfg = StationConfig {
        seed,
        malfunction_chance: 0.1,
    };
    let mut station = Station::with_config(cfg)?;
    let mut rng = SmallRng::seed_from_u64(seed);

    for _ in 0..POD_COUNT {
        let capacity = rng.gen_range(0..6);
        station.create_pod(capacity, rng.gen_bool(0.4));
    }
    check_tracks(&station)?;

    let mut faults = 0;
    for rider in 0..RIDERS {
        match station.board_passenger(format!("rider-{rider}"), rng.gen_bool(0.5)) {
            Ok(_) => {}
            Err(err) => {
                faults += 1;
                log::debug!("boarding rider-{rider} failed: {err}");
            }
        }
    }
    log::info!("seed {seed}: {faults} boarding faults");
    check_tracks(&station)?;

    let passengers_before = station.num_passengers();
    for _ in 0..POD_COUNT / 2 {
        station.launch_pod()?;
    }
    anyhow::ensure!(
        station.num_passengers() == passengers_before,
        "launching changed the passenger total"
    );

    let launched_before = station.num_launched();
    let removed = station.clear_malfunctioning();
    anyhow::ensure!(
        station.num_launched() == launched_before - removed,
        "cleanup reported {removed} removals but launched went {launched_before} -> {}",
        station.num_launched()
    );
    anyhow::ensure!(
        station.launched().iter().all(Pod::peek_functional),
        "a malfunctioning pod survived cleanup"
    );
    anyhow::ensure!(
        station.num_launched() + station.num_waiting() == POD_COUNT - removed,
        "pods went missing outside cleanup"
    );
    check_tracks(&station)
}

fn check_tracks(station: &Station) -> Result<()> {
    for (label, track) in [
        ("launched", station.launched()),
        ("waiting first", station.waiting_first()),
        ("waiting economy", station.waiting_economy()),
    ] {
        check_links(label, track)?;
    }
    let pods: Vec<&Pod> = [
        station.launched(),
        station.waiting_first(),
        station.waiting_economy(),
    ]
    .into_iter()
    .flat_map(Track::iter)
    .collect();
    anyhow::ensure!(
        pods.iter().all(|pod| pod.passenger_count() <= pod.capacity()),
        "a pod holds more riders than its capacity"
    );
    let seated: usize = pods.iter().map(|pod| pod.passenger_count()).sum();
    anyhow::ensure!(
        seated == station.num_passengers(),
        "passenger total {} disagrees with seated riders {seated}",
        station.num_passengers()
    );
    Ok(())
}

fn check_links(label: &str, track: &Track) -> Result<()> {
    let forward = track.iter().count();
    let backward = track.iter_rev().count();
    anyhow::ensure!(
        forward == track.size() && backward == track.size(),
        "{label} track size {} but walks {forward} forward and {backward} backward",
        track.size()
    );
    anyhow::ensure!(
        track.is_empty() == (track.size() == 0),
        "{label} track emptiness disagrees with its size"
    );
    Ok(())
}
