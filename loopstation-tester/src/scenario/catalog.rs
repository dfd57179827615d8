use anyhow::{Result, anyhow};

use super::Scenario;
use loopstation_core::{Pod, PodClass, Station, StationConfig, StationError, Track};

pub fn catalog_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "create-pod",
            "Create Pod",
            "Pods land on the waiting track that matches their class",
            create_pod_expectation,
        ),
        Scenario::new(
            "launch-pod",
            "Launch Pod",
            "Newest first-class pod launches first, then economy in arrival order",
            launch_pod_expectation,
        ),
        Scenario::new(
            "empty-station-launch",
            "Empty Station Launch",
            "Launching with nothing waiting reports NoWaitingPods",
            empty_station_expectation,
        ),
        Scenario::new(
            "clear-malfunctioning",
            "Clear Malfunctioning",
            "Cleanup removes exactly the broken launched pods",
            clear_malfunctioning_expectation,
        ),
        Scenario::new(
            "get-nums",
            "Station Counts",
            "Launched, waiting and passenger totals follow every change",
            get_nums_expectation,
        ),
        Scenario::new(
            "insertion-order",
            "Insertion Order",
            "First class stacks at the head, economy queues at the tail",
            insertion_order_expectation,
        ),
        Scenario::new(
            "boarding-boundary",
            "Boarding Boundary",
            "Boarding fills free seats only and refuses once the class is full",
            boarding_boundary_expectation,
        ),
    ]
}

fn reliable_station(seed: u64) -> Result<Station> {
    Ok(Station::with_config(StationConfig::reliable(seed))?)
}

fn create_pod_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;

    let first = station.create_pod(10, true);
    anyhow::ensure!(first.class().is_first(), "expected a first-class pod");
    anyhow::ensure!(
        station.waiting_first().size() == 1 && station.waiting_economy().size() == 0,
        "first-class pod queued on the wrong track"
    );

    let economy = station.create_pod(20, false);
    anyhow::ensure!(
        economy.class() == PodClass::Economy,
        "expected an economy pod"
    );
    anyhow::ensure!(
        station.waiting_first().size() == 1 && station.waiting_economy().size() == 1,
        "economy pod queued on the wrong track"
    );

    anyhow::ensure!(
        station.waiting_first().contains(&first) && station.waiting_economy().contains(&economy),
        "returned handles do not refer to the queued pods"
    );
    anyhow::ensure!(
        first.capacity() == 10 && economy.capacity() == 20,
        "capacities were not kept"
    );
    Ok(())
}

fn launch_pod_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;
    let a = station.create_pod(10, true);
    let b = station.create_pod(10, true);
    let x = station.create_pod(20, false);
    let y = station.create_pod(20, false);

    for (step, expected) in [b, a, x, y].iter().enumerate() {
        let launched = station.launch_pod()?;
        anyhow::ensure!(
            &launched == expected,
            "launch {} picked {launched}, expected {expected}",
            step + 1
        );
        anyhow::ensure!(
            station.num_launched() == step + 1,
            "launched track holds {} pods after {} launches",
            station.num_launched(),
            step + 1
        );
    }
    Ok(())
}

fn empty_station_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;
    match station.launch_pod() {
        Err(StationError::NoWaitingPods) => Ok(()),
        Err(other) => Err(anyhow!("unexpected error: {other}")),
        Ok(pod) => Err(anyhow!("empty station launched {pod}")),
    }
}

fn clear_malfunctioning_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;
    let pods: Vec<Pod> = (0..3).map(|_| station.create_pod(10, true)).collect();
    for _ in 0..pods.len() {
        station.launch_pod()?;
    }
    let before = station.num_launched();

    pods[0].set_non_functional();
    pods[2].set_non_functional();
    let removed = station.clear_malfunctioning();

    anyhow::ensure!(removed == 2, "expected 2 removals, got {removed}");
    anyhow::ensure!(
        station.num_launched() == before - removed,
        "launched size does not match reported removals"
    );
    anyhow::ensure!(
        !station.launched().contains(&pods[0]) && !station.launched().contains(&pods[2]),
        "a malfunctioning pod is still on the launched track"
    );
    anyhow::ensure!(
        station.launched().contains(&pods[1]),
        "the working pod was removed"
    );
    Ok(())
}

fn get_nums_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;
    anyhow::ensure!(
        station.num_launched() == 0 && station.num_waiting() == 0 && station.num_passengers() == 0,
        "fresh station is not empty"
    );

    let first = station.create_pod(3, true);
    first.add_passenger("Alice")?;
    first.add_passenger("Bob")?;
    let economy = station.create_pod(2, false);
    economy.add_passenger("Charlie")?;
    anyhow::ensure!(
        station.num_waiting() == 2,
        "waiting count {} != 2",
        station.num_waiting()
    );
    anyhow::ensure!(
        station.num_passengers() == 3,
        "passenger count {} != 3",
        station.num_passengers()
    );

    station.launch_pod()?;
    anyhow::ensure!(
        station.num_launched() == 1 && station.num_waiting() == 1,
        "launch did not move exactly one pod"
    );
    anyhow::ensure!(
        station.num_passengers() == 3,
        "launching changed the passenger count"
    );
    Ok(())
}

fn insertion_order_expectation(_seed: u64) -> Result<()> {
    let mut track = Track::new();
    let firsts: Vec<Pod> = (0..3).map(|_| Pod::new(2, PodClass::First)).collect();
    let economies: Vec<Pod> = (0..3).map(|_| Pod::new(2, PodClass::Economy)).collect();
    for (f, e) in firsts.iter().zip(&economies) {
        track.add(e.clone());
        track.add(f.clone());
    }

    let expected: Vec<&Pod> = firsts.iter().rev().chain(economies.iter()).collect();
    for (index, pod) in expected.iter().enumerate() {
        anyhow::ensure!(
            track.get(index)? == **pod,
            "position {index} holds the wrong pod"
        );
    }
    anyhow::ensure!(
        track.iter().count() == track.size() && track.iter().rev().count() == track.size(),
        "link walk disagrees with track size"
    );

    track.clear();
    anyhow::ensure!(
        track.is_empty() && track.size() == 0 && track.get(0).is_err(),
        "cleared track does not behave like a new one"
    );
    Ok(())
}

fn boarding_boundary_expectation(seed: u64) -> Result<()> {
    let mut station = reliable_station(seed)?;
    let pods = [
        station.create_pod(1, true),
        station.create_pod(2, true),
        station.create_pod(1, false),
    ];

    let mut boarded = 0;
    for i in 0..5 {
        if station.board_passenger(format!("first-{i}"), true)? {
            boarded += 1;
        }
    }
    anyhow::ensure!(boarded == 3, "boarded {boarded} first-class riders, expected 3");
    anyhow::ensure!(
        pods[2].passenger_count() == 0,
        "first-class rider landed in economy"
    );
    anyhow::ensure!(
        pods.iter().all(|pod| pod.passenger_count() <= pod.capacity()),
        "a pod was overfilled"
    );
    anyhow::ensure!(
        station.board_passenger("econ-0", false)? && !station.board_passenger("econ-1", false)?,
        "economy boarding did not stop at capacity"
    );
    Ok(())
}
