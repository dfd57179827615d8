//! Station orchestration: waiting queues, launches and malfunction cleanup.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, StationConfig, derive_pod_seed};
use crate::pod::{Pod, PodClass};
use crate::track::{Track, TrackError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StationError {
    #[error("no pods are waiting to launch")]
    NoWaitingPods,
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Which of the station's tracks a pod sits on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Launched,
    WaitingFirst,
    WaitingEconomy,
}

#[derive(Debug)]
pub struct Station {
    launched: Track,
    waiting_first: Track,
    waiting_economy: Track,
    config: StationConfig,
    pods_created: u64,
}

impl Default for Station {
    fn default() -> Self {
        Self::from_valid_config(StationConfig::default())
    }
}

impl Station {
    /// Station with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(config: StationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StationConfig) -> Self {
        Self {
            launched: Track::new(),
            waiting_first: Track::new(),
            waiting_economy: Track::new(),
            config,
            pods_created: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }

    #[must_use]
    pub const fn launched(&self) -> &Track {
        &self.launched
    }

    #[must_use]
    pub const fn waiting_first(&self) -> &Track {
        &self.waiting_first
    }

    #[must_use]
    pub const fn waiting_economy(&self) -> &Track {
        &self.waiting_economy
    }

    /// Build a pod and queue it on the matching waiting track.
    ///
    /// The returned handle shares the queued pod.
    pub fn create_pod(&mut self, capacity: usize, is_first_class: bool) -> Pod {
        let class = PodClass::from_first_class(is_first_class);
        let seed = derive_pod_seed(self.config.seed, self.pods_created);
        self.pods_created += 1;
        let pod = Pod::with_seed(capacity, class, self.config.malfunction_chance, seed);
        log::debug!("created {} pod with capacity {capacity}", class.label());
        self.waiting_mut(class).add(pod.clone());
        pod
    }

    /// Launch the next waiting pod and return it.
    ///
    /// First class goes before economy. The newest first-class pod launches
    /// first; economy pods launch in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::NoWaitingPods`] when both queues are empty.
    pub fn launch_pod(&mut self) -> Result<Pod, StationError> {
        let pod = if !self.waiting_first.is_empty() {
            self.waiting_first.remove(0)?
        } else if !self.waiting_economy.is_empty() {
            self.waiting_economy.remove(0)?
        } else {
            return Err(StationError::NoWaitingPods);
        };
        log::debug!("launching {pod}");
        self.launched.add(pod.clone());
        Ok(pod)
    }

    /// Remove every launched pod found malfunctioning and return how many went.
    ///
    /// Each pass rescans from the head, checking pods as it goes, so a check
    /// can break a pod that an earlier pass saw working.
    pub fn clear_malfunctioning(&mut self) -> usize {
        let mut removed = 0;
        while let Some(pod) = self.launched.remove_first_non_functional() {
            log::debug!("cleared {pod} from launched track");
            removed += 1;
        }
        removed
    }

    #[must_use]
    pub const fn num_launched(&self) -> usize {
        self.launched.size()
    }

    #[must_use]
    pub const fn num_waiting(&self) -> usize {
        self.waiting_first.size() + self.waiting_economy.size()
    }

    /// Passengers across all three tracks. Never rolls a pod for wear.
    #[must_use]
    pub fn num_passengers(&self) -> usize {
        [&self.launched, &self.waiting_first, &self.waiting_economy]
            .into_iter()
            .flat_map(Track::iter)
            .map(Pod::passenger_count)
            .sum()
    }

    /// Board a passenger onto a waiting pod of the requested class.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen pod malfunctions while boarding.
    pub fn board_passenger(
        &self,
        name: impl Into<String>,
        is_first_class: bool,
    ) -> Result<bool, StationError> {
        let class = PodClass::from_first_class(is_first_class);
        let track = match class {
            PodClass::First => &self.waiting_first,
            PodClass::Economy => &self.waiting_economy,
        };
        Ok(track.add_passenger(name, class)?)
    }

    /// Locate a passenger, checking launched pods before waiting ones.
    #[must_use]
    pub fn find_passenger(&self, name: &str) -> Option<(TrackKind, usize)> {
        [
            (TrackKind::Launched, &self.launched),
            (TrackKind::WaitingFirst, &self.waiting_first),
            (TrackKind::WaitingEconomy, &self.waiting_economy),
        ]
        .into_iter()
        .find_map(|(kind, track)| track.find_passenger(name).map(|index| (kind, index)))
    }

    fn waiting_mut(&mut self, class: PodClass) -> &mut Track {
        match class {
            PodClass::First => &mut self.waiting_first,
            PodClass::Economy => &mut self.waiting_economy,
        }
    }
}
