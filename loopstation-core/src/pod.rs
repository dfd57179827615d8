//! Passenger pods and their degrading functional state.
//!
//! A pod's functionality is not a pure query: every check draws from the pod's
//! own random stream and may knock the pod out of service for good. Callers
//! that need to look without touching use [`Pod::peek_functional`] and
//! [`Pod::passenger_count`], which never draw.
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodClass {
    First,
    Economy,
}

impl PodClass {
    #[must_use]
    pub const fn from_first_class(is_first_class: bool) -> Self {
        if is_first_class {
            Self::First
        } else {
            Self::Economy
        }
    }

    #[must_use]
    pub const fn is_first(self) -> bool {
        matches!(self, Self::First)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Economy => "Economy",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PodError {
    #[error("pod is at capacity ({capacity} passengers)")]
    CapacityExceeded { capacity: usize },
    #[error("pod is malfunctioning")]
    Malfunctioning,
}

struct PodState {
    capacity: usize,
    class: PodClass,
    passengers: Vec<String>,
    functional: bool,
    malfunction_chance: f32,
    rng: Box<dyn RngCore>,
}

impl PodState {
    /// Roll the degradation stream once. A pod that has failed stays failed.
    fn roll_wear(&mut self) {
        if !self.functional || self.malfunction_chance <= 0.0 {
            return;
        }
        if self.rng.r#gen::<f32>() < self.malfunction_chance {
            self.functional = false;
            log::debug!(
                "{} pod (capacity {}) malfunctioned while being checked",
                self.class.label(),
                self.capacity
            );
        }
    }

    fn ensure_in_service(&mut self) -> Result<(), PodError> {
        self.roll_wear();
        if self.functional {
            Ok(())
        } else {
            Err(PodError::Malfunctioning)
        }
    }
}

/// Shared handle to a pod.
///
/// Cloning the handle shares the pod; equality is identity, so two pods with
/// identical contents are still distinct.
#[derive(Clone)]
pub struct Pod {
    inner: Rc<RefCell<PodState>>,
}

impl Pod {
    /// A pod that never degrades on its own.
    #[must_use]
    pub fn new(capacity: usize, class: PodClass) -> Self {
        Self::with_rng(capacity, class, 0.0, SmallRng::seed_from_u64(0))
    }

    /// A pod whose degradation stream is seeded from `seed`.
    #[must_use]
    pub fn with_seed(
        capacity: usize,
        class: PodClass,
        malfunction_chance: f32,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            capacity,
            class,
            malfunction_chance,
            SmallRng::seed_from_u64(seed),
        )
    }

    /// A pod driven by an arbitrary random source.
    #[must_use]
    pub fn with_rng<R>(capacity: usize, class: PodClass, malfunction_chance: f32, rng: R) -> Self
    where
        R: RngCore + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(PodState {
                capacity,
                class,
                passengers: Vec::new(),
                functional: true,
                malfunction_chance: malfunction_chance.clamp(0.0, 1.0),
                rng: Box::new(rng),
            })),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.borrow().capacity
    }

    #[must_use]
    pub fn class(&self) -> PodClass {
        self.inner.borrow().class
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        let state = self.inner.borrow();
        state.passengers.len() >= state.capacity
    }

    /// Number of passengers aboard. Never rolls for wear.
    #[must_use]
    pub fn passenger_count(&self) -> usize {
        self.inner.borrow().passengers.len()
    }

    /// Current functional flag without rolling for degradation.
    #[must_use]
    pub fn peek_functional(&self) -> bool {
        self.inner.borrow().functional
    }

    /// Check the pod. The check itself may break it.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        let mut state = self.inner.borrow_mut();
        state.roll_wear();
        state.functional
    }

    /// Board a passenger.
    ///
    /// # Errors
    ///
    /// Returns [`PodError::Malfunctioning`] if the pod is (or becomes) out of
    /// service, and [`PodError::CapacityExceeded`] if every seat is taken.
    pub fn add_passenger(&self, name: impl Into<String>) -> Result<(), PodError> {
        let mut state = self.inner.borrow_mut();
        state.ensure_in_service()?;
        if state.passengers.len() >= state.capacity {
            return Err(PodError::CapacityExceeded {
                capacity: state.capacity,
            });
        }
        state.passengers.push(name.into());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PodError::Malfunctioning`] if the pod is (or becomes) out of service.
    pub fn contains_passenger(&self, name: &str) -> Result<bool, PodError> {
        let mut state = self.inner.borrow_mut();
        state.ensure_in_service()?;
        Ok(state.passengers.iter().any(|p| p == name))
    }

    /// Passenger names in boarding order.
    ///
    /// # Errors
    ///
    /// Returns [`PodError::Malfunctioning`] if the pod is (or becomes) out of service.
    pub fn passengers(&self) -> Result<Vec<String>, PodError> {
        let mut state = self.inner.borrow_mut();
        state.ensure_in_service()?;
        Ok(state.passengers.clone())
    }

    /// Diagnostic hook for harnesses: force the pod out of service.
    pub fn set_non_functional(&self) {
        self.inner.borrow_mut().functional = false;
    }
}

impl PartialEq for Pod {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Pod {}

impl fmt::Debug for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Pod")
            .field("capacity", &state.capacity)
            .field("class", &state.class)
            .field("passengers", &state.passengers)
            .field("functional", &state.functional)
            .field("malfunction_chance", &state.malfunction_chance)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        write!(
            f,
            "Pod[class={}, capacity={}, passengers={}]",
            state.class.label(),
            state.capacity,
            state.passengers.len()
        )?;
        if !state.functional {
            f.write_str(" (malfunctioning)")?;
        }
        Ok(())
    }
}
