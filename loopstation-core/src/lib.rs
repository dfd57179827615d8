//! LoopStation Core
//!
//! In-memory model of a loop station: passenger pods wait on first-class and
//! economy tracks, launch onto a shared track, and get cleared away once they
//! break down. No I/O and no platform dependencies.

pub mod config;
pub mod pod;
pub mod station;
pub mod track;

// Re-export commonly used types
pub use config::{ConfigError, StationConfig};
pub use pod::{Pod, PodClass, PodError};
pub use station::{Station, StationError, TrackKind};
pub use track::{Track, TrackError};
