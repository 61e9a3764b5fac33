//! NMEA-0183 decoding and sailing navigation math.
//!
//! Raw sentences enter through the [`Dispatcher`], which validates them, updates the
//! per-channel records, then recomputes polar performance and the waypoint/layline
//! figures. Consumers read fused [`Snapshot`]s.

pub mod dispatcher;
pub mod math;
pub mod nmea;
pub mod performance;
pub mod prelude;
pub mod processing;
pub mod records;
pub mod snapshot;
pub mod telemetry;
pub mod waypoint;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use prelude::{Coordinate, NavError, NavResult, NavigationConfig, SailingState};
pub use snapshot::{DisplayChannel, Snapshot, WindUnits};
