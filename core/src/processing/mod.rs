pub mod angle_buffer;
pub mod compass;
pub mod gps;
pub mod hydro;
pub mod wind;

pub use angle_buffer::AngleBuffer;
pub use compass::CompassProcessor;
pub use gps::GpsProcessor;
pub use hydro::HydroProcessor;
pub use wind::WindProcessor;
