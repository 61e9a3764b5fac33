pub mod angle;
pub mod filter;
pub mod geodesy;
pub mod spline;

pub use angle::{fold_to_180, fold_to_90, normalize, to_degrees, to_radians};
pub use filter::ScalarFilter;
pub use spline::cubic_spline;
